//! Developer-facing wrapper around `sst-codegen`'s library API. Not part
//! of the plugin's runtime surface -- this is the thing a contributor runs
//! by hand to check a gamedata file or print a feature's dependency order
//! before committing to a full build.
//!
//! Converted from: SkyTemple-c-of-time's `cargo-cot`, whose `Opt`/`Commands`
//! derive-based shape this mirrors, generalized from that tool's two
//! ROM-burning subcommands to this project's four codegen subcommands.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "sst-cli", version, about = "Developer tooling for gamedata/entprops/feature-graph compilation")]
struct Opt {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Gamedata text-format operations.
    Gamedata {
        #[command(subcommand)]
        command: GamedataCommand,
    },
    /// Entity-property text-format operations.
    Entprops {
        #[command(subcommand)]
        command: EntpropsCommand,
    },
    /// Prints a feature crate's resolved dependency order, or reports a cycle.
    FeatureGraph {
        /// Root of the feature crate to scan (its `src/` is globbed recursively).
        crate_dir: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum GamedataCommand {
    /// Parses a gamedata file and reports success, without emitting anything.
    Check { file: PathBuf },
    /// Parses and compiles a gamedata file to generated Rust source.
    Compile {
        file: PathBuf,
        /// Defaults to `sst.toml`'s `output.gamedata`, then the input's stem with a `.rs` extension.
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum EntpropsCommand {
    /// Parses and compiles an entity-property file to generated Rust source.
    Compile {
        file: PathBuf,
        /// Defaults to `sst.toml`'s `output.entprops`, then the input's stem with a `.rs` extension.
        out: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::parse();

    match opt.command {
        Command::Gamedata { command: GamedataCommand::Check { file } } => commands::gamedata_check(&file),
        Command::Gamedata { command: GamedataCommand::Compile { file, out } } => {
            commands::gamedata_compile(&file, out)
        }
        Command::Entprops { command: EntpropsCommand::Compile { file, out } } => {
            commands::entprops_compile(&file, out)
        }
        Command::FeatureGraph { crate_dir } => commands::feature_graph(&crate_dir),
    }
}
