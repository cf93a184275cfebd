//! `sst.toml`: default output paths for the `compile` subcommands, so a
//! developer invoking `sst-cli gamedata compile foo.gamedata` from a crate
//! root doesn't have to spell out `--out` every time.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    pub gamedata: Option<PathBuf>,
    pub entprops: Option<PathBuf>,
}

impl Config {
    /// Loads `sst.toml` from `dir` if present; a missing file is not an
    /// error, since every output path can also be given explicitly on the
    /// command line.
    pub fn load(dir: &Path) -> anyhow::Result<Config> {
        let path = dir.join("sst.toml");
        match std::fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text)
                .map_err(|e| anyhow::anyhow!("{}: {e}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(anyhow::anyhow!("{}: {e}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_default_config() {
        let dir = std::env::temp_dir().join("sst-cli-config-test-missing");
        let cfg = Config::load(&dir).unwrap();
        assert!(cfg.output.gamedata.is_none());
    }

    #[test]
    fn parses_output_table() {
        let dir = std::env::temp_dir().join(format!("sst-cli-config-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("sst.toml"),
            "[output]\ngamedata = \"gen/gamedata.rs\"\n",
        )
        .unwrap();
        let cfg = Config::load(&dir).unwrap();
        assert_eq!(cfg.output.gamedata, Some(PathBuf::from("gen/gamedata.rs")));
        std::fs::remove_dir_all(&dir).ok();
    }
}
