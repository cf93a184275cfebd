//! Host plugin entry point: `CreateInterface`, the versioned callback
//! vtable, and the load/unload lifecycle that wires the console, gamedata,
//! and feature registries together.
//!
//! Converted from: `examples/mattx86-myq2-rust/crates/myq2-game-dll`'s
//! `GetGameApi` cdylib entry point and `Mutex`-guarded global game state,
//! generalized from Quake2's single fixed export struct to the Source
//! engine's `CreateInterface`-by-name convention and versioned vtable tail,
//! per `original_source/src/sst.c`.

pub mod autoload;
pub mod commands;
mod error;
mod identity;
mod interface;
mod lifecycle;
mod vtable;

pub use error::{PluginError, Result};
pub use interface::CreateInterface;
pub use lifecycle::{command_client, request_unload};
