//! In-process console-variable/command registry, ABI-compatible with the
//! host engine's own `ICvar`/`ConCommand` machinery.
//!
//! Converted from: examples/original_source/src/con_.h and
//! examples/mattx86-myq2-rust/crates/myq2-common/src/{cvar,cmd}.rs.

pub mod abi;
pub mod cmd;
pub mod error;
pub mod flags;
pub mod registry;
pub mod var;

pub use abi::{detect, VtableShape};
pub use cmd::{Cmd, CmdFn, HookOrder};
pub use error::{ConError, Result};
pub use registry::Registry;
pub use var::Var;
