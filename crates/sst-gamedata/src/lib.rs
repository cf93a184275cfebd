//! Runtime table of discovered offsets, v-table indices, and known-game
//! bitmasks, populated at load by matching host identity against
//! declarative rules emitted at build time.
//!
//! Converted from: examples/original_source/src/gamedata.c/.h.

pub mod error;
pub mod identity;
pub mod store;

pub use error::{GamedataError, Result};
pub use identity::Identity;
pub use store::{Store, MISSING};
