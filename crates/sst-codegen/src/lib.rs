//! Build-time scanning and text-format compilers shared by every feature
//! crate's `build.rs`: the feature/event macro-surface scanner, the
//! gamedata text compiler, and the entity-property text compiler.
//!
//! Converted from: examples/original_source/src/build/*.c, the standalone
//! host-side tool invoked before the C build proper. Here the equivalent
//! logic is a library a `build.rs` calls directly rather than a separate
//! executable shelled out to, since Cargo's build-script protocol makes
//! that unnecessary.

mod emit;
mod entprops;
mod error;
mod gamedata;
mod scan;
mod trie;

pub use emit::{gen_cvar_decls, gen_driver, gen_events, gen_name_index};
pub use entprops::{gen_entprops, EntPropTree, RawEntry as EntPropEntry};
pub use error::{CodegenError, CodegenResult, ParseError, ParseResult};
pub use gamedata::{gen_gamedata, RawEntry as GamedataEntry};
pub use scan::{scan, validate, CvarDecl, EventDecl, FeatureDecl, Graph, HandlerDecl};
pub use trie::CritBitTrie;

pub mod parse {
    pub use crate::entprops::parse as entprops;
    pub use crate::gamedata::parse as gamedata;
}
