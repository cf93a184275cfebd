//! Memory/patch helpers: unaligned loads, pointer arithmetic, page-granular
//! protection changes, hex colour parsing.
//!
//! Converted from: examples/original_source/src/mem.h, src/hexcolour.c.

pub mod hexcolour;
pub mod load;
pub mod protect;

pub use hexcolour::{parse_hex_colour, Rgba};
pub use load::{diff, load_ptr, load_s32, load_s64, load_u32, load_u64, offset};
pub use protect::protect;
