//! Variable/command flag bits.
//!
//! Converted from: examples/original_source/src/con_.h's anonymous flag enum.
//! Kept as a flat bitmask of plain `u32` constants (rather than reaching for
//! the `bitflags` crate) since these values must match the host engine's own
//! bit layout exactly and are combined with plain `|`/`&` throughout, same as
//! the teacher's `CVAR_*` constants in `q_shared.rs`.

pub const UNREG: u32 = 1;
pub const DEVONLY: u32 = 1 << 1;
pub const SERVERSIDE: u32 = 1 << 2;
pub const CLIENTDLL: u32 = 1 << 3;
pub const HIDDEN: u32 = 1 << 4;
pub const PROTECTED: u32 = 1 << 5;
pub const SPONLY: u32 = 1 << 6;
pub const ARCHIVE: u32 = 1 << 7;
pub const NOTIFY: u32 = 1 << 8;
pub const USERINFO: u32 = 1 << 9;
pub const PRINTABLE: u32 = 1 << 10;
pub const UNLOGGED: u32 = 1 << 11;
pub const NOPRINT: u32 = 1 << 12;
pub const REPLICATE: u32 = 1 << 13;
pub const CHEAT: u32 = 1 << 14;
pub const DEMO: u32 = 1 << 16;
pub const NORECORD: u32 = 1 << 17;
pub const NOTCONN: u32 = 1 << 22;
pub const SRVEXEC: u32 = 1 << 28;
pub const NOSRVQUERY: u32 = 1 << 29;
pub const CCMDEXEC: u32 = 1 << 30;
