// protect.rs — page-granular memory protection, rounding the requested
// range down to the start and up to the end of containing pages.
//
// Converted from: examples/original_source/src/mem.h design note
// ("page-granular memory protection changes (rounded down to page start, up
// to page end)"); the actual rounding arithmetic lives in sst-platform's
// mprot backend, which already does the rounding. This module is the
// documented, crate-public "patch helper" wrapper the rest of the workspace
// (sst-hook in particular) is expected to call.

pub use sst_platform::mprot::{
    PAGE_EXECUTE_READ, PAGE_EXECUTE_READWRITE, PAGE_NOACCESS, PAGE_READONLY, PAGE_READWRITE,
};

/// Changes protection on the pages spanning `[addr, addr+len)`.
pub fn protect(addr: *mut u8, len: usize, mode: u32) -> sst_platform::Result<()> {
    sst_platform::mprot::mprotect(addr, len, mode)
}
