// error.rs — the seam's own "last error" type, kept distinct from libc
// errno/io::Error so a plugin embedded in a host with a different CRT isn't
// misled by whichever errno happens to be sitting around.

use std::fmt;

/// Raw OS error code captured at the point of failure (GetLastError() on
/// Windows, errno on Unix). Not every seam call fails this way -- a few
/// return `Option`/`bool` with no further detail, matching the C original.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RawOsError(pub i32);

impl fmt::Display for RawOsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "os error {}", self.0)
    }
}

impl std::error::Error for RawOsError {}

#[derive(thiserror::Error, Debug)]
pub enum PlatformError {
    #[error("couldn't open {path}: {source}")]
    Open { path: String, source: RawOsError },
    #[error("read failed: {0}")]
    Read(RawOsError),
    #[error("write failed: {0}")]
    Write(RawOsError),
    #[error("couldn't create directory {path}: {source}")]
    Mkdir { path: String, source: RawOsError },
    #[error("couldn't remove {path}: {source}")]
    Remove { path: String, source: RawOsError },
    #[error("couldn't change memory protection: {0}")]
    Mprotect(RawOsError),
    #[error("couldn't lock page in memory: {0}")]
    LockPage(RawOsError),
    #[error("dynamic library lookup failed for {0}")]
    DlLookup(String),
}

pub type Result<T> = std::result::Result<T, PlatformError>;

/// The well-known error codes the original exposes as OS_EEXIST/OS_ENOENT,
/// since callers frequently want to treat "already there"/"already gone" as
/// non-fatal.
#[cfg(unix)]
pub mod codes {
    pub const EEXIST: i32 = libc::EEXIST;
    pub const ENOENT: i32 = libc::ENOENT;
}

#[cfg(windows)]
pub mod codes {
    pub const EEXIST: i32 = 183; // ERROR_ALREADY_EXISTS
    pub const ENOENT: i32 = 3; // ERROR_PATH_NOT_FOUND
}
