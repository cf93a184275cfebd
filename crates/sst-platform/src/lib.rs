//! Platform seam: the one place in the workspace allowed to call directly
//! into OS APIs. Everything above this crate talks to files, dynamic
//! libraries, and memory protection only through here.
//!
//! Converted from: examples/original_source/src/os.h, examples/
//! mattx86-myq2-rust/crates/myq2-common/src/files.rs.

pub mod dl;
pub mod error;
pub mod fs;
pub mod mprot;
pub mod native_str;
pub mod rand;
pub mod secure_page;

pub use dl::{dlfile, dlhandle, dlsym, handle_containing, ModuleHandle};
pub use error::{PlatformError, RawOsError, Result};
pub use fs::FileHandle;
pub use native_str::NativeString;
pub use secure_page::SecurePage;
