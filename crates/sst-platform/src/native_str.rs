// native_str.rs — OS-native path/string handling.
//
// Per the design notes: string handling in paths must use an OS-native char
// type and do the narrow-to-wide conversion at the edge (here), not inside
// the rest of the core. Unix keeps bytes as-is; Windows widens to UTF-16.

use std::path::Path;

#[cfg(windows)]
pub type NativeChar = u16;
#[cfg(unix)]
pub type NativeChar = u8;

/// An owned OS-native string, built once at the edge from a user-supplied
/// `&str`/`Path` and then passed unchanged through the rest of the seam.
#[derive(Clone, Debug)]
pub struct NativeString(Vec<NativeChar>);

impl NativeString {
    #[cfg(windows)]
    pub fn from_path(path: &Path) -> Self {
        use std::os::windows::ffi::OsStrExt;
        let mut v: Vec<u16> = path.as_os_str().encode_wide().collect();
        v.push(0);
        NativeString(v)
    }

    #[cfg(unix)]
    pub fn from_path(path: &Path) -> Self {
        use std::os::unix::ffi::OsStrExt;
        let mut v: Vec<u8> = path.as_os_str().as_bytes().to_vec();
        v.push(0);
        NativeString(v)
    }

    pub fn from_str(s: &str) -> Self {
        Self::from_path(Path::new(s))
    }

    /// NUL-terminated slice suitable for passing to a raw OS call.
    pub fn as_native_cstr(&self) -> &[NativeChar] {
        &self.0
    }

    #[cfg(unix)]
    pub fn as_c_char_ptr(&self) -> *const libc::c_char {
        self.0.as_ptr() as *const libc::c_char
    }

    #[cfg(windows)]
    pub fn as_wide_ptr(&self) -> *const u16 {
        self.0.as_ptr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_ascii_path() {
        let ns = NativeString::from_str("addons/sst.dll");
        assert!(ns.as_native_cstr().last() == Some(&0));
    }
}
