// dl.rs — dynamic-library lookups: symbol-by-name, module-handle-by-name,
// module-path-by-handle. These are the primitives sst-plugin uses to find
// engine interfaces and sst-hook uses to locate functions to patch.
//
// Converted from: examples/original_source/src/os.h (os_dlsym/os_dlhandle/
// os_dlfile).

use crate::error::{PlatformError, Result};
use crate::native_str::NativeString;
use std::ffi::CString;
use std::path::PathBuf;

/// Opaque handle to a loaded module. Does not own/unload the library --
/// that's `libloading::Library`'s job for libraries *we* load; this type is
/// for probing modules the host has already loaded.
#[derive(Clone, Copy, Debug)]
pub struct ModuleHandle(*mut std::ffi::c_void);

#[cfg(unix)]
pub fn dlsym(lib: ModuleHandle, sym: &str) -> Result<*mut std::ffi::c_void> {
    let c = CString::new(sym).map_err(|_| PlatformError::DlLookup(sym.to_string()))?;
    let p = unsafe { libc::dlsym(lib.0, c.as_ptr()) };
    if p.is_null() {
        return Err(PlatformError::DlLookup(sym.to_string()));
    }
    Ok(p)
}

#[cfg(unix)]
pub fn dlhandle(name: &str) -> Option<ModuleHandle> {
    let ns = NativeString::from_str(name);
    let h = unsafe { libc::dlopen(ns.as_c_char_ptr(), libc::RTLD_NOLOAD | libc::RTLD_NOW) };
    if h.is_null() {
        None
    } else {
        Some(ModuleHandle(h))
    }
}

/// The handle of the module containing `address` -- used to find the
/// currently-running plugin's own handle (by passing the address of a
/// function inside it) without needing a name or a priori knowledge of
/// where it's loaded from.
#[cfg(unix)]
pub fn handle_containing(address: *const std::ffi::c_void) -> Option<ModuleHandle> {
    let mut info: libc::Dl_info = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::dladdr(address, &mut info) };
    if rc == 0 || info.dli_fbase.is_null() {
        return None;
    }
    Some(ModuleHandle(info.dli_fbase))
}

#[cfg(windows)]
pub fn handle_containing(address: *const std::ffi::c_void) -> Option<ModuleHandle> {
    use windows_sys::Win32::System::LibraryLoader::{
        GetModuleHandleExW, GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS,
        GET_MODULE_HANDLE_EX_FLAG_UNCHANGED_REFCOUNT,
    };
    let mut h = 0isize;
    let ok = unsafe {
        GetModuleHandleExW(
            GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS | GET_MODULE_HANDLE_EX_FLAG_UNCHANGED_REFCOUNT,
            address as *const u16,
            &mut h,
        )
    };
    if ok == 0 || h == 0 {
        None
    } else {
        Some(ModuleHandle(h as *mut _))
    }
}

#[cfg(unix)]
pub fn dlfile(lib: ModuleHandle) -> Option<PathBuf> {
    // dladdr needs a symbol inside the module; as a module-path probe we use
    // the handle itself cast to an address, which works for the common case
    // of the handle doubling as the link_map base on glibc. Best-effort, the
    // same caveat the original carries (os_dlfile is platform-specific and
    // not fully portable there either).
    let mut info: libc::Dl_info = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::dladdr(lib.0, &mut info) };
    if rc == 0 || info.dli_fname.is_null() {
        return None;
    }
    let cstr = unsafe { std::ffi::CStr::from_ptr(info.dli_fname) };
    Some(PathBuf::from(cstr.to_string_lossy().into_owned()))
}

#[cfg(windows)]
pub fn dlsym(lib: ModuleHandle, sym: &str) -> Result<*mut std::ffi::c_void> {
    use windows_sys::Win32::System::LibraryLoader::GetProcAddress;
    let c = CString::new(sym).map_err(|_| PlatformError::DlLookup(sym.to_string()))?;
    let p = unsafe { GetProcAddress(lib.0 as _, c.as_ptr() as *const u8) };
    match p {
        Some(p) => Ok(p as *mut std::ffi::c_void),
        None => Err(PlatformError::DlLookup(sym.to_string())),
    }
}

#[cfg(windows)]
pub fn dlhandle(name: &str) -> Option<ModuleHandle> {
    use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
    let ns = NativeString::from_str(name);
    let h = unsafe { GetModuleHandleW(ns.as_wide_ptr()) };
    if h == 0 {
        None
    } else {
        Some(ModuleHandle(h as *mut _))
    }
}

#[cfg(windows)]
pub fn dlfile(lib: ModuleHandle) -> Option<PathBuf> {
    use windows_sys::Win32::System::LibraryLoader::GetModuleFileNameW;
    let mut buf = [0u16; 4096];
    let n = unsafe { GetModuleFileNameW(lib.0 as _, buf.as_mut_ptr(), buf.len() as u32) };
    if n == 0 {
        return None;
    }
    Some(PathBuf::from(String::from_utf16_lossy(&buf[..n as usize])))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn handle_containing_self_resolves_to_a_real_file() {
        let here = handle_containing as *const std::ffi::c_void;
        let handle = handle_containing(here).expect("dladdr should resolve our own address");
        let path = dlfile(handle).expect("dlfile should resolve a path for our own module");
        assert!(path.exists(), "resolved path {:?} should exist on disk", path);
    }
}
