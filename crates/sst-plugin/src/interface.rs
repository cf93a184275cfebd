//! `CreateInterface`: the one symbol the engine actually looks up by name
//! in this plugin's binary, per Valve's `factory.h` convention.
//!
//! Converted from: `original_source/src/sst.c`'s `CreateInterface`, which
//! matches a fixed `"ISERVERPLUGINCALLBACKS00"` prefix followed by a single
//! ASCII digit `1`..`3` and a NUL.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_void};

const IFACE_PREFIX: &[u8] = b"ISERVERPLUGINCALLBACKS00";

/// Parses the trailing digit of an `ISERVERPLUGINCALLBACKS00N` interface
/// name. Returns `None` for anything else, including a correct prefix
/// followed by more than one extra character.
fn parse_version(name: &CStr) -> Option<u8> {
    let bytes = name.to_bytes();
    if !bytes.starts_with(IFACE_PREFIX) {
        return None;
    }
    let rest = &bytes[IFACE_PREFIX.len()..];
    match rest {
        [digit @ b'1'..=b'3'] => Some(digit - b'0'),
        _ => None,
    }
}

/// # Safety
/// `name` must be a valid, NUL-terminated C string for the duration of the
/// call, as guaranteed by the engine's `CreateInterface` calling convention.
#[no_mangle]
pub unsafe extern "C" fn CreateInterface(name: *const c_char, ret: *mut c_int) -> *const c_void {
    if name.is_null() {
        if !ret.is_null() {
            *ret = 1;
        }
        return std::ptr::null();
    }
    let cname = CStr::from_ptr(name);
    match parse_version(cname) {
        Some(version) => {
            crate::lifecycle::finish_loading_vtable(version, true);
            if !ret.is_null() {
                *ret = 0;
            }
            crate::vtable::plugin_obj_ptr() as *const c_void
        }
        None => {
            if !ret.is_null() {
                *ret = 1;
            }
            std::ptr::null()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cstr(s: &str) -> std::ffi::CString {
        std::ffi::CString::new(s).unwrap()
    }

    #[test]
    fn accepts_known_versions() {
        for v in 1..=3u8 {
            let name = cstr(&format!("ISERVERPLUGINCALLBACKS00{v}"));
            assert_eq!(parse_version(&name), Some(v));
        }
    }

    #[test]
    fn rejects_out_of_range_digit_and_trailing_garbage() {
        assert_eq!(parse_version(&cstr("ISERVERPLUGINCALLBACKS004")), None);
        assert_eq!(parse_version(&cstr("ISERVERPLUGINCALLBACKS001x")), None);
        assert_eq!(parse_version(&cstr("SomeOtherInterface001")), None);
    }

    #[test]
    fn create_interface_returns_null_for_unknown_name() {
        let name = cstr("NotAPluginInterface");
        let mut ret: c_int = 0;
        let p = unsafe { CreateInterface(name.as_ptr(), &mut ret) };
        assert!(p.is_null());
        assert_eq!(ret, 1);
    }

    #[test]
    fn create_interface_returns_plugin_obj_for_known_name() {
        let name = cstr("ISERVERPLUGINCALLBACKS002");
        let mut ret: c_int = 0;
        let p = unsafe { CreateInterface(name.as_ptr(), &mut ret) };
        assert!(!p.is_null());
        assert_eq!(ret, 0);
    }
}
