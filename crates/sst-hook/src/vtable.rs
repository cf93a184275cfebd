//! V-table slot replacement.
//!
//! Converted from: examples/original_source/src/hook.h's
//! `hook_vtable`/`unhook_vtable` inline functions.

use std::ffi::c_void;

/// Replaces `vtable[off]` with `target` and returns the previous value.
///
/// # Safety
/// `vtable` must point to a valid, writable array of at least `off + 1`
/// function-pointer slots. The caller is responsible for having made the
/// containing page writable first (the C original's own precondition).
pub unsafe fn hook_vtable(vtable: *mut *mut c_void, off: usize, target: *mut c_void) -> *mut c_void {
    let slot = vtable.add(off);
    let orig = *slot;
    *slot = target;
    orig
}

/// Restores a previously saved v-table entry.
///
/// # Safety
/// Same preconditions as `hook_vtable`.
pub unsafe fn unhook_vtable(vtable: *mut *mut c_void, off: usize, orig: *mut c_void) {
    *vtable.add(off) = orig;
}

#[cfg(test)]
mod tests {
    use super::*;

    extern "C" fn original() -> i32 {
        1
    }
    extern "C" fn replacement() -> i32 {
        2
    }

    #[test]
    fn hook_then_unhook_round_trips() {
        let mut table: [*mut c_void; 2] = [original as *mut c_void, std::ptr::null_mut()];
        unsafe {
            let saved = hook_vtable(table.as_mut_ptr(), 0, replacement as *mut c_void);
            assert_eq!(saved, original as *mut c_void);
            assert_eq!(table[0], replacement as *mut c_void);
            unhook_vtable(table.as_mut_ptr(), 0, saved);
            assert_eq!(table[0], original as *mut c_void);
        }
    }
}
