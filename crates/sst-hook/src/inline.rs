//! Inline hook trampolines: prologue walking, a bump-allocated executable
//! arena, hook commit, and non-atomic unhook.
//!
//! Converted from: examples/original_source/src/hook.c's
//! `hook_inline_prep`/`hook_inline_mprot`/`hook_inline_commit`/
//! `unhook_inline`, ported close to line-for-line including the thunk-chase
//! loop and the length-byte-prefixed trampoline layout that makes unhooking
//! cheap. The C original's single static `trampolines[4096]` array becomes
//! `TrampolineArena`, a heap-allocated, page-aligned, append-only bump
//! allocator sized at construction instead of a fixed global.

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::ffi::c_void;
use std::ptr;

use sst_mem::load_s32;
use sst_mem::protect::{protect, PAGE_EXECUTE_READWRITE};

use crate::error::{HookError, Result};

const JMP_REL32: u8 = 0xE9;
const CALL_REL32: u8 = 0xE8;
/// Generous lookahead window for the instruction decoder; the longest
/// legal x86 instruction is 15 bytes, so 32 safely covers any prologue
/// instruction plus its ModR/M/SIB/displacement/immediate tail.
const DECODE_WINDOW: usize = 32;

/// A single-allocation, single-writer, append-only executable buffer that
/// inline-hook trampolines are carved out of. Unhooking a trampoline does
/// not reclaim its slot -- trampolines live for the lifetime of the arena,
/// matching spec's "no per-hook deallocation" model.
pub struct TrampolineArena {
    base: *mut u8,
    size: usize,
    cursor: usize,
    layout: Layout,
}

// `base` is a page we own exclusively and only ever append to; all mutation
// happens from the single thread driving feature init.
unsafe impl Send for TrampolineArena {}

impl TrampolineArena {
    /// Allocates a page-aligned, zeroed, executable arena of `size` bytes.
    pub fn new(size: usize) -> Result<Self> {
        let layout = Layout::from_size_align(size, 4096).expect("valid arena layout");
        let base = unsafe { alloc_zeroed(layout) };
        if base.is_null() {
            return Err(HookError::ArenaFull);
        }
        // PE doesn't support RWX sections and allocator memory isn't
        // executable by default on either platform, so flip it here.
        protect(base, size, PAGE_EXECUTE_READWRITE)?;
        Ok(TrampolineArena { base, size, cursor: 0, layout })
    }

    /// Carves out a new trampoline slot for a `len`-byte original-prologue
    /// copy, returning a pointer to the body (just past the length-prefix
    /// byte). Layout: `[len: u8][body: len bytes][jmp: 5 bytes]`.
    fn alloc(&mut self, len: usize) -> Result<*mut u8> {
        let total = 1 + len + 5;
        if self.cursor + total > self.size {
            return Err(HookError::ArenaFull);
        }
        unsafe {
            let slot = self.base.add(self.cursor);
            *slot = len as u8;
            self.cursor += total;
            Ok(slot.add(1))
        }
    }
}

impl Drop for TrampolineArena {
    fn drop(&mut self) {
        unsafe { dealloc(self.base, self.layout) };
    }
}

/// The result of a successful `inline_prep`: the prologue address to patch
/// and the trampoline through which the original behavior remains callable.
pub struct PreparedHook {
    pub prologue: *mut u8,
    pub trampoline: *mut u8,
}

/// Walks `func`'s prologue (chasing through any immediate near jumps first,
/// the way thunked imports do), accumulates whole instructions via
/// `sst_decode::x86_len` until at least 5 bytes are covered, and writes a
/// trampoline that replays those bytes followed by a jump back to the
/// unpatched continuation.
///
/// # Safety
/// `func` must point to the entry of a real, readable, executable function.
pub unsafe fn inline_prep(arena: &mut TrampolineArena, func: *mut u8) -> Result<PreparedHook> {
    let mut p = func;
    while *p == JMP_REL32 {
        let rel = load_s32(p.add(1));
        p = p.add(5).offset(rel as isize);
    }
    let prologue = p;

    let mut len = 0usize;
    loop {
        if *p.add(len) == CALL_REL32 {
            return Err(HookError::CallInPrologue("hooked function"));
        }
        let window = std::slice::from_raw_parts(p.add(len), DECODE_WINDOW);
        let ilen = sst_decode::x86_len(window).ok_or(HookError::UnknownInstruction("hooked function"))?;
        len += ilen;
        if len >= 5 {
            let trampoline = arena.alloc(len)?;
            ptr::copy_nonoverlapping(p, trampoline, len);
            *trampoline.add(len) = JMP_REL32;
            let diff = (p as isize) - (trampoline.add(5) as isize);
            ptr::copy_nonoverlapping((diff as i32).to_le_bytes().as_ptr(), trampoline.add(len + 1), 4);
            return Ok(PreparedHook { prologue, trampoline });
        }
        if *p.add(len) == JMP_REL32 {
            return Err(HookError::JumpInPrologue("hooked function"));
        }
    }
}

/// Makes the 5 bytes at `prologue` writable, ahead of `inline_commit`.
pub fn inline_mprot(prologue: *mut u8) -> Result<()> {
    protect(prologue, 5, PAGE_EXECUTE_READWRITE)?;
    Ok(())
}

/// Writes a 5-byte near jump at `prologue` that transfers control to
/// `target`. `prologue` must already be writable (see `inline_mprot`).
///
/// # Safety
/// `prologue` must point to at least 5 writable, executable bytes prepared
/// by `inline_prep`.
pub unsafe fn inline_commit(prologue: *mut u8, target: *mut c_void) {
    let diff = (target as isize) - (prologue as isize + 5);
    *prologue = JMP_REL32;
    ptr::copy_nonoverlapping((diff as i32).to_le_bytes().as_ptr(), prologue.add(1), 4);
}

/// Reverts a hook given its trampoline pointer (not the original function
/// pointer), by copying the trampoline's saved original bytes back over the
/// jump that was installed at the prologue. Not atomic with respect to
/// concurrent calls into the hooked function.
///
/// # Safety
/// `trampoline` must be a pointer previously returned by `inline_prep`.
pub unsafe fn unhook_inline(trampoline: *mut u8) {
    let len = *trampoline.sub(1) as isize;
    let off = load_s32(trampoline.offset(len + 1));
    let q = trampoline.offset(5).offset(off as isize);
    ptr::copy_nonoverlapping(trampoline, q, 5);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_alloc_advances_cursor_past_len_prefix_and_jmp() {
        let mut arena = TrampolineArena::new(4096).unwrap();
        let before = arena.cursor;
        let t = arena.alloc(6).unwrap();
        assert_eq!(arena.cursor, before + 1 + 6 + 5);
        assert!(!t.is_null());
    }

    #[test]
    fn arena_rejects_overflow() {
        let mut arena = TrampolineArena::new(16).unwrap();
        assert!(arena.alloc(64).is_err());
    }

    #[test]
    fn prep_rejects_call_in_first_five_bytes() {
        // CALL rel32 immediately, then padding.
        let mut code = vec![CALL_REL32, 0, 0, 0, 0, 0x90, 0x90, 0x90, 0x90, 0x90];
        code.resize(64, 0x90);
        let mut arena = TrampolineArena::new(4096).unwrap();
        let result = unsafe { inline_prep(&mut arena, code.as_mut_ptr()) };
        assert!(matches!(result, Err(HookError::CallInPrologue(_))));
    }

    #[test]
    fn prep_copies_exact_prologue_bytes_into_trampoline() {
        // Five single-byte NOPs -- len reaches 5 after the 5th NOP.
        let mut code = vec![0x90u8; 5];
        code.resize(64, 0x90);
        let mut arena = TrampolineArena::new(4096).unwrap();
        let prepared = unsafe { inline_prep(&mut arena, code.as_mut_ptr()) }.unwrap();
        let copied = unsafe { std::slice::from_raw_parts(prepared.trampoline, 5) };
        assert_eq!(copied, &[0x90u8; 5]);
        assert_eq!(prepared.prologue, code.as_mut_ptr());
    }

    #[test]
    fn commit_then_unhook_restores_original_bytes() {
        let mut code = vec![0x90u8; 5];
        code.resize(64, 0x90);
        let original_bytes = code[..5].to_vec();
        let mut arena = TrampolineArena::new(4096).unwrap();
        let prepared = unsafe { inline_prep(&mut arena, code.as_mut_ptr()) }.unwrap();

        inline_mprot(prepared.prologue).unwrap();
        unsafe { inline_commit(prepared.prologue, 0x1000 as *mut c_void) };
        assert_eq!(code[0], JMP_REL32);

        unsafe { unhook_inline(prepared.trampoline) };
        assert_eq!(&code[..5], original_bytes.as_slice());
    }

    #[test]
    fn unhook_restores_bytes_at_the_real_hook_site_not_past_it() {
        // A 6-byte prologue (four single-byte NOPs then a 2-byte MOV
        // EAX,EAX), so `len != 5`: a wrong offset that drifts by `len`
        // would land the restore outside the 5 bytes the jump occupies.
        let mut code = vec![0x90, 0x90, 0x90, 0x90, 0x8B, 0xC0];
        code.resize(64, 0xCC);
        let original_bytes = code[..5].to_vec();
        let mut arena = TrampolineArena::new(4096).unwrap();
        let prepared = unsafe { inline_prep(&mut arena, code.as_mut_ptr()) }.unwrap();

        inline_mprot(prepared.prologue).unwrap();
        unsafe { inline_commit(prepared.prologue, 0x2000 as *mut c_void) };
        assert_eq!(code[0], JMP_REL32);

        unsafe { unhook_inline(prepared.trampoline) };
        assert_eq!(&code[..5], original_bytes.as_slice());
        // Bytes past the 5-byte jump site were never touched by commit or
        // unhook and must still hold their filler value.
        assert_eq!(code[5], 0x8B);
        assert_eq!(code[6], 0xC0);
    }

    #[test]
    fn thunk_chase_follows_jmp_to_real_function() {
        // A thunk at `thunk` that jmps to `real`, laid out in one buffer so
        // relative offsets are well-defined.
        let mut buf = vec![0x90u8; 128];
        // real function starts at offset 64: five NOPs.
        for b in &mut buf[64..69] {
            *b = 0x90;
        }
        // thunk at offset 0: E9 <rel32 to 64>
        buf[0] = JMP_REL32;
        let rel = 64i32 - (0 + 5);
        buf[1..5].copy_from_slice(&rel.to_le_bytes());

        let mut arena = TrampolineArena::new(4096).unwrap();
        let prepared = unsafe { inline_prep(&mut arena, buf.as_mut_ptr()) }.unwrap();
        assert_eq!(prepared.prologue, unsafe { buf.as_mut_ptr().add(64) });
    }
}
