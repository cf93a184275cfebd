//! Binary interception: v-table slot replacement and inline-hook
//! trampolines over raw host-process memory.
//!
//! Converted from: examples/original_source/src/hook.c, hook.h.

mod error;
mod inline;
mod vtable;

pub use error::{HookError, Result};
pub use inline::{inline_commit, inline_mprot, inline_prep, unhook_inline, PreparedHook, TrampolineArena};
pub use vtable::{hook_vtable, unhook_vtable};
