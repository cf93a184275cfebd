//! Host console-ABI shape detection and the `repr(C)` v-table layouts used
//! to present a constructed `ICvar`-compatible dispatch table back to the
//! host.
//!
//! Converted from: examples/original_source/src/con_.c's `con_detect()`
//! (shape discrimination by probing known variable names) and the
//! `_con_vtab_var_wrap`/`_con_vtab_iconvar_wrap` structs in `con_.h` (the
//! RTTI-locator-then-vtable layout). Here the C union-of-branches pattern
//! becomes a Rust enum with one `repr(C)` struct per shape.

use std::os::raw::{c_char, c_void};

use crate::error::{ConError, Result};

/// Which of the known `ICvar`/variable-struct layouts the host binary uses.
///
/// Branches differ in where `ConsoleColorPrintf`/`AllocateDLLIdentifier`
/// land in the v-table and whether colour/split-screen-slot virtuals exist
/// at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VtableShape {
    /// Original Source (HL2 era): no colour print, no split-screen slot.
    V1,
    /// Orange Box era: adds `ConsoleColorPrintf`.
    V2,
    /// Portal 2 / left 4 dead branch: adds `AllocateDLLIdentifier` and a
    /// split-screen slot parameter on several calls.
    V3,
    /// Newest (post-reboot) branch: full colour + split-screen + extra
    /// identifier virtuals.
    V4,
}

/// A marker name that only exists on a given branch, used to discriminate it
/// from its neighbours. Probed in order; the first hit wins, matching the
/// C original's "presence of a Portal-2-only variable implies Portal-2-shape
/// ABI" approach.
struct Marker {
    shape: VtableShape,
    varname: &'static str,
}

const MARKERS: &[Marker] = &[
    Marker { shape: VtableShape::V4, varname: "sv_use_trace_duration" },
    Marker { shape: VtableShape::V3, varname: "sv_portal_placement_never_fail" },
    Marker { shape: VtableShape::V2, varname: "mat_colorcorrection" },
    Marker { shape: VtableShape::V1, varname: "developer" },
];

/// Detects the host's console ABI shape by probing for known marker
/// variable names via `probe`, which should report whether a variable by
/// that name is already registered in the host engine.
pub fn detect(probe: impl Fn(&str) -> bool) -> Result<VtableShape> {
    for m in MARKERS {
        if probe(m.varname) {
            return Ok(m.shape);
        }
    }
    Err(ConError::UnknownAbi)
}

/// Layout of the "common" (middle) part of a ConVar struct, shared across
/// all branches; the branch-specific `ConVar` wrapper differs only in
/// whether an `IConVar` vtable pointer precedes it.
#[repr(C)]
pub struct VarCommon {
    pub parent: *mut c_void,
    pub defaultval: *const c_char,
    pub strval: *mut c_char,
    pub strlen: u32,
    pub fval: f32,
    pub ival: i32,
    pub hasmin: bool,
    pub minval: f32,
    pub hasmax: bool,
    pub maxval: f32,
}

/// V1/V2 layout: no `IConVar` vtable, `VarCommon` sits directly after the
/// command base.
#[repr(C)]
pub struct VarShapeV1 {
    pub vtable: *const *const c_void,
    pub next: *mut c_void,
    pub registered: bool,
    pub name: *const c_char,
    pub help: *const c_char,
    pub flags: u32,
    pub common: VarCommon,
}

/// V3/V4 layout: an additional `IConVar` vtable pointer precedes
/// `VarCommon`, matching the engine's multiple-inheritance layout.
#[repr(C)]
pub struct VarShapeV3 {
    pub vtable: *const *const c_void,
    pub next: *mut c_void,
    pub registered: bool,
    pub name: *const c_char,
    pub help: *const c_char,
    pub flags: u32,
    pub vtable_iconvar: *const *const c_void,
    pub common: VarCommon,
}

/// Picks the variable struct's total size for a given shape, used when the
/// registry needs to lay out a constructed instance for handing to the host.
pub fn var_struct_size(shape: VtableShape) -> usize {
    match shape {
        VtableShape::V1 | VtableShape::V2 => std::mem::size_of::<VarShapeV1>(),
        VtableShape::V3 | VtableShape::V4 => std::mem::size_of::<VarShapeV3>(),
    }
}

/// Number of entries in the constructed `ICvar` v-table for a given shape.
/// V1/V2 lack `AllocateDLLIdentifier`-family calls; V3/V4 carry the full set.
pub fn icvar_vtable_len(shape: VtableShape) -> usize {
    match shape {
        VtableShape::V1 => 14,
        VtableShape::V2 => 16,
        VtableShape::V3 => 18,
        VtableShape::V4 => 19,
    }
}
