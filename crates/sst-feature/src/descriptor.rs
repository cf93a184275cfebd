//! Feature descriptor table shape.
//!
//! Converted from: examples/original_source/src/feature.h's macro surface
//! (`FEATURE`, `GAMESPECIFIC`, `REQUIRE`, `REQUEST`, `REQUIRE_GAMEDATA`,
//! `REQUIRE_GLOBAL`, `PREINIT`/`INIT`/`END`). At build time the C version
//! expands these into free functions and leaves the DAG implicit in
//! translation-unit linkage; here `sst-codegen` instead emits one `const`
//! `FeatureDescriptor` per feature, matching spec's "compile-time table
//! (generated code) of feature descriptors" redesign note.

use sst_gamedata::Identity;

use crate::status::Status;

/// One feature's static declaration, as `sst-codegen` would emit it (one
/// `const FeatureDescriptor` per source file containing a `FEATURE(...)`
/// marker).
pub struct FeatureDescriptor {
    /// Module name -- the source file's stem, by convention.
    pub name: &'static str,
    /// User-visible description; `None` marks an internal feature that
    /// never appears in the load report.
    pub desc: Option<&'static str>,
    /// Set by `GAMESPECIFIC(tag)`; `None` means compatible with every host.
    pub tag_mask: Option<Identity>,
    pub required_gd: &'static [&'static str],
    pub required_globals: &'static [&'static str],
    /// Hard dependencies (`REQUIRE`): all must reach `Ok` first.
    pub deps: &'static [&'static str],
    /// Soft dependencies (`REQUEST`): ordering only, no failure on absence.
    pub opt_deps: &'static [&'static str],
    pub preinit_fn: Option<fn() -> Status>,
    pub init_fn: fn() -> Status,
    pub end_fn: Option<fn()>,
}
