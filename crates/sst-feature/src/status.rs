//! Feature lifecycle status values.
//!
//! Converted from: examples/original_source/src/feature.h's
//! `FEAT_SKIP`/`FEAT_OK`/`FEAT_FAIL`/`FEAT_INCOMPAT` enum, expanded per the
//! richer runtime-state set so the driver can report *why* a feature didn't
//! reach `Ok` (the C enum conflates several of these into `FEAT_FAIL`; the
//! driver distinguishes them to produce a more useful load-time report).

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// The feature decided it isn't useful on this host; hidden from the
    /// load report.
    Skip,
    /// Successfully initialised.
    Ok,
    /// A hard dependency didn't reach `Ok`.
    ReqFail,
    /// The feature's pre-init function returned non-`Ok`.
    PreFail,
    /// A required gamedata entry was missing on this host.
    NoGd,
    /// A required global pointer was null.
    NoGlobal,
    /// The feature's own init function failed.
    Fail,
}

impl Status {
    pub fn is_ok(self) -> bool {
        matches!(self, Status::Ok)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Skip => "skip",
            Status::Ok => "ok",
            Status::ReqFail => "requirement failed",
            Status::PreFail => "pre-init failed",
            Status::NoGd => "missing gamedata",
            Status::NoGlobal => "missing global pointer",
            Status::Fail => "init failed",
        };
        f.write_str(s)
    }
}
