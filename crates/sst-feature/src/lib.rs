//! Feature lifecycle management and event/predicate dispatch.
//!
//! Converted from: examples/original_source/src/feature.h and
//! examples/original_source/src/event.h.

pub mod descriptor;
pub mod error;
pub mod event;
pub mod registry;
pub mod status;

pub use descriptor::FeatureDescriptor;
pub use error::{FeatureError, Result};
pub use event::{dispatch, dispatch_predicate, Handler};
pub use registry::Registry;
pub use status::Status;

#[cfg(test)]
mod tests {
    use super::*;
    use sst_gamedata::{Identity, Store};

    fn ok() -> Status {
        Status::Ok
    }
    fn fail() -> Status {
        Status::Fail
    }

    #[test]
    fn dependency_order_runs_before_dependents() {
        let mut r = Registry::new();
        r.register(FeatureDescriptor {
            name: "base",
            desc: None,
            tag_mask: None,
            required_gd: &[],
            required_globals: &[],
            deps: &[],
            opt_deps: &[],
            preinit_fn: None,
            init_fn: ok,
            end_fn: None,
        });
        r.register(FeatureDescriptor {
            name: "derived",
            desc: Some("derived feature"),
            tag_mask: None,
            required_gd: &[],
            required_globals: &[],
            deps: &["base"],
            opt_deps: &[],
            preinit_fn: None,
            init_fn: ok,
            end_fn: None,
        });
        let gd = Store::new();
        r.run_init(&gd, Identity::NONE, |_| true).unwrap();
        assert_eq!(r.status_of("base"), Some(Status::Ok));
        assert_eq!(r.status_of("derived"), Some(Status::Ok));
    }

    #[test]
    fn failed_dependency_propagates_req_fail() {
        let mut r = Registry::new();
        r.register(FeatureDescriptor {
            name: "base",
            desc: None,
            tag_mask: None,
            required_gd: &[],
            required_globals: &[],
            deps: &[],
            opt_deps: &[],
            preinit_fn: None,
            init_fn: fail,
            end_fn: None,
        });
        r.register(FeatureDescriptor {
            name: "derived",
            desc: None,
            tag_mask: None,
            required_gd: &[],
            required_globals: &[],
            deps: &["base"],
            opt_deps: &[],
            preinit_fn: None,
            init_fn: ok,
            end_fn: None,
        });
        let gd = Store::new();
        r.run_init(&gd, Identity::NONE, |_| true).unwrap();
        assert_eq!(r.status_of("base"), Some(Status::Fail));
        assert_eq!(r.status_of("derived"), Some(Status::ReqFail));
    }

    #[test]
    fn gamespecific_mismatch_skips() {
        let mut r = Registry::new();
        r.register(FeatureDescriptor {
            name: "l4d_only",
            desc: None,
            tag_mask: Some(Identity::L4D),
            required_gd: &[],
            required_globals: &[],
            deps: &[],
            opt_deps: &[],
            preinit_fn: None,
            init_fn: ok,
            end_fn: None,
        });
        let gd = Store::new();
        r.run_init(&gd, Identity::PORTAL2, |_| true).unwrap();
        assert_eq!(r.status_of("l4d_only"), Some(Status::Skip));
    }

    #[test]
    fn missing_gamedata_entry_yields_no_gd() {
        let mut r = Registry::new();
        r.register(FeatureDescriptor {
            name: "needs_gd",
            desc: None,
            tag_mask: None,
            required_gd: &["offFoo"],
            required_globals: &[],
            deps: &[],
            opt_deps: &[],
            preinit_fn: None,
            init_fn: ok,
            end_fn: None,
        });
        let gd = Store::new();
        r.run_init(&gd, Identity::NONE, |_| true).unwrap();
        assert_eq!(r.status_of("needs_gd"), Some(Status::NoGd));
    }

    #[test]
    fn missing_global_yields_no_global() {
        let mut r = Registry::new();
        r.register(FeatureDescriptor {
            name: "needs_global",
            desc: None,
            tag_mask: None,
            required_gd: &[],
            required_globals: &["g_pGameRules"],
            deps: &[],
            opt_deps: &[],
            preinit_fn: None,
            init_fn: ok,
            end_fn: None,
        });
        let gd = Store::new();
        r.run_init(&gd, Identity::NONE, |_| false).unwrap();
        assert_eq!(r.status_of("needs_global"), Some(Status::NoGlobal));
    }

    #[test]
    fn cyclic_dependency_is_reported() {
        let mut r = Registry::new();
        r.register(FeatureDescriptor {
            name: "a",
            desc: None,
            tag_mask: None,
            required_gd: &[],
            required_globals: &[],
            deps: &["b"],
            opt_deps: &[],
            preinit_fn: None,
            init_fn: ok,
            end_fn: None,
        });
        r.register(FeatureDescriptor {
            name: "b",
            desc: None,
            tag_mask: None,
            required_gd: &[],
            required_globals: &[],
            deps: &["a"],
            opt_deps: &[],
            preinit_fn: None,
            init_fn: ok,
            end_fn: None,
        });
        let gd = Store::new();
        assert!(r.run_init(&gd, Identity::NONE, |_| true).is_err());
    }

    #[test]
    fn teardown_calls_end_only_for_ok_features_in_reverse_order() {
        thread_local! {
            static LOG: std::cell::RefCell<Vec<&'static str>> = std::cell::RefCell::new(Vec::new());
        }
        fn end_base() {
            LOG.with(|l| l.borrow_mut().push("base"));
        }
        fn end_derived() {
            LOG.with(|l| l.borrow_mut().push("derived"));
        }

        let mut r = Registry::new();
        r.register(FeatureDescriptor {
            name: "base",
            desc: None,
            tag_mask: None,
            required_gd: &[],
            required_globals: &[],
            deps: &[],
            opt_deps: &[],
            preinit_fn: None,
            init_fn: ok,
            end_fn: Some(end_base),
        });
        r.register(FeatureDescriptor {
            name: "derived",
            desc: None,
            tag_mask: None,
            required_gd: &[],
            required_globals: &[],
            deps: &["base"],
            opt_deps: &[],
            preinit_fn: None,
            init_fn: ok,
            end_fn: Some(end_derived),
        });
        let gd = Store::new();
        r.run_init(&gd, Identity::NONE, |_| true).unwrap();
        r.teardown();
        LOG.with(|l| assert_eq!(*l.borrow(), vec!["derived", "base"]));
    }
}
