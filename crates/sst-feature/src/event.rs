//! Event/predicate fan-out helpers.
//!
//! Converted from: spec.md 4.G's description of the build-time-generated
//! emitter functions. `sst-codegen` emits one concrete function per
//! declared event, inlining calls to each handler in source-processing
//! order and guarding feature-owned handlers with `has_<feature>`; these
//! generics are what that generated code calls into, so the dispatch and
//! short-circuit semantics live in one place instead of being re-emitted
//! per event.

use crate::registry::Registry;

/// One event handler, optionally owned by a feature. A `None` owner means
/// the handler is declared outside any feature and always runs.
pub struct Handler<F> {
    pub feature: Option<&'static str>,
    pub func: F,
}

/// Runs every handler for an ordinary (void-returning) event, in
/// declaration order, skipping any whose owning feature isn't `Ok`.
pub fn dispatch<A>(handlers: &[Handler<fn(&A)>], registry: &Registry, args: &A) {
    for h in handlers {
        if h.feature.map_or(true, |f| registry.has_feature(f)) {
            (h.func)(args);
        }
    }
}

/// Runs every handler for a predicate event, short-circuiting (returning
/// `false`) on the first `Ok`-feature handler that returns `false`.
/// Handlers owned by a non-`Ok` feature are skipped entirely and do not
/// affect the result.
pub fn dispatch_predicate<A>(handlers: &[Handler<fn(&A) -> bool>], registry: &Registry, args: &A) -> bool {
    for h in handlers {
        if h.feature.map_or(true, |f| registry.has_feature(f)) && !(h.func)(args) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FeatureDescriptor;
    use crate::status::Status;
    use sst_gamedata::{Identity, Store};
    use std::sync::atomic::{AtomicUsize, Ordering};

    static CALLS: AtomicUsize = AtomicUsize::new(0);

    fn bump(_: &()) {
        CALLS.fetch_add(1, Ordering::SeqCst);
    }

    fn ok_init() -> Status {
        Status::Ok
    }

    #[test]
    fn unconditional_handlers_always_run() {
        CALLS.store(0, Ordering::SeqCst);
        let registry = Registry::new();
        let handlers = [Handler { feature: None, func: bump as fn(&()) }];
        dispatch(&handlers, &registry, &());
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn feature_owned_handler_needs_ok_status() {
        CALLS.store(0, Ordering::SeqCst);
        let mut registry = Registry::new();
        registry.register(FeatureDescriptor {
            name: "demo",
            desc: None,
            tag_mask: None,
            required_gd: &[],
            required_globals: &[],
            deps: &[],
            opt_deps: &[],
            preinit_fn: None,
            init_fn: ok_init,
            end_fn: None,
        });
        let gd = Store::new();
        registry.run_init(&gd, Identity::NONE, |_| true).unwrap();

        let handlers = [Handler { feature: Some("demo"), func: bump as fn(&()) }];
        dispatch(&handlers, &registry, &());
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn predicate_short_circuits_on_first_false() {
        fn yes(_: &()) -> bool {
            true
        }
        fn no(_: &()) -> bool {
            false
        }
        let registry = Registry::new();
        let handlers = [
            Handler { feature: None, func: yes as fn(&()) -> bool },
            Handler { feature: None, func: no as fn(&()) -> bool },
            Handler { feature: None, func: yes as fn(&()) -> bool },
        ];
        assert!(!dispatch_predicate(&handlers, &registry, &()));
    }
}
