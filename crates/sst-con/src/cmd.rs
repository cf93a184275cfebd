//! Console command storage and callback-hooking shims.
//!
//! Converted from: examples/mattx86-myq2-rust/crates/myq2-common/src/cmd.rs
//! (`CmdFunction`'s boxed-closure callback style), generalized against
//! examples/original_source/src/con_.h's `con_cmd`/`con_cmdcb` (argc/argv
//! calling convention rather than the teacher's mutable-context style, since
//! SST commands receive raw host-parsed argument vectors).

pub type CmdFn = Box<dyn Fn(&[String]) + Send>;

pub struct Cmd {
    pub name: String,
    pub help: String,
    pub flags: u32,
    pub callback: CmdFn,
}

impl Cmd {
    pub fn new(name: &str, help: &str, flags: u32, callback: CmdFn) -> Self {
        Cmd { name: name.to_string(), help: help.to_string(), flags, callback }
    }

    pub fn call(&self, argv: &[String]) {
        (self.callback)(argv);
    }
}

/// Order in which a hooking shim runs the original callback relative to the
/// new one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookOrder {
    OldThenNew,
    NewThenOld,
}

/// Builds a shim callback that runs `original` and `extra` in the given
/// order. Used by `Registry::hook_command` to intercept commands like
/// `record`/`stop`/`plugin_load`/`plugin_unload` without losing the host's
/// own behavior.
pub fn shim(original: CmdFn, extra: CmdFn, order: HookOrder) -> CmdFn {
    Box::new(move |argv: &[String]| match order {
        HookOrder::OldThenNew => {
            original(argv);
            extra(argv);
        }
        HookOrder::NewThenOld => {
            extra(argv);
            original(argv);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn shim_runs_both_in_requested_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let l1 = log.clone();
        let l2 = log.clone();
        let original: CmdFn = Box::new(move |_| l1.lock().unwrap().push("old"));
        let extra: CmdFn = Box::new(move |_| l2.lock().unwrap().push("new"));
        let combined = shim(original, extra, HookOrder::OldThenNew);
        combined(&[]);
        assert_eq!(*log.lock().unwrap(), vec!["old", "new"]);
    }

    #[test]
    fn shim_new_then_old() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let l1 = log.clone();
        let l2 = log.clone();
        let original: CmdFn = Box::new(move |_| l1.lock().unwrap().push("old"));
        let extra: CmdFn = Box::new(move |_| l2.lock().unwrap().push("new"));
        let combined = shim(original, extra, HookOrder::NewThenOld);
        combined(&[]);
        assert_eq!(*log.lock().unwrap(), vec!["new", "old"]);
    }
}
