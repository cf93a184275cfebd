//! Runtime gamedata store: declared entries resolved against a host
//! `Identity` at init time.
//!
//! Converted from: examples/original_source/src/gamedata.c/.h, whose actual
//! entry table and resolution loop live in the build-time-generated
//! `gamedatainit.gen.h` (produced by `mkgamedata.c`, ported into
//! `sst-codegen`). This module is the runtime half: the generated code
//! calls `Store::declare_*` once per entry (in file-declared order) and then
//! `Store::init` exactly once at plugin load.

use std::collections::HashMap;

use crate::identity::Identity;

/// Sentinel returned by `Store::get` for an entry that is missing or whose
/// tag rules didn't match the host and which has no default.
pub const MISSING: i32 = i32::MIN;

enum Entry {
    Const(i32),
    Tagged { default: Option<i32>, rules: Vec<(Identity, i32)> },
}

pub struct Store {
    order: Vec<String>,
    entries: HashMap<String, Entry>,
    resolved: HashMap<String, i32>,
    initialised: bool,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Store {
            order: Vec::new(),
            entries: HashMap::new(),
            resolved: HashMap::new(),
            initialised: false,
        }
    }

    /// Declares an entry with no tag refinements; it resolves to the same
    /// value on every host, same as a plain compile-time constant.
    pub fn declare_const(&mut self, name: &str, value: i32) {
        self.order.push(name.to_string());
        self.entries.insert(name.to_string(), Entry::Const(value));
    }

    /// Declares an entry with per-tag values, evaluated in declaration
    /// order at `init`; the first rule whose tag expression matches the
    /// host identity wins. `default` is used if no rule matches.
    pub fn declare_tagged(&mut self, name: &str, default: Option<i32>, rules: Vec<(Identity, i32)>) {
        self.order.push(name.to_string());
        self.entries.insert(name.to_string(), Entry::Tagged { default, rules });
    }

    /// Resolves every declared entry against `identity`, in declaration
    /// order. Entries are never re-evaluated after this call.
    pub fn init(&mut self, identity: Identity) {
        for name in &self.order {
            let value = match &self.entries[name] {
                Entry::Const(v) => *v,
                Entry::Tagged { default, rules } => {
                    let mut v = None;
                    for (tag, candidate) in rules {
                        if identity.matches(*tag) {
                            v = Some(*candidate);
                            break;
                        }
                    }
                    v.or(*default).unwrap_or(MISSING)
                }
            };
            self.resolved.insert(name.clone(), value);
        }
        self.initialised = true;
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised
    }

    /// Returns the resolved value for `name`, or `MISSING` if the entry
    /// doesn't exist or resolved to nothing.
    pub fn get(&self, name: &str) -> i32 {
        self.resolved.get(name).copied().unwrap_or(MISSING)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name) != MISSING
    }

    /// Union of every tag for which `name` has a defined value. Returns
    /// `Identity::NONE` for entries with a default (since a default means
    /// every identity effectively "has" it) or for unknown entries.
    pub fn games_with(&self, name: &str) -> Identity {
        match self.entries.get(name) {
            Some(Entry::Tagged { default: None, rules }) => {
                rules.iter().fold(Identity::NONE, |acc, (tag, _)| acc.union(*tag))
            }
            _ => Identity::NONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn const_entry_resolves_same_everywhere() {
        let mut s = Store::new();
        s.declare_const("offFoo", 42);
        s.init(Identity::L4D2);
        assert_eq!(s.get("offFoo"), 42);
        assert!(s.has("offFoo"));
    }

    #[test]
    fn tagged_entry_picks_first_matching_rule() {
        let mut s = Store::new();
        s.declare_tagged(
            "offBar",
            None,
            vec![(Identity::PORTAL2, 100), (Identity::L4D, 200)],
        );
        s.init(Identity::L4D2);
        assert_eq!(s.get("offBar"), 200);
    }

    #[test]
    fn unmatched_entry_without_default_is_missing() {
        let mut s = Store::new();
        s.declare_tagged("offBaz", None, vec![(Identity::PORTAL2, 100)]);
        s.init(Identity::L4D2);
        assert!(!s.has("offBaz"));
        assert_eq!(s.get("offBaz"), MISSING);
    }

    #[test]
    fn unmatched_entry_falls_back_to_default() {
        let mut s = Store::new();
        s.declare_tagged("offQux", Some(7), vec![(Identity::PORTAL2, 100)]);
        s.init(Identity::L4D2);
        assert_eq!(s.get("offQux"), 7);
    }

    #[test]
    fn games_with_unions_rule_tags() {
        let mut s = Store::new();
        s.declare_tagged(
            "offQuux",
            None,
            vec![(Identity::PORTAL2, 1), (Identity::L4D1, 2)],
        );
        let gw = s.games_with("offQuux");
        assert!(gw.matches(Identity::PORTAL2));
        assert!(gw.matches(Identity::L4D1));
        assert!(!gw.matches(Identity::L4D2));
    }

    #[test]
    fn games_with_entry_that_has_default_is_none() {
        let mut s = Store::new();
        s.declare_tagged("offDefaulted", Some(0), vec![(Identity::PORTAL2, 1)]);
        assert_eq!(s.games_with("offDefaulted"), Identity::NONE);
    }
}
