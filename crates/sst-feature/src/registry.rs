//! Feature lifecycle driver: topological init order, status tracking,
//! reverse teardown.
//!
//! Converted from: spec's redesign of
//! examples/original_source/src/feature.h's macro-declared DAG into a
//! runtime-walkable table (see descriptor.rs), combined with the
//! dependency-ordering/cycle-detection behavior described for the build-time
//! generator in spec.md 4.F, reimplemented here as Kahn's algorithm since
//! the registry itself (not just the generator) needs to produce and
//! validate an order.

use std::collections::{HashMap, VecDeque};

use sst_gamedata::{Identity, Store};

use crate::descriptor::FeatureDescriptor;
use crate::error::{FeatureError, Result};
use crate::status::Status;

pub struct Registry {
    features: Vec<FeatureDescriptor>,
    index: HashMap<&'static str, usize>,
    status: Vec<Option<Status>>,
    order: Vec<usize>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Registry { features: Vec::new(), index: HashMap::new(), status: Vec::new(), order: Vec::new() }
    }

    pub fn register(&mut self, descriptor: FeatureDescriptor) {
        let idx = self.features.len();
        self.index.insert(descriptor.name, idx);
        self.features.push(descriptor);
        self.status.push(None);
    }

    pub fn status_of(&self, name: &str) -> Option<Status> {
        self.index.get(name).and_then(|&i| self.status[i])
    }

    pub fn has_feature(&self, name: &str) -> bool {
        self.status_of(name) == Some(Status::Ok)
    }

    /// Computes a topological order over hard (`deps`) and soft (`opt_deps`)
    /// edges via Kahn's algorithm, caching it for `teardown`'s reverse walk.
    fn topo_order(&self) -> Result<Vec<usize>> {
        let n = self.features.len();
        let mut indegree = vec![0usize; n];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];

        for (idx, f) in self.features.iter().enumerate() {
            for dep in f.deps.iter().chain(f.opt_deps.iter()) {
                let &dep_idx = self
                    .index
                    .get(dep)
                    .ok_or(FeatureError::UnknownDependency(f.name, dep))?;
                dependents[dep_idx].push(idx);
                indegree[idx] += 1;
            }
        }

        let mut queue: VecDeque<usize> =
            (0..n).filter(|&i| indegree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(idx) = queue.pop_front() {
            order.push(idx);
            for &dep in &dependents[idx] {
                indegree[dep] -= 1;
                if indegree[dep] == 0 {
                    queue.push_back(dep);
                }
            }
        }

        if order.len() != n {
            let stuck = (0..n)
                .filter(|&i| indegree[i] > 0)
                .map(|i| self.features[i].name)
                .collect();
            return Err(FeatureError::Cycle(stuck));
        }
        Ok(order)
    }

    /// Runs every feature's pre-init/init in dependency order, recording its
    /// terminal status. `has_global` reports whether a named global pointer
    /// is currently non-null.
    pub fn run_init(&mut self, gamedata: &Store, identity: Identity, has_global: impl Fn(&str) -> bool) -> Result<()> {
        let order = self.topo_order()?;
        self.order = order.clone();

        'features: for idx in order {
            if let Some(tag) = self.features[idx].tag_mask {
                if !identity.matches(tag) {
                    self.status[idx] = Some(Status::Skip);
                    continue;
                }
            }
            for gd in self.features[idx].required_gd {
                if !gamedata.has(gd) {
                    self.status[idx] = Some(Status::NoGd);
                    continue 'features;
                }
            }
            for g in self.features[idx].required_globals {
                if !has_global(g) {
                    self.status[idx] = Some(Status::NoGlobal);
                    continue 'features;
                }
            }
            for dep in self.features[idx].deps {
                if self.status_of(dep) != Some(Status::Ok) {
                    self.status[idx] = Some(Status::ReqFail);
                    continue 'features;
                }
            }

            if let Some(preinit) = self.features[idx].preinit_fn {
                let pre_status = preinit();
                if !pre_status.is_ok() {
                    self.status[idx] = Some(if pre_status == Status::Skip {
                        Status::Skip
                    } else {
                        Status::PreFail
                    });
                    continue;
                }
            }

            let status = (self.features[idx].init_fn)();
            log::debug!("feature '{}' -> {status}", self.features[idx].name);
            self.status[idx] = Some(status);
        }
        Ok(())
    }

    /// Calls every successfully-initialised feature's `end_fn` exactly once,
    /// in reverse initialisation order.
    pub fn teardown(&mut self) {
        for &idx in self.order.iter().rev() {
            if self.status[idx] == Some(Status::Ok) {
                if let Some(end) = self.features[idx].end_fn {
                    end();
                }
            }
        }
    }

    /// User-visible load report: one line per feature with a description,
    /// skipping internal (no-`desc`) and `Skip`-status features.
    pub fn report(&self) -> Vec<String> {
        self.features
            .iter()
            .enumerate()
            .filter_map(|(idx, f)| {
                let desc = f.desc?;
                let status = self.status[idx]?;
                if status == Status::Skip {
                    return None;
                }
                Some(format!("{desc}: {status}"))
            })
            .collect()
    }
}
