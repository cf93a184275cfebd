//! Feature/event macro-surface scanner and validator.
//!
//! Converted from: examples/original_source/src/build/cmeta.c (per-file
//! metadata extraction), gluegen.c (dependency-graph assembly and the
//! glue-code emission this module's `gen_*` functions replace), and
//! codegen.c (the final header assembly pass). The C tools tokenize their
//! own source with a hand-rolled paren-matching scanner; this scans actual
//! Rust syntax with `syn::visit::Visit` over `syn::Macro` call sites, which
//! is immune to the "nested parens inside a macro argument" class of bug
//! the C comments call out as tricky.
//!
//! Convention carried over from the original one-feature-per-source-file
//! layout (`feature.h`'s macro contract): a source file may declare at
//! most one `feature!(name, "description")`, and every other recognised
//! macro call in that file is attributed to that feature.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use syn::visit::Visit;
use syn::{Expr, Lit, Macro};

use crate::error::{CodegenError, CodegenResult};

#[derive(Debug, Clone, Default)]
pub struct FeatureDecl {
    pub name: String,
    pub description: Option<String>,
    pub gamespecific: Option<String>,
    pub requires: Vec<String>,
    pub requests: Vec<String>,
    pub required_gamedata: Vec<String>,
    pub required_globals: Vec<String>,
    pub preinit_fn: Option<String>,
    pub init_fn: Option<String>,
    pub end_fn: Option<String>,
    pub file: String,
    pub line: usize,
}

impl FeatureDecl {
    pub fn has_init(&self) -> bool {
        self.init_fn.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct EventDecl {
    pub name: String,
    pub predicate: bool,
    pub file: String,
    pub line: usize,
}

#[derive(Debug, Clone)]
pub struct HandlerDecl {
    pub event: String,
    /// The function `handle_event!`'s second argument names -- the Rust
    /// analogue of `HANDLE_EVENT`'s generated `_evhandler_<module>_<event>`
    /// function, except here the author names it explicitly rather than
    /// writing the body inline at the macro call site.
    pub handler_fn: String,
    pub feature: String,
    pub file: String,
    pub line: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CvarDecl {
    pub name: String,
    pub is_command: bool,
    pub feature: String,
}

#[derive(Debug, Default)]
pub struct Graph {
    pub features: Vec<FeatureDecl>,
    pub events: Vec<EventDecl>,
    pub handlers: Vec<HandlerDecl>,
    pub cvars: Vec<CvarDecl>,
}

fn expr_name(e: &Expr) -> Option<String> {
    match e {
        Expr::Path(p) => p.path.segments.last().map(|s| s.ident.to_string()),
        Expr::Lit(syn::ExprLit { lit: Lit::Str(s), .. }) => Some(s.value()),
        _ => None,
    }
}

struct FileVisitor<'a> {
    file: &'a str,
    graph: &'a mut Graph,
    current_feature: Option<usize>,
    errors: Vec<CodegenError>,
}

impl FileVisitor<'_> {
    fn line_of(&self, mac: &Macro) -> usize {
        mac.path.segments.last().map(|s| s.ident.span().start().line).unwrap_or(0)
    }

    fn macro_name(mac: &Macro) -> Option<String> {
        mac.path.segments.last().map(|s| s.ident.to_string())
    }

    fn parse_args(mac: &Macro) -> Vec<Expr> {
        use syn::punctuated::Punctuated;
        use syn::Token;
        mac.parse_body_with(Punctuated::<Expr, Token![,]>::parse_terminated)
            .map(|p| p.into_iter().collect())
            .unwrap_or_default()
    }

    fn current_feature_name(&self) -> String {
        self.current_feature
            .and_then(|i| self.graph.features.get(i))
            .map(|f| f.name.clone())
            .unwrap_or_default()
    }
}

impl<'ast> Visit<'ast> for FileVisitor<'_> {
    fn visit_macro(&mut self, mac: &'ast Macro) {
        let Some(name) = Self::macro_name(mac) else { return };
        let line = self.line_of(mac);
        let args = Self::parse_args(mac);

        match name.as_str() {
            "feature" => {
                let fname = args.first().and_then(expr_name).unwrap_or_default();
                let desc = args.get(1).and_then(expr_name);
                if self.graph.features.iter().any(|f| f.description.is_some() && f.name == fname && desc.is_some()) {
                    self.errors.push(CodegenError::DuplicateDescription(fname.clone()));
                }
                self.graph.features.push(FeatureDecl {
                    name: fname,
                    description: desc,
                    file: self.file.to_string(),
                    line,
                    ..Default::default()
                });
                self.current_feature = Some(self.graph.features.len() - 1);
            }
            "gamespecific" => {
                if let Some(idx) = self.current_feature {
                    self.graph.features[idx].gamespecific = args.first().and_then(expr_name);
                }
            }
            "require" => {
                if let Some(target) = args.first().and_then(expr_name) {
                    if let Some(idx) = self.current_feature {
                        self.graph.features[idx].requires.push(target);
                    }
                }
            }
            "request" => {
                if let Some(target) = args.first().and_then(expr_name) {
                    if let Some(idx) = self.current_feature {
                        self.graph.features[idx].requests.push(target);
                    }
                }
            }
            "require_gamedata" => {
                if let Some(entry) = args.first().and_then(expr_name) {
                    if let Some(idx) = self.current_feature {
                        self.graph.features[idx].required_gamedata.push(entry);
                    }
                }
            }
            "require_global" => {
                if let Some(entry) = args.first().and_then(expr_name) {
                    if let Some(idx) = self.current_feature {
                        self.graph.features[idx].required_globals.push(entry);
                    }
                }
            }
            "preinit" => {
                if let Some(idx) = self.current_feature {
                    self.graph.features[idx].preinit_fn = args.first().and_then(expr_name);
                }
            }
            "init" => {
                if let Some(idx) = self.current_feature {
                    self.graph.features[idx].init_fn = args.first().and_then(expr_name);
                }
            }
            "end" => {
                if let Some(idx) = self.current_feature {
                    self.graph.features[idx].end_fn = args.first().and_then(expr_name);
                }
            }
            "def_event" => {
                if let Some(ename) = args.first().and_then(expr_name) {
                    self.graph.events.push(EventDecl {
                        name: ename,
                        predicate: false,
                        file: self.file.to_string(),
                        line,
                    });
                }
            }
            "def_predicate" => {
                if let Some(ename) = args.first().and_then(expr_name) {
                    self.graph.events.push(EventDecl {
                        name: ename,
                        predicate: true,
                        file: self.file.to_string(),
                        line,
                    });
                }
            }
            "handle_event" => {
                if let Some(ename) = args.first().and_then(expr_name) {
                    match args.get(1).and_then(expr_name) {
                        Some(handler_fn) => self.graph.handlers.push(HandlerDecl {
                            event: ename,
                            handler_fn,
                            feature: self.current_feature_name(),
                            file: self.file.to_string(),
                            line,
                        }),
                        None => self.errors.push(CodegenError::MissingHandlerFn(ename)),
                    }
                }
            }
            "def_cvar" => {
                if let Some(cname) = args.first().and_then(expr_name) {
                    self.graph.cvars.push(CvarDecl { name: cname, is_command: false, feature: self.current_feature_name() });
                }
            }
            "def_ccmd" => {
                if let Some(cname) = args.first().and_then(expr_name) {
                    self.graph.cvars.push(CvarDecl { name: cname, is_command: true, feature: self.current_feature_name() });
                }
            }
            _ => {}
        }

        syn::visit::visit_macro(self, mac);
    }
}

/// Scans every `*.rs` file matching `patterns` for the feature/event macro
/// surface, returning the assembled graph.
pub fn scan(patterns: &[&str]) -> CodegenResult<Graph> {
    let mut graph = Graph::default();
    let mut errors = Vec::new();
    let mut paths: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        for entry in glob::glob(pattern)? {
            match entry {
                Ok(p) => paths.push(p),
                Err(e) => errors.push(CodegenError::Io {
                    path: pattern.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
                }),
            }
        }
    }
    paths.sort();

    for path in &paths {
        scan_file(path, &mut graph, &mut errors)?;
    }

    if !errors.is_empty() {
        return Err(errors.into_iter().next().unwrap());
    }
    Ok(graph)
}

fn scan_file(path: &Path, graph: &mut Graph, errors: &mut Vec<CodegenError>) -> CodegenResult<()> {
    let text = std::fs::read_to_string(path).map_err(|e| CodegenError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let file = syn::parse_file(&text).map_err(|e| CodegenError::Syntax {
        file: path.display().to_string(),
        line: e.span().start().line,
        column: e.span().start().column,
        message: e.to_string(),
    })?;

    let file_name = path.display().to_string();
    let mut visitor = FileVisitor { file: &file_name, graph, current_feature: None, errors: Vec::new() };
    visitor.visit_file(&file);
    errors.append(&mut visitor.errors);
    Ok(())
}

/// Validation pass (spec's "feature-graph scanner" item 2):
/// - every `require!` target must have an `init!`
/// - a feature can't combine `preinit!` with `require!`/`request!`
/// - no duplicate event definitions
/// - every `handle_event!` target must have a `def_event!`/`def_predicate!`
/// - the hard-dependency graph (via `require!`) must be acyclic
pub fn validate(graph: &Graph) -> Result<(), Vec<CodegenError>> {
    let mut errors = Vec::new();
    let by_name: std::collections::HashMap<&str, &FeatureDecl> =
        graph.features.iter().map(|f| (f.name.as_str(), f)).collect();

    for f in &graph.features {
        if f.preinit_fn.is_some() && (!f.requires.is_empty() || !f.requests.is_empty()) {
            errors.push(CodegenError::PreinitWithRequire(f.name.clone()));
        }
        for dep in f.requires.iter().chain(f.requests.iter()) {
            match by_name.get(dep.as_str()) {
                None => errors.push(CodegenError::UnknownDependency { feature: f.name.clone(), dep: dep.clone() }),
                Some(target) if !target.has_init() => {
                    errors.push(CodegenError::RequireWithoutInit(dep.clone()))
                }
                Some(_) => {}
            }
        }
    }

    let mut seen_events = HashSet::new();
    for e in &graph.events {
        if !seen_events.insert(e.name.clone()) {
            errors.push(CodegenError::DuplicateEvent(e.name.clone()));
        }
    }
    for h in &graph.handlers {
        if !seen_events.contains(&h.event) {
            errors.push(CodegenError::UnknownEvent(h.event.clone()));
        }
    }

    if let Err(cycle) = topo_order(graph) {
        errors.push(CodegenError::Cycle(cycle));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// DFS-based cycle check over the hard-dependency (`require!`) edges,
/// grounded on gluegen.c's topological assembly pass. Returns the cycle
/// path on failure, or the resolved order on success.
fn topo_order(graph: &Graph) -> Result<Vec<String>, Vec<String>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        InProgress,
        Done,
    }

    let names: Vec<&str> = graph.features.iter().map(|f| f.name.as_str()).collect();
    let mut marks = vec![Mark::Unvisited; names.len()];
    let mut order = Vec::new();
    let mut stack = Vec::new();

    fn visit(
        idx: usize,
        graph: &Graph,
        names: &[&str],
        marks: &mut [Mark],
        stack: &mut Vec<String>,
        order: &mut Vec<String>,
    ) -> Result<(), Vec<String>> {
        match marks[idx] {
            Mark::Done => return Ok(()),
            Mark::InProgress => {
                stack.push(names[idx].to_string());
                return Err(stack.clone());
            }
            Mark::Unvisited => {}
        }
        marks[idx] = Mark::InProgress;
        stack.push(names[idx].to_string());
        for dep in &graph.features[idx].requires {
            if let Some(dep_idx) = names.iter().position(|n| *n == dep.as_str()) {
                visit(dep_idx, graph, names, marks, stack, order)?;
            }
        }
        stack.pop();
        marks[idx] = Mark::Done;
        order.push(names[idx].to_string());
        Ok(())
    }

    for idx in 0..names.len() {
        visit(idx, graph, &names, &mut marks, &mut stack, &mut order)?;
    }
    Ok(order)
}
