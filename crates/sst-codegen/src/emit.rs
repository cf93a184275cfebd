//! Final code-assembly pass: turns a validated `scan::Graph` into the four
//! chunks of generated Rust a feature crate's `build.rs` writes to
//! `OUT_DIR` for `include!()`.
//!
//! Converted from: examples/original_source/src/build/codegen.c (header
//! assembly) and gluegen.c (driver/event glue emission). The C tool emits
//! C declarations and a hand-written init/teardown loop; here the
//! init/teardown *loop itself* already lives in `sst_feature::Registry`
//! (it's runtime code, not generated), so `gen_driver` only needs to emit
//! the static `FeatureDescriptor` table the registry walks.

use crate::scan::{Graph, HandlerDecl};
use sst_gamedata::Identity;

/// Emits the static feature-descriptor table consumed by
/// `sst_feature::Registry::register`. Function-pointer fields reference
/// the identifiers captured from `preinit!`/`init!`/`end!` by name -- the
/// generated code assumes those functions are defined elsewhere in the
/// same crate, exactly as the macro call sites implied.
pub fn gen_driver(graph: &Graph) -> String {
    let mut out = String::new();
    out.push_str("// generated by sst-codegen's feature-graph scanner. do not edit.\n\n");
    out.push_str("pub static FEATURES: &[sst_feature::FeatureDescriptor] = &[\n");
    for f in &graph.features {
        out.push_str("    sst_feature::FeatureDescriptor {\n");
        out.push_str(&format!("        name: {:?},\n", f.name));
        match &f.description {
            Some(d) => out.push_str(&format!("        desc: Some({:?}),\n", d)),
            None => out.push_str("        desc: None,\n"),
        }
        match f.gamespecific.as_deref().and_then(Identity::by_name) {
            Some(tag) => out.push_str(&format!("        tag_mask: Some(sst_gamedata::Identity({})),\n", tag.0)),
            None => out.push_str("        tag_mask: None,\n"),
        }
        out.push_str(&format!("        required_gd: &{:?},\n", f.required_gamedata));
        out.push_str(&format!("        required_globals: &{:?},\n", f.required_globals));
        out.push_str(&format!("        deps: &{:?},\n", f.requires));
        out.push_str(&format!("        opt_deps: &{:?},\n", f.requests));
        match &f.preinit_fn {
            Some(name) => out.push_str(&format!("        preinit_fn: Some({}),\n", name)),
            None => out.push_str("        preinit_fn: None,\n"),
        }
        out.push_str(&format!(
            "        init_fn: {},\n",
            f.init_fn.as_deref().unwrap_or("/* MISSING init! */ || sst_feature::Status::Fail")
        ));
        match &f.end_fn {
            Some(name) => out.push_str(&format!("        end_fn: Some({}),\n", name)),
            None => out.push_str("        end_fn: None,\n"),
        }
        out.push_str("    },\n");
    }
    out.push_str("];\n");
    out
}

/// Emits one emitter function per `def_event!`/`def_predicate!`, wrapping
/// `sst_feature::event::dispatch`/`dispatch_predicate` over every
/// `handle_event!` target registered for that event.
pub fn gen_events(graph: &Graph) -> String {
    let mut out = String::new();
    out.push_str("// generated by sst-codegen's feature-graph scanner. do not edit.\n\n");

    for event in &graph.events {
        let handlers: Vec<&HandlerDecl> = graph.handlers.iter().filter(|h| h.event == event.name).collect();

        let (fn_ty, dispatch_fn, ret) = if event.predicate {
            ("fn(&()) -> bool", "dispatch_predicate", " -> bool")
        } else {
            ("fn(&())", "dispatch", "")
        };

        out.push_str(&format!(
            "pub fn emit_{name}(registry: &sst_feature::Registry, args: &()){ret} {{\n",
            name = event.name,
        ));
        out.push_str(&format!("    static HANDLERS: &[sst_feature::event::Handler<{fn_ty}>] = &[\n"));
        for h in &handlers {
            let feature = if h.feature.is_empty() {
                "None".to_string()
            } else {
                format!("Some({:?})", h.feature)
            };
            out.push_str(&format!(
                "        sst_feature::event::Handler {{ feature: {feature}, func: {func} }},\n",
                func = h.handler_fn,
            ));
        }
        out.push_str("    ];\n");
        out.push_str(&format!("    sst_feature::event::{dispatch_fn}(HANDLERS, registry, args)\n"));
        out.push_str("}\n\n");
    }
    out
}

/// Emits one `pub fn` per `def_cvar!`/`def_ccmd!` call site, forwarding
/// into the owning feature's registry slot -- the Rust analogue of the
/// `extern`-declaration chunk `codegen.c` writes for console variables.
pub fn gen_cvar_decls(graph: &Graph) -> String {
    let mut out = String::new();
    out.push_str("// generated by sst-codegen's feature-graph scanner. do not edit.\n\n");
    for c in &graph.cvars {
        let kind = if c.is_command { "command" } else { "variable" };
        out.push_str(&format!(
            "pub fn {name}(registry: &sst_con::Registry) -> Option<&sst_con::{ty}> {{\n",
            name = c.name,
            ty = if c.is_command { "Cmd" } else { "Var" },
        ));
        out.push_str(&format!(
            "    registry.find_{kind}({name:?})\n}}\n\n",
            kind = kind,
            name = c.name,
        ));
    }
    out
}

/// Emits a name/index mapping for identifiers that collide across the
/// console-variable namespace and the generated `con_` module prefix --
/// `codegen.c`'s ambiguous-identifier handling, reduced here to a flat
/// array the runtime can binary-search (identifiers are sorted so feature
/// crates see a deterministic diff across regenerations).
pub fn gen_name_index(graph: &Graph) -> String {
    let mut names: Vec<&str> = graph.cvars.iter().map(|c| c.name.as_str()).collect();
    names.sort();
    names.dedup();

    let mut out = String::new();
    out.push_str("// generated by sst-codegen's feature-graph scanner. do not edit.\n\n");
    out.push_str("pub static NAME_INDEX: &[(&str, usize)] = &[\n");
    for (i, name) in names.iter().enumerate() {
        out.push_str(&format!("    ({:?}, {}),\n", name, i));
    }
    out.push_str("];\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{CvarDecl, EventDecl, FeatureDecl, HandlerDecl};

    fn sample_graph() -> Graph {
        Graph {
            features: vec![FeatureDecl {
                name: "suggest".to_string(),
                description: Some("aim suggestion hud".to_string()),
                init_fn: Some("suggest_init".to_string()),
                ..Default::default()
            }],
            events: vec![EventDecl { name: "tick".to_string(), predicate: false, file: "f.rs".into(), line: 1 }],
            handlers: vec![HandlerDecl {
                event: "tick".to_string(),
                handler_fn: "suggest_on_tick".to_string(),
                feature: "suggest".to_string(),
                file: "f.rs".into(),
                line: 2,
            }],
            cvars: vec![CvarDecl { name: "sst_suggest_enabled".to_string(), is_command: false, feature: "suggest".to_string() }],
        }
    }

    #[test]
    fn gen_driver_references_captured_init_fn_by_name() {
        let src = gen_driver(&sample_graph());
        assert!(src.contains("init_fn: suggest_init,"));
        assert!(src.contains("name: \"suggest\","));
    }

    #[test]
    fn gen_events_emits_one_function_per_event() {
        let src = gen_events(&sample_graph());
        assert!(src.contains("pub fn emit_tick(registry: &sst_feature::Registry, args: &()) {"));
        assert!(src.contains("feature: Some(\"suggest\"), func: suggest_on_tick"));
        assert!(src.contains("sst_feature::event::dispatch(HANDLERS, registry, args)"));
    }

    #[test]
    fn gen_events_emits_predicate_dispatch_with_bool_return() {
        let mut graph = sample_graph();
        graph.events[0].predicate = true;
        let src = gen_events(&graph);
        assert!(src.contains("pub fn emit_tick(registry: &sst_feature::Registry, args: &()) -> bool {"));
        assert!(src.contains("Handler<fn(&()) -> bool>"));
        assert!(src.contains("sst_feature::event::dispatch_predicate(HANDLERS, registry, args)"));
    }

    #[test]
    fn gen_events_uses_none_for_handlers_outside_any_feature() {
        let mut graph = sample_graph();
        graph.handlers[0].feature = String::new();
        let src = gen_events(&graph);
        assert!(src.contains("feature: None, func: suggest_on_tick"));
    }

    #[test]
    fn gen_cvar_decls_emits_finder_per_cvar() {
        let src = gen_cvar_decls(&sample_graph());
        assert!(src.contains("pub fn sst_suggest_enabled"));
        assert!(src.contains("find_variable(\"sst_suggest_enabled\")"));
    }

    #[test]
    fn gen_name_index_is_sorted_and_deduped() {
        let mut graph = sample_graph();
        graph.cvars.push(CvarDecl { name: "sst_suggest_enabled".to_string(), is_command: false, feature: "suggest".to_string() });
        graph.cvars.push(CvarDecl { name: "aaa_first".to_string(), is_command: false, feature: "suggest".to_string() });
        let src = gen_name_index(&graph);
        let aaa_pos = src.find("aaa_first").unwrap();
        let sst_pos = src.find("sst_suggest_enabled").unwrap();
        assert!(aaa_pos < sst_pos);
        assert_eq!(src.matches("sst_suggest_enabled").count(), 1);
    }
}
