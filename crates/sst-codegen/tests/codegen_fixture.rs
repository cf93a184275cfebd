//! End-to-end exercise of the three compilers against realistic fixture
//! inputs, rather than the unit-level cases already covered inside each
//! module.

use sst_codegen::{gen_cvar_decls, gen_driver, gen_entprops, gen_events, gen_gamedata, gen_name_index, parse, scan, validate, EntPropTree};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn scans_and_validates_a_realistic_feature_file() {
    let pattern = fixture_path("suggest_feature.rs");
    let graph = scan(&[&pattern]).expect("scan should succeed");

    assert_eq!(graph.features.len(), 2);
    assert!(validate(&graph).is_ok(), "fixture feature graph should be well-formed");

    let suggest = graph.features.iter().find(|f| f.name == "suggest").unwrap();
    assert_eq!(suggest.gamespecific.as_deref(), Some("l4dbased"));
    assert_eq!(suggest.requires, vec!["democlient".to_string()]);
    assert_eq!(suggest.init_fn.as_deref(), Some("suggest_init"));
    assert_eq!(suggest.end_fn.as_deref(), Some("suggest_end"));

    let driver_src = gen_driver(&graph);
    assert!(driver_src.contains("name: \"suggest\","));
    assert!(driver_src.contains("init_fn: suggest_init,"));
    assert!(driver_src.contains("tag_mask: Some(sst_gamedata::Identity("));

    let events_src = gen_events(&graph);
    assert!(events_src.contains("pub fn emit_tick"));
    assert!(events_src.contains("feature: Some(\"suggest\"), func: suggest_on_tick"));
    assert!(events_src.contains("sst_feature::event::dispatch(HANDLERS, registry, args)"));

    let cvars_src = gen_cvar_decls(&graph);
    assert!(cvars_src.contains("pub fn sst_suggest_enabled"));
    assert!(cvars_src.contains("pub fn sst_suggest_dump"));
    assert!(cvars_src.contains("find_command(\"sst_suggest_dump\")"));

    let index_src = gen_name_index(&graph);
    assert!(index_src.contains("\"sst_suggest_dump\""));
    assert!(index_src.contains("\"sst_suggest_enabled\""));
}

#[test]
fn compiles_a_realistic_gamedata_fixture() {
    let text = std::fs::read_to_string(fixture_path("sample.gamedata.txt")).unwrap();
    let entries = parse::gamedata(&text).expect("fixture should parse");
    assert_eq!(entries.iter().filter(|e| e.indent == 0).count(), 2);

    let src = gen_gamedata(&entries);
    assert!(src.contains("store.declare_tagged(\"signature_CHLClient_FrameStageNotify\""));
    assert!(src.contains("store.declare_tagged(\"off_m_angEyeAngles\", None"));
    assert!(src.contains("pub const _GAMES_WITH_off_m_angEyeAngles"));
}

#[test]
fn compiles_a_realistic_entprops_fixture() {
    let text = std::fs::read_to_string(fixture_path("sample.entprops.txt")).unwrap();
    let entries = parse::entprops(&text).expect("fixture should parse");
    assert_eq!(entries.len(), 3);

    let tree = EntPropTree::build(&entries);
    assert_eq!(tree.class_count(), 1);
    assert_eq!(tree.lookup("CBasePlayer", "m_Local/m_vecOrigin"), Some("off_eyeangles"));

    let src = gen_entprops(&tree, &entries);
    assert!(src.contains("pub fn has_off_health() -> bool"));
    assert!(src.contains("pub fn has_off_armor() -> bool"));
    assert!(src.contains("pub fn has_off_eyeangles() -> bool"));
}
