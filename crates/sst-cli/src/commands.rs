//! Implementations of each subcommand. Thin wrappers around `sst-codegen`'s
//! library API -- this crate owns no parsing or codegen logic of its own,
//! only the file I/O and reporting around it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::Config;

fn default_out(explicit: Option<PathBuf>, from_config: Option<PathBuf>, input: &Path) -> PathBuf {
    explicit
        .or(from_config)
        .unwrap_or_else(|| input.with_extension("rs"))
}

pub fn gamedata_check(file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let entries = sst_codegen::parse::gamedata(&text)?;
    println!("{}: {} entries parsed ok", file.display(), entries.len());
    Ok(())
}

pub fn gamedata_compile(file: &Path, out: Option<PathBuf>) -> Result<()> {
    let cfg = Config::load(&std::env::current_dir()?)?;
    let out = default_out(out, cfg.output.gamedata, file);

    let text = std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let entries = sst_codegen::parse::gamedata(&text)?;
    let generated = sst_codegen::gen_gamedata(&entries);

    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(&out, generated).with_context(|| format!("writing {}", out.display()))?;
    log::info!("wrote {}", out.display());
    Ok(())
}

pub fn entprops_compile(file: &Path, out: Option<PathBuf>) -> Result<()> {
    let cfg = Config::load(&std::env::current_dir()?)?;
    let out = default_out(out, cfg.output.entprops, file);

    let text = std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let entries = sst_codegen::parse::entprops(&text)?;
    let tree = sst_codegen::EntPropTree::build(&entries);
    let generated = sst_codegen::gen_entprops(&tree, &entries);

    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(&out, generated).with_context(|| format!("writing {}", out.display()))?;
    log::info!("wrote {}", out.display());
    Ok(())
}

pub fn feature_graph(crate_dir: &Path) -> Result<()> {
    let pattern = crate_dir.join("src/**/*.rs");
    let pattern_str = pattern
        .to_str()
        .context("crate directory path is not valid UTF-8")?;
    let graph = sst_codegen::scan(&[pattern_str])?;
    if let Err(errors) = sst_codegen::validate(&graph) {
        for e in &errors {
            eprintln!("error: {e}");
        }
        anyhow::bail!("{} validation error(s) in {}", errors.len(), crate_dir.display());
    }

    let order = topo_order(&graph)?;
    println!("{} feature(s), init order:", graph.features.len());
    for name in &order {
        println!("  {name}");
    }
    Ok(())
}

/// Kahn's algorithm over the `requires`/`requests` edges, for developer
/// debugging outside the full build. Mirrors the same dependency edges
/// `sst_feature::Registry::run_init` resolves at runtime, just without
/// actually running anything.
fn topo_order(graph: &sst_codegen::Graph) -> Result<Vec<String>> {
    use std::collections::{HashMap, VecDeque};

    let names: Vec<&str> = graph.features.iter().map(|f| f.name.as_str()).collect();
    let mut indegree: HashMap<&str, usize> = names.iter().map(|&n| (n, 0)).collect();
    let mut edges: HashMap<&str, Vec<&str>> = names.iter().map(|&n| (n, Vec::new())).collect();

    for f in &graph.features {
        for dep in f.requires.iter().chain(f.requests.iter()) {
            if let Some(e) = edges.get_mut(dep.as_str()) {
                e.push(f.name.as_str());
                *indegree.get_mut(f.name.as_str()).unwrap() += 1;
            }
        }
    }

    let mut queue: VecDeque<&str> = names.iter().copied().filter(|n| indegree[n] == 0).collect();
    let mut order = Vec::new();
    while let Some(n) = queue.pop_front() {
        order.push(n.to_string());
        for &next in &edges[n] {
            let d = indegree.get_mut(next).unwrap();
            *d -= 1;
            if *d == 0 {
                queue.push_back(next);
            }
        }
    }

    if order.len() != names.len() {
        anyhow::bail!("dependency cycle detected among: {}", names.join(", "));
    }
    Ok(order)
}
