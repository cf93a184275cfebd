//! `sst_autoload_enable`/`sst_autoload_disable`/`sst_printversion` command
//! registration, and the `plugin_load`/`plugin_unload` hooks that fire
//! `PluginLoaded`/`PluginUnloaded` events and catch the user unloading this
//! very plugin.
//!
//! Converted from: `original_source/src/sst.c`'s `DEF_CCMD_HERE` blocks and
//! `hook_plugin_unload_common`. The original special-cases `plugin_unload`
//! to force a tail call into the host's own callback when the target is
//! this plugin (so the unload completes from a stack frame that doesn't
//! reference this library's soon-to-be-unmapped code); Rust has no
//! guaranteed-tail-call equivalent, so the redesigned behavior here defers
//! self-unload to `lifecycle::request_unload`, consumed at the top of the
//! next `GameFrame` once this command's own call frame has long since
//! returned.

use sst_con::{Cmd, HookOrder, Registry};

use crate::autoload;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// Stands in for the original's `gameinfo_gamedir` global, which `gameinfo.c`
// populates by parsing the host's `gameinfo.txt` search-path chain -- out of
// scope here (no gameinfo crate exists yet), so the mod directory is read
// from the environment instead until that parser lands.
fn gamedir_from_env() -> Option<std::path::PathBuf> {
    std::env::var_os("SST_GAMEDIR").map(std::path::PathBuf::from)
}

fn own_plugin_path() -> Option<std::path::PathBuf> {
    let here = own_plugin_path as *const std::ffi::c_void;
    let handle = sst_platform::handle_containing(here)?;
    sst_platform::dlfile(handle)
}

fn cmd_autoload_enable(_argv: &[String]) {
    let (Some(gamedir), Some(plugin_path)) = (gamedir_from_env(), own_plugin_path()) else {
        log::error!("couldn't determine paths needed to register autoload");
        return;
    };
    match autoload::enable(&gamedir, &plugin_path) {
        Ok(()) => log::info!("registered to load on startup"),
        Err(e) => log::error!("couldn't register autoload: {e}"),
    }
}

fn cmd_autoload_disable(_argv: &[String]) {
    let Some(gamedir) = gamedir_from_env() else {
        log::error!("couldn't determine the game directory");
        return;
    };
    match autoload::disable(&gamedir) {
        Ok(()) => log::info!("no longer loading on startup"),
        Err(e) => log::error!("couldn't remove autoload registration: {e}"),
    }
}

fn cmd_printversion(_argv: &[String]) {
    log::info!("v{VERSION}");
}

/// Registers the plugin's own commands. Called once from `Load`. Failure
/// here (a name collision with a command the host or another plugin
/// already owns) is the one fallible step `lifecycle::load` collapses
/// through `anyhow` rather than growing its own dedicated error variant
/// for what should never happen with this crate's own fixed command names.
pub fn register(con: &mut Registry) -> anyhow::Result<()> {
    anyhow::ensure!(
        con.register_command(Cmd::new(
            "sst_autoload_enable",
            "Register SST to load on game startup",
            0,
            Box::new(cmd_autoload_enable),
        )),
        "a command named sst_autoload_enable is already registered"
    );
    anyhow::ensure!(
        con.register_command(Cmd::new(
            "sst_autoload_disable",
            "Stop loading SST on game startup",
            0,
            Box::new(cmd_autoload_disable),
        )),
        "a command named sst_autoload_disable is already registered"
    );
    anyhow::ensure!(
        con.register_command(Cmd::new(
            "sst_printversion",
            "Display plugin version information",
            0,
            Box::new(cmd_printversion),
        )),
        "a command named sst_printversion is already registered"
    );
    Ok(())
}

/// Hooks `plugin_load` to fire a `PluginLoaded` event whenever the host's
/// own callback actually increased the loaded-plugin count (as opposed to
/// failing partway through). `plugin_count_before`/`plugin_count_after`
/// read the host's own plugin-list length; supplied as closures since that
/// count lives in host memory this crate has no typed view into.
pub fn hook_plugin_load(
    con: &mut Registry,
    plugin_count: impl Fn() -> usize + Send + Sync + 'static,
    on_loaded: impl Fn() + Send + 'static,
) -> sst_con::Result<()> {
    let before = std::sync::Arc::new(std::sync::Mutex::new(0usize));
    let before_write = before.clone();
    let plugin_count = std::sync::Arc::new(plugin_count);
    let pc1 = plugin_count.clone();
    con.hook_command(
        "plugin_load",
        Box::new(move |_argv| {
            *before_write.lock().unwrap() = pc1();
        }),
        HookOrder::NewThenOld,
    )?;
    let pc2 = plugin_count;
    con.hook_command(
        "plugin_load",
        Box::new(move |_argv| {
            if pc2() != *before.lock().unwrap() {
                on_loaded();
            }
        }),
        HookOrder::OldThenNew,
    )
}

/// Hooks `plugin_unload`. Unlike the original's version/union-typed raw
/// callback interception, this goes through the ordinary command-hook shim;
/// `is_self` tells us whether the targeted index names this very plugin, in
/// which case we flag a deferred unload instead of tearing down inline.
pub fn hook_plugin_unload(
    con: &mut Registry,
    is_self: impl Fn(&[String]) -> bool + Send + 'static,
    on_unloaded: impl Fn() + Send + 'static,
) -> sst_con::Result<()> {
    con.hook_command(
        "plugin_unload",
        Box::new(move |argv| {
            if is_self(argv) {
                crate::lifecycle::request_unload();
            } else {
                on_unloaded();
            }
        }),
        HookOrder::OldThenNew,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_adds_all_three_commands() {
        let mut con = Registry::new();
        register(&mut con).unwrap();
        assert!(con.find_command("sst_autoload_enable").is_some());
        assert!(con.find_command("sst_autoload_disable").is_some());
        assert!(con.find_command("sst_printversion").is_some());
    }

    #[test]
    fn register_fails_on_name_collision() {
        let mut con = Registry::new();
        con.register_command(Cmd::new("sst_printversion", "", 0, Box::new(|_| {})));
        assert!(register(&mut con).is_err());
    }

    #[test]
    fn hook_plugin_load_fires_event_only_on_count_increase() {
        let mut con = Registry::new();
        con.register_command(Cmd::new("plugin_load", "", 0, Box::new(|_| {})));
        let count = std::sync::Arc::new(std::sync::Mutex::new(1usize));
        let fired = std::sync::Arc::new(std::sync::Mutex::new(false));
        let c = count.clone();
        let f = fired.clone();
        hook_plugin_load(&mut con, move || *c.lock().unwrap(), move || *f.lock().unwrap() = true)
            .unwrap();

        con.find_command("plugin_load").unwrap().call(&[]);
        assert!(!*fired.lock().unwrap());

        *count.lock().unwrap() = 2;
        con.find_command("plugin_load").unwrap().call(&[]);
        assert!(*fired.lock().unwrap());
    }

    #[test]
    fn hook_plugin_unload_routes_self_target_to_deferred_unload() {
        let mut con = Registry::new();
        con.register_command(Cmd::new("plugin_unload", "", 0, Box::new(|_| {})));
        let unloaded = std::sync::Arc::new(std::sync::Mutex::new(false));
        let u = unloaded.clone();
        hook_plugin_unload(&mut con, |argv| argv.first().map(String::as_str) == Some("0"), move || {
            *u.lock().unwrap() = true;
        })
        .unwrap();

        con.find_command("plugin_unload").unwrap().call(&["1".to_string()]);
        assert!(*unloaded.lock().unwrap());
    }
}
