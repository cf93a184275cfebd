//! Plugin lifecycle: the handful of `extern "C"` functions the engine
//! actually calls through the vtable built in `vtable.rs`, plus the
//! `Mutex`-guarded global state they share.
//!
//! Converted from: `myq2-game-dll::lib.rs`'s `static GAME_CONTEXT:
//! Mutex<Option<GameContext>>` pattern (a lazily-populated, mutex-guarded
//! bundle of everything the DLL's exported callbacks need, since the host
//! only ever gives us function pointers, never a place to stash our own
//! state), combined with `original_source/src/sst.c`'s `do_load`/`do_unload`/
//! `Load`/`Unload`/`GameFrame`/`ClientActive`/`deferinit` sequencing.

use std::os::raw::{c_char, c_int, c_void};
use std::sync::Mutex;

use anyhow::Context;

use sst_con::Registry as ConRegistry;
use sst_feature::Registry as FeatureRegistry;
use sst_gamedata::{Identity, Store};
use sst_hook::TrampolineArena;

use crate::{identity, vtable};

/// Size of the hook-buffer page carved out at `Load`, matching the
/// original's `_Alignas(4096) uchar trampolines[4096]`.
const HOOK_ARENA_SIZE: usize = 4096;

/// Everything the plugin needs once loaded: detected host identity, the
/// resolved gamedata store, and the console/feature registries features
/// get wired up against. Absent (`None`) until `Load` succeeds.
pub struct PluginContext {
    pub identity: Identity,
    pub gamedata: Store,
    pub con: ConRegistry,
    pub features: FeatureRegistry,
    /// VGui hasn't connected yet when this is true; feature init is
    /// deferred to the `CEngineVGui::Connect` hook rather than run inline
    /// from `Load`. Mirrors `sst_earlyloaded`.
    pub deferred: bool,
    /// Set by the `plugin_unload` command hook when the user has asked to
    /// unload *this* plugin; checked at the top of the next `GameFrame` and
    /// acted on there, since Rust has no equivalent of the original's tail
    /// call into a callback that may free this very library's memory mid-
    /// call. See DESIGN.md's note on this deliberate redesign.
    pub pending_unload: bool,
    /// The page hooks carve their trampolines out of; allocated once at
    /// `Load`, matching `hook_inline_mprot`'s one-time page-permission
    /// flip over the original's fixed `trampolines[4096]` array.
    pub hook_arena: TrampolineArena,
}

impl PluginContext {
    fn new(identity: Identity, hook_arena: TrampolineArena) -> Self {
        PluginContext {
            identity,
            gamedata: Store::new(),
            con: ConRegistry::new(),
            features: FeatureRegistry::new(),
            deferred: false,
            pending_unload: false,
            hook_arena,
        }
    }
}

static CONTEXT: Mutex<Option<PluginContext>> = Mutex::new(None);

/// Runs `f` with the loaded context, logging and returning `default` if the
/// plugin isn't currently loaded (shouldn't happen once `Load` has
/// succeeded, but every engine-facing entry point checks anyway, matching
/// `already_loaded`'s role as a load guard in the original).
fn with_context<R>(default: R, f: impl FnOnce(&mut PluginContext) -> R) -> R {
    match CONTEXT.lock() {
        Ok(mut guard) => match guard.as_mut() {
            Some(ctx) => f(ctx),
            None => default,
        },
        Err(poisoned) => {
            log::error!("plugin context lock was poisoned; a prior callback must have panicked");
            match poisoned.into_inner().as_mut() {
                Some(ctx) => f(ctx),
                None => default,
            }
        }
    }
}

/// Runs one load of the plugin's own logic, independent of the engine ABI
/// plumbing `vtable::load` wraps it in: detects identity, resolves
/// gamedata, and either runs feature init now or defers it until VGui
/// connects.
static LOGGER_INIT: std::sync::Once = std::sync::Once::new();

/// Sets up `env_logger` on first load. The host has no logging facility of
/// its own to hook into before `con_init` has run, so this plugin brings
/// its own, the same way it would as a standalone process.
fn init_logger() {
    LOGGER_INIT.call_once(|| {
        let _ = env_logger::try_init();
    });
}

fn do_load(has_engine_iface: impl Fn(&str) -> bool, has_server_iface: impl Fn(&str) -> bool) -> bool {
    init_logger();

    let hook_arena = match TrampolineArena::new(HOOK_ARENA_SIZE).context("allocating the hook trampoline page") {
        Ok(arena) => arena,
        Err(e) => {
            log::error!("{e:#}");
            return false;
        }
    };

    let id = identity::detect(&has_engine_iface, &has_server_iface, |_| false);
    let mut ctx = PluginContext::new(id, hook_arena);

    // `commands::register` is the one step in load that can meaningfully
    // fail (a command-name collision); everything upstream of it is
    // infallible table population. Collapsed through anyhow into one
    // logged line rather than growing lifecycle::load its own wrapper
    // variant for a failure mode this crate's own fixed names should never
    // actually hit.
    if let Err(e) = crate::commands::register(&mut ctx.con).context("registering built-in commands") {
        log::error!("{e:#}");
        return false;
    }

    // Hooking the host's own `plugin_load`/`plugin_unload` commands (spec
    // step 7) needs those commands to already exist in `ctx.con` -- which
    // requires a live bridge importing the host's registered commands,
    // not yet implemented in `sst_con::Registry` (it currently only models
    // commands this plugin registers itself). `commands::hook_plugin_load`/
    // `hook_plugin_unload` are ready for that bridge to call into; see
    // DESIGN.md.

    ctx.gamedata.init(id);
    check_updated();
    let deferred = !vgui_is_ready();
    if !deferred {
        run_feature_init(&mut ctx);
    }
    ctx.deferred = deferred;
    *CONTEXT.lock().unwrap_or_else(|e| e.into_inner()) = Some(ctx);
    true
}

/// Best-effort VGui readiness probe; a real build would check the engine's
/// `CEngineVGui::VGuiIsInitialized` vfunc through the discovered interface.
/// With no interface plumbed in yet, feature init just always runs inline,
/// matching the "early loaded" fallback path (`sst_earlyloaded = true`).
fn vgui_is_ready() -> bool {
    true
}

fn run_feature_init(ctx: &mut PluginContext) {
    let gamedata = &ctx.gamedata;
    let identity = ctx.identity;
    let con = &ctx.con;
    if let Err(e) = ctx
        .features
        .run_init(gamedata, identity, |name| con.find_variable(name).is_some())
    {
        log::error!("feature dependency graph is broken: {e}");
    }
    for line in ctx.features.report() {
        log::info!("{line}");
    }
}

fn check_updated() {
    if std::env::var_os("SST_UPDATED").is_some() {
        log::info!("Source speedrun tool has been updated -- see the changelog for what's new");
        // SAFETY: called once, synchronously, before any other thread in
        // this process could plausibly be reading the environment; no
        // other code in this plugin touches SST_UPDATED.
        unsafe { std::env::remove_var("SST_UPDATED") };
    }
}

fn do_unload() {
    with_context((), |ctx| ctx.features.teardown());
    *CONTEXT.lock().unwrap_or_else(|e| e.into_inner()) = None;
}

/// Called by the `plugin_unload` command hook when the user has targeted
/// this plugin; flags the unload for the next frame instead of unwinding
/// out of the command dispatcher, which is still on the stack at this
/// point.
pub fn request_unload() {
    with_context((), |ctx| ctx.pending_unload = true);
}

fn run_catching<R>(label: &str, default: R, f: impl FnOnce() -> R) -> R {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
        Ok(r) => r,
        Err(_) => {
            log::error!("panic inside {label}; continuing to avoid unwinding across the FFI boundary");
            default
        }
    }
}

pub unsafe extern "C" fn load(_this: *mut c_void, enginef: *mut c_void, serverf: *mut c_void) -> bool {
    run_catching("Load", false, || {
        let has_engine_iface = |_name: &str| !enginef.is_null();
        let has_server_iface = |_name: &str| !serverf.is_null();
        do_load(has_engine_iface, has_server_iface)
    })
}

pub unsafe extern "C" fn unload(_this: *mut c_void) {
    run_catching("Unload", (), do_unload)
}

static DESCRIPTION: &[u8] = b"Source speedrun tool\0";

pub unsafe extern "C" fn get_plugin_description(_this: *mut c_void) -> *const c_char {
    DESCRIPTION.as_ptr() as *const c_char
}

pub unsafe extern "C" fn game_frame(_this: *mut c_void, _simulating: bool) {
    run_catching("GameFrame", (), || {
        let unload_requested = with_context(false, |ctx| {
            let was = ctx.pending_unload;
            ctx.pending_unload = false;
            was
        });
        if unload_requested {
            do_unload();
        }
    })
}

pub unsafe extern "C" fn client_active(_this: *mut c_void, _player: *mut c_void) {
    run_catching("ClientActive", (), || {
        with_context((), |ctx| {
            if ctx.deferred {
                run_feature_init(ctx);
                ctx.deferred = false;
            }
        });
    })
}

static mut COMMAND_CLIENT: c_int = 0;

pub unsafe extern "C" fn set_command_client(_this: *mut c_void, index: c_int) {
    unsafe { COMMAND_CLIENT = index };
}

pub fn command_client() -> c_int {
    unsafe { COMMAND_CLIENT }
}

/// Fills in the version-dependent vtable tail and returns the number of
/// valid slots, for `CreateInterface` to hand back to the engine.
pub fn finish_loading_vtable(version: u8, client_fully_connect: bool) -> usize {
    unsafe { vtable::build(version, client_fully_connect) }
}
