//! The plugin's callback vtable.
//!
//! Converted from: `myq2-game-dll::lib.rs`'s `static mut GAME_EXPORT:
//! game_export_t` (a mutable static export struct pre-filled with `Some`
//! function pointers, later read by the engine through `GetGameApi`'s
//! return value) generalized from Quake2's single fixed-shape export struct
//! to the Source engine's versioned `IServerPluginCallbacks001..003`, whose
//! tail past `ClientActive` is only known once `CreateInterface`'s `name`
//! argument reveals which version the host asked for. `original_source/
//! src/sst.c`'s `vtable[]`/`vtable_firstdiff` static array plays the same
//! role there: the first ten entries are fixed at compile time, the rest
//! are patched in once the interface version (and a couple of engine-branch
//! quirks) are known.
//!
//! Like a C++ object with no data members, the "object" handed back to the
//! engine is nothing but a vtable pointer: `PLUGIN_OBJ` holds the address of
//! `VTABLE`'s first slot, and `&PLUGIN_OBJ` is the `this` pointer the engine
//! calls through.

use std::os::raw::{c_char, c_int, c_void};

pub const FIXED_SLOTS: usize = 10;
pub const MAX_VTABLE_FUNCS: usize = 21;

pub type VLoad = unsafe extern "C" fn(*mut c_void, *mut c_void, *mut c_void) -> bool;
pub type VUnload = unsafe extern "C" fn(*mut c_void);
pub type VPause = unsafe extern "C" fn(*mut c_void);
pub type VGetDescription = unsafe extern "C" fn(*mut c_void) -> *const c_char;
pub type VLevelInit = unsafe extern "C" fn(*mut c_void, *const c_char);
pub type VServerActivate = unsafe extern "C" fn(*mut c_void, *mut c_void, c_int, c_int);
pub type VGameFrame = unsafe extern "C" fn(*mut c_void, bool);
pub type VLevelShutdown = unsafe extern "C" fn(*mut c_void);
pub type VClientActive = unsafe extern "C" fn(*mut c_void, *mut c_void);
pub type VClientDisconnect = unsafe extern "C" fn(*mut c_void, *mut c_void);
pub type VClientPutInServer = unsafe extern "C" fn(*mut c_void, *mut c_void, *const c_char);
pub type VSetCommandClient = unsafe extern "C" fn(*mut c_void, c_int);
pub type VClientSettingsChanged = unsafe extern "C" fn(*mut c_void, *mut c_void);
pub type VClientConnect = unsafe extern "C" fn(
    *mut c_void,
    *mut c_void,
    *const c_char,
    *const c_char,
    *mut c_char,
    c_int,
) -> bool;
pub type VClientCommand = unsafe extern "C" fn(*mut c_void, *mut c_void) -> bool;
pub type VNetworkIdValidated = unsafe extern "C" fn(*mut c_void, *const c_char, *const c_char) -> bool;
pub type VOnQueryCvarValueFinished =
    unsafe extern "C" fn(*mut c_void, c_int, *mut c_void, c_int, *const c_char, *const c_char);
pub type VOnEdict = unsafe extern "C" fn(*mut c_void, *mut c_void);

unsafe extern "C" fn nop_p_v(_this: *mut c_void) {}
unsafe extern "C" fn nop_pp_v(_this: *mut c_void, _p: *mut c_void) {}
unsafe extern "C" fn nop_ppi_v(_this: *mut c_void, _p: *const c_char) {}
unsafe extern "C" fn nop_pppii_v(_this: *mut c_void, _p: *mut c_void, _i1: c_int, _i2: c_int) {}
unsafe extern "C" fn nop_pi_v(_this: *mut c_void, _i: c_int) {}
unsafe extern "C" fn nop_ppp_v(_this: *mut c_void, _p: *mut c_void, _s: *const c_char) {}
unsafe extern "C" fn nop_client_connect(
    _this: *mut c_void,
    _edict: *mut c_void,
    _name: *const c_char,
    _addr: *const c_char,
    _reject: *mut c_char,
    _maxrej: c_int,
) -> bool {
    true
}
unsafe extern "C" fn nop_client_command(_this: *mut c_void, _edict: *mut c_void) -> bool {
    false
}
unsafe extern "C" fn nop_network_id_validated(
    _this: *mut c_void,
    _name: *const c_char,
    _id: *const c_char,
) -> bool {
    true
}
unsafe extern "C" fn nop_query_cvar_finished(
    _this: *mut c_void,
    _cookie: c_int,
    _player: *mut c_void,
    _status: c_int,
    _name: *const c_char,
    _value: *const c_char,
) {
}

use crate::lifecycle::{client_active, game_frame, get_plugin_description, load, unload};

static mut VTABLE: [*const (); MAX_VTABLE_FUNCS] = [
    load as VLoad as *const (),
    unload as VUnload as *const (),
    nop_p_v as VPause as *const (),
    nop_p_v as VPause as *const (),
    get_plugin_description as VGetDescription as *const (),
    nop_ppi_v as VLevelInit as *const (),
    nop_pppii_v as VServerActivate as *const (),
    game_frame as VGameFrame as *const (),
    nop_p_v as VLevelShutdown as *const (),
    client_active as VClientActive as *const (),
    std::ptr::null(),
    std::ptr::null(),
    std::ptr::null(),
    std::ptr::null(),
    std::ptr::null(),
    std::ptr::null(),
    std::ptr::null(),
    std::ptr::null(),
    std::ptr::null(),
    std::ptr::null(),
    std::ptr::null(),
];

/// The "this" pointer handed to the engine: a single word holding the
/// address of `VTABLE`'s first slot, exactly as a vtable-only C++ object's
/// in-memory representation would be.
#[repr(transparent)]
struct SyncConstPtr(*const *const ());
unsafe impl Sync for SyncConstPtr {}

static PLUGIN_OBJ: SyncConstPtr = SyncConstPtr((&raw const VTABLE) as *const *const ());

pub fn plugin_obj_ptr() -> *const *const *const () {
    (&raw const PLUGIN_OBJ) as *const *const *const ()
}

/// `VTABLE`'s tail is a single process-wide mutable static; anything that
/// calls `build` (directly, or via `CreateInterface`) must hold this for the
/// duration so concurrent callers -- tests, primarily, since a real host
/// only ever calls `CreateInterface` from one thread at load time -- don't
/// race on the same memory.
pub static BUILD_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Fills in the version-dependent tail of `VTABLE`, mirroring `do_load()`'s
/// direct writes through `vtable_firstdiff`. `version` is the interface
/// version requested via `CreateInterface`'s `ISERVERPLUGINCALLBACKS00N`
/// name (1..=3); `client_fully_connect` additionally threads in
/// `ClientFullyConnect`, present from interface version 002 onward.
///
/// # Safety
/// Must only be called once, from `Load`, before the engine makes any
/// further virtual calls past `ClientActive` -- matches the ordering
/// guarantee the original relies on (the engine only calls deeper into
/// the vtable well after `Load` returns).
pub unsafe fn build(version: u8, client_fully_connect: bool) -> usize {
    let _guard = BUILD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let mut i = FIXED_SLOTS;
    let mut push = |f: *const ()| {
        unsafe { VTABLE[i] = f };
        i += 1;
    };
    if client_fully_connect {
        push(nop_pp_v as VClientDisconnect as *const ());
    }
    push(nop_pp_v as VClientDisconnect as *const ());
    push(nop_ppp_v as VClientPutInServer as *const ());
    push(crate::lifecycle::set_command_client as VSetCommandClient as *const ());
    push(nop_pp_v as VClientSettingsChanged as *const ());
    push(nop_client_connect as VClientConnect as *const ());
    // Versions 1 and 2+ differ in ClientCommand's C++ signature (a raw
    // edict_t* vs an IServerPluginCallbacks handle) but not in what we do
    // with it, so `version` only needs threading through if a future
    // feature needs to tell them apart.
    let _ = version;
    push(nop_client_command as VClientCommand as *const ());
    push(nop_network_id_validated as VNetworkIdValidated as *const ());
    push(nop_query_cvar_finished as VOnQueryCvarValueFinished as *const ());
    push(nop_pp_v as VOnEdict as *const ());
    push(nop_pp_v as VOnEdict as *const ());
    i
}
