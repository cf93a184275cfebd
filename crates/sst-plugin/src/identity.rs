//! Host identity detection: probing the engine/client/server factories for
//! known interface versions and a couple of console commands, to build up
//! the `Identity` bitmask the rest of the plugin matches gamedata and
//! feature `tag_mask`s against.
//!
//! Converted from: `original_source/src/engineapi.c`'s `engineapi_init`,
//! which ORs `_gametype_tag` bits together as each probe succeeds. The
//! `CreateInterface`-style `ifacefactory` callback it calls into is
//! represented here as a plain `Fn(&str) -> bool` closure (the caller
//! already has the raw factory pointers; this module only needs to know
//! whether a name resolved, not the interface pointer itself).

use sst_gamedata::Identity;

/// One interface name to probe, paired with the tag it grants if present.
/// Entries are tried in order and the first match in each group wins,
/// mirroring the `if / else if` chains in `engineapi_init`.
struct Probe {
    name: &'static str,
    tag: Identity,
}

const CLIENT_VERSIONS: &[Probe] = &[
    Probe { name: "VEngineClient015", tag: Identity::CLIENT015 },
    Probe { name: "VEngineClient014", tag: Identity::CLIENT014 },
];

const SERVER_VERSIONS: &[Probe] = &[Probe { name: "VEngineServer021", tag: Identity::SERVER021 }];

const SRVDLL_VERSIONS: &[Probe] = &[Probe { name: "ServerGameDLL005", tag: Identity::SRVDLL005 }];

/// Detects the running host's `Identity` by probing engine/server factory
/// interface names and a console command, exactly as `engineapi_init` does.
/// `has_engine_iface`/`has_server_iface` report whether the named interface
/// is exposed by the engine/server factory respectively; `has_command`
/// reports whether a console command by that name is registered.
pub fn detect(
    has_engine_iface: impl Fn(&str) -> bool,
    has_server_iface: impl Fn(&str) -> bool,
    has_command: impl Fn(&str) -> bool,
) -> Identity {
    let mut id = Identity::NONE;

    for probe in CLIENT_VERSIONS {
        if has_engine_iface(probe.name) {
            id = id.union(probe.tag);
            break;
        }
    }
    for probe in SERVER_VERSIONS {
        if has_engine_iface(probe.name) {
            id = id.union(probe.tag);
        }
    }
    for probe in SRVDLL_VERSIONS {
        if has_server_iface(probe.name) {
            id = id.union(probe.tag);
        }
    }

    if !id.matches(Identity::PORTAL2) && has_command("upgrade_portalgun") {
        id = id.union(Identity::PORTAL1);
    }

    id
}
