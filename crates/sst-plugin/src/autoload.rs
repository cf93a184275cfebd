//! `SourceSpeedrunTools.vdf` autoload registration: writing (and removing) a
//! `Plugin { file "..." }` stanza under `<gamedir>/addons/` so the engine
//! loads this plugin on every game startup without the user retyping
//! `plugin_load` every session.
//!
//! Converted from: `original_source/src/sst.c`'s `sst_autoload_enable`/
//! `sst_autoload_disable`, simplified from the original's in-place
//! fixed-buffer path surgery (and its separate interface-version-2-vs-3
//! "which directory is the base for relative-pathing" branch) into ordinary
//! `Path`/`PathBuf` manipulation -- `Path::strip_prefix`/a manual
//! common-prefix walk stand in for `PathRelativePathToW`/the POSIX
//! hand-rolled relative-path loop.

use std::path::{Path, PathBuf};

use crate::error::{PluginError, Result};

const VDF_BASENAME: &str = "SourceSpeedrunTools.vdf";

/// Builds a relative path from `start_dir` to `target`, the same job
/// `PathRelativePathToW`/the original's POSIX loop does: walk up out of
/// `start_dir` with `..` until reaching the nearest ancestor shared with
/// `target`, then back down into `target`.
fn relative_to(start_dir: &Path, target: &Path) -> Option<PathBuf> {
    let start_dir = start_dir.canonicalize().ok()?;
    let target = target.canonicalize().ok()?;

    let mut start_components = start_dir.components();
    let mut target_components = target.components();
    let mut common = 0;
    loop {
        let (s, t) = (start_components.clone().next(), target_components.clone().next());
        match (s, t) {
            (Some(a), Some(b)) if a == b => {
                start_components.next();
                target_components.next();
                common += 1;
            }
            _ => break,
        }
    }
    let _ = common;

    let mut rel = PathBuf::new();
    for _ in start_components {
        rel.push("..");
    }
    for part in target_components {
        rel.push(part.as_os_str());
    }
    Some(rel)
}

#[cfg(windows)]
fn same_drive(a: &Path, b: &Path) -> bool {
    use std::path::Component;
    let prefix = |p: &Path| match p.components().next() {
        Some(Component::Prefix(pc)) => Some(pc.as_os_str().to_ascii_lowercase()),
        _ => None,
    };
    match (prefix(a), prefix(b)) {
        (Some(x), Some(y)) => x == y,
        _ => true,
    }
}

#[cfg(not(windows))]
fn same_drive(_a: &Path, _b: &Path) -> bool {
    true
}

fn vdf_path(gamedir: &Path) -> PathBuf {
    gamedir.join("addons").join(VDF_BASENAME)
}

/// Writes the autoload VDF pointing at `plugin_path`, relative to `gamedir`.
/// Refuses cross-drive setups on Windows the same way the original does,
/// rather than writing an absolute path that would break if a removable
/// disk is swapped out.
pub fn enable(gamedir: &Path, plugin_path: &Path) -> Result<()> {
    if !same_drive(gamedir, plugin_path) {
        return Err(PluginError::CrossDrive);
    }
    let rel = relative_to(gamedir, plugin_path).ok_or(PluginError::OwnPath)?;
    let rel_str = rel.to_string_lossy().replace('\\', "/");

    let addons_dir = gamedir.join("addons");
    if let Err(e) = sst_platform::fs::mkdir(&addons_dir) {
        if !matches!(&e, sst_platform::PlatformError::Mkdir { source, .. } if source.0 == sst_platform::error::codes::EEXIST)
        {
            return Err(PluginError::Mkdir(e));
        }
    }

    let contents = format!("Plugin {{ file \"{rel_str}\" }}\n");
    let f = sst_platform::fs::open_writetrunc(&vdf_path(gamedir)).map_err(PluginError::Write)?;
    let res = sst_platform::fs::write(&f, contents.as_bytes()).map_err(PluginError::Write);
    sst_platform::fs::close(f);
    res.map(|_| ())
}

/// Removes the autoload VDF. Not finding one is not an error -- matches the
/// original's `os_lasterror() != OS_ENOENT` "didn't exist already" check.
pub fn disable(gamedir: &Path) -> Result<()> {
    match sst_platform::fs::unlink(&vdf_path(gamedir)) {
        Ok(()) => Ok(()),
        Err(sst_platform::PlatformError::Remove { source, .. })
            if source.0 == sst_platform::error::codes::ENOENT =>
        {
            Ok(())
        }
        Err(e) => Err(PluginError::Remove(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn unique_dir(label: &str) -> PathBuf {
        temp_dir().join(format!("sst-plugin-autoload-test-{label}-{}", std::process::id()))
    }

    #[test]
    fn relative_to_walks_up_and_back_down() {
        let game = unique_dir("game");
        let bin = game.join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        let plugin_dir = game.join("addons").join("sst");
        std::fs::create_dir_all(&plugin_dir).unwrap();
        let plugin = plugin_dir.join("libsst.so");
        std::fs::write(&plugin, b"").unwrap();

        let rel = relative_to(&bin, &plugin).expect("relative path");
        assert_eq!(rel, PathBuf::from("../addons/sst/libsst.so"));

        std::fs::remove_dir_all(&game).ok();
    }

    #[test]
    fn enable_then_disable_round_trips_the_vdf_file() {
        let game = unique_dir("enable");
        std::fs::create_dir_all(&game).unwrap();
        let plugin_dir = unique_dir("plugin-dir");
        std::fs::create_dir_all(&plugin_dir).unwrap();
        let plugin = plugin_dir.join("libsst.so");
        std::fs::write(&plugin, b"").unwrap();

        enable(&game, &plugin).expect("enable");
        let vdf = vdf_path(&game);
        assert!(vdf.exists());
        let text = std::fs::read_to_string(&vdf).unwrap();
        assert!(text.starts_with("Plugin { file \""));
        assert!(text.contains("libsst.so"));

        disable(&game).expect("disable");
        assert!(!vdf.exists());

        std::fs::remove_dir_all(&game).ok();
        std::fs::remove_dir_all(&plugin_dir).ok();
    }

    #[test]
    fn disable_without_existing_file_is_not_an_error() {
        let game = unique_dir("disable-missing");
        std::fs::create_dir_all(game.join("addons")).unwrap();
        assert!(disable(&game).is_ok());
        std::fs::remove_dir_all(&game).ok();
    }
}
