//! core::paths
//!
//! Home directory expansion for user supplied paths.

use std::path::{Path, PathBuf};

/// Expand a leading `~` or `~/` to the home directory.
///
/// Other paths, and all paths when no home directory is known, are
/// returned unchanged.
///
/// # Example
///
/// ```
/// use gdk_release::core::paths::expand_home;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(expand_home(Path::new("/etc/token")), PathBuf::from("/etc/token"));
/// assert_eq!(expand_home(Path::new("rel/token")), PathBuf::from("rel/token"));
/// ```
pub fn expand_home(path: &Path) -> PathBuf {
    match dirs::home_dir() {
        Some(home) => expand_home_with(path, &home),
        None => path.to_path_buf(),
    }
}

fn expand_home_with(path: &Path, home: &Path) -> PathBuf {
    let Some(raw) = path.to_str() else {
        return path.to_path_buf();
    };

    if raw == "~" {
        return home.to_path_buf();
    }

    match raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        Some(rest) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// Per-user configuration directories for the tool, in search order.
pub fn config_dirs() -> Vec<PathBuf> {
    let xdg_home = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    config_dirs_with(xdg_home.as_deref(), dirs::home_dir().as_deref())
}

/// `$XDG_CONFIG_HOME/gdk-release` when set and non-empty, then
/// `~/.gdk-release`.
pub fn config_dirs_with(xdg_home: Option<&Path>, home: Option<&Path>) -> Vec<PathBuf> {
    let mut dirs = Vec::with_capacity(2);
    if let Some(xdg_home) = xdg_home.filter(|p| !p.as_os_str().is_empty()) {
        dirs.push(xdg_home.join("gdk-release"));
    }
    if let Some(home) = home {
        dirs.push(home.join(".gdk-release"));
    }
    dirs
}
