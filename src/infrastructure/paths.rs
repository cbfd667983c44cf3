//! Filesystem locations for configuration, traces and themes.
//!
//! Follows the XDG base directory layout with `$HOME` fallbacks. Nothing here
//! creates directories; callers do that when they actually write.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "marketmod";

/// Returns the data directory used for trace files.
///
/// Resolution order: `$XDG_DATA_HOME/marketmod`, `$HOME/.local/share/marketmod`,
/// then `<tmp>/marketmod`.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    env::var_os("XDG_DATA_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir().map(|home| home.join(".local").join("share")))
        .unwrap_or_else(env::temp_dir)
        .join(APP_DIR)
}

/// Returns the default configuration file path.
///
/// `$XDG_CONFIG_HOME/marketmod/config.toml` or `$HOME/.config/marketmod/config.toml`.
#[must_use]
pub fn get_config_file() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir().map(|home| home.join(".config")))
        .map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a tilde, or a tilde with no known home, are returned as-is.
///
/// # Examples
///
/// ```
/// use marketmod::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = home_dir() else {
        return path.to_string();
    };
    if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest).to_string_lossy().into_owned()
    } else if path == "~" {
        home.to_string_lossy().into_owned()
    } else {
        path.to_string()
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME").filter(|v| !v.is_empty()).map(PathBuf::from)
}
