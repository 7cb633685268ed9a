//! Settings file lookup.
//!
//! A target is started with the name of its settings file, with or without
//! the `.json` extension, either as a path relative to the working directory
//! or as a bare name that lives in the GlosSI targets directory:
//!
//! - Windows: `%APPDATA%\GlosSI\Targets\<name>.json`
//!
//! The targets directory is derived from the temp directory rather than from
//! `%APPDATA%`: `…\AppData\Local\Temp` → `…\AppData` → `Roaming\GlosSI\Targets`.
//! There is exactly one fallback level.  Existence is only checked here;
//! open failures are reported by the store.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Extension every settings file carries.
pub const SETTINGS_EXTENSION: &str = ".json";

/// Resolves target names to settings file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    fallback_dir: Option<PathBuf>,
}

impl PathResolver {
    /// Uses the process temp directory to locate the targets directory.
    pub fn from_env() -> Self {
        Self::with_temp_dir(&std::env::temp_dir())
    }

    /// Derives the targets directory from an explicit temp directory.
    pub fn with_temp_dir(temp_dir: &Path) -> Self {
        Self {
            fallback_dir: targets_dir_from_temp(temp_dir),
        }
    }

    /// Uses `dir` directly as the fallback directory.
    pub fn with_fallback_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            fallback_dir: Some(dir.into()),
        }
    }

    /// The directory searched when the name does not exist as given.
    pub fn fallback_dir(&self) -> Option<&Path> {
        self.fallback_dir.as_deref()
    }

    /// Resolves `name` to a settings file path.
    ///
    /// Appends `.json` if missing.  If the result does not exist relative to
    /// the working directory (or as an absolute path), it is joined onto the
    /// fallback directory instead.  `resolve("foo")` and
    /// `resolve("foo.json")` always agree.
    pub fn resolve(&self, name: &str) -> PathBuf {
        let file_name = if name.ends_with(SETTINGS_EXTENSION) {
            name.to_string()
        } else {
            format!("{name}{SETTINGS_EXTENSION}")
        };

        let direct = PathBuf::from(&file_name);
        if direct.exists() {
            return direct;
        }

        match &self.fallback_dir {
            Some(dir) => {
                let fallback = dir.join(&file_name);
                debug!(
                    "\"{}\" not found; trying {}",
                    direct.display(),
                    fallback.display()
                );
                fallback
            }
            None => direct,
        }
    }
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::from_env()
    }
}

/// `<temp>/../..` + `Roaming/GlosSI/Targets`, if the temp dir is deep enough.
fn targets_dir_from_temp(temp_dir: &Path) -> Option<PathBuf> {
    let app_data = temp_dir.ancestors().nth(2)?;
    if app_data.as_os_str().is_empty() {
        return None;
    }
    Some(app_data.join("Roaming").join("GlosSI").join("Targets"))
}
