//! JSON settings persistence for a target.
//!
//! [`SettingsStore`] owns the one [`Settings`] instance the application
//! works with, plus the path of the file it was last loaded from.
//!
//! # Failure policy
//!
//! | Condition                         | Result                                        |
//! |-----------------------------------|-----------------------------------------------|
//! | file missing / cannot be opened   | `error!`, [`LoadOutcome::Unreadable`], no change |
//! | file is not valid JSON            | [`SettingsError::Malformed`] returned, no change |
//! | top level is not an object        | [`SettingsError::NotAnObject`] returned, no change |
//! | a field has the wrong type        | `warn!`, that field keeps its value            |
//! | `version` missing or not `1`      | `warn!`, load continues                        |
//! | save before any successful load   | `error!`, nothing written                      |
//! | save cannot write                 | `error!`, nothing propagated                   |

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info};

use super::path_resolver::PathResolver;
use crate::domain::options::{LoadReport, Settings};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file was read but its contents are not a JSON document.
    #[error("settings file {path} is not valid JSON: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file is valid JSON but its top level is not an object or `null`.
    #[error("settings file {path} holds a JSON {found}, expected an object")]
    NotAnObject { path: PathBuf, found: &'static str },

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Saving was requested before any file was loaded.
    #[error("no settings file has been loaded, nowhere to store settings")]
    NoSettingsPath,

    /// The settings could not be serialized.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Result of [`SettingsStore::parse`] when no fatal error occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The file was parsed and applied.
    Loaded { path: PathBuf, report: LoadReport },
    /// The resolved file could not be opened; nothing changed.
    Unreadable { path: PathBuf },
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

fn non_object_kind(tree: &Value) -> Option<&'static str> {
    match tree {
        Value::Object(_) | Value::Null => None,
        Value::Array(_) => Some("array"),
        Value::String(_) => Some("string"),
        Value::Number(_) => Some("number"),
        Value::Bool(_) => Some("boolean"),
    }
}

/// Owns the live settings and the file they came from.
#[derive(Debug, Default)]
pub struct SettingsStore {
    settings: Settings,
    settings_path: Option<PathBuf>,
    resolver: PathResolver,
}

impl SettingsStore {
    /// Creates a store holding default settings.
    pub fn new(resolver: PathResolver) -> Self {
        Self {
            settings: Settings::default(),
            settings_path: None,
            resolver,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Path of the last successfully parsed file, if any.
    pub fn settings_path(&self) -> Option<&Path> {
        self.settings_path.as_deref()
    }

    /// Loads the settings file for `name` over the current settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Malformed`] if the file is not valid JSON,
    /// [`SettingsError::NotAnObject`] if it holds an array, string, number
    /// or boolean, and [`SettingsError::Io`] if it opened but could not be
    /// read.  In each case no setting and not the stored path have been
    /// touched.  A top-level `null` loads like an empty object.  A file
    /// that cannot be opened is not an error: it is logged and reported as
    /// [`LoadOutcome::Unreadable`].
    pub fn parse(&mut self, name: &str) -> Result<LoadOutcome, SettingsError> {
        let path = self.resolver.resolve(name);

        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                error!("Couldn't open settings file {}: {e}", path.display());
                return Ok(LoadOutcome::Unreadable { path });
            }
        };

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|source| SettingsError::Io {
                path: path.clone(),
                source,
            })?;
        drop(file);

        let contents = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes[..]);
        let tree: Value =
            serde_json::from_slice(contents).map_err(|source| SettingsError::Malformed {
                path: path.clone(),
                source,
            })?;
        if let Some(found) = non_object_kind(&tree) {
            return Err(SettingsError::NotAnObject { path, found });
        }

        self.settings_path = Some(path.clone());
        let report = self.settings.apply_tree(&tree);

        debug!("Read config file \"{}\"; config: {tree}", path.display());

        Ok(LoadOutcome::Loaded { path, report })
    }

    /// Writes the current settings back to the last loaded file.
    ///
    /// Failures are logged, never returned.  Use
    /// [`try_store_settings`](Self::try_store_settings) to inspect them.
    pub fn store_settings(&self) {
        if let Err(e) = self.try_store_settings() {
            error!("Couldn't store settings file: {e}");
        }
    }

    /// Like [`store_settings`](Self::store_settings) but returns the error.
    ///
    /// # Errors
    ///
    /// [`SettingsError::NoSettingsPath`] before the first successful
    /// [`parse`](Self::parse), otherwise whatever [`write_to`](Self::write_to)
    /// reports.
    pub fn try_store_settings(&self) -> Result<&Path, SettingsError> {
        let path = self
            .settings_path
            .as_deref()
            .ok_or(SettingsError::NoSettingsPath)?;
        self.write_to(path)?;
        Ok(path)
    }

    /// Writes the current settings to `path`.
    ///
    /// The document is serialized in memory first, so a field that cannot
    /// be encoded leaves the file untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Serialize`] or [`SettingsError::Io`].
    pub fn write_to(&self, path: &Path) -> Result<(), SettingsError> {
        let mut content = Vec::new();
        self.settings
            .write_pretty(&mut content)
            .map_err(SettingsError::Serialize)?;
        std::fs::write(path, content).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Stored settings to {}", path.display());
        Ok(())
    }
}
