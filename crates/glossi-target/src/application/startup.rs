//! Target start-up: arguments, OS probe, settings load.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use glossi_settings::{
    probe, LoadOutcome, OsCapabilities, OsVersionSource, PathResolver, Settings, SettingsStore,
};

/// Command-line arguments for `glossi-target`.
#[derive(Debug, Clone, Parser)]
#[command(name = "glossi-target", version, about = "Start a GlosSI target from its settings file")]
pub struct TargetArgs {
    /// Target settings name or path; ".json" is appended if missing.
    pub config: String,

    /// Directory searched when CONFIG does not exist as given
    /// (default: %APPDATA%\GlosSI\Targets, derived from the temp directory).
    #[arg(long, env = "GLOSSI_TARGETS_DIR")]
    pub targets_dir: Option<PathBuf>,

    /// Write the effective settings back to the loaded file.
    #[arg(long)]
    pub store: bool,

    /// Print the effective settings as JSON on stdout.
    #[arg(long)]
    pub print: bool,
}

/// Everything a running target reads at start-up.
#[derive(Debug)]
pub struct TargetContext {
    store: SettingsStore,
    capabilities: OsCapabilities,
}

impl TargetContext {
    /// Probes the OS and loads the target named in `args`.
    ///
    /// A missing settings file is not fatal; the target runs on defaults.
    ///
    /// # Errors
    ///
    /// Fails if the settings file exists but is not valid JSON.
    pub fn load(args: &TargetArgs, version_source: &dyn OsVersionSource) -> anyhow::Result<Self> {
        let capabilities = probe(version_source);

        let resolver = match &args.targets_dir {
            Some(dir) => PathResolver::with_fallback_dir(dir),
            None => PathResolver::from_env(),
        };
        let mut store = SettingsStore::new(resolver);

        let outcome = store
            .parse(&args.config)
            .with_context(|| format!("failed to load settings for target \"{}\"", args.config))?;
        match outcome {
            LoadOutcome::Loaded { path, report } => info!(
                "loaded target settings from {} ({} field warning(s))",
                path.display(),
                report.warnings.len()
            ),
            LoadOutcome::Unreadable { .. } => warn!("continuing with default settings"),
        }

        if args.store {
            store.store_settings();
        }

        Ok(Self {
            store,
            capabilities,
        })
    }

    pub fn settings(&self) -> &Settings {
        self.store.settings()
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    pub fn capabilities(&self) -> OsCapabilities {
        self.capabilities
    }

    /// The effective settings as the JSON document `store_settings` writes.
    ///
    /// # Errors
    ///
    /// Fails if a text field holds invalid UTF-16.
    pub fn settings_json(&self) -> anyhow::Result<String> {
        let mut out = Vec::new();
        self.settings().write_pretty(&mut out)?;
        Ok(String::from_utf8(out)?)
    }

    /// One-line description of what the target is about to do.
    pub fn summary(&self) -> String {
        let launch = &self.settings().launch;
        let os = if self.capabilities.is_legacy {
            "legacy OS"
        } else {
            "modern OS"
        };
        if launch.launch {
            format!(
                "launching {:?} target \"{}\" ({os})",
                launch.launch_target(),
                launch.launch_path
            )
        } else {
            format!("not launching anything ({os})")
        }
    }
}
