//! Subscriber setup.
//!
//! The filter starts at `info` (or `RUST_LOG`) and sits behind a reload
//! layer, because the `extendedLogging` switch is only known after the
//! settings file has been read.  Debug events emitted while loading that
//! file are therefore filtered out; the caller re-logs the effective
//! settings once [`apply_settings`] has raised the level.

use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

use glossi_settings::Settings;

/// Handle for swapping the active filter after start-up.
pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

const DEFAULT_FILTER: &str = "info";
const EXTENDED_FILTER: &str = "debug";

/// Installs the global subscriber and returns its filter handle.
///
/// # Errors
///
/// Fails if a global subscriber is already set.
pub fn init() -> anyhow::Result<FilterHandle> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let (filter, handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init()?;
    Ok(handle)
}

/// `extendedLogging` only applies when `RUST_LOG` has not been set.
pub fn wants_extended_logging(settings: &Settings, rust_log_set: bool) -> bool {
    settings.extended_logging && !rust_log_set
}

/// Raises the filter to `debug` if the settings ask for it.
///
/// Returns `true` if the filter was raised.
pub fn apply_settings(handle: &FilterHandle, settings: &Settings) -> bool {
    let rust_log_set = std::env::var_os(EnvFilter::DEFAULT_ENV).is_some();
    wants_extended_logging(settings, rust_log_set) && raise_filter(handle)
}

fn raise_filter(handle: &FilterHandle) -> bool {
    match handle.modify(|filter| *filter = EnvFilter::new(EXTENDED_FILTER)) {
        Ok(()) => {
            info!("extended logging enabled");
            true
        }
        Err(e) => {
            warn!("could not enable extended logging: {e}");
            false
        }
    }
}
