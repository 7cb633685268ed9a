//! # glossi-settings
//!
//! Typed settings for a GlosSI target: the option groups a target reads at
//! startup, the JSON file they live in, and the host OS capability flag used
//! to branch behaviour elsewhere in the application.
//!
//! # Architecture overview
//!
//! - **`domain`** – Pure logic with no file-system or OS access.  Option
//!   groups and their defaults, the UTF-8 ⇄ UTF-16 [`WideString`] converter,
//!   the fault-tolerant field extractor, and the launch-target classifier
//!   that decides whether a launch path names a UWP application.
//!
//! - **`infrastructure`** – The parts that touch the outside world.  The
//!   [`PathResolver`] turns a bare target name into a settings file path,
//!   the [`SettingsStore`] reads and writes that file, and the `os_probe`
//!   adapters query the real Windows build number.
//!
//! The crate only emits `tracing` events.  Installing a subscriber is the
//! binary's job.

pub mod domain;
pub mod infrastructure;

pub use domain::extract::{FieldError, FieldWarning};
pub use domain::launch_target::{is_uwp, LaunchTargetKind};
pub use domain::options::{
    ControllerOptions, DeviceOptions, LaunchOptions, LoadReport, Settings, WindowOptions,
    SUPPORTED_VERSION,
};
pub use domain::wide::{EncodingError, WideString};
pub use infrastructure::os_probe::{
    probe, NativeVersionSource, OsCapabilities, OsVersion, OsVersionSource,
};
pub use infrastructure::path_resolver::PathResolver;
pub use infrastructure::store::{LoadOutcome, SettingsError, SettingsStore};
