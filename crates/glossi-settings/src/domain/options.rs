//! Option groups and the settings document.
//!
//! A target's settings file looks like this (every key optional, unknown
//! keys ignored):
//!
//! ```json
//! {
//!     "version": 1,
//!     "launch": {
//!         "launch": true,
//!         "launchPath": "steam://rungameid/292030",
//!         "launchAppArgs": "",
//!         "closeOnExit": true,
//!         "waitForChildProcs": true
//!     },
//!     "devices": { "hideDevices": true, "realDeviceIds": false },
//!     "window": { "windowMode": false, "maxFps": 0, "scale": 0.0, "disableOverlay": false },
//!     "controller": { "maxControllers": 1, "allowDesktopConfig": false, "emulateDS4": false },
//!     "extendedLogging": false
//! }
//! ```
//!
//! [`Settings::apply_tree`] overlays a parsed document on the current
//! values field by field.  Serialization goes through [`Settings::write_pretty`],
//! which always writes every key and `"version": 1`.

use std::io;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::{debug, warn};

use super::extract::{extract, extract_group, FieldEntry, FieldWarning};
use super::launch_target::LaunchTargetKind;
use super::wide::WideString;

/// Settings file schema version this build reads and writes.
pub const SUPPORTED_VERSION: i32 = 1;

/// An option group stored under its own top-level key.
trait OptionGroup {
    /// Top-level key of the group's object.
    const KEY: &'static str;

    /// `(json key, destination)` table for every stored field.
    fn fields(&mut self) -> Vec<FieldEntry<'_>>;
}

/// How the target launches (or doesn't launch) the game.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchOptions {
    pub launch: bool,
    pub launch_path: WideString,
    pub launch_app_args: WideString,
    pub close_on_exit: bool,
    pub wait_for_child_procs: bool,
    /// Derived from `launch_path`; never read from or trusted in the file.
    #[serde(skip)]
    pub is_uwp: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            launch: false,
            launch_path: WideString::new(),
            launch_app_args: WideString::new(),
            close_on_exit: true,
            wait_for_child_procs: true,
            is_uwp: false,
        }
    }
}

impl LaunchOptions {
    /// Classifies the current launch path.
    pub fn launch_target(&self) -> LaunchTargetKind {
        LaunchTargetKind::classify_wide(&self.launch_path)
    }
}

impl OptionGroup for LaunchOptions {
    const KEY: &'static str = "launch";

    fn fields(&mut self) -> Vec<FieldEntry<'_>> {
        let fields: [FieldEntry<'_>; 5] = [
            ("launch", &mut self.launch),
            ("launchPath", &mut self.launch_path),
            ("launchAppArgs", &mut self.launch_app_args),
            ("closeOnExit", &mut self.close_on_exit),
            ("waitForChildProcs", &mut self.wait_for_child_procs),
        ];
        fields.into()
    }
}

/// Physical controller hiding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceOptions {
    pub hide_devices: bool,
    pub real_device_ids: bool,
}

impl Default for DeviceOptions {
    fn default() -> Self {
        Self {
            hide_devices: true,
            real_device_ids: false,
        }
    }
}

impl OptionGroup for DeviceOptions {
    const KEY: &'static str = "devices";

    fn fields(&mut self) -> Vec<FieldEntry<'_>> {
        let fields: [FieldEntry<'_>; 2] = [
            ("hideDevices", &mut self.hide_devices),
            ("realDeviceIds", &mut self.real_device_ids),
        ];
        fields.into()
    }
}

/// Overlay window behaviour.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowOptions {
    pub window_mode: bool,
    pub max_fps: i32,
    pub scale: f32,
    pub disable_overlay: bool,
}

impl OptionGroup for WindowOptions {
    const KEY: &'static str = "window";

    fn fields(&mut self) -> Vec<FieldEntry<'_>> {
        let fields: [FieldEntry<'_>; 4] = [
            ("windowMode", &mut self.window_mode),
            ("maxFps", &mut self.max_fps),
            ("scale", &mut self.scale),
            ("disableOverlay", &mut self.disable_overlay),
        ];
        fields.into()
    }
}

/// Virtual controller emulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerOptions {
    pub max_controllers: i32,
    pub allow_desktop_config: bool,
    #[serde(rename = "emulateDS4")]
    pub emulate_ds4: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            max_controllers: 1,
            allow_desktop_config: false,
            emulate_ds4: false,
        }
    }
}

impl OptionGroup for ControllerOptions {
    const KEY: &'static str = "controller";

    fn fields(&mut self) -> Vec<FieldEntry<'_>> {
        let fields: [FieldEntry<'_>; 3] = [
            ("maxControllers", &mut self.max_controllers),
            ("allowDesktopConfig", &mut self.allow_desktop_config),
            ("emulateDS4", &mut self.emulate_ds4),
        ];
        fields.into()
    }
}

/// Every option group plus the top-level flags.
///
/// One instance is owned by the application's composition root and lent
/// out by reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub launch: LaunchOptions,
    pub devices: DeviceOptions,
    pub window: WindowOptions,
    pub controller: ControllerOptions,
    pub extended_logging: bool,
}

/// What happened while applying a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// `version` as read, if it was present and an integer.
    pub version: Option<i32>,
    /// `version` was missing or not [`SUPPORTED_VERSION`].
    pub version_mismatch: bool,
    /// Fields that were present but rejected.
    pub warnings: Vec<FieldWarning>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingsDocument<'a> {
    version: i32,
    launch: &'a LaunchOptions,
    devices: &'a DeviceOptions,
    window: &'a WindowOptions,
    controller: &'a ControllerOptions,
    extended_logging: bool,
}

fn apply_group<G: OptionGroup>(tree: &Value, group: &mut G, warnings: &mut Vec<FieldWarning>) {
    match tree.get(G::KEY) {
        Some(object @ Value::Object(_)) => {
            extract_group(object, G::KEY, &mut group.fields(), warnings);
        }
        Some(_) => debug!("\"{}\" is not an object; keeping current values", G::KEY),
        None => {}
    }
}

impl Settings {
    /// Overlays `tree` on the current values.
    ///
    /// Fields that are missing, blank or of the wrong type keep their
    /// current value.  `launch.is_uwp` is recomputed only when
    /// `launch.launch` is true afterwards; otherwise it is left as it was.
    pub fn apply_tree(&mut self, tree: &Value) -> LoadReport {
        let mut report = LoadReport::default();

        if !tree.is_object() && !tree.is_null() {
            warn!("settings document is not a JSON object; nothing to load");
        }

        extract(tree, "", "version", &mut report.version, &mut report.warnings);
        if report.version != Some(SUPPORTED_VERSION) {
            // TODO: migrate older documents once a version 2 schema exists.
            warn!("Config version doesn't match application version.");
            report.version_mismatch = true;
        }

        apply_group(tree, &mut self.launch, &mut report.warnings);
        apply_group(tree, &mut self.devices, &mut report.warnings);
        apply_group(tree, &mut self.window, &mut report.warnings);
        apply_group(tree, &mut self.controller, &mut report.warnings);
        extract(
            tree,
            "",
            "extendedLogging",
            &mut self.extended_logging,
            &mut report.warnings,
        );

        if self.launch.launch {
            self.launch.is_uwp = self.launch.launch_target() == LaunchTargetKind::UwpApp;
        }

        report
    }

    /// Writes the full document, indented by four spaces.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors from `writer`, or if a text field holds invalid
    /// UTF-16.
    pub fn write_pretty<W: io::Write>(&self, writer: W) -> serde_json::Result<()> {
        let document = SettingsDocument {
            version: SUPPORTED_VERSION,
            launch: &self.launch,
            devices: &self.devices,
            window: &self.window,
            controller: &self.controller,
            extended_logging: self.extended_logging,
        };
        let mut serializer =
            serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(b"    "));
        document.serialize(&mut serializer)
    }
}
