//! Integration tests for loading and storing target settings files.
//!
//! These exercise the public API end to end against real files in a unique
//! temp directory: path resolution, parsing, per-field fault tolerance,
//! logging, and write-back.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use glossi_settings::{
    is_uwp, LoadOutcome, PathResolver, Settings, SettingsStore, WideString,
};
use uuid::Uuid;

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// A unique directory laid out like a Windows profile:
/// `AppData/Local/Temp` and `AppData/Roaming/GlosSI/Targets`.
struct Profile {
    root: PathBuf,
}

impl Profile {
    fn new() -> Self {
        let root = std::env::temp_dir().join(format!("glossi_it_{}", Uuid::new_v4()));
        std::fs::create_dir_all(root.join("AppData").join("Local").join("Temp")).unwrap();
        std::fs::create_dir_all(Self::targets_dir_of(&root)).unwrap();
        Self { root }
    }

    fn targets_dir_of(root: &Path) -> PathBuf {
        root.join("AppData").join("Roaming").join("GlosSI").join("Targets")
    }

    fn temp_dir(&self) -> PathBuf {
        self.root.join("AppData").join("Local").join("Temp")
    }

    fn targets_dir(&self) -> PathBuf {
        Self::targets_dir_of(&self.root)
    }

    fn resolver(&self) -> PathResolver {
        PathResolver::with_temp_dir(&self.temp_dir())
    }

    fn store(&self) -> SettingsStore {
        SettingsStore::new(self.resolver())
    }

    fn write_target(&self, name: &str, json: &str) -> PathBuf {
        let path = self.targets_dir().join(format!("{name}.json"));
        std::fs::write(&path, json).unwrap();
        path
    }
}

impl Drop for Profile {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.root).ok();
    }
}

/// Shared in-memory sink for `tracing` output.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a subscriber that records every event as plain text.
fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.contents())
}

fn warn_lines<'a>(logs: &'a str, needle: &'a str) -> Vec<&'a str> {
    logs.lines()
        .filter(|line| line.contains(" WARN ") && line.contains(needle))
        .collect()
}

// ── Path resolution ───────────────────────────────────────────────────────────

#[test]
fn test_resolve_with_and_without_extension_agree() {
    let profile = Profile::new();
    let resolver = profile.resolver();
    assert_eq!(resolver.resolve("foo"), resolver.resolve("foo.json"));
}

#[test]
fn test_resolve_missing_direct_path_uses_targets_dir() {
    let profile = Profile::new();

    let path = profile.resolver().resolve("Forza Horizon 5");

    assert!(path.ends_with("Roaming/GlosSI/Targets/Forza Horizon 5.json"));
    assert_eq!(path, profile.targets_dir().join("Forza Horizon 5.json"));
}

#[test]
fn test_parse_finds_target_in_fallback_dir() {
    // Arrange
    let profile = Profile::new();
    let written = profile.write_target(
        "Elden Ring",
        r#"{ "version": 1, "launch": { "launch": true, "launchPath": "steam://rungameid/1245620" } }"#,
    );
    let mut store = profile.store();

    // Act
    let outcome = store.parse("Elden Ring").expect("valid json");

    // Assert
    assert!(outcome.is_loaded());
    assert_eq!(store.settings_path(), Some(written.as_path()));
    assert!(store.settings().launch.launch);
    assert!(!store.settings().launch.is_uwp);
}

// ── Load semantics ────────────────────────────────────────────────────────────

#[test]
fn test_store_then_parse_round_trips_every_field() {
    // Arrange: load a stub so the store knows where to write.
    let profile = Profile::new();
    profile.write_target("Round Trip", "{}");
    let mut writer = profile.store();
    writer.parse("Round Trip").unwrap();

    let settings = writer.settings_mut();
    settings.launch.launch = true;
    settings.launch.launch_path = WideString::from_narrow("Microsoft.SeaofThieves_8wekyb3d8bbwe!SeaofThieves");
    settings.launch.launch_app_args = WideString::from_narrow("-nosplash «quoted»");
    settings.launch.close_on_exit = false;
    settings.launch.wait_for_child_procs = false;
    settings.devices.hide_devices = false;
    settings.devices.real_device_ids = true;
    settings.window.window_mode = true;
    settings.window.max_fps = 75;
    settings.window.scale = 1.5;
    settings.window.disable_overlay = true;
    settings.controller.max_controllers = 4;
    settings.controller.allow_desktop_config = true;
    settings.controller.emulate_ds4 = true;
    settings.extended_logging = true;
    let expected = settings.clone();

    // Act
    writer.try_store_settings().expect("store");
    let mut reader = profile.store();
    let outcome = reader.parse("Round Trip").unwrap();

    // Assert
    let LoadOutcome::Loaded { report, .. } = outcome else {
        panic!("stored file must load");
    };
    assert!(report.warnings.is_empty());
    assert!(!report.version_mismatch);

    let loaded = reader.settings();
    assert_eq!(loaded.launch.launch_path, expected.launch.launch_path);
    assert_eq!(loaded.launch.launch_app_args, expected.launch.launch_app_args);
    assert_eq!(loaded.devices, expected.devices);
    assert_eq!(loaded.window, expected.window);
    assert_eq!(loaded.controller, expected.controller);
    assert_eq!(loaded.extended_logging, expected.extended_logging);
    assert_eq!(
        loaded.launch.is_uwp,
        is_uwp(&loaded.launch.launch_path.to_narrow().unwrap())
    );
    assert!(loaded.launch.is_uwp);
}

#[test]
fn test_stored_file_is_four_space_indented_with_every_key() {
    let profile = Profile::new();
    let path = profile.write_target("Layout", r#"{ "version": 1 }"#);
    let mut store = profile.store();
    store.parse("Layout").unwrap();

    store.store_settings();

    let text = std::fs::read_to_string(path).unwrap();
    for key in [
        "\n    \"version\": 1",
        "\n        \"launchPath\": \"\"",
        "\n        \"realDeviceIds\": false",
        "\n        \"maxFps\": 0",
        "\n        \"allowDesktopConfig\": false",
        "\n    \"extendedLogging\": false",
    ] {
        assert!(text.contains(key), "missing {key:?} in:\n{text}");
    }
}

#[test]
fn test_absent_keys_keep_values_from_previous_load() {
    // Arrange
    let profile = Profile::new();
    profile.write_target(
        "First",
        r#"{ "version": 1, "window": { "maxFps": 120, "scale": 2.0 }, "extendedLogging": true }"#,
    );
    profile.write_target("Second", r#"{ "version": 1, "devices": { "realDeviceIds": true } }"#);
    let mut store = profile.store();
    store.parse("First").unwrap();
    let before = store.settings().clone();

    // Act
    store.parse("Second").unwrap();

    // Assert
    let after = store.settings();
    assert_eq!(after.window, before.window);
    assert_eq!(after.launch, before.launch);
    assert_eq!(after.controller, before.controller);
    assert!(after.extended_logging);
    assert!(after.devices.real_device_ids);
}

#[test]
fn test_absent_keys_on_first_load_are_defaults() {
    let profile = Profile::new();
    profile.write_target("Empty", "{}");
    let mut store = profile.store();

    store.parse("Empty").unwrap();

    assert_eq!(store.settings(), &Settings::default());
}

#[test]
fn test_type_mismatch_logs_one_warning_and_loads_the_rest() {
    // Arrange
    let profile = Profile::new();
    profile.write_target(
        "Mismatch",
        r#"{
            "version": 1,
            "window": { "maxFps": "fast", "windowMode": true, "scale": 1.25 },
            "controller": { "maxControllers": 2 },
            "extendedLogging": true
        }"#,
    );
    let mut store = profile.store();
    store.settings_mut().window.max_fps = 45;

    // Act
    let (outcome, logs) = capture_logs(|| store.parse("Mismatch"));

    // Assert
    let LoadOutcome::Loaded { report, .. } = outcome.unwrap() else {
        panic!("file exists");
    };
    assert_eq!(store.settings().window.max_fps, 45);
    assert!(store.settings().window.window_mode);
    assert_eq!(store.settings().window.scale, 1.25);
    assert_eq!(store.settings().controller.max_controllers, 2);
    assert!(store.settings().extended_logging);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].key, "window.maxFps");
    assert_eq!(warn_lines(&logs, "maxFps").len(), 1, "logs:\n{logs}");
}

#[test]
fn test_version_two_loads_fields_and_warns_once() {
    let profile = Profile::new();
    profile.write_target(
        "Future",
        r#"{ "version": 2, "launch": { "closeOnExit": false }, "window": { "maxFps": 30 } }"#,
    );
    let mut store = profile.store();

    let (outcome, logs) = capture_logs(|| store.parse("Future"));

    let LoadOutcome::Loaded { report, .. } = outcome.unwrap() else {
        panic!("file exists");
    };
    assert!(report.version_mismatch);
    assert!(!store.settings().launch.close_on_exit);
    assert_eq!(store.settings().window.max_fps, 30);
    assert_eq!(
        warn_lines(&logs, "Config version doesn't match").len(),
        1,
        "logs:\n{logs}"
    );
}

#[test]
fn test_missing_file_logs_error_with_path() {
    let profile = Profile::new();
    let mut store = profile.store();

    let (outcome, logs) = capture_logs(|| store.parse("Nowhere"));

    assert!(matches!(outcome, Ok(LoadOutcome::Unreadable { .. })));
    assert!(logs
        .lines()
        .any(|line| line.contains("ERROR") && line.contains("Nowhere.json")));
}

#[test]
fn test_successful_parse_logs_document_at_debug() {
    let profile = Profile::new();
    profile.write_target("Dumped", r#"{ "version": 1, "extendedLogging": true }"#);
    let mut store = profile.store();

    let (_, logs) = capture_logs(|| store.parse("Dumped"));

    assert!(logs.lines().any(|line| line.contains("DEBUG")
        && line.contains("Dumped.json")
        && line.contains("\"extendedLogging\":true")));
}

#[test]
fn test_store_settings_without_parse_logs_error_and_writes_nothing() {
    let profile = Profile::new();
    let store = profile.store();

    let (_, logs) = capture_logs(|| store.store_settings());

    assert!(logs.contains("ERROR"));
    assert_eq!(std::fs::read_dir(profile.targets_dir()).unwrap().count(), 0);
}

// ── Launch target classification ──────────────────────────────────────────────

#[test]
fn test_uwp_classification_examples() {
    assert!(!is_uwp("steam://run/123"));
    assert!(!is_uwp("C:\\Games\\g.exe"));
    assert!(is_uwp("SomeApp_8wekyb3d8bbwe!App"));
}
