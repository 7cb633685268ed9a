//! Host OS capability probe.
//!
//! Parts of a target behave differently on Windows 10 and Windows 11.  The
//! rest of the application only ever sees the resulting
//! [`OsCapabilities::is_legacy`] flag; how the build number is obtained
//! stays behind the [`OsVersionSource`] trait.
//!
//! # Why not `GetVersionEx`?
//!
//! Under an application compatibility shim, `GetVersionEx` reports whatever
//! version the manifest targets, not the real one.  `RtlGetVersion` in
//! `ntdll.dll` is not shimmed, so that is what the Windows adapter calls.
//!
//! # Platform implementations
//!
//! | Module    | OS        | Source                                  |
//! |-----------|-----------|-----------------------------------------|
//! | `windows` | Windows   | `RtlGetVersion` looked up at runtime    |
//! | –         | elsewhere | [`UnsupportedVersionSource`], no build  |
//!
//! The selected type is re-exported as `NativeVersionSource`.

use tracing::info;

/// Builds below this are Windows 10 (Windows 11 starts at 22000).
pub const LEGACY_BUILD_THRESHOLD: u32 = 22000;

/// Raw OS version numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OsVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
}

/// What the rest of the application may branch on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OsCapabilities {
    /// Host predates [`LEGACY_BUILD_THRESHOLD`].
    pub is_legacy: bool,
    /// `None` on platforms without a Windows build number.
    pub version: Option<OsVersion>,
}

/// Source of the real OS version.
#[cfg_attr(test, mockall::automock)]
pub trait OsVersionSource {
    /// Returns `None` when the platform has no build-number concept.
    ///
    /// Implementations that have the concept but fail to query it return a
    /// zeroed [`OsVersion`] instead.
    fn query(&self) -> Option<OsVersion>;
}

/// Probes the host once and logs the classification.
pub fn probe(source: &dyn OsVersionSource) -> OsCapabilities {
    let Some(version) = source.query() else {
        info!("No Windows build number on this platform; using modern code paths");
        return OsCapabilities::default();
    };

    let is_legacy = version.build < LEGACY_BUILD_THRESHOLD;
    let name = if is_legacy { "Windows 10" } else { "Windows 11" };
    info!(
        "Running on {name}; Winver: {}.{}.{}",
        version.major, version.minor, version.build
    );

    OsCapabilities {
        is_legacy,
        version: Some(version),
    }
}

/// Version source for targets without Windows build numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedVersionSource;

impl OsVersionSource for UnsupportedVersionSource {
    fn query(&self) -> Option<OsVersion> {
        None
    }
}

// ── Windows implementation ────────────────────────────────────────────────────

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub use self::windows::RtlVersionSource as NativeVersionSource;

// ── Everything else ───────────────────────────────────────────────────────────

#[cfg(not(target_os = "windows"))]
pub use UnsupportedVersionSource as NativeVersionSource;
