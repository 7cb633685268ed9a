//! Windows OS version via `RtlGetVersion`.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

use tracing::warn;
use windows::core::{s, w};
use windows::Win32::Foundation::NTSTATUS;
use windows::Win32::System::LibraryLoader::{GetModuleHandleW, GetProcAddress};
use windows::Win32::System::SystemInformation::OSVERSIONINFOW;

use super::{OsVersion, OsVersionSource};

type RtlGetVersionFn = unsafe extern "system" fn(*mut OSVERSIONINFOW) -> NTSTATUS;

const STATUS_SUCCESS: i32 = 0;

/// Reads the unshimmed version from `ntdll!RtlGetVersion`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RtlVersionSource;

impl RtlVersionSource {
    pub fn new() -> Self {
        Self
    }
}

impl OsVersionSource for RtlVersionSource {
    /// Always `Some`; a zeroed version if `RtlGetVersion` is unavailable.
    fn query(&self) -> Option<OsVersion> {
        Some(real_os_version().unwrap_or_default())
    }
}

fn real_os_version() -> Option<OsVersion> {
    // SAFETY: ntdll.dll is mapped into every Win32 process; the returned
    // handle is not reference counted and must not be freed.
    let module = match unsafe { GetModuleHandleW(w!("ntdll.dll")) } {
        Ok(module) => module,
        Err(e) => {
            warn!("ntdll.dll not available: {e}");
            return None;
        }
    };

    // SAFETY: `module` is a valid module handle and the name is a
    // NUL-terminated ANSI literal.
    let Some(proc) = (unsafe { GetProcAddress(module, s!("RtlGetVersion")) }) else {
        warn!("RtlGetVersion not exported by ntdll.dll");
        return None;
    };

    // SAFETY: RtlGetVersion takes a single PRTL_OSVERSIONINFOW and returns an
    // NTSTATUS; both function pointer types have the same size.
    let rtl_get_version: RtlGetVersionFn = unsafe { std::mem::transmute(proc) };

    let mut info = OSVERSIONINFOW {
        dwOSVersionInfoSize: std::mem::size_of::<OSVERSIONINFOW>() as u32,
        ..Default::default()
    };
    // SAFETY: `info` is a properly sized, writable OSVERSIONINFOW.
    let status = unsafe { rtl_get_version(&mut info) };
    if status.0 != STATUS_SUCCESS {
        warn!("RtlGetVersion failed with NTSTATUS {:#010x}", status.0);
        return None;
    }

    Some(OsVersion {
        major: info.dwMajorVersion,
        minor: info.dwMinorVersion,
        build: info.dwBuildNumber,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtl_version_source_reports_windows_10_or_later() {
        let version = RtlVersionSource::new().query().expect("always Some on Windows");
        assert!(version.major >= 10, "unexpected version {version:?}");
        assert!(version.build > 0);
    }
}
