//! UTF-16 text for OS-facing option fields.
//!
//! Launch paths and launch arguments end up in Win32 calls, which take
//! UTF-16.  The settings file stores them as UTF-8.  [`WideString`] holds
//! the UTF-16 form in memory and converts at the file boundary:
//!
//! | Direction | Function                     | Can fail?                      |
//! |-----------|------------------------------|--------------------------------|
//! | toWide    | [`WideString::from_narrow`]  | no (`&str` is always valid)    |
//! | toNarrow  | [`WideString::to_narrow`]    | yes, on an unpaired surrogate  |

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error converting UTF-16 back to UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// The buffer holds a surrogate half without its partner.
    #[error("unpaired UTF-16 surrogate in wide string")]
    UnpairedSurrogate,
}

/// A UTF-16 code-unit buffer, without a trailing NUL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct WideString(Vec<u16>);

impl WideString {
    /// Creates an empty wide string.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Encodes UTF-8 text as UTF-16.
    pub fn from_narrow(text: &str) -> Self {
        Self(text.encode_utf16().collect())
    }

    /// Wraps raw code units, e.g. a buffer filled by an OS call.
    ///
    /// The units are not validated; [`to_narrow`](Self::to_narrow) reports
    /// any unpaired surrogate.
    pub fn from_units(units: Vec<u16>) -> Self {
        Self(units)
    }

    /// Decodes back to UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::UnpairedSurrogate`] if the buffer is not
    /// valid UTF-16.
    pub fn to_narrow(&self) -> Result<String, EncodingError> {
        String::from_utf16(&self.0).map_err(|_| EncodingError::UnpairedSurrogate)
    }

    /// Decodes to UTF-8, replacing invalid sequences with U+FFFD.
    pub fn to_narrow_lossy(&self) -> String {
        String::from_utf16_lossy(&self.0)
    }

    /// The raw UTF-16 code units.
    pub fn as_units(&self) -> &[u16] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Converts to the platform string type without a UTF-8 detour.
    #[cfg(target_os = "windows")]
    pub fn to_os_string(&self) -> std::ffi::OsString {
        use std::os::windows::ffi::OsStringExt;
        std::ffi::OsString::from_wide(&self.0)
    }
}

impl From<&str> for WideString {
    fn from(text: &str) -> Self {
        Self::from_narrow(text)
    }
}

impl fmt::Display for WideString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_narrow_lossy())
    }
}

impl Serialize for WideString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let narrow = self.to_narrow().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&narrow)
    }
}
