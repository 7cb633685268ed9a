//! Launch-target classification.
//!
//! A target's `launchPath` is one of three things:
//!
//! - a URI such as `steam://rungameid/123` (contains `://`),
//! - a file-system path such as `C:\Games\game.exe` (1–3 characters then `:`),
//! - anything else, which is taken to be a UWP application user model id
//!   such as `Microsoft.MinecraftUWP_8wekyb3d8bbwe!App`.
//!
//! This is a string test only.  No package lookup is made.  Lengths are
//! counted in UTF-16 code units, so a character outside the BMP takes two.

use super::wide::WideString;

/// What kind of thing a launch path names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchTargetKind {
    Uri,
    Path,
    UwpApp,
}

impl LaunchTargetKind {
    /// Classifies `launch_path`.
    pub fn classify(launch_path: &str) -> Self {
        let units: Vec<u16> = launch_path.encode_utf16().collect();
        Self::classify_units(&units)
    }

    /// Classifies a path already held as UTF-16.
    pub fn classify_wide(launch_path: &WideString) -> Self {
        Self::classify_units(launch_path.as_units())
    }

    fn classify_units(units: &[u16]) -> Self {
        if contains_scheme_separator(units) {
            Self::Uri
        } else if has_short_prefix(units) {
            Self::Path
        } else {
            Self::UwpApp
        }
    }
}

/// Returns `true` if `launch_path` names a UWP application.
pub fn is_uwp(launch_path: &str) -> bool {
    LaunchTargetKind::classify(launch_path) == LaunchTargetKind::UwpApp
}

const COLON: u16 = b':' as u16;
const SLASH: u16 = b'/' as u16;

fn contains_scheme_separator(units: &[u16]) -> bool {
    units.windows(3).any(|w| w == [COLON, SLASH, SLASH])
}

fn is_line_terminator(unit: u16) -> bool {
    matches!(unit, 0x000A | 0x000D | 0x2028 | 0x2029)
}

/// Matches `^.{1,3}:` where `.` is any code unit except a line terminator.
fn has_short_prefix(units: &[u16]) -> bool {
    for (index, &unit) in units.iter().take(4).enumerate() {
        if index > 0 && unit == COLON {
            return true;
        }
        if is_line_terminator(unit) {
            return false;
        }
    }
    false
}
