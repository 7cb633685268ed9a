//! Domain layer: settings types and the rules for filling them.
//!
//! Nothing in here opens files or calls OS APIs, so every rule can be tested
//! against an in-memory `serde_json::Value` on any platform.

/// Fault-tolerant extraction of single fields from a parsed JSON tree.
pub mod extract;

/// Launch-target classification (URI / file path / UWP app id).
pub mod launch_target;

/// Option groups, their defaults, and tree application.
pub mod options;

/// UTF-8 ⇄ UTF-16 conversion for OS-facing text fields.
pub mod wide;
