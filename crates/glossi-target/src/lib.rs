//! glossi-target library entry point.
//!
//! Re-exports all public modules so that tests and the binary entry point in
//! `main.rs` share the same module tree.
//!
//! The target binary is the composition root: it owns the one
//! [`SettingsStore`](glossi_settings::SettingsStore) and the OS capability
//! flag, and lends both out by reference to whatever runs next.

/// Application layer: start-up sequence and command-line arguments.
pub mod application;

/// Infrastructure layer: logging setup.
pub mod infrastructure;
