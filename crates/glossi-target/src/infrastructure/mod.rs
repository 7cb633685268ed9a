//! Infrastructure layer for the target binary.
//!
//! - **`logging`** – installs the `tracing` subscriber and raises its level
//!   when the loaded settings ask for extended logging.

pub mod logging;
