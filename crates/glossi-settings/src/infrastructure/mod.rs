//! Infrastructure layer: file system and OS adapters.
//!
//! **Dependency rule**: this layer may depend on `domain`, but the domain
//! never imports from here.
//!
//! # Sub-modules
//!
//! - **`path_resolver`** – maps a target name to its settings file, with a
//!   single fallback into the roaming GlosSI `Targets` directory.
//! - **`store`** – owns the [`Settings`](crate::Settings) instance and the
//!   path of the last successfully parsed file; loads and saves it.
//! - **`os_probe`** – reads the real OS build number.  The implementation is
//!   selected at compile time with `#[cfg(target_os)]`.

pub mod os_probe;
pub mod path_resolver;
pub mod store;
