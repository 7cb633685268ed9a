//! Application layer for the target binary.
//!
//! - **`startup`** – parses the command line, probes the OS, loads the
//!   target's settings, and bundles the results into a [`startup::TargetContext`].

pub mod startup;
