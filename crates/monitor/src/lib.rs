//! `thermo-monitor` library crate.
//!
//! Re-exports internal modules for integration testing. The binary
//! entrypoints live in `main.rs` and `bin/`.

pub mod config;
pub mod cycle;
pub mod dispatcher;
pub mod generator;
pub mod rearm;
