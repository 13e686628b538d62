//! `dcf-valuation` library crate.
//!
//! The binary (`dcf`) is a thin wrapper around this library so that:
//!
//! - the valuation engine is testable without spawning processes
//! - modules are reusable (e.g., a future web backend)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod io;
pub mod report;
pub mod tui;
