//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - valuation inputs (`ValuationInputs`, `InputMode`)
//! - engine outputs (`ValuationResult`, `SensitivityCell`, `SensitivityTable`)
//! - saved scenarios (`SavedScenario`)

pub mod types;

pub use types::*;
