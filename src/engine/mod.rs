//! Valuation math.
//!
//! Everything here is pure and synchronous: no I/O, no logging, no shared state.

pub mod dcf;
pub mod wacc;

pub use dcf::{compute_valuation, discounted_series, GROWTH_OFFSETS, WACC_OFFSETS};
pub use wacc::{WaccBreakdown, WaccInputs};
