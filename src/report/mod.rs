//! Reporting utilities: plain-text renderings of valuations, WACC breakdowns,
//! AI assumptions, summaries and the scenario list.

pub mod format;

pub use format::*;
