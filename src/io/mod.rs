//! Input/output helpers.
//!
//! - explicit FCF import from CSV (`fcf_csv`)
//! - shareable links (`share`)
//! - named scenario store (`scenario`)
//! - result exports (JSON/CSV) (`export`)

pub mod export;
pub mod fcf_csv;
pub mod scenario;
pub mod share;

pub use export::*;
pub use fcf_csv::*;
pub use scenario::*;
pub use share::*;
