//! Network collaborators around the valuation engine.
//!
//! - market data from Financial Modeling Prep (`fmp`)
//! - chat completions from Mistral (`mistral`)
//! - AI growth-rate suggestions (`assumptions`)
//! - price comparison narrative (`summary`)
//! - DCF tutor chat (`tutor`)
//!
//! These report failures as `ServiceError`. They never feed warnings into a
//! `ValuationResult`; that channel belongs to the engine.

pub mod assumptions;
pub mod config;
pub mod fmp;
pub mod mistral;
pub mod summary;
pub mod tutor;

use thiserror::Error;

pub use assumptions::{AssumptionAdvisor, GrowthAssumptions, GrowthCase, GrowthScenario};
pub use config::ServiceConfig;
pub use fmp::{FinancialData, FmpClient};
pub use mistral::{ChatMessage, MistralClient, ResponseFormat};
pub use summary::{Summarizer, ValuationSummary, Verdict};
pub use tutor::Tutor;

/// Failure of an external collaborator.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A required key or setting is absent from `ServiceConfig`.
    #[error("{0} is not configured")]
    MissingConfig(&'static str),
    /// The caller supplied an unusable request (e.g. an empty ticker).
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{service} request failed: {message}")]
    Network { service: &'static str, message: String },
    #[error("{service} API error: {status}. Details: {body}")]
    Upstream {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("Malformed {service} response: {message}")]
    MalformedResponse { service: &'static str, message: String },
}

/// Trim and upper-case a ticker symbol, rejecting empty input.
pub fn normalize_ticker(ticker: &str) -> Result<String, ServiceError> {
    let trimmed = ticker.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidRequest("Ticker symbol is required".to_string()));
    }
    Ok(trimmed.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_ticker_uppercases_and_rejects_blank() {
        assert_eq!(normalize_ticker(" msft ").unwrap(), "MSFT");
        assert!(matches!(normalize_ticker("  "), Err(ServiceError::InvalidRequest(_))));
    }
}
