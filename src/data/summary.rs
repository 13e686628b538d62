//! Intrinsic value vs market price comparison.

use serde::Serialize;

use crate::data::fmp::FmpClient;
use crate::data::mistral::{ChatMessage, MistralClient, ResponseFormat};
use crate::data::{normalize_ticker, ServiceConfig, ServiceError};

/// Relative gap inside which a stock is called fairly valued.
pub const FAIR_VALUE_BAND: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Undervalued,
    Overvalued,
    Fair,
}

impl Verdict {
    /// Compare intrinsic value against market price.
    pub fn classify(intrinsic_value: f64, market_price: f64) -> Self {
        let gap = (intrinsic_value - market_price) / market_price;
        if gap > FAIR_VALUE_BAND {
            Verdict::Undervalued
        } else if gap < -FAIR_VALUE_BAND {
            Verdict::Overvalued
        } else {
            Verdict::Fair
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Verdict::Undervalued => "undervalued",
            Verdict::Overvalued => "overvalued",
            Verdict::Fair => "fairly valued",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationSummary {
    pub ticker: String,
    pub intrinsic_value: f64,
    pub market_price: f64,
    /// `(intrinsic - price) / price`.
    pub upside: f64,
    pub verdict: Verdict,
    pub narrative: String,
}

pub struct Summarizer {
    fmp: FmpClient,
    llm: MistralClient,
}

impl Summarizer {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            llm: MistralClient::new(config)?,
            fmp: FmpClient::new(config)?,
        })
    }

    pub fn summarize(&self, ticker: &str, intrinsic_value: f64) -> Result<ValuationSummary, ServiceError> {
        if !intrinsic_value.is_finite() {
            return Err(ServiceError::InvalidRequest(
                "Ticker and intrinsicValue are required".to_string(),
            ));
        }
        let ticker = normalize_ticker(ticker)?;
        let market_price = self.fmp.fetch_price(&ticker)?;

        let messages = [
            ChatMessage::system(build_system_prompt(&ticker, intrinsic_value, market_price)),
            ChatMessage::user(format!("Generate a valuation summary for {ticker}.")),
        ];
        let narrative = self.llm.chat(&messages, ResponseFormat::Text)?;

        Ok(ValuationSummary {
            upside: (intrinsic_value - market_price) / market_price,
            verdict: Verdict::classify(intrinsic_value, market_price),
            ticker,
            intrinsic_value,
            market_price,
            narrative: narrative.trim().to_string(),
        })
    }
}

pub fn build_system_prompt(ticker: &str, intrinsic_value: f64, market_price: f64) -> String {
    format!(
        "You are a concise financial analyst. Based on the provided DCF intrinsic value and the current stock \
price, generate a brief, one-paragraph summary. Conclude whether the stock is overvalued, undervalued, or fairly \
valued. The tone should be neutral and informative.

- Ticker: {ticker}
- DCF Intrinsic Value: ${intrinsic_value:.2}
- Current Market Price: ${market_price:.2}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_uses_five_percent_band() {
        assert_eq!(Verdict::classify(120.0, 100.0), Verdict::Undervalued);
        assert_eq!(Verdict::classify(80.0, 100.0), Verdict::Overvalued);
        assert_eq!(Verdict::classify(104.0, 100.0), Verdict::Fair);
        assert_eq!(Verdict::classify(96.0, 100.0), Verdict::Fair);
    }

    #[test]
    fn prompt_formats_prices() {
        let p = build_system_prompt("AAPL", 119.590_479, 227.5);
        assert!(p.contains("- DCF Intrinsic Value: $119.59"));
        assert!(p.contains("- Current Market Price: $227.50"));
    }
}
