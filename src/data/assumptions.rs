//! AI-suggested FCF growth rates (base / bull / bear).
//!
//! Pulls revenue history and analyst estimates from FMP, then asks the chat
//! model for three growth cases as JSON. The result only proposes values; the
//! caller decides whether to copy one into `ValuationInputs::fcf_growth_rate`.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::data::fmp::{FinancialData, FmpClient};
use crate::data::mistral::{ChatMessage, MistralClient, ResponseFormat};
use crate::data::{normalize_ticker, ServiceConfig, ServiceError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthCase {
    /// Annual FCF growth in percentage points.
    pub rate: f64,
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthAssumptions {
    pub base: GrowthCase,
    pub bull: GrowthCase,
    pub bear: GrowthCase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GrowthScenario {
    Bear,
    Base,
    Bull,
}

impl GrowthScenario {
    pub const ALL: [GrowthScenario; 3] = [GrowthScenario::Bull, GrowthScenario::Base, GrowthScenario::Bear];

    pub fn display_name(self) -> &'static str {
        match self {
            GrowthScenario::Bear => "Bear Case",
            GrowthScenario::Base => "Base Case",
            GrowthScenario::Bull => "Bull Case",
        }
    }
}

impl GrowthAssumptions {
    pub fn case(&self, scenario: GrowthScenario) -> &GrowthCase {
        match scenario {
            GrowthScenario::Bear => &self.bear,
            GrowthScenario::Base => &self.base,
            GrowthScenario::Bull => &self.bull,
        }
    }
}

pub struct AssumptionAdvisor {
    fmp: FmpClient,
    llm: MistralClient,
}

impl AssumptionAdvisor {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            llm: MistralClient::new(config)?,
            fmp: FmpClient::new(config)?,
        })
    }

    pub fn generate(&self, ticker: &str) -> Result<GrowthAssumptions, ServiceError> {
        let ticker = normalize_ticker(ticker)?;
        let data = self.fmp.fetch_financial_data(&ticker)?;

        let messages = [
            ChatMessage::system(build_system_prompt(&data)),
            ChatMessage::user(format!("Generate the FCF growth rate assumptions for {ticker}.")),
        ];
        let content = self.llm.chat(&messages, ResponseFormat::JsonObject)?;
        let assumptions = parse_assumptions(&content)?;

        tracing::info!(
            %ticker,
            base = assumptions.base.rate,
            bull = assumptions.bull.rate,
            bear = assumptions.bear.rate,
            "generated growth assumptions"
        );
        Ok(assumptions)
    }
}

pub fn build_system_prompt(data: &FinancialData) -> String {
    let history = serde_json::to_string_pretty(&data.historical_growth).unwrap_or_else(|_| "[]".to_string());
    let estimates = serde_json::to_string_pretty(&data.future_estimates).unwrap_or_else(|_| "[]".to_string());

    format!(
        "You are a sophisticated financial analyst providing assumptions for a Discounted Cash Flow (DCF) model. \
Your analysis should be neutral, data-driven, and concise. Based on the provided data, generate a base, bull, \
and bear case for the 5-year Free Cash Flow (FCF) growth rate. FCF growth is often correlated with revenue growth.

**Historical Revenue Growth:**
{history}

**Analyst Revenue Estimates (next 2 years):**
{estimates}

Provide your output in a structured JSON format with the keys: 'base', 'bull', 'bear'. \
Each case should have 'rate' (a number) and 'justification' (a brief string)."
    )
}

/// Parse the model's JSON, tolerating prose around a single JSON object.
pub fn parse_assumptions(content: &str) -> Result<GrowthAssumptions, ServiceError> {
    let direct = serde_json::from_str::<GrowthAssumptions>(content);
    let parsed = match direct {
        Ok(parsed) => parsed,
        Err(first_err) => {
            let embedded = match (content.find('{'), content.rfind('}')) {
                (Some(start), Some(end)) if end > start => {
                    serde_json::from_str::<GrowthAssumptions>(&content[start..=end]).ok()
                }
                _ => None,
            };
            embedded.ok_or_else(|| ServiceError::MalformedResponse {
                service: "Mistral",
                message: format!("could not parse assumptions JSON: {first_err}"),
            })?
        }
    };

    for scenario in GrowthScenario::ALL {
        if !parsed.case(scenario).rate.is_finite() {
            return Err(ServiceError::MalformedResponse {
                service: "Mistral",
                message: format!("{} rate is not a finite number", scenario.display_name()),
            });
        }
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fmp::{HistoricalGrowth, RevenueEstimate};

    const JSON: &str = r#"{
        "base": {"rate": 6.5, "justification": "In line with history."},
        "bull": {"rate": 9.0, "justification": "Services mix."},
        "bear": {"rate": 3.0, "justification": "Hardware slowdown."}
    }"#;

    #[test]
    fn parses_plain_json() {
        let a = parse_assumptions(JSON).unwrap();
        assert_eq!(a.base.rate, 6.5);
        assert_eq!(a.case(GrowthScenario::Bull).justification, "Services mix.");
        assert_eq!(a.case(GrowthScenario::Bear).rate, 3.0);
    }

    #[test]
    fn parses_json_wrapped_in_prose() {
        let wrapped = format!("Here you go:\n```json\n{JSON}\n```\nGood luck.");
        let a = parse_assumptions(&wrapped).unwrap();
        assert_eq!(a.bull.rate, 9.0);
    }

    #[test]
    fn rejects_missing_cases() {
        let err = parse_assumptions(r#"{"base": {"rate": 1, "justification": "x"}}"#).unwrap_err();
        assert!(matches!(err, ServiceError::MalformedResponse { .. }));
        assert!(parse_assumptions("no json here").is_err());
    }

    #[test]
    fn prompt_embeds_financial_data() {
        let data = FinancialData {
            historical_growth: vec![HistoricalGrowth {
                year: "2024".to_string(),
                revenue: 100.0,
                growth: Some(2.5),
            }],
            future_estimates: vec![RevenueEstimate {
                year: "2025".to_string(),
                estimated_revenue_growth: Some(10.0),
            }],
        };
        let prompt = build_system_prompt(&data);
        assert!(prompt.contains("\"year\": \"2024\""));
        assert!(prompt.contains("\"estimatedRevenueGrowth\": 10.0"));
        assert!(prompt.contains("'base', 'bull', 'bear'"));
    }
}
