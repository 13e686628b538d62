//! Financial Modeling Prep integration: revenue history, analyst estimates and quotes.

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::data::{ServiceConfig, ServiceError};

const SERVICE: &str = "FMP";
const HISTORY_YEARS: usize = 5;
const ESTIMATE_YEARS: usize = 2;

/// One year of reported revenue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalGrowth {
    pub year: String,
    pub revenue: f64,
    /// Year-over-year revenue growth in percent, when FMP reports it.
    pub growth: Option<f64>,
}

/// One year of consensus revenue estimates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueEstimate {
    pub year: String,
    /// Average estimated revenue minus the reported revenue for that period.
    pub estimated_revenue_growth: Option<f64>,
}

/// The data set handed to the assumption prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialData {
    pub historical_growth: Vec<HistoricalGrowth>,
    pub future_estimates: Vec<RevenueEstimate>,
}

pub struct FmpClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FmpClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let api_key = config
            .fmp_api_key
            .clone()
            .ok_or(ServiceError::MissingConfig("FMP_API_KEY"))?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::Network {
                service: SERVICE,
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            api_key,
            base_url: config.fmp_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Last five annual revenue figures plus the next two years of estimates.
    pub fn fetch_financial_data(&self, ticker: &str) -> Result<FinancialData, ServiceError> {
        let statements: Vec<IncomeStatement> = self.get_json(
            &format!("{}/api/v3/income-statement/{ticker}", self.base_url),
            &[("period", "annual")],
        )?;
        let estimates: Vec<AnalystEstimate> = self.get_json(
            &format!("{}/api/v3/analyst-estimates/{ticker}", self.base_url),
            &[],
        )?;

        tracing::debug!(
            ticker,
            statements = statements.len(),
            estimates = estimates.len(),
            "fetched FMP fundamentals"
        );

        Ok(FinancialData {
            historical_growth: statements
                .into_iter()
                .take(HISTORY_YEARS)
                .map(HistoricalGrowth::from)
                .collect(),
            future_estimates: estimates
                .into_iter()
                .take(ESTIMATE_YEARS)
                .map(RevenueEstimate::from)
                .collect(),
        })
    }

    /// Latest traded price for `ticker`.
    pub fn fetch_price(&self, ticker: &str) -> Result<f64, ServiceError> {
        let quotes: Vec<QuoteShort> = self.get_json(
            &format!("{}/stable/quote-short", self.base_url),
            &[("symbol", ticker)],
        )?;
        price_from_quotes(&quotes)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T, ServiceError> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .map_err(|e| ServiceError::Network {
                service: SERVICE,
                message: e.without_url().to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            tracing::warn!(%status, "FMP request failed");
            return Err(ServiceError::Upstream {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        resp.json().map_err(|e| ServiceError::MalformedResponse {
            service: SERVICE,
            message: e.without_url().to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomeStatement {
    #[serde(default)]
    calendar_year: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    revenue: f64,
    #[serde(default)]
    revenue_growth: Option<f64>,
}

impl From<IncomeStatement> for HistoricalGrowth {
    fn from(is: IncomeStatement) -> Self {
        let year = is
            .calendar_year
            .or_else(|| is.date.map(|d| d.chars().take(4).collect()))
            .unwrap_or_default();
        Self {
            year,
            revenue: is.revenue,
            growth: is.revenue_growth.map(|g| g * 100.0),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalystEstimate {
    date: String,
    #[serde(default)]
    estimated_revenue_avg: Option<f64>,
    #[serde(default)]
    revenue: Option<f64>,
}

impl From<AnalystEstimate> for RevenueEstimate {
    fn from(est: AnalystEstimate) -> Self {
        let estimated_revenue_growth = match (est.estimated_revenue_avg, est.revenue) {
            (Some(avg), Some(actual)) => Some(avg - actual),
            _ => None,
        };
        Self {
            year: est.date.chars().take(4).collect(),
            estimated_revenue_growth,
        }
    }
}

#[derive(Debug, Deserialize)]
struct QuoteShort {
    #[serde(default)]
    price: Option<f64>,
}

fn price_from_quotes(quotes: &[QuoteShort]) -> Result<f64, ServiceError> {
    match quotes.first().and_then(|q| q.price) {
        Some(price) if price.is_finite() && price != 0.0 => Ok(price),
        _ => Err(ServiceError::MalformedResponse {
            service: SERVICE,
            message: "Invalid ticker or no price data available from FMP.".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn income_statement_maps_growth_to_percent() {
        let raw: Vec<IncomeStatement> = serde_json::from_str(
            r#"[{"calendarYear": "2024", "revenue": 391035000000, "revenueGrowth": 0.0202},
                {"date": "2023-09-30", "revenue": 383285000000}]"#,
        )
        .unwrap();
        let rows: Vec<HistoricalGrowth> = raw.into_iter().map(HistoricalGrowth::from).collect();

        assert_eq!(rows[0].year, "2024");
        assert!((rows[0].growth.unwrap() - 2.02).abs() < 1e-9);
        assert_eq!(rows[1].year, "2023");
        assert_eq!(rows[1].growth, None);
    }

    #[test]
    fn estimate_year_comes_from_date_prefix() {
        let est: AnalystEstimate = serde_json::from_str(
            r#"{"date": "2026-09-27", "estimatedRevenueAvg": 450.0, "revenue": 400.0}"#,
        )
        .unwrap();
        let mapped = RevenueEstimate::from(est);
        assert_eq!(mapped.year, "2026");
        assert_eq!(mapped.estimated_revenue_growth, Some(50.0));
    }

    #[test]
    fn quote_requires_a_price() {
        let ok: Vec<QuoteShort> = serde_json::from_str(r#"[{"symbol": "AAPL", "price": 227.5}]"#).unwrap();
        assert_eq!(price_from_quotes(&ok).unwrap(), 227.5);

        let empty: Vec<QuoteShort> = Vec::new();
        assert!(matches!(
            price_from_quotes(&empty),
            Err(ServiceError::MalformedResponse { .. })
        ));

        let zero: Vec<QuoteShort> = serde_json::from_str(r#"[{"price": 0}]"#).unwrap();
        assert!(price_from_quotes(&zero).is_err());
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = FmpClient::new(&ServiceConfig::default()).err().unwrap();
        assert!(matches!(err, ServiceError::MissingConfig("FMP_API_KEY")));
    }
}
