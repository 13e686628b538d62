//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - fed to the valuation engine from any front-end (CLI flags, TUI form, share links)
//! - stored as named scenarios
//! - exported to JSON/CSV
//!
//! Field names serialize in camelCase so scenario files and share links stay
//! readable by the browser version of the calculator.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Number of rows (and columns) in the sensitivity grid.
pub const GRID_SIDE: usize = 5;

/// Longest forecast horizon accepted from flags, links, scenario files or the form.
pub const MAX_FORECAST_YEARS: u32 = 50;

/// How projected free cash flows are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum InputMode {
    /// Compound `base_fcf` at `fcf_growth_rate` for every forecast year.
    #[default]
    BaseGrowth,
    /// Use `explicit_fcfs` verbatim, one value per forecast year.
    Explicit,
}

impl InputMode {
    pub fn display_name(self) -> &'static str {
        match self {
            InputMode::BaseGrowth => "Base FCF + Growth Rate",
            InputMode::Explicit => "Explicit FCF Values",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            InputMode::BaseGrowth => InputMode::Explicit,
            InputMode::Explicit => InputMode::BaseGrowth,
        }
    }
}

/// Caller-supplied valuation assumptions.
///
/// Monetary amounts are in whatever unit the caller chooses (the UI labels them
/// as millions). Rates are percentage points, so `8.5` means 8.5%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationInputs {
    /// Ticker symbol. Ignored by the engine; used by collaborators and scenario names.
    #[serde(default)]
    pub ticker: String,
    pub forecast_years: u32,
    pub input_mode: InputMode,
    pub base_fcf: f64,
    pub fcf_growth_rate: f64,
    #[serde(default)]
    pub explicit_fcfs: Vec<f64>,
    pub discount_rate: f64,
    pub terminal_growth_rate: f64,
    pub shares_outstanding: f64,
    pub net_debt: f64,
}

impl Default for ValuationInputs {
    fn default() -> Self {
        Self {
            ticker: "AAPL".to_string(),
            forecast_years: 5,
            input_mode: InputMode::BaseGrowth,
            base_fcf: 100_000.0,
            fcf_growth_rate: 5.0,
            explicit_fcfs: vec![105_000.0, 110_250.0, 115_762.0, 121_550.0, 127_628.0],
            discount_rate: 8.5,
            terminal_growth_rate: 2.5,
            shares_outstanding: 15_500.0,
            net_debt: 50_000.0,
        }
    }
}

impl ValuationInputs {
    /// Check that `years` is a usable horizon (`1..=MAX_FORECAST_YEARS`).
    pub fn check_forecast_years(years: u32) -> Result<u32, String> {
        if (1..=MAX_FORECAST_YEARS).contains(&years) {
            Ok(years)
        } else {
            Err(format!(
                "Forecast years must be between 1 and {MAX_FORECAST_YEARS} (got {years})."
            ))
        }
    }

    /// Pad with zeros (or truncate) `explicit_fcfs` so it has one entry per forecast year.
    ///
    /// Front-ends call this when the year count changes while in explicit mode;
    /// existing entries keep their positions.
    pub fn resize_explicit_fcfs(&mut self) {
        self.explicit_fcfs.resize(self.forecast_years as usize, 0.0);
    }
}

/// One cell of the sensitivity grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityCell {
    /// Discount rate (percentage points) used for this cell.
    pub wacc: f64,
    /// Terminal growth rate (percentage points) used for this cell.
    pub g: f64,
    /// Per-share value, or `0.0` when the cell is not computable.
    pub value: f64,
    /// False when `wacc <= g` or shares are non-positive (the `0.0` above is a sentinel).
    #[serde(default = "computable_default")]
    pub computable: bool,
}

fn computable_default() -> bool {
    true
}

impl SensitivityCell {
    /// The per-share value, or `None` when the engine could not compute one.
    pub fn defined_value(&self) -> Option<f64> {
        self.computable.then_some(self.value)
    }
}

/// Full output of a valuation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub projected_fcf: Vec<f64>,
    /// Present value of the explicit forecast cash flows.
    pub pv_fcf: f64,
    /// Undiscounted Gordon-growth terminal value (zero when any warning is present).
    pub terminal_value: f64,
    pub pv_terminal_value: f64,
    pub enterprise_value: f64,
    pub equity_value: f64,
    pub intrinsic_value_per_share: f64,
    /// 25 cells in discount-rate-major order.
    pub sensitivity_grid: Vec<SensitivityCell>,
    pub warnings: Vec<String>,
}

impl ValuationResult {
    /// Intrinsic value per share, or `None` where the engine zeroed it because of warnings.
    pub fn per_share(&self) -> Option<f64> {
        self.warnings
            .is_empty()
            .then_some(self.intrinsic_value_per_share)
    }

    /// Arrange the flat grid into discount-rate rows and growth-rate columns.
    pub fn sensitivity_table(&self) -> SensitivityTable {
        let rows: Vec<Vec<SensitivityCell>> = self
            .sensitivity_grid
            .chunks(GRID_SIDE)
            .map(|row| row.to_vec())
            .collect();
        let wacc_axis = rows.iter().filter_map(|row| row.first()).map(|c| c.wacc).collect();
        let growth_axis = rows
            .first()
            .map(|row| row.iter().map(|c| c.g).collect())
            .unwrap_or_default();

        SensitivityTable {
            wacc_axis,
            growth_axis,
            rows,
        }
    }
}

/// The sensitivity grid as a display matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityTable {
    /// Row keys (discount rates, ascending).
    pub wacc_axis: Vec<f64>,
    /// Column keys (terminal growth rates, ascending).
    pub growth_axis: Vec<f64>,
    pub rows: Vec<Vec<SensitivityCell>>,
}

/// A named set of inputs saved by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedScenario {
    /// Creation time in epoch milliseconds, as a string.
    pub id: String,
    pub name: String,
    pub inputs: ValuationInputs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inputs_deserialize_from_browser_json() {
        let json = r#"{
            "ticker": "MSFT",
            "forecastYears": 3,
            "inputMode": "explicit",
            "baseFcf": 0,
            "fcfGrowthRate": 0,
            "explicitFcfs": [10, 20, 30],
            "discountRate": 9,
            "terminalGrowthRate": 2,
            "sharesOutstanding": 100,
            "netDebt": 5
        }"#;

        let inputs: ValuationInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.ticker, "MSFT");
        assert_eq!(inputs.input_mode, InputMode::Explicit);
        assert_eq!(inputs.explicit_fcfs, vec![10.0, 20.0, 30.0]);

        let back = serde_json::to_value(&inputs).unwrap();
        assert_eq!(back["inputMode"], "explicit");
        assert_eq!(back["forecastYears"], 3);
    }

    #[test]
    fn resize_explicit_pads_and_truncates() {
        let mut inputs = ValuationInputs {
            forecast_years: 4,
            explicit_fcfs: vec![1.0, 2.0],
            ..ValuationInputs::default()
        };
        inputs.resize_explicit_fcfs();
        assert_eq!(inputs.explicit_fcfs, vec![1.0, 2.0, 0.0, 0.0]);

        inputs.forecast_years = 1;
        inputs.resize_explicit_fcfs();
        assert_eq!(inputs.explicit_fcfs, vec![1.0]);
    }

    #[test]
    fn forecast_years_must_be_between_one_and_cap() {
        assert_eq!(ValuationInputs::check_forecast_years(1), Ok(1));
        assert_eq!(ValuationInputs::check_forecast_years(MAX_FORECAST_YEARS), Ok(50));
        assert!(ValuationInputs::check_forecast_years(0).is_err());
        let err = ValuationInputs::check_forecast_years(2_000_000_000).unwrap_err();
        assert!(err.contains("between 1 and 50"));
    }

    #[test]
    fn cell_without_flag_defaults_to_computable() {
        let cell: SensitivityCell = serde_json::from_str(r#"{"wacc": 8, "g": 2, "value": 12.5}"#).unwrap();
        assert_eq!(cell.defined_value(), Some(12.5));
    }
}
