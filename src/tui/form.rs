//! Editable fields of the input form and the WACC helper panel.
//!
//! Kept free of terminal types so edits can be tested directly.

use crate::domain::{InputMode, ValuationInputs, MAX_FORECAST_YEARS};
use crate::engine::WaccInputs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Ticker,
    Years,
    Mode,
    BaseFcf,
    Growth,
    ExplicitFcf(usize),
    DiscountRate,
    TerminalGrowth,
    Shares,
    NetDebt,
}

/// Fields shown for the current mode, top to bottom.
pub fn visible_fields(inputs: &ValuationInputs) -> Vec<Field> {
    let mut fields = vec![Field::Ticker, Field::Years, Field::Mode];
    match inputs.input_mode {
        InputMode::BaseGrowth => fields.extend([Field::BaseFcf, Field::Growth]),
        InputMode::Explicit => fields.extend((0..inputs.explicit_fcfs.len()).map(Field::ExplicitFcf)),
    }
    fields.extend([Field::DiscountRate, Field::TerminalGrowth, Field::Shares, Field::NetDebt]);
    fields
}

impl Field {
    pub fn label(self) -> String {
        match self {
            Field::Ticker => "Ticker".to_string(),
            Field::Years => "Forecast years".to_string(),
            Field::Mode => "FCF input".to_string(),
            Field::BaseFcf => "Base FCF ($M)".to_string(),
            Field::Growth => "FCF growth (%)".to_string(),
            Field::ExplicitFcf(i) => format!("  Year {} ($M)", i + 1),
            Field::DiscountRate => "WACC (%)".to_string(),
            Field::TerminalGrowth => "Terminal growth (%)".to_string(),
            Field::Shares => "Shares (M)".to_string(),
            Field::NetDebt => "Net debt ($M)".to_string(),
        }
    }

    pub fn display(self, inputs: &ValuationInputs) -> String {
        match self {
            Field::Ticker => inputs.ticker.clone(),
            Field::Years => inputs.forecast_years.to_string(),
            Field::Mode => inputs.input_mode.display_name().to_string(),
            Field::ExplicitFcf(i) => inputs
                .explicit_fcfs
                .get(i)
                .map(|v| v.to_string())
                .unwrap_or_default(),
            _ => self.number(inputs).map(|v| v.to_string()).unwrap_or_default(),
        }
    }

    /// Write edited text into `inputs`. Returns a message when the text is rejected.
    pub fn set(self, inputs: &mut ValuationInputs, text: &str) -> Result<(), String> {
        let text = text.trim();
        match self {
            Field::Ticker => {
                inputs.ticker = text.to_uppercase();
                Ok(())
            }
            Field::Years => {
                let years: u32 = text
                    .parse()
                    .map_err(|_| format!("'{text}' is not a whole number of years"))?;
                let years = ValuationInputs::check_forecast_years(years)?;
                set_years(inputs, years);
                Ok(())
            }
            Field::Mode => {
                let mode = inputs.input_mode.toggle();
                set_mode(inputs, mode);
                Ok(())
            }
            _ => {
                let v: f64 = text.parse().map_err(|_| format!("'{text}' is not a number"))?;
                if !v.is_finite() {
                    return Err(format!("'{text}' is not a finite number"));
                }
                self.set_number(inputs, v);
                Ok(())
            }
        }
    }

    /// Arrow-key adjustment. `delta` is +1 or -1.
    pub fn step(self, inputs: &mut ValuationInputs, delta: i32) {
        match self {
            Field::Ticker => {}
            Field::Years => {
                let years = inputs
                    .forecast_years
                    .saturating_add_signed(delta)
                    .clamp(1, MAX_FORECAST_YEARS);
                set_years(inputs, years);
            }
            Field::Mode => {
                let mode = inputs.input_mode.toggle();
                set_mode(inputs, mode);
            }
            _ => {
                let Some(current) = self.number(inputs) else {
                    return;
                };
                let step = match self {
                    Field::Growth | Field::DiscountRate | Field::TerminalGrowth => 0.25,
                    _ => (current.abs() * 0.01).max(1.0),
                };
                self.set_number(inputs, current + step * f64::from(delta));
            }
        }
    }

    fn number(self, inputs: &ValuationInputs) -> Option<f64> {
        match self {
            Field::BaseFcf => Some(inputs.base_fcf),
            Field::Growth => Some(inputs.fcf_growth_rate),
            Field::ExplicitFcf(i) => inputs.explicit_fcfs.get(i).copied(),
            Field::DiscountRate => Some(inputs.discount_rate),
            Field::TerminalGrowth => Some(inputs.terminal_growth_rate),
            Field::Shares => Some(inputs.shares_outstanding),
            Field::NetDebt => Some(inputs.net_debt),
            Field::Ticker | Field::Years | Field::Mode => None,
        }
    }

    fn set_number(self, inputs: &mut ValuationInputs, v: f64) {
        match self {
            Field::BaseFcf => inputs.base_fcf = v,
            Field::Growth => inputs.fcf_growth_rate = v,
            Field::ExplicitFcf(i) => {
                if let Some(slot) = inputs.explicit_fcfs.get_mut(i) {
                    *slot = v;
                }
            }
            Field::DiscountRate => inputs.discount_rate = v,
            Field::TerminalGrowth => inputs.terminal_growth_rate = v,
            Field::Shares => inputs.shares_outstanding = v,
            Field::NetDebt => inputs.net_debt = v,
            Field::Ticker | Field::Years | Field::Mode => {}
        }
    }
}

/// `years` must already be in range.
fn set_years(inputs: &mut ValuationInputs, years: u32) {
    inputs.forecast_years = years;
    if inputs.input_mode == InputMode::Explicit {
        inputs.resize_explicit_fcfs();
    }
}

/// Switch mode; entering explicit mode sizes the series to the horizon.
pub fn set_mode(inputs: &mut ValuationInputs, mode: InputMode) {
    inputs.input_mode = mode;
    if mode == InputMode::Explicit {
        inputs.resize_explicit_fcfs();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaccField {
    RiskFree,
    Beta,
    MarketRiskPremium,
    CostOfDebt,
    TaxRate,
    EquityWeight,
    DebtWeight,
}

impl WaccField {
    pub const ALL: [WaccField; 7] = [
        WaccField::RiskFree,
        WaccField::Beta,
        WaccField::MarketRiskPremium,
        WaccField::CostOfDebt,
        WaccField::TaxRate,
        WaccField::EquityWeight,
        WaccField::DebtWeight,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WaccField::RiskFree => "Risk-free rate (%)",
            WaccField::Beta => "Beta",
            WaccField::MarketRiskPremium => "Market risk premium (%)",
            WaccField::CostOfDebt => "Pre-tax cost of debt (%)",
            WaccField::TaxRate => "Tax rate (%)",
            WaccField::EquityWeight => "Weight of equity (%)",
            WaccField::DebtWeight => "Weight of debt (%)",
        }
    }

    pub fn get(self, w: &WaccInputs) -> f64 {
        match self {
            WaccField::RiskFree => w.risk_free_rate,
            WaccField::Beta => w.beta,
            WaccField::MarketRiskPremium => w.market_risk_premium,
            WaccField::CostOfDebt => w.pre_tax_cost_of_debt,
            WaccField::TaxRate => w.tax_rate,
            WaccField::EquityWeight => w.equity_weight,
            WaccField::DebtWeight => w.debt_weight,
        }
    }

    fn slot(self, w: &mut WaccInputs) -> &mut f64 {
        match self {
            WaccField::RiskFree => &mut w.risk_free_rate,
            WaccField::Beta => &mut w.beta,
            WaccField::MarketRiskPremium => &mut w.market_risk_premium,
            WaccField::CostOfDebt => &mut w.pre_tax_cost_of_debt,
            WaccField::TaxRate => &mut w.tax_rate,
            WaccField::EquityWeight => &mut w.equity_weight,
            WaccField::DebtWeight => &mut w.debt_weight,
        }
    }

    pub fn set(self, w: &mut WaccInputs, text: &str) -> Result<(), String> {
        let text = text.trim();
        let v: f64 = text.parse().map_err(|_| format!("'{text}' is not a number"))?;
        if !v.is_finite() {
            return Err(format!("'{text}' is not a finite number"));
        }
        *self.slot(w) = v;
        Ok(())
    }

    pub fn step(self, w: &mut WaccInputs, delta: i32) {
        let step = match self {
            WaccField::Beta => 0.05,
            WaccField::EquityWeight | WaccField::DebtWeight => 5.0,
            _ => 0.25,
        };
        *self.slot(w) += step * f64::from(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_mode_lists_one_field_per_year() {
        let mut inputs = ValuationInputs::default();
        assert_eq!(visible_fields(&inputs).len(), 9);

        set_mode(&mut inputs, InputMode::Explicit);
        let fields = visible_fields(&inputs);
        assert_eq!(fields.len(), 12);
        assert_eq!(fields[3], Field::ExplicitFcf(0));
        assert_eq!(fields[7], Field::ExplicitFcf(4));
    }

    #[test]
    fn editing_years_resizes_explicit_series() {
        let mut inputs = ValuationInputs {
            input_mode: InputMode::Explicit,
            ..ValuationInputs::default()
        };
        Field::Years.set(&mut inputs, "7").unwrap();
        assert_eq!(inputs.explicit_fcfs.len(), 7);
        assert_eq!(inputs.explicit_fcfs[0], 105_000.0);

        Field::Years.step(&mut inputs, -1);
        assert_eq!(inputs.forecast_years, 6);
        assert_eq!(inputs.explicit_fcfs.len(), 6);

        assert!(Field::Years.set(&mut inputs, "500").is_err());
        assert!(Field::Years.set(&mut inputs, "abc").is_err());
        assert_eq!(inputs.forecast_years, 6);
    }

    #[test]
    fn typed_and_stepped_years_share_one_range() {
        let mut inputs = ValuationInputs::default();
        assert!(Field::Years.set(&mut inputs, "0").is_err());
        assert_eq!(inputs.forecast_years, 5);

        Field::Years.set(&mut inputs, "1").unwrap();
        Field::Years.step(&mut inputs, -1);
        assert_eq!(inputs.forecast_years, 1);

        Field::Years.set(&mut inputs, "50").unwrap();
        Field::Years.step(&mut inputs, 1);
        assert_eq!(inputs.forecast_years, MAX_FORECAST_YEARS);
        assert!(Field::Years.set(&mut inputs, "51").is_err());
    }

    #[test]
    fn numeric_fields_parse_and_step() {
        let mut inputs = ValuationInputs::default();
        Field::DiscountRate.set(&mut inputs, " 9.5 ").unwrap();
        assert_eq!(inputs.discount_rate, 9.5);
        Field::DiscountRate.step(&mut inputs, 1);
        assert_eq!(inputs.discount_rate, 9.75);

        assert!(Field::NetDebt.set(&mut inputs, "lots").is_err());
        Field::NetDebt.set(&mut inputs, "-2500").unwrap();
        assert_eq!(Field::NetDebt.display(&inputs), "-2500");

        Field::Ticker.set(&mut inputs, " nvda ").unwrap();
        assert_eq!(inputs.ticker, "NVDA");
    }

    #[test]
    fn wacc_fields_edit_helper_inputs() {
        let mut w = WaccInputs::default();
        WaccField::Beta.set(&mut w, "1.3").unwrap();
        WaccField::DebtWeight.step(&mut w, 1);
        assert_eq!(w.beta, 1.3);
        assert_eq!(w.debt_weight, 25.0);
        assert!(WaccField::TaxRate.set(&mut w, "").is_err());
    }
}
