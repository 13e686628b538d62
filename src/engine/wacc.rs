//! Weighted average cost of capital helper.
//!
//! Cost of equity comes from CAPM (`rf + β · MRP`); cost of debt is taken
//! after tax. All values are percentage points.

use serde::{Deserialize, Serialize};

use crate::domain::ValuationInputs;

/// Inputs for the WACC calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaccInputs {
    pub risk_free_rate: f64,
    pub beta: f64,
    pub market_risk_premium: f64,
    pub pre_tax_cost_of_debt: f64,
    pub tax_rate: f64,
    pub equity_weight: f64,
    pub debt_weight: f64,
}

impl Default for WaccInputs {
    fn default() -> Self {
        Self {
            risk_free_rate: 4.5,
            beta: 1.1,
            market_risk_premium: 5.5,
            pre_tax_cost_of_debt: 6.0,
            tax_rate: 21.0,
            equity_weight: 80.0,
            debt_weight: 20.0,
        }
    }
}

/// Component breakdown of a WACC calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaccBreakdown {
    pub cost_of_equity: f64,
    pub after_tax_cost_of_debt: f64,
    pub wacc: f64,
}

impl WaccInputs {
    pub fn cost_of_equity(&self) -> f64 {
        self.risk_free_rate + self.beta * self.market_risk_premium
    }

    pub fn after_tax_cost_of_debt(&self) -> f64 {
        self.pre_tax_cost_of_debt * (1.0 - self.tax_rate / 100.0)
    }

    /// Blend equity and debt costs by their weights.
    ///
    /// Weights are used as given; they are not renormalized when they do not sum to 100.
    pub fn wacc(&self) -> f64 {
        (self.equity_weight / 100.0) * self.cost_of_equity()
            + (self.debt_weight / 100.0) * self.after_tax_cost_of_debt()
    }

    pub fn breakdown(&self) -> WaccBreakdown {
        WaccBreakdown {
            cost_of_equity: self.cost_of_equity(),
            after_tax_cost_of_debt: self.after_tax_cost_of_debt(),
            wacc: self.wacc(),
        }
    }

    /// Set `inputs.discount_rate` to this WACC rounded to two decimals.
    pub fn apply_to(&self, inputs: &mut ValuationInputs) -> f64 {
        let rounded = (self.wacc() * 100.0).round() / 100.0;
        inputs.discount_rate = rounded;
        rounded
    }
}
