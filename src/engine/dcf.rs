//! Discounted cash flow valuation.
//!
//! `compute_valuation` is a pure function of its inputs:
//!
//! ```text
//! fcf_i      = base * (1 + growth)^i              (or explicit values)
//! pv_fcf     = Σ fcf_i / (1 + r)^i
//! tv         = fcf_n * (1 + g) / (r - g)          (Gordon growth)
//! ev         = pv_fcf + tv / (1 + r)^n
//! equity     = ev - net_debt
//! per_share  = equity / shares
//! ```
//!
//! Invalid inputs never fail the call. Each problem adds a warning and the
//! affected outputs are zeroed, so callers always get a complete result.

use crate::domain::{InputMode, SensitivityCell, ValuationInputs, ValuationResult};

/// Discount-rate offsets (percentage points) for the sensitivity grid rows.
pub const WACC_OFFSETS: [f64; 5] = [-1.0, -0.5, 0.0, 0.5, 1.0];

/// Terminal-growth offsets (percentage points) for the sensitivity grid columns.
pub const GROWTH_OFFSETS: [f64; 5] = [-0.5, -0.25, 0.0, 0.25, 0.5];

/// Run a full valuation: projection, discounting, terminal value, roll-up and sensitivity grid.
pub fn compute_valuation(inputs: &ValuationInputs) -> ValuationResult {
    let years = inputs.forecast_years;
    let mut warnings = Vec::new();

    if inputs.discount_rate <= inputs.terminal_growth_rate {
        warnings.push("Discount rate must be greater than terminal growth rate.".to_string());
    }
    if inputs.shares_outstanding <= 0.0 {
        warnings.push("Shares outstanding must be positive.".to_string());
    }

    let projected_fcf = match inputs.input_mode {
        InputMode::BaseGrowth => project_growth(inputs.base_fcf, inputs.fcf_growth_rate, years),
        InputMode::Explicit => {
            if inputs.explicit_fcfs.len() == years as usize {
                inputs.explicit_fcfs.clone()
            } else {
                warnings.push(format!(
                    "Explicit FCF entries ({}) must match forecast years ({years}).",
                    inputs.explicit_fcfs.len()
                ));
                vec![0.0; years as usize]
            }
        }
    };

    let pv_fcf = present_value(&projected_fcf, inputs.discount_rate);
    let last_fcf = projected_fcf.last().copied().unwrap_or(0.0);

    let (terminal_value, pv_terminal_value) = if warnings.is_empty() {
        let tv = terminal_value(last_fcf, inputs.discount_rate, inputs.terminal_growth_rate);
        (tv, tv / discount_factor(inputs.discount_rate, years))
    } else {
        (0.0, 0.0)
    };

    let enterprise_value = pv_fcf + pv_terminal_value;
    let equity_value = enterprise_value - inputs.net_debt;
    let intrinsic_value_per_share = if !warnings.is_empty() || inputs.shares_outstanding <= 0.0 {
        0.0
    } else {
        equity_value / inputs.shares_outstanding
    };

    let sensitivity_grid = sensitivity_grid(inputs, pv_fcf, last_fcf);

    ValuationResult {
        projected_fcf,
        pv_fcf,
        terminal_value,
        pv_terminal_value,
        enterprise_value,
        equity_value,
        intrinsic_value_per_share,
        sensitivity_grid,
        warnings,
    }
}

/// Geometric growth from `base`, starting one period out (no re-basing).
pub fn project_growth(base: f64, growth_pct: f64, years: u32) -> Vec<f64> {
    (1..=years)
        .map(|i| base * discount_factor(growth_pct, i))
        .collect()
}

/// Present value of a cash flow series with end-of-year annual discounting.
pub fn present_value(cash_flows: &[f64], rate_pct: f64) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .map(|(i, fcf)| fcf / discount_factor(rate_pct, i as u32 + 1))
        .sum()
}

/// Each cash flow discounted to today, in forecast order.
pub fn discounted_series(cash_flows: &[f64], rate_pct: f64) -> Vec<f64> {
    cash_flows
        .iter()
        .enumerate()
        .map(|(i, fcf)| fcf / discount_factor(rate_pct, i as u32 + 1))
        .collect()
}

/// Gordon growth terminal value at the end of the forecast horizon.
///
/// Callers must ensure `rate_pct > growth_pct`; otherwise the result is
/// infinite or negative.
pub fn terminal_value(last_fcf: f64, rate_pct: f64, growth_pct: f64) -> f64 {
    last_fcf * (1.0 + growth_pct / 100.0) / (rate_pct / 100.0 - growth_pct / 100.0)
}

/// `(1 + rate)^periods` for a rate in percentage points.
fn discount_factor(rate_pct: f64, periods: u32) -> f64 {
    (1.0 + rate_pct / 100.0).powi(periods as i32)
}

/// Re-price the terminal step for every (wacc, g) neighbour of the central case.
///
/// The forecast PV and last cash flow are those of the central case; only the
/// terminal value and roll-up change per cell.
fn sensitivity_grid(inputs: &ValuationInputs, pv_fcf: f64, last_fcf: f64) -> Vec<SensitivityCell> {
    let mut grid = Vec::with_capacity(WACC_OFFSETS.len() * GROWTH_OFFSETS.len());

    for wacc in WACC_OFFSETS.map(|d| inputs.discount_rate + d) {
        for g in GROWTH_OFFSETS.map(|d| inputs.terminal_growth_rate + d) {
            // Written as a positive test so NaN rates land in the sentinel branch.
            if wacc > g && inputs.shares_outstanding > 0.0 {
                let pv_tv = terminal_value(last_fcf, wacc, g) / discount_factor(wacc, inputs.forecast_years);
                let equity = pv_fcf + pv_tv - inputs.net_debt;
                grid.push(SensitivityCell {
                    wacc,
                    g,
                    value: equity / inputs.shares_outstanding,
                    computable: true,
                });
            } else {
                grid.push(SensitivityCell {
                    wacc,
                    g,
                    value: 0.0,
                    computable: false,
                });
            }
        }
    }

    grid
}
