//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the engine stays free of presentation concerns
//! - output changes are localized (important for future snapshot tests)
//!
//! Monetary inputs are in millions, so aggregate values are scaled by 1e6
//! before currency formatting. Per-share values are shown as-is.

use crate::data::{GrowthAssumptions, GrowthScenario, ValuationSummary};
use crate::domain::{SavedScenario, ValuationInputs, ValuationResult};
use crate::engine::WaccInputs;

const MILLION: f64 = 1_000_000.0;

/// Format the full valuation report: inputs, warnings, key figures, cash flows, grid.
pub fn format_valuation(inputs: &ValuationInputs, result: &ValuationResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== dcf - DCF Valuation: {} ===\n", display_ticker(&inputs.ticker)));
    out.push_str(&format!("Mode: {}\n", inputs.input_mode.display_name()));
    out.push_str(&format!(
        "Forecast: {} years | WACC={} | g={}\n",
        inputs.forecast_years,
        format_percent(inputs.discount_rate),
        format_percent(inputs.terminal_growth_rate),
    ));
    out.push_str(&format!(
        "Shares: {}M | Net debt: ${}M\n",
        format_number(inputs.shares_outstanding),
        format_number(inputs.net_debt),
    ));

    if !result.warnings.is_empty() {
        out.push_str("\nInput warnings:\n");
        for w in &result.warnings {
            out.push_str(&format!("- {w}\n"));
        }
    }

    out.push_str("\nValuation:\n");
    out.push_str(&format!("  {:<24} {:>24}\n", "PV of forecast FCF", format_currency(result.pv_fcf * MILLION)));
    out.push_str(&format!("  {:<24} {:>24}\n", "Terminal value", format_currency(result.terminal_value * MILLION)));
    out.push_str(&format!("  {:<24} {:>24}\n", "PV of terminal value", format_currency(result.pv_terminal_value * MILLION)));
    out.push_str(&format!("  {:<24} {:>24}\n", "Enterprise value", format_currency(result.enterprise_value * MILLION)));
    out.push_str(&format!("  {:<24} {:>24}\n", "Equity value", format_currency(result.equity_value * MILLION)));
    let per_share = result
        .per_share()
        .map(format_currency)
        .unwrap_or_else(|| "N/A".to_string());
    out.push_str(&format!("  {:<24} {:>24}\n", "Intrinsic value / share", per_share));

    out.push_str("\nProjected free cash flows ($M):\n");
    out.push_str(&format_projected_fcf(&result.projected_fcf));

    out.push_str("\nSensitivity: intrinsic value per share\n");
    out.push_str(&format_sensitivity_table(result));

    out
}

/// `Year N` columns with rounded cash flows.
pub fn format_projected_fcf(fcfs: &[f64]) -> String {
    if fcfs.is_empty() {
        return "  (no forecast years)\n".to_string();
    }
    let mut out = String::new();
    for (i, fcf) in fcfs.iter().enumerate() {
        out.push_str(&format!("  Year {:<3} {:>16}\n", i + 1, format_number(fcf.round())));
    }
    out
}

/// 5x5 WACC (rows) by terminal growth (columns) table.
///
/// Non-computable cells print `N/A`. The base case sits at the center.
pub fn format_sensitivity_table(result: &ValuationResult) -> String {
    let table = result.sensitivity_table();
    let mut out = String::new();

    let mut header = format!("{:<10}", "WACC \\ g");
    for g in &table.growth_axis {
        header.push_str(&format!(" {:>14}", format_percent(*g)));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    let mut rule = format!("{:-<10}", "");
    for _ in &table.growth_axis {
        rule.push_str(&format!(" {:-<14}", ""));
    }
    out.push_str(&rule);
    out.push('\n');

    for (wacc, row) in table.wacc_axis.iter().zip(&table.rows) {
        let mut line = format!("{:<10}", format_percent(*wacc));
        for cell in row {
            let text = cell
                .defined_value()
                .map(format_currency)
                .unwrap_or_else(|| "N/A".to_string());
            line.push_str(&format!(" {text:>14}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

pub fn format_wacc(wacc: &WaccInputs) -> String {
    let b = wacc.breakdown();
    let mut out = String::new();

    out.push_str("=== dcf - WACC Helper ===\n");
    out.push_str("Cost of equity (CAPM):\n");
    out.push_str(&format!(
        "  rf={} + beta={} x MRP={} = {}\n",
        format_percent(wacc.risk_free_rate),
        wacc.beta,
        format_percent(wacc.market_risk_premium),
        format_percent(b.cost_of_equity),
    ));
    out.push_str("Cost of debt:\n");
    out.push_str(&format!(
        "  {} x (1 - {}) = {}\n",
        format_percent(wacc.pre_tax_cost_of_debt),
        format_percent(wacc.tax_rate),
        format_percent(b.after_tax_cost_of_debt),
    ));
    out.push_str("Capital structure:\n");
    out.push_str(&format!(
        "  equity {} | debt {}\n",
        format_percent(wacc.equity_weight),
        format_percent(wacc.debt_weight),
    ));
    out.push_str(&format!("\nCalculated WACC: {}\n", format_percent(b.wacc)));

    out
}

pub fn format_assumptions(ticker: &str, assumptions: &GrowthAssumptions) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== dcf - AI Growth Assumptions: {} ===\n", display_ticker(ticker)));
    for scenario in GrowthScenario::ALL {
        let case = assumptions.case(scenario);
        out.push_str(&format!("\n{}: {}\n", scenario.display_name(), format_percent(case.rate)));
        out.push_str(&format!("  {}\n", case.justification.trim()));
    }
    out
}

pub fn format_summary(summary: &ValuationSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== dcf - Valuation Summary: {} ===\n", summary.ticker));
    out.push_str(&format!("Intrinsic value / share: {}\n", format_currency(summary.intrinsic_value)));
    out.push_str(&format!("Market price:            {}\n", format_currency(summary.market_price)));
    out.push_str(&format!(
        "Upside:                  {} ({})\n",
        format_percent(summary.upside * 100.0),
        summary.verdict.display_name(),
    ));
    out.push('\n');
    out.push_str(summary.narrative.trim());
    out.push('\n');
    out
}

pub fn format_scenarios(scenarios: &[SavedScenario]) -> String {
    if scenarios.is_empty() {
        return "No saved scenarios.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(format!("{:<15} {:<28} {:<8} {:>6} {:>8}", "id", "name", "ticker", "years", "wacc").trim_end());
    out.push('\n');
    out.push_str(&format!("{:-<15} {:-<28} {:-<8} {:->6} {:->8}\n", "", "", "", "", ""));
    for s in scenarios {
        out.push_str(
            format!(
                "{:<15} {:<28} {:<8} {:>6} {:>8}",
                s.id,
                truncate(&s.name, 28),
                truncate(&s.inputs.ticker, 8),
                s.inputs.forecast_years,
                format_percent(s.inputs.discount_rate),
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// `$1,234.56`, with a leading minus for negatives.
pub fn format_currency(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let fixed = format!("{:.2}", v.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((&fixed, "00"));
    let sign = if v < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${}.{frac}", group_thousands(int))
}

/// Thousands-grouped number with up to three decimals, trailing zeros trimmed.
pub fn format_number(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let fixed = format!("{:.3}", v.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((&fixed, ""));
    let frac = frac.trim_end_matches('0');
    let sign = if v < 0.0 && (int != "0" || !frac.is_empty()) { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{}", group_thousands(int))
    } else {
        format!("{sign}{}.{frac}", group_thousands(int))
    }
}

pub fn format_percent(v: f64) -> String {
    format!("{v:.2}%")
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn display_ticker(ticker: &str) -> &str {
    let t = ticker.trim();
    if t.is_empty() { "(no ticker)" } else { t }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InputMode;
    use crate::engine::compute_valuation;

    #[test]
    fn currency_groups_and_signs() {
        assert_eq!(format_currency(119.590_479_647_824_72), "$119.59");
        assert_eq!(format_currency(1_903_652.434_541_283_2 * MILLION), "$1,903,652,434,541.28");
        assert_eq!(format_currency(-2.0), "-$2.00");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-0.001), "$0.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
    }

    #[test]
    fn number_trims_decimals() {
        assert_eq!(format_number(127_628.0), "127,628");
        assert_eq!(format_number(-50_000.0), "-50,000");
        assert_eq!(format_number(15_500.5), "15,500.5");
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_percent(9.388), "9.39%");
    }

    #[test]
    fn sensitivity_table_marks_degenerate_cells() {
        let inputs = ValuationInputs {
            discount_rate: 3.0,
            ..ValuationInputs::default()
        };
        let table = format_sensitivity_table(&compute_valuation(&inputs));
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("WACC \\ g"));
        assert!(lines[0].ends_with("3.00%"));
        // wacc 2.00% row: all five cells undefined.
        assert!(lines[2].starts_with("2.00%"));
        assert_eq!(lines[2].matches("N/A").count(), 5);
        // wacc 3.50% row is fully computable.
        assert_eq!(lines[5].matches("N/A").count(), 0);
    }

    #[test]
    fn valuation_report_lists_warnings_and_na_per_share() {
        let inputs = ValuationInputs {
            shares_outstanding: 0.0,
            ..ValuationInputs::default()
        };
        let report = format_valuation(&inputs, &compute_valuation(&inputs));
        assert!(report.contains("Input warnings:\n- Shares outstanding must be positive.\n"));
        assert!(report.contains("Intrinsic value / share"));
        assert!(report.contains("N/A"));
    }

    #[test]
    fn valuation_report_for_default_inputs() {
        let inputs = ValuationInputs::default();
        let report = format_valuation(&inputs, &compute_valuation(&inputs));
        assert!(report.starts_with("=== dcf - DCF Valuation: AAPL ===\n"));
        assert!(report.contains(InputMode::BaseGrowth.display_name()));
        assert!(report.contains("$119.59"));
        assert!(report.contains("Year 5"));
        assert!(report.contains("127,628"));
        assert!(!report.contains("Input warnings"));
    }

    #[test]
    fn wacc_report_shows_components() {
        let text = format_wacc(&WaccInputs::default());
        assert!(text.contains("= 10.55%"));
        assert!(text.contains("= 4.74%"));
        assert!(text.ends_with("Calculated WACC: 9.39%\n"));
    }

    #[test]
    fn scenario_list_truncates_long_names() {
        let scenarios = vec![SavedScenario {
            id: "1700000000000".to_string(),
            name: "A very long scenario name that keeps going".to_string(),
            inputs: ValuationInputs::default(),
        }];
        let text = format_scenarios(&scenarios);
        assert!(text.contains("1700000000000"));
        assert!(text.contains("A very long scenario name t."));
        assert_eq!(format_scenarios(&[]), "No saved scenarios.\n");
    }
}
