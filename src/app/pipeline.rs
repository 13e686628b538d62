//! Shared "resolve inputs -> value" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the input layering:
//! defaults -> scenario or share link -> flag overrides -> CSV import
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::cli::{InputArgs, SourceArgs};
use crate::domain::{ValuationInputs, ValuationResult};
use crate::engine::compute_valuation;
use crate::error::AppError;
use crate::io::{ScenarioStore, apply_fcf_values, decode_share_link, load_fcf_csv};

/// Inputs together with the result they produced.
#[derive(Debug, Clone)]
pub struct ValuationRun {
    pub inputs: ValuationInputs,
    pub result: ValuationResult,
}

/// Open the scenario store selected by `--store` (or the default location).
pub fn open_store(source: &SourceArgs) -> Result<ScenarioStore, AppError> {
    ScenarioStore::resolve(source.store.store.as_deref())
}

/// Starting inputs: a saved scenario, a share link, or the defaults.
pub fn load_base_inputs(source: &SourceArgs) -> Result<ValuationInputs, AppError> {
    if let Some(key) = &source.scenario {
        let store = open_store(source)?;
        let scenario = store.get(key)?;
        ValuationInputs::check_forecast_years(scenario.inputs.forecast_years)
            .map_err(|e| AppError::new(2, format!("Scenario '{key}' is unusable: {e}")))?;
        tracing::info!(id = %scenario.id, name = %scenario.name, "loaded scenario");
        return Ok(scenario.inputs);
    }
    if let Some(link) = &source.link {
        return decode_share_link(link);
    }
    Ok(ValuationInputs::default())
}

/// Layer flag overrides and an optional CSV import on top of the base inputs.
pub fn resolve_inputs(source: &SourceArgs, overrides: &InputArgs) -> Result<ValuationInputs, AppError> {
    let mut inputs = load_base_inputs(source)?;
    overrides.apply_to(&mut inputs);
    ValuationInputs::check_forecast_years(inputs.forecast_years).map_err(|e| AppError::new(2, e))?;

    if let Some(path) = &overrides.csv {
        let values = load_fcf_csv(path)?;
        apply_fcf_values(&mut inputs, values)?;
    }

    tracing::debug!(
        ticker = %inputs.ticker,
        years = inputs.forecast_years,
        mode = ?inputs.input_mode,
        "resolved valuation inputs"
    );
    Ok(inputs)
}

/// Value the given inputs.
pub fn run_valuation(inputs: ValuationInputs) -> ValuationRun {
    let result = compute_valuation(&inputs);
    if !result.warnings.is_empty() {
        tracing::debug!(warnings = ?result.warnings, "valuation produced warnings");
    }
    ValuationRun { inputs, result }
}
