//! Export valuation results to JSON and the sensitivity grid to CSV.
//!
//! Both are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::domain::{ValuationInputs, ValuationResult};
use crate::error::AppError;

/// JSON document written by `--export-json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationExport<'a> {
    pub tool: &'static str,
    pub exported_at: String,
    pub inputs: &'a ValuationInputs,
    pub result: &'a ValuationResult,
}

impl<'a> ValuationExport<'a> {
    pub fn new(inputs: &'a ValuationInputs, result: &'a ValuationResult) -> Self {
        Self {
            tool: "dcf",
            exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            inputs,
            result,
        }
    }
}

/// Write inputs plus the full result as pretty JSON.
pub fn write_result_json(path: &Path, inputs: &ValuationInputs, result: &ValuationResult) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, &ValuationExport::new(inputs, result))
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))?;
    tracing::info!(path = %path.display(), "wrote result JSON");
    Ok(())
}

/// Write the sensitivity grid in long form: one row per (wacc, g) cell.
///
/// Non-computable cells leave `value_per_share` empty.
pub fn write_grid_csv(path: &Path, result: &ValuationResult) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create grid CSV '{}': {e}", path.display())))?;
    write_grid(&mut writer, result)?;
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write grid CSV: {e}")))?;
    tracing::info!(path = %path.display(), cells = result.sensitivity_grid.len(), "wrote grid CSV");
    Ok(())
}

fn write_grid<W: std::io::Write>(writer: &mut csv::Writer<W>, result: &ValuationResult) -> Result<(), AppError> {
    let row_err = |e: csv::Error| AppError::new(2, format!("Failed to write grid CSV row: {e}"));

    writer
        .write_record(["wacc", "terminal_growth", "value_per_share"])
        .map_err(row_err)?;
    for cell in &result.sensitivity_grid {
        let value = cell.defined_value().map(|v| format!("{v:.6}")).unwrap_or_default();
        writer
            .write_record([format!("{:.2}", cell.wacc), format!("{:.2}", cell.g), value])
            .map_err(row_err)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_valuation;

    #[test]
    fn grid_csv_has_header_and_25_rows() {
        let inputs = ValuationInputs {
            discount_rate: 3.0,
            ..ValuationInputs::default()
        };
        let result = compute_valuation(&inputs);

        let mut writer = csv::Writer::from_writer(Vec::new());
        write_grid(&mut writer, &result).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 26);
        assert_eq!(lines[0], "wacc,terminal_growth,value_per_share");
        // wacc 2.00 is below every growth rate on the first row.
        assert_eq!(lines[1], "2.00,2.00,");
    }

    #[test]
    fn json_export_embeds_inputs_and_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let inputs = ValuationInputs::default();
        let result = compute_valuation(&inputs);

        write_result_json(&path, &inputs, &result).unwrap();
        let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(v["tool"], "dcf");
        assert_eq!(v["inputs"]["ticker"], "AAPL");
        assert_eq!(v["result"]["sensitivityGrid"].as_array().unwrap().len(), 25);
        assert!(v["exportedAt"].as_str().unwrap().ends_with('Z'));
    }
}
