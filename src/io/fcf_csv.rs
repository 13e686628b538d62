//! Explicit free-cash-flow import from CSV.
//!
//! Expected layout is one row per forecast year with the FCF in the second
//! column, e.g.
//!
//! ```text
//! year,fcf
//! 2025,105000
//! 2026,110250
//! ```
//!
//! Rules:
//! - the first line is a header and is never parsed
//! - blank lines and rows with fewer than two columns are skipped
//! - a non-numeric second column aborts the whole import
//! - the row count must equal `forecast_years` before inputs are touched

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::domain::{InputMode, ValuationInputs};
use crate::error::AppError;

/// Parse FCF values from CSV text.
pub fn parse_fcf_csv<R: Read>(reader: R) -> Result<Vec<f64>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut values = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header and lines are 1-based.
        let line = idx + 2;
        let record = result
            .map_err(|e| AppError::new(2, format!("Could not parse FCF values in CSV (line {line}): {e}")))?;

        if record.len() < 2 {
            continue;
        }

        let raw = record.get(1).unwrap_or_default();
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => values.push(v),
            _ => {
                return Err(AppError::new(
                    2,
                    format!("Could not parse FCF values in CSV (line {line}: '{raw}')."),
                ));
            }
        }
    }

    Ok(values)
}

/// Read and parse an FCF CSV file.
pub fn load_fcf_csv(path: &Path) -> Result<Vec<f64>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let values = parse_fcf_csv(file)?;
    tracing::debug!(path = %path.display(), rows = values.len(), "loaded FCF CSV");
    Ok(values)
}

/// Install imported values as explicit FCFs and switch to explicit mode.
///
/// Leaves `inputs` untouched when the row count does not match the horizon.
pub fn apply_fcf_values(inputs: &mut ValuationInputs, values: Vec<f64>) -> Result<(), AppError> {
    if values.len() != inputs.forecast_years as usize {
        return Err(AppError::new(
            2,
            format!(
                "CSV has {} rows, but forecast requires {} years.",
                values.len(),
                inputs.forecast_years
            ),
        ));
    }
    inputs.explicit_fcfs = values;
    inputs.input_mode = InputMode::Explicit;
    Ok(())
}

/// `*.csv` files under `root`, at most `max_depth` directories deep, sorted by path.
///
/// Used by the TUI import picker. Unreadable directories are skipped.
pub fn discover_csv_files(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut out = Vec::new();
    collect_csv_files(root, 0, max_depth, &mut out);
    out.sort();
    out
}

fn collect_csv_files(dir: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
            if depth < max_depth && !matches!(name, ".git" | "target" | "node_modules") {
                collect_csv_files(&path, depth + 1, max_depth, out);
            }
        } else if file_type.is_file() && is_csv(&path) {
            out.push(path);
        }
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_header_blank_and_short_rows() {
        let csv = "year,fcf\n2025,105000\n\nnote\n2026, 110250.5 \n2027,115762\n";
        let values = parse_fcf_csv(csv.as_bytes()).unwrap();
        assert_eq!(values, vec![105_000.0, 110_250.5, 115_762.0]);
    }

    #[test]
    fn non_numeric_value_aborts() {
        let csv = "year,fcf\n2025,105000\n2026,n/a\n";
        let err = parse_fcf_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().starts_with("Could not parse FCF values in CSV"));
        assert!(err.message().contains("line 3"));
    }

    #[test]
    fn apply_requires_matching_count() {
        let mut inputs = ValuationInputs::default();
        let before = inputs.clone();

        let err = apply_fcf_values(&mut inputs, vec![1.0, 2.0]).unwrap_err();
        assert_eq!(err.message(), "CSV has 2 rows, but forecast requires 5 years.");
        assert_eq!(inputs, before);

        apply_fcf_values(&mut inputs, vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(inputs.input_mode, InputMode::Explicit);
        assert_eq!(inputs.explicit_fcfs, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fcf.csv");
        std::fs::write(&path, "year,fcf\n1,10\n2,20\n").unwrap();
        assert_eq!(load_fcf_csv(&path).unwrap(), vec![10.0, 20.0]);

        let missing = dir.path().join("missing.csv");
        assert_eq!(load_fcf_csv(&missing).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn discovers_csv_files_within_depth() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("a/b")).unwrap();
        std::fs::create_dir_all(root.join("target")).unwrap();
        std::fs::write(root.join("top.CSV"), "").unwrap();
        std::fs::write(root.join("notes.txt"), "").unwrap();
        std::fs::write(root.join("a/one.csv"), "").unwrap();
        std::fs::write(root.join("a/b/deep.csv"), "").unwrap();
        std::fs::write(root.join("target/skip.csv"), "").unwrap();

        let found = discover_csv_files(root, 1);
        assert_eq!(found, vec![root.join("a/one.csv"), root.join("top.CSV")]);
        assert_eq!(discover_csv_files(root, 2).len(), 3);
    }
}
