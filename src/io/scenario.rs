//! Named scenario persistence.
//!
//! Scenarios live in a single JSON array of `{id, name, inputs}` records, the
//! same shape the browser calculator keeps under `dcf_scenarios_v1`.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::domain::{SavedScenario, ValuationInputs};
use crate::error::AppError;

pub const STORE_FILE_NAME: &str = "dcf_scenarios_v1.json";
pub const STORE_ENV_VAR: &str = "DCF_SCENARIO_STORE";

pub struct ScenarioStore {
    path: PathBuf,
}

impl ScenarioStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform data directory, e.g. `~/.local/share/dcf-valuation/`.
    pub fn default_location() -> Result<Self, AppError> {
        let dir = dirs::data_dir()
            .ok_or_else(|| AppError::new(2, "Could not determine a data directory; pass --store"))?;
        Ok(Self::new(dir.join("dcf-valuation").join(STORE_FILE_NAME)))
    }

    /// Use `explicit` when given (the CLI fills it from `--store` or `DCF_SCENARIO_STORE`),
    /// otherwise the default location.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, AppError> {
        match explicit {
            Some(path) => Ok(Self::new(path)),
            None => Self::default_location(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All saved scenarios, oldest first.
    ///
    /// A missing file is an empty store. An unreadable or corrupt file is
    /// logged and also treated as empty so a bad file never blocks valuation.
    pub fn load(&self) -> Vec<SavedScenario> {
        self.read().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to load scenarios");
            Vec::new()
        })
    }

    /// Strict read: only a missing file counts as empty.
    fn read(&self) -> Result<Vec<SavedScenario>, AppError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::new(
                    2,
                    format!("Failed to open scenario store '{}': {e}", self.path.display()),
                ));
            }
        };

        serde_json::from_reader(file).map_err(|e| {
            AppError::new(
                2,
                format!("Scenario store '{}' could not be parsed: {e}", self.path.display()),
            )
        })
    }

    /// Append a scenario named `name` and persist the whole list.
    pub fn save(&self, name: &str, inputs: &ValuationInputs) -> Result<SavedScenario, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::new(2, "Scenario name must not be empty"));
        }

        // A store that cannot be parsed is left alone rather than replaced.
        let mut scenarios = self.read()?;
        let mut id = Utc::now().timestamp_millis();
        // Two saves inside the same millisecond must still get distinct ids.
        while scenarios.iter().any(|s| s.id == id.to_string()) {
            id += 1;
        }

        let scenario = SavedScenario {
            id: id.to_string(),
            name: name.to_string(),
            inputs: inputs.clone(),
        };
        scenarios.push(scenario.clone());
        self.write(&scenarios)?;

        tracing::info!(id = %scenario.id, name = %scenario.name, "saved scenario");
        Ok(scenario)
    }

    /// Look up by id first, then by exact name (latest save wins on duplicate names).
    pub fn find(&self, key: &str) -> Option<SavedScenario> {
        let scenarios = self.load();
        if let Some(found) = scenarios.iter().find(|s| s.id == key) {
            return Some(found.clone());
        }
        scenarios.into_iter().rev().find(|s| s.name == key)
    }

    /// Like `find`, but a miss is an error.
    pub fn get(&self, key: &str) -> Result<SavedScenario, AppError> {
        self.find(key)
            .ok_or_else(|| AppError::new(2, format!("Scenario '{key}' not found in {}", self.path.display())))
    }

    fn write(&self, scenarios: &[SavedScenario]) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::new(2, format!("Failed to create scenario directory '{}': {e}", parent.display()))
            })?;
        }
        let file = File::create(&self.path).map_err(|e| {
            AppError::new(2, format!("Failed to create scenario store '{}': {e}", self.path.display()))
        })?;
        serde_json::to_writer_pretty(file, scenarios)
            .map_err(|e| AppError::new(2, format!("Failed to write scenario store: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> ScenarioStore {
        ScenarioStore::new(dir.path().join("nested").join(STORE_FILE_NAME))
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().is_empty());
        assert!(store.find("anything").is_none());
    }

    #[test]
    fn save_then_find_by_id_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let bull = ValuationInputs {
            fcf_growth_rate: 9.0,
            ..ValuationInputs::default()
        };
        let first = store.save("AAPL bull", &bull).unwrap();
        let second = store.save("AAPL base", &ValuationInputs::default()).unwrap();
        assert_ne!(first.id, second.id);

        let all = store.load();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "AAPL bull");

        assert_eq!(store.get(&first.id).unwrap().inputs.fcf_growth_rate, 9.0);
        assert_eq!(store.get("AAPL base").unwrap().id, second.id);
        assert_eq!(store.get("missing").unwrap_err().exit_code(), 2);
    }

    #[test]
    fn corrupt_file_is_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE_NAME);
        fs::write(&path, "{not json").unwrap();

        let store = ScenarioStore::new(&path);
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_keeps_a_store_it_cannot_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE_NAME);
        let truncated = r#"[{"id": "1", "name": "keep me", "inputs": {"ticker": "KEEP"}}, {"id": "2", "na"#;
        fs::write(&path, truncated).unwrap();

        let store = ScenarioStore::new(&path);
        let err = store.save("new", &ValuationInputs::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("could not be parsed"));
        assert_eq!(fs::read_to_string(&path).unwrap(), truncated);
    }

    #[test]
    fn reads_browser_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE_NAME);
        fs::write(
            &path,
            r#"[{"id": "1700000000000", "name": "MSFT", "inputs": {
                "ticker": "MSFT", "forecastYears": 5, "inputMode": "baseGrowth",
                "baseFcf": 70000, "fcfGrowthRate": 8, "explicitFcfs": [],
                "discountRate": 9, "terminalGrowthRate": 3,
                "sharesOutstanding": 7430, "netDebt": -20000}}]"#,
        )
        .unwrap();

        let found = ScenarioStore::new(&path).get("MSFT").unwrap();
        assert_eq!(found.id, "1700000000000");
        assert_eq!(found.inputs.net_debt, -20_000.0);
    }

    #[test]
    fn blank_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).save("   ", &ValuationInputs::default()).is_err());
    }
}
