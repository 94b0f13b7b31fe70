//! # File I/O Module
//!
//! Reads and writes combination inputs:
//! - **Structured input**: a JSON [`CombinationInput`] document
//! - **Input snapshots**: flat `key -> value` JSON files (`<name>-inputs.txt`)
//!   mirroring the calculator form fields
//! - **Atomic saves**: write to `.tmp`, sync, rename to prevent corruption
//!
//! ## Snapshot Format
//!
//! ```json
//! {
//!   "asce_standard": "ASCE 7-16",
//!   "jurisdiction": "",
//!   "design_method": "ASD",
//!   "input_load_level": "Nominal (Service/ASD)",
//!   "unit_system": "imperial",
//!   "dead_load": 20,
//!   "live_load": 0,
//!   "roof_live_load": 20,
//!   "rain_load": 0,
//!   "seismic_load": 0,
//!   "windward_roof_snow": 0,
//!   "windward_roof_wind_max": 12,
//!   "windward_roof_wind_min": "-18",
//!   "saved_at": "2026-10-16T12:00:00Z"
//! }
//! ```
//!
//! Values may be numbers or strings. Only field presence is checked; numeric
//! fields that do not parse to a finite number read as 0 and produce a
//! warning.
//!
//! ## Example
//!
//! ```rust,no_run
//! use combo_core::calculations::CombinationInput;
//! use combo_core::file_io::{load_snapshot, save_snapshot, snapshot_path, InputSnapshot};
//! use combo_core::loads::{DesignMethod, Standard};
//! use std::path::Path;
//!
//! let input = CombinationInput::new(Standard::Asce7_16, DesignMethod::Asd, 20.0);
//! let path = snapshot_path(Path::new("."), "roof");
//!
//! save_snapshot(&InputSnapshot::from_input(&input), &path)?;
//! let (loaded, warnings) = load_snapshot(&path)?.to_input()?;
//! assert_eq!(loaded, input);
//! assert!(warnings.is_empty());
//! # Ok::<(), combo_core::errors::CalcError>(())
//! ```

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calculations::combo::CombinationInput;
use crate::calculations::scenario::{Scenario, ScenarioLoads};
use crate::errors::{CalcError, CalcResult};
use crate::loads::{DesignMethod, LoadLevel, Standard};
use crate::units::UnitSystem;

/// File name suffix for input snapshots
pub const SNAPSHOT_SUFFIX: &str = "-inputs.txt";

pub const KEY_STANDARD: &str = "asce_standard";
pub const KEY_JURISDICTION: &str = "jurisdiction";
pub const KEY_METHOD: &str = "design_method";
pub const KEY_LOAD_LEVEL: &str = "input_load_level";
pub const KEY_UNIT_SYSTEM: &str = "unit_system";
pub const KEY_LABEL: &str = "label";
pub const KEY_SAVED_AT: &str = "saved_at";

const KEY_DEAD: &str = "dead_load";
const KEY_LIVE: &str = "live_load";
const KEY_ROOF_LIVE: &str = "roof_live_load";
const KEY_RAIN: &str = "rain_load";
const KEY_SEISMIC: &str = "seismic_load";

/// Flat key/value form snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputSnapshot {
    pub fields: BTreeMap<String, Value>,
}

impl InputSnapshot {
    /// Snapshot of a structured input. Scenario fields are written for every
    /// supplied scenario.
    pub fn from_input(input: &CombinationInput) -> Self {
        let mut fields = BTreeMap::new();
        let mut text = |k: &str, v: &str| {
            fields.insert(k.to_string(), Value::String(v.to_string()));
        };
        text(KEY_LABEL, &input.label);
        text(KEY_STANDARD, input.standard.code());
        text(KEY_JURISDICTION, &input.jurisdiction);
        text(KEY_METHOD, input.method.code());
        text(KEY_LOAD_LEVEL, input.input_load_level.code());
        text(KEY_UNIT_SYSTEM, input.unit_system.code());

        let mut snapshot = InputSnapshot { fields };
        snapshot.set_number(KEY_DEAD, input.dead);
        snapshot.set_number(KEY_LIVE, input.live);
        snapshot.set_number(KEY_ROOF_LIVE, input.roof_live);
        snapshot.set_number(KEY_RAIN, input.rain);
        snapshot.set_number(KEY_SEISMIC, input.seismic);

        for (scenario, loads) in &input.scenarios {
            let [snow, wind_max, wind_min] = scenario_keys(*scenario);
            snapshot.set_number(&snow, loads.snow);
            snapshot.set_number(&wind_max, loads.wind_max);
            snapshot.set_number(&wind_min, loads.wind_min);
        }
        snapshot
    }

    fn set_number(&mut self, key: &str, value: f64) {
        // Non-finite values have no JSON form; they are stored as text and
        // read back as 0 with a warning.
        let v = serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(value.to_string()));
        self.fields.insert(key.to_string(), v);
    }

    /// Whether a key is present
    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Text value of a key; numbers are rendered as text
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Numeric value of a key.
    ///
    /// Absent keys read as 0. Present values that are not a number or a
    /// finite numeric string ("nan" and "inf" included) also read as 0 and
    /// push a warning.
    pub fn get_number(&self, key: &str, warnings: &mut Vec<String>) -> f64 {
        let Some(value) = self.fields.get(key) else {
            return 0.0;
        };
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) if s.trim().is_empty() => Some(0.0),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        };
        match parsed {
            Some(v) => v,
            None => {
                warnings.push(format!("Field '{}' is not a number ({}); using 0", key, value));
                0.0
            }
        }
    }

    /// Convert back into a structured input.
    ///
    /// # Returns
    ///
    /// * `Ok((input, warnings))` - warnings list every numeric field read as 0
    /// * `Err(CalcError::MissingField)` - standard or design method absent
    /// * `Err(CalcError::InvalidInput)` - a selector field has an unknown value
    pub fn to_input(&self) -> CalcResult<(CombinationInput, Vec<String>)> {
        let standard_text = self
            .get_str(KEY_STANDARD)
            .ok_or_else(|| CalcError::missing_field(KEY_STANDARD))?;
        let standard = Standard::from_code(&standard_text).ok_or_else(|| {
            CalcError::invalid_input(KEY_STANDARD, &standard_text, "Expected ASCE 7-16 or ASCE 7-22")
        })?;

        let method_text = self
            .get_str(KEY_METHOD)
            .ok_or_else(|| CalcError::missing_field(KEY_METHOD))?;
        let method = DesignMethod::from_code(&method_text)
            .ok_or_else(|| CalcError::invalid_input(KEY_METHOD, &method_text, "Expected LRFD or ASD"))?;

        let input_load_level = match self.get_str(KEY_LOAD_LEVEL) {
            Some(text) => LoadLevel::from_code(&text).ok_or_else(|| {
                CalcError::invalid_input(KEY_LOAD_LEVEL, &text, "Expected Nominal or Strength")
            })?,
            None => LoadLevel::default(),
        };

        let unit_system = match self.get_str(KEY_UNIT_SYSTEM) {
            Some(text) => UnitSystem::from_code(&text).ok_or_else(|| {
                CalcError::invalid_input(KEY_UNIT_SYSTEM, &text, "Expected imperial or metric")
            })?,
            None => UnitSystem::default(),
        };

        let mut warnings = Vec::new();
        let mut input = CombinationInput::new(standard, method, 0.0);
        input.label = self.get_str(KEY_LABEL).unwrap_or_default();
        input.jurisdiction = self.get_str(KEY_JURISDICTION).unwrap_or_default();
        input.input_load_level = input_load_level;
        input.unit_system = unit_system;
        input.dead = self.get_number(KEY_DEAD, &mut warnings);
        input.live = self.get_number(KEY_LIVE, &mut warnings);
        input.roof_live = self.get_number(KEY_ROOF_LIVE, &mut warnings);
        input.rain = self.get_number(KEY_RAIN, &mut warnings);
        input.seismic = self.get_number(KEY_SEISMIC, &mut warnings);

        for scenario in Scenario::ALL {
            let keys = scenario_keys(scenario);
            if !keys.iter().any(|k| self.has(k)) {
                continue;
            }
            let [snow, wind_max, wind_min] = keys;
            input.scenarios.insert(
                scenario,
                ScenarioLoads::new(
                    self.get_number(&snow, &mut warnings),
                    self.get_number(&wind_max, &mut warnings),
                    self.get_number(&wind_min, &mut warnings),
                ),
            );
        }

        Ok((input, warnings))
    }
}

/// Snapshot keys of a scenario: snow, max wind, min wind
pub fn scenario_keys(scenario: Scenario) -> [String; 3] {
    let key = scenario.key();
    [
        format!("{}_snow", key),
        format!("{}_wind_max", key),
        format!("{}_wind_min", key),
    ]
}

/// Snapshot path for a name: `<dir>/<name>-inputs.txt`
pub fn snapshot_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}{}", name, SNAPSHOT_SUFFIX))
}

/// Temporary path used during an atomic save
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `contents` to `path` atomically.
///
/// 1. Write to a temporary file next to the target
/// 2. Sync to disk (fsync)
/// 3. Rename over the target (atomic on most filesystems)
pub fn write_atomic(path: &Path, contents: &str) -> CalcResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(contents.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

fn read_to_string(path: &Path) -> CalcResult<String> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;
    Ok(contents)
}

/// Save a snapshot, stamping `saved_at` with the current UTC time.
pub fn save_snapshot(snapshot: &InputSnapshot, path: &Path) -> CalcResult<()> {
    let mut stamped = snapshot.clone();
    stamped
        .fields
        .insert(KEY_SAVED_AT.to_string(), Value::String(Utc::now().to_rfc3339()));

    let json = serde_json::to_string_pretty(&stamped)?;
    write_atomic(path, &json)
}

/// Load a snapshot file. The file must hold a flat JSON object.
pub fn load_snapshot(path: &Path) -> CalcResult<InputSnapshot> {
    let contents = read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid snapshot in {}: {}", path.display(), e),
    })
}

/// Load a structured JSON input document.
pub fn load_input(path: &Path) -> CalcResult<CombinationInput> {
    let contents = read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// Save a structured JSON input document atomically.
pub fn save_input(input: &CombinationInput, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(input)?;
    write_atomic(path, &json)
}
