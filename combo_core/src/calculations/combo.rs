//! # Load Combination Run
//!
//! Evaluates a full ASCE 7 combination matrix: base combinations once, then
//! every supplied scenario at both wind extremes, then the governing
//! envelope.
//!
//! ## Example
//!
//! ```rust
//! use combo_core::calculations::combo::{calculate, CombinationInput};
//! use combo_core::calculations::scenario::{Scenario, ScenarioLoads};
//! use combo_core::loads::{DesignMethod, Standard};
//!
//! let mut input = CombinationInput::new(Standard::Asce7_16, DesignMethod::Asd, 20.0);
//! input.roof_live = 20.0;
//! input.scenarios.insert(Scenario::WindwardRoof, ScenarioLoads::new(0.0, 12.0, -18.0));
//!
//! let report = calculate(&input).unwrap();
//! let governing = report.base_combos.governing.unwrap();
//! assert_eq!(governing.label, "3. D + (Lr|S|R)");
//! assert_eq!(governing.value, 40.0);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::envelope::{governing_envelope, GoverningEnvelope};
use super::scenario::{
    evaluate_load_set, evaluate_scenario, EvaluationContext, Scenario, ScenarioEvaluation,
    ScenarioLoads, WindCase,
};
use crate::errors::{CalcError, CalcResult};
use crate::loads::{
    find_governing_combination, AdjustmentNotes, DesignMethod, EvaluatedCombination, LoadLevel,
    LoadSet, Standard,
};
use crate::units::UnitSystem;

/// Input parameters for a combination run.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Roof framing",
///   "standard": "ASCE 7-22",
///   "jurisdiction": "IBC 2021",
///   "method": "LRFD",
///   "input_load_level": "Nominal (Service/ASD)",
///   "unit_system": "imperial",
///   "dead": 15.0,
///   "live": 0.0,
///   "roof_live": 20.0,
///   "rain": 0.0,
///   "seismic": 0.0,
///   "scenarios": {
///     "windward_roof": { "snow": 30.0, "wind_max": 8.0, "wind_min": -22.0 },
///     "drift_surcharge": { "snow": 55.0 }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationInput {
    /// User label for this run
    #[serde(default)]
    pub label: String,

    /// ASCE 7 edition selected by the user
    pub standard: Standard,

    /// Governing jurisdiction; "NYCBC 2022" forces ASCE 7-16
    #[serde(default)]
    pub jurisdiction: String,

    pub method: DesignMethod,

    /// Level at which snow and wind were entered
    #[serde(default)]
    pub input_load_level: LoadLevel,

    #[serde(default)]
    pub unit_system: UnitSystem,

    /// Dead load D
    pub dead: f64,
    /// Live load L
    #[serde(default)]
    pub live: f64,
    /// Roof live load Lr
    #[serde(default)]
    pub roof_live: f64,
    /// Rain load R
    #[serde(default)]
    pub rain: f64,
    /// Seismic load E
    #[serde(default)]
    pub seismic: f64,

    /// Snow and wind per scenario; iterated in report order
    #[serde(default)]
    pub scenarios: BTreeMap<Scenario, ScenarioLoads>,
}

impl CombinationInput {
    /// Create an input with only a dead load and no scenarios
    pub fn new(standard: Standard, method: DesignMethod, dead: f64) -> Self {
        CombinationInput {
            label: String::new(),
            standard,
            jurisdiction: String::new(),
            method,
            input_load_level: LoadLevel::default(),
            unit_system: UnitSystem::default(),
            dead,
            live: 0.0,
            roof_live: 0.0,
            rain: 0.0,
            seismic: 0.0,
            scenarios: BTreeMap::new(),
        }
    }

    /// Loads shared by every scenario (snow and wind zero)
    pub fn base_loads(&self) -> LoadSet {
        LoadSet::new(self.dead, self.live)
            .with_roof_live(self.roof_live)
            .with_rain(self.rain)
            .with_seismic(self.seismic)
    }

    /// Edition used for the formulas after jurisdiction overrides
    pub fn effective_standard(&self) -> Standard {
        self.standard.effective(&self.jurisdiction)
    }

    /// Check every input and return all problems found.
    ///
    /// An empty list means the run can proceed.
    pub fn validate(&self) -> Vec<CalcError> {
        let mut errors = Vec::new();

        let gravity = [
            ("live", self.live, "Live load"),
            ("roof_live", self.roof_live, "Roof live load"),
            ("rain", self.rain, "Rain load"),
            ("seismic", self.seismic, "Seismic load"),
        ];

        if !self.dead.is_finite() {
            errors.push(not_finite("dead", self.dead));
        } else if self.dead <= 0.0 {
            errors.push(CalcError::invalid_input(
                "dead",
                self.dead.to_string(),
                "Dead load must be positive",
            ));
        }

        for (field, value, name) in gravity {
            if !value.is_finite() {
                errors.push(not_finite(field, value));
            } else if value < 0.0 {
                errors.push(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    format!("{} cannot be negative", name),
                ));
            }
        }

        for (scenario, loads) in &self.scenarios {
            let key = scenario.key();
            if !loads.snow.is_finite() {
                errors.push(not_finite(format!("{}.snow", key), loads.snow));
            } else if loads.snow < 0.0 {
                errors.push(CalcError::invalid_input(
                    format!("{}.snow", key),
                    loads.snow.to_string(),
                    "Snow load cannot be negative",
                ));
            }
            for (name, value) in [("wind_max", loads.wind_max), ("wind_min", loads.wind_min)] {
                if !value.is_finite() {
                    errors.push(not_finite(format!("{}.{}", key, name), value));
                }
            }
        }

        errors
    }

    /// Non-fatal advisories for a valid input
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let units = self.unit_system.pressure_label();

        let effective = self.effective_standard();
        if effective != self.standard {
            warnings.push(format!(
                "{} adopts {}; the {} selection was overridden",
                self.jurisdiction.trim(),
                effective,
                self.standard
            ));
        }

        if self.dead > self.unit_system.heavy_dead_load() {
            warnings.push(format!(
                "Dead load of {:.2} {} is unusually high; check units",
                self.dead, units
            ));
        }

        let threshold = self.unit_system.pattern_load_threshold();
        if self.live > threshold {
            warnings.push(format!(
                "Live load exceeds {} {}; pattern live load (0.75L) combinations are included",
                threshold, units
            ));
        }

        for (scenario, loads) in &self.scenarios {
            if loads.wind_min > loads.wind_max {
                warnings.push(format!(
                    "{}: minimum wind ({:.2}) exceeds maximum wind ({:.2})",
                    scenario.title(),
                    loads.wind_min,
                    loads.wind_max
                ));
            }
        }

        if self.scenarios.is_empty() {
            warnings.push("No scenarios supplied; only base combinations were evaluated".to_string());
        }

        warnings
    }
}

fn not_finite(field: impl Into<String>, value: f64) -> CalcError {
    CalcError::invalid_input(field, value.to_string(), "Value must be a finite number")
}

/// A base combination with its values substituted, for reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalFormula {
    pub label: String,
    /// e.g. "1.2(50.00) + 1.6(40.00) + 0.5max(0.00, 0.00, 0.00)"
    pub expression: String,
    pub value: f64,
}

/// Every combination evaluated once against the base loads (S = W = 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseCombos {
    pub results: Vec<EvaluatedCombination>,
    pub final_formulas: Vec<FinalFormula>,
    pub adjustment_notes: AdjustmentNotes,
    /// Largest base result; ties keep table order
    pub governing: Option<EvaluatedCombination>,
    pub pattern_load_required: bool,
    pub pattern_results: Vec<EvaluatedCombination>,
}

/// Complete output of a combination run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationReport {
    pub label: String,
    /// Edition selected by the user
    pub requested_standard: Standard,
    /// Edition whose formulas were used
    pub standard: Standard,
    pub jurisdiction: String,
    pub method: DesignMethod,
    pub input_load_level: LoadLevel,
    pub unit_system: UnitSystem,
    pub warnings: Vec<String>,
    pub base_combos: BaseCombos,
    /// Two entries per scenario (max wind, then min wind), in report order
    pub scenarios: Vec<ScenarioEvaluation>,
    pub envelope: GoverningEnvelope,
}

impl CombinationReport {
    /// Evaluation for a scenario and wind extreme
    pub fn scenario(&self, scenario: Scenario, wind_case: WindCase) -> Option<&ScenarioEvaluation> {
        self.scenarios
            .iter()
            .find(|e| e.scenario == scenario && e.wind_case == wind_case)
    }
}

/// Run the full combination matrix.
///
/// # Returns
///
/// * `Ok(CombinationReport)` - All results
/// * `Err(CalcError::ValidationFailed)` - One or more inputs were rejected;
///   nothing was evaluated
pub fn calculate(input: &CombinationInput) -> CalcResult<CombinationReport> {
    let errors = input.validate();
    if !errors.is_empty() {
        warn!(count = errors.len(), "combination input rejected");
        return Err(CalcError::validation_failed(&errors));
    }

    let ctx = EvaluationContext {
        standard: input.effective_standard(),
        method: input.method,
        input_load_level: input.input_load_level,
        unit_system: input.unit_system,
    };
    info!(
        standard = %ctx.standard,
        method = %ctx.method,
        scenarios = input.scenarios.len(),
        "evaluating load combinations"
    );

    let base_loads = input.base_loads();
    let table = ctx.table();

    let base_eval = evaluate_load_set(&base_loads, &ctx);
    let final_formulas = table
        .iter()
        .zip(&base_eval.results)
        .map(|(combo, result)| FinalFormula {
            label: combo.label.to_string(),
            expression: combo.substituted(&base_eval.scope),
            value: result.value,
        })
        .collect();
    let base_combos = BaseCombos {
        governing: find_governing_combination(&base_eval.results).cloned(),
        final_formulas,
        results: base_eval.results,
        adjustment_notes: base_eval.adjustment_notes,
        pattern_load_required: base_eval.pattern_load_required,
        pattern_results: base_eval.pattern_results,
    };

    let scenarios: Vec<ScenarioEvaluation> = input
        .scenarios
        .iter()
        .flat_map(|(scenario, loads)| {
            [WindCase::Max, WindCase::Min]
                .into_iter()
                .map(|case| evaluate_scenario(*scenario, case, &base_loads, loads, &ctx))
                .collect::<Vec<_>>()
        })
        .collect();

    let envelope = governing_envelope(&scenarios, table);

    Ok(CombinationReport {
        label: input.label.clone(),
        requested_standard: input.standard,
        standard: ctx.standard,
        jurisdiction: input.jurisdiction.clone(),
        method: input.method,
        input_load_level: input.input_load_level,
        unit_system: input.unit_system,
        warnings: input.warnings(),
        base_combos,
        scenarios,
        envelope,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> CombinationInput {
        let mut input = CombinationInput::new(Standard::Asce7_16, DesignMethod::Asd, 20.0);
        input.roof_live = 20.0;
        input
    }

    #[test]
    fn test_validation_passes() {
        assert!(valid_input().validate().is_empty());
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let mut input = valid_input();
        input.dead = 0.0;
        input.live = -5.0;
        input.rain = f64::NAN;
        input
            .scenarios
            .insert(Scenario::DriftSurcharge, ScenarioLoads::new(-1.0, f64::INFINITY, 0.0));

        let errors = input.validate();
        assert_eq!(errors.len(), 5);
        assert!(errors.iter().all(|e| e.error_code() == "INVALID_INPUT"));

        match calculate(&input) {
            Err(CalcError::ValidationFailed { errors }) => assert_eq!(errors.len(), 5),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_wind_is_valid() {
        let mut input = valid_input();
        input
            .scenarios
            .insert(Scenario::LeewardWall, ScenarioLoads::new(0.0, -5.0, -25.0));
        assert!(input.validate().is_empty());
    }

    #[test]
    fn test_base_combos_7_16_asd() {
        let report = calculate(&valid_input()).unwrap();
        let base = &report.base_combos;

        assert_eq!(base.results[0].label, "1. D");
        assert_eq!(base.results[0].value, 20.0);
        assert_eq!(base.results[2].value, 40.0);

        let governing = base.governing.as_ref().unwrap();
        assert_eq!(governing.id, "3");
        assert_eq!(governing.value, 40.0);

        assert_eq!(base.final_formulas.len(), base.results.len());
        assert_eq!(base.final_formulas[2].expression, "20.00 + max(20.00, 0.00, 0.00)");
        assert!(base.adjustment_notes.is_empty());
    }

    #[test]
    fn test_scenarios_in_report_order() {
        let mut input = valid_input();
        input.scenarios.insert(Scenario::DriftSurcharge, ScenarioLoads::new(40.0, 0.0, 0.0));
        input.scenarios.insert(Scenario::WindwardWall, ScenarioLoads::new(0.0, 10.0, -10.0));

        let report = calculate(&input).unwrap();
        let keys: Vec<&str> = report.scenarios.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "windward_wall_wmax",
                "windward_wall_wmin",
                "drift_surcharge_wmax",
                "drift_surcharge_wmin",
            ]
        );
        assert_eq!(report.envelope.per_scenario.len(), 2);
    }

    #[test]
    fn test_jurisdiction_override_reported() {
        let mut input = valid_input();
        input.standard = Standard::Asce7_22;
        input.jurisdiction = "NYCBC 2022".to_string();

        let report = calculate(&input).unwrap();
        assert_eq!(report.requested_standard, Standard::Asce7_22);
        assert_eq!(report.standard, Standard::Asce7_16);
        assert!(report.warnings.iter().any(|w| w.contains("overridden")));
    }

    #[test]
    fn test_warnings() {
        let mut input = valid_input();
        input.dead = 400.0;
        input.live = 120.0;
        input
            .scenarios
            .insert(Scenario::WindwardWall, ScenarioLoads::new(0.0, -10.0, 5.0));

        let warnings = input.warnings();
        assert!(warnings.iter().any(|w| w.contains("unusually high")));
        assert!(warnings.iter().any(|w| w.contains("pattern live load")));
        assert!(warnings.iter().any(|w| w.contains("Windward Wall")));

        let empty = valid_input().warnings();
        assert_eq!(empty, vec!["No scenarios supplied; only base combinations were evaluated"]);
    }

    #[test]
    fn test_input_json_roundtrip() {
        let json = r#"{
            "standard": "ASCE 7-22",
            "method": "LRFD",
            "dead": 15.0,
            "roof_live": 20.0,
            "scenarios": {
                "drift_surcharge": { "snow": 55.0 },
                "windward_roof": { "snow": 30.0, "wind_max": 8.0, "wind_min": -22.0 }
            }
        }"#;
        let input: CombinationInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.input_load_level, LoadLevel::Nominal);
        assert_eq!(input.unit_system, UnitSystem::Imperial);
        assert_eq!(input.scenarios.len(), 2);
        assert_eq!(
            input.scenarios.keys().next(),
            Some(&Scenario::WindwardRoof)
        );

        let back: CombinationInput = serde_json::from_str(&serde_json::to_string(&input).unwrap()).unwrap();
        assert_eq!(back, input);
    }

    #[test]
    fn test_report_serializes() {
        let mut input = valid_input();
        input.scenarios.insert(Scenario::BalancedSnow, ScenarioLoads::new(30.0, 0.0, 0.0));
        let report = calculate(&input).unwrap();
        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("\"balanced_snow_wmax\""));
        assert!(json.contains("\"overall_max\""));
        assert!(json.contains("\"ASCE 7-16\""));
    }
}
