//! # Governing Envelope
//!
//! Scans every scenario-dependent combination value of a run and picks the
//! governing maximum (pressure) and minimum (uplift/suction), per scenario
//! and overall.
//!
//! Candidates are visited in enumeration order: scenarios in report order;
//! within a scenario the max-wind results, max-wind pattern results,
//! min-wind results, then min-wind pattern results; within each group the
//! table order. Ties keep the first candidate visited.
//!
//! Base combinations (no snow, wind or seismic term) are constant across
//! scenarios and are left out; they are reported on their own.

use serde::{Deserialize, Serialize};

use super::scenario::{Scenario, ScenarioEvaluation};
use crate::loads::combinations::{first_max_by, first_min_by};
use crate::loads::{EvaluatedCombination, LoadCombination};

/// Suffix appended to pattern-load combination labels
pub const PATTERN_LABEL_SUFFIX: &str = " [0.75L]";

/// One candidate value: where it came from and what it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoverningValue {
    pub scenario: Scenario,
    /// Scenario title
    pub title: String,
    /// Combination label (with the pattern suffix for pattern results)
    pub combo: String,
    pub value: f64,
}

/// Governing values of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioEnvelope {
    pub scenario: Scenario,
    pub title: String,
    /// Governing maximum (pressure)
    pub max: GoverningValue,
    /// Governing minimum (uplift/suction)
    pub min: GoverningValue,
}

/// Governing values of a whole run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GoverningEnvelope {
    pub per_scenario: Vec<ScenarioEnvelope>,
    pub overall_max: Option<GoverningValue>,
    pub overall_min: Option<GoverningValue>,
}

impl GoverningEnvelope {
    /// Envelope entry for a scenario
    pub fn scenario(&self, scenario: Scenario) -> Option<&ScenarioEnvelope> {
        self.per_scenario.iter().find(|s| s.scenario == scenario)
    }
}

/// Flatten scenario evaluations into envelope candidates, in enumeration
/// order, skipping base combinations of `table`.
pub fn candidates(evaluations: &[ScenarioEvaluation], table: &[LoadCombination]) -> Vec<GoverningValue> {
    let is_base = |result: &EvaluatedCombination| {
        table
            .iter()
            .find(|combo| combo.id == result.id)
            .map(|combo| combo.is_base())
            .unwrap_or(false)
    };

    let mut out = Vec::new();
    for eval in evaluations {
        let groups = [
            (&eval.evaluation.results, ""),
            (&eval.evaluation.pattern_results, PATTERN_LABEL_SUFFIX),
        ];
        for (results, suffix) in groups {
            for result in results.iter().filter(|r| !is_base(r)) {
                out.push(GoverningValue {
                    scenario: eval.scenario,
                    title: eval.title.clone(),
                    combo: format!("{}{}", result.label, suffix),
                    value: result.value,
                });
            }
        }
    }
    out
}

/// Build the governing envelope of a run.
///
/// `evaluations` must be in enumeration order (as produced by
/// [`super::combo::calculate`]); the order decides ties.
pub fn governing_envelope(evaluations: &[ScenarioEvaluation], table: &[LoadCombination]) -> GoverningEnvelope {
    let all = candidates(evaluations, table);

    let mut scenarios: Vec<Scenario> = Vec::new();
    for c in &all {
        if !scenarios.contains(&c.scenario) {
            scenarios.push(c.scenario);
        }
    }

    let per_scenario = scenarios
        .into_iter()
        .filter_map(|scenario| {
            let own = || all.iter().filter(move |c| c.scenario == scenario);
            let max = first_max_by(own(), |c| c.value)?.clone();
            let min = first_min_by(own(), |c| c.value)?.clone();
            Some(ScenarioEnvelope {
                scenario,
                title: scenario.title().to_string(),
                max,
                min,
            })
        })
        .collect();

    GoverningEnvelope {
        per_scenario,
        overall_max: first_max_by(&all, |c| c.value).cloned(),
        overall_min: first_min_by(&all, |c| c.value).cloned(),
    }
}
