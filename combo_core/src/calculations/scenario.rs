//! # Scenario Evaluation
//!
//! A scenario is one analysis context (a wall or roof zone under wind, or a
//! snow distribution) that supplies its own snow load and a pair of wind
//! extremes. Dead, live, roof live, rain and seismic loads are shared by
//! every scenario of a run.
//!
//! Each scenario is evaluated twice, once per wind extreme. When the live
//! load exceeds the pattern threshold, each evaluation is repeated with the
//! live load reduced to 0.75L.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::loads::{
    evaluate_all, formula_table, normalize, AdjustmentNotes, DesignMethod, EvaluatedCombination,
    LoadCombination, LoadLevel, LoadScope, LoadSet, Standard,
};
use crate::units::UnitSystem;

/// Live load factor for pattern live loading
pub const PATTERN_LIVE_FACTOR: f64 = 0.75;

/// The ten analysis scenarios, declared in report order.
///
/// `Ord` follows declaration order, so a `BTreeMap<Scenario, _>` iterates
/// scenarios the same way every run regardless of input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    WindwardWall,
    LeewardWall,
    WindwardRoof,
    LeewardRoof,
    #[serde(rename = "cc_roof")]
    ComponentsRoof,
    #[serde(rename = "cc_wall")]
    ComponentsWall,
    BalancedSnow,
    UnbalancedWindwardSnow,
    UnbalancedLeewardSnow,
    DriftSurcharge,
}

impl Scenario {
    /// All scenarios in report order
    pub const ALL: [Scenario; 10] = [
        Scenario::WindwardWall,
        Scenario::LeewardWall,
        Scenario::WindwardRoof,
        Scenario::LeewardRoof,
        Scenario::ComponentsRoof,
        Scenario::ComponentsWall,
        Scenario::BalancedSnow,
        Scenario::UnbalancedWindwardSnow,
        Scenario::UnbalancedLeewardSnow,
        Scenario::DriftSurcharge,
    ];

    /// Key used in JSON maps and snapshot field names
    pub fn key(&self) -> &'static str {
        match self {
            Scenario::WindwardWall => "windward_wall",
            Scenario::LeewardWall => "leeward_wall",
            Scenario::WindwardRoof => "windward_roof",
            Scenario::LeewardRoof => "leeward_roof",
            Scenario::ComponentsRoof => "cc_roof",
            Scenario::ComponentsWall => "cc_wall",
            Scenario::BalancedSnow => "balanced_snow",
            Scenario::UnbalancedWindwardSnow => "unbalanced_windward_snow",
            Scenario::UnbalancedLeewardSnow => "unbalanced_leeward_snow",
            Scenario::DriftSurcharge => "drift_surcharge",
        }
    }

    /// Report title
    pub fn title(&self) -> &'static str {
        match self {
            Scenario::WindwardWall => "Windward Wall",
            Scenario::LeewardWall => "Leeward Wall",
            Scenario::WindwardRoof => "Windward Roof",
            Scenario::LeewardRoof => "Leeward Roof",
            Scenario::ComponentsRoof => "C&C Roof",
            Scenario::ComponentsWall => "C&C Wall",
            Scenario::BalancedSnow => "Balanced Snow",
            Scenario::UnbalancedWindwardSnow => "Unbalanced Snow (Windward)",
            Scenario::UnbalancedLeewardSnow => "Unbalanced Snow (Leeward)",
            Scenario::DriftSurcharge => "Drift Surcharge",
        }
    }

    pub fn from_key(key: &str) -> Option<Scenario> {
        Scenario::ALL.iter().copied().find(|s| s.key() == key)
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Which wind extreme of a scenario is being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindCase {
    /// Maximum (pressure) wind
    Max,
    /// Minimum (suction) wind
    Min,
}

impl WindCase {
    /// Suffix used in evaluation keys
    pub fn suffix(&self) -> &'static str {
        match self {
            WindCase::Max => "wmax",
            WindCase::Min => "wmin",
        }
    }
}

/// Snow and wind values supplied for one scenario.
///
/// Missing fields default to 0.
///
/// ## JSON Example
///
/// ```json
/// { "snow": 25.0, "wind_max": 14.2, "wind_min": -21.8 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioLoads {
    /// Snow load at the level given by the run's input load level
    pub snow: f64,
    /// Maximum (pressure) wind, signed
    pub wind_max: f64,
    /// Minimum (suction) wind, signed
    pub wind_min: f64,
}

impl ScenarioLoads {
    pub fn new(snow: f64, wind_max: f64, wind_min: f64) -> Self {
        ScenarioLoads { snow, wind_max, wind_min }
    }

    /// Wind for an extreme
    pub fn wind(&self, case: WindCase) -> f64 {
        match case {
            WindCase::Max => self.wind_max,
            WindCase::Min => self.wind_min,
        }
    }
}

/// Settings shared by every evaluation in a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationContext {
    /// Edition after jurisdiction overrides
    pub standard: Standard,
    pub method: DesignMethod,
    pub input_load_level: LoadLevel,
    pub unit_system: UnitSystem,
}

impl EvaluationContext {
    /// Active combination table
    pub fn table(&self) -> &'static [LoadCombination] {
        formula_table(self.standard, self.method)
    }

    /// Whether `live` triggers pattern live loading (strictly greater than
    /// the threshold)
    pub fn pattern_load_required(&self, live: f64) -> bool {
        live > self.unit_system.pattern_load_threshold()
    }
}

/// Table results for one load set, with the pattern-load variant when the
/// live load calls for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSetEvaluation {
    pub results: Vec<EvaluatedCombination>,
    /// Results with L replaced by 0.75L; empty unless `pattern_load_required`
    pub pattern_results: Vec<EvaluatedCombination>,
    pub pattern_load_required: bool,
    pub adjustment_notes: AdjustmentNotes,
    /// Scope the results were evaluated against
    pub scope: LoadScope,
}

/// Normalize a load set and evaluate the active table against it.
pub fn evaluate_load_set(loads: &LoadSet, ctx: &EvaluationContext) -> LoadSetEvaluation {
    let (scope, adjustment_notes) = normalize(loads, ctx.standard, ctx.input_load_level);
    let table = ctx.table();
    let results = evaluate_all(table, &scope);

    let pattern_load_required = ctx.pattern_load_required(scope.live);
    let pattern_results = if pattern_load_required {
        debug!(live = scope.live, "live load exceeds pattern threshold");
        evaluate_all(table, &scope.with_live(PATTERN_LIVE_FACTOR * scope.live))
    } else {
        Vec::new()
    };

    LoadSetEvaluation {
        results,
        pattern_results,
        pattern_load_required,
        adjustment_notes,
        scope,
    }
}

/// Results for one scenario at one wind extreme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioEvaluation {
    /// `<scenario>_wmax` or `<scenario>_wmin`
    pub key: String,
    pub scenario: Scenario,
    pub title: String,
    pub wind_case: WindCase,
    /// Load set as entered (before level conversion)
    pub loads: LoadSet,
    #[serde(flatten)]
    pub evaluation: LoadSetEvaluation,
}

/// Evaluate one scenario at one wind extreme.
///
/// # Example
/// ```
/// use combo_core::calculations::scenario::{
///     evaluate_scenario, EvaluationContext, Scenario, ScenarioLoads, WindCase,
/// };
/// use combo_core::loads::{DesignMethod, LoadLevel, LoadSet, Standard};
/// use combo_core::units::UnitSystem;
///
/// let ctx = EvaluationContext {
///     standard: Standard::Asce7_16,
///     method: DesignMethod::Asd,
///     input_load_level: LoadLevel::Strength,
///     unit_system: UnitSystem::Imperial,
/// };
/// let base = LoadSet::new(15.0, 0.0);
/// let loads = ScenarioLoads::new(0.0, 20.0, -30.0);
///
/// let eval = evaluate_scenario(Scenario::LeewardRoof, WindCase::Min, &base, &loads, &ctx);
/// assert_eq!(eval.key, "leeward_roof_wmin");
/// assert_eq!(eval.loads.wind, -30.0);
/// assert!(!eval.evaluation.pattern_load_required);
/// ```
pub fn evaluate_scenario(
    scenario: Scenario,
    wind_case: WindCase,
    base: &LoadSet,
    scenario_loads: &ScenarioLoads,
    ctx: &EvaluationContext,
) -> ScenarioEvaluation {
    let loads = base
        .with_snow(scenario_loads.snow)
        .with_wind(scenario_loads.wind(wind_case));

    ScenarioEvaluation {
        key: format!("{}_{}", scenario.key(), wind_case.suffix()),
        scenario,
        title: scenario.title().to_string(),
        wind_case,
        loads,
        evaluation: evaluate_load_set(&loads, ctx),
    }
}
