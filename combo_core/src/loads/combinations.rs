//! ASCE 7-16 and ASCE 7-22 Load Combinations
//!
//! The four combination tables (edition x design method), encoded verbatim.
//! The 7-22 tables are not a rescaling of the 7-16 ones: case 3 is split in
//! two, and several coefficients change because snow and wind enter the
//! equations at different levels (see [`super::normalize`]).
//!
//! ## Notation
//!
//! `(Lr|S|R)` means the largest of the listed loads, each with its own
//! factor where one is shown, e.g. `(L|0.5W)` is `max(L, 0.5W)`.
//!
//! ## Wind Sign Convention
//!
//! Wind is signed: the scenario evaluator runs every table once with the
//! maximum (pressure) wind and once with the minimum (suction) wind, so the
//! tables carry no separate uplift variants.

use serde::{Deserialize, Serialize};

use super::load_types::LoadType;
use super::normalize::{LoadScope, ScopeVar};
use super::{DesignMethod, Standard};

use ScopeVar::{
    Dead, Live, Rain, RoofLive, Seismic, SnowNominal, SnowStrength, WindNominal, WindStrength,
};

/// One additive term of a combination equation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Term {
    /// `coef * var`
    Load(f64, ScopeVar),
    /// `coef * max(c1 * v1, c2 * v2, ...)`
    Max(f64, &'static [(f64, ScopeVar)]),
}

impl Term {
    /// Evaluate this term against a scope
    pub fn evaluate(&self, scope: &LoadScope) -> f64 {
        match self {
            Term::Load(coef, var) => coef * scope.get(*var),
            Term::Max(coef, items) => {
                coef * max_propagating(items.iter().map(|(c, var)| c * scope.get(*var)))
            }
        }
    }

    /// Variables this term reads
    pub fn vars(&self) -> Vec<ScopeVar> {
        match self {
            Term::Load(_, var) => vec![*var],
            Term::Max(_, items) => items.iter().map(|(_, var)| *var).collect(),
        }
    }

    /// The term with scope values substituted, e.g. `0.5max(0.00, 48.00, 0.00)`
    fn substituted(&self, scope: &LoadScope) -> String {
        match self {
            Term::Load(coef, var) => factored(*coef, scope.get(*var)),
            Term::Max(coef, items) => {
                let inner: Vec<String> = items
                    .iter()
                    .map(|(c, var)| factored(*c, scope.get(*var)))
                    .collect();
                format!("{}max({})", coef_prefix(*coef), inner.join(", "))
            }
        }
    }
}

/// Largest value, propagating NaN instead of skipping it like `f64::max`
fn max_propagating(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::NEG_INFINITY, |acc, x| {
        if acc.is_nan() || x.is_nan() {
            f64::NAN
        } else {
            acc.max(x)
        }
    })
}

fn coef_prefix(coef: f64) -> String {
    if coef == 1.0 {
        String::new()
    } else {
        format!("{}", coef)
    }
}

fn factored(coef: f64, value: f64) -> String {
    if coef == 1.0 {
        format!("{:.2}", value)
    } else {
        format!("{}({:.2})", coef, value)
    }
}

/// A code load combination equation.
///
/// `label` is the canonical display string and embeds the equation number;
/// `id` is that number alone. Evaluation is a pure linear combination with
/// `max` terms and never fails for finite input.
///
/// # Example
/// ```
/// use combo_core::loads::{formula_table, DesignMethod, LoadScope, Standard};
///
/// let combos = formula_table(Standard::Asce7_16, DesignMethod::Asd);
/// let scope = LoadScope { dead: 20.0, roof_live: 20.0, snow_nominal: Some(0.0), wind_strength: Some(0.0), ..Default::default() };
///
/// let case3 = &combos[2];
/// assert_eq!(case3.label, "3. D + (Lr|S|R)");
/// assert_eq!(case3.evaluate(&scope), 40.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoadCombination {
    /// Equation number within its table (e.g. "1", "3a")
    pub id: &'static str,
    /// Equation number and formula sketch (e.g. "2. 1.2D + 1.6L + 0.5(Lr|S|R)")
    pub label: &'static str,
    /// Additive terms
    pub terms: &'static [Term],
}

impl LoadCombination {
    const fn new(id: &'static str, label: &'static str, terms: &'static [Term]) -> Self {
        LoadCombination { id, label, terms }
    }

    /// Total factored load for a scope
    pub fn evaluate(&self, scope: &LoadScope) -> f64 {
        self.terms.iter().map(|t| t.evaluate(scope)).sum()
    }

    /// Every scope variable this combination reads, in term order
    pub fn vars(&self) -> Vec<ScopeVar> {
        self.terms.iter().flat_map(|t| t.vars()).collect()
    }

    /// Whether the combination reads the given load type at any level
    pub fn references(&self, load_type: LoadType) -> bool {
        self.vars().iter().any(|v| v.load_type() == load_type)
    }

    /// True when no snow, wind or seismic load appears, so the value is the
    /// same in every analysis scenario.
    pub fn is_base(&self) -> bool {
        !LoadType::ALL
            .iter()
            .filter(|lt| lt.is_scenario_dependent())
            .any(|lt| self.references(*lt))
    }

    /// The equation with scope values substituted, for reports.
    ///
    /// ```
    /// use combo_core::loads::{ASCE7_16_LRFD, LoadScope};
    ///
    /// let scope = LoadScope { dead: 50.0, ..Default::default() };
    /// assert_eq!(ASCE7_16_LRFD[0].substituted(&scope), "1.4(50.00)");
    /// ```
    pub fn substituted(&self, scope: &LoadScope) -> String {
        self.terms
            .iter()
            .map(|t| t.substituted(scope))
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

/// A combination applied to one scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedCombination {
    /// Equation number (e.g. "5a")
    pub id: String,
    /// Display label (e.g. "5a. D + 0.6W")
    pub label: String,
    /// Factored load
    pub value: f64,
}

impl EvaluatedCombination {
    pub fn new(combo: &LoadCombination, scope: &LoadScope) -> Self {
        EvaluatedCombination {
            id: combo.id.to_string(),
            label: combo.label.to_string(),
            value: combo.evaluate(scope),
        }
    }
}

/// Evaluate every combination of a table against one scope, in table order
pub fn evaluate_all(combinations: &[LoadCombination], scope: &LoadScope) -> Vec<EvaluatedCombination> {
    combinations
        .iter()
        .map(|combo| EvaluatedCombination::new(combo, scope))
        .collect()
}

// ============================================================================
// ASCE 7-16 (S nominal, W strength)
// ============================================================================

const LR_S16_R: &[(f64, ScopeVar)] = &[(1.0, RoofLive), (1.0, SnowNominal), (1.0, Rain)];

/// ASCE 7-16 Section 2.3.1 strength design combinations
pub const ASCE7_16_LRFD: &[LoadCombination] = &[
    LoadCombination::new("1", "1. 1.4D", &[Term::Load(1.4, Dead)]),
    LoadCombination::new(
        "2",
        "2. 1.2D + 1.6L + 0.5(Lr|S|R)",
        &[Term::Load(1.2, Dead), Term::Load(1.6, Live), Term::Max(0.5, LR_S16_R)],
    ),
    LoadCombination::new(
        "3",
        "3. 1.2D + 1.6(Lr|S|R) + (L|0.5W)",
        &[
            Term::Load(1.2, Dead),
            Term::Max(1.6, LR_S16_R),
            Term::Max(1.0, &[(1.0, Live), (0.5, WindStrength)]),
        ],
    ),
    LoadCombination::new(
        "4",
        "4. 1.2D + 1.0W + L + 0.5(Lr|S|R)",
        &[
            Term::Load(1.2, Dead),
            Term::Load(1.0, WindStrength),
            Term::Load(1.0, Live),
            Term::Max(0.5, LR_S16_R),
        ],
    ),
    LoadCombination::new(
        "5",
        "5. 1.2D + 1.0E + L + 0.2S",
        &[
            Term::Load(1.2, Dead),
            Term::Load(1.0, Seismic),
            Term::Load(1.0, Live),
            Term::Load(0.2, SnowNominal),
        ],
    ),
    LoadCombination::new("6", "6. 0.9D + 1.0W", &[Term::Load(0.9, Dead), Term::Load(1.0, WindStrength)]),
    LoadCombination::new("7", "7. 0.9D + 1.0E", &[Term::Load(0.9, Dead), Term::Load(1.0, Seismic)]),
];

/// ASCE 7-16 Section 2.4.1 allowable stress design combinations
pub const ASCE7_16_ASD: &[LoadCombination] = &[
    LoadCombination::new("1", "1. D", &[Term::Load(1.0, Dead)]),
    LoadCombination::new("2", "2. D + L", &[Term::Load(1.0, Dead), Term::Load(1.0, Live)]),
    LoadCombination::new("3", "3. D + (Lr|S|R)", &[Term::Load(1.0, Dead), Term::Max(1.0, LR_S16_R)]),
    LoadCombination::new(
        "4",
        "4. D + 0.75L + 0.75(Lr|S|R)",
        &[Term::Load(1.0, Dead), Term::Load(0.75, Live), Term::Max(0.75, LR_S16_R)],
    ),
    LoadCombination::new("5a", "5a. D + 0.6W", &[Term::Load(1.0, Dead), Term::Load(0.6, WindStrength)]),
    LoadCombination::new("5b", "5b. D + 0.7E", &[Term::Load(1.0, Dead), Term::Load(0.7, Seismic)]),
    LoadCombination::new(
        "6a",
        "6a. D + 0.75L + 0.75(0.6W) + 0.75(Lr|S|R)",
        &[
            Term::Load(1.0, Dead),
            Term::Load(0.75, Live),
            Term::Load(0.45, WindStrength),
            Term::Max(0.75, LR_S16_R),
        ],
    ),
    LoadCombination::new(
        "6b",
        "6b. D + 0.75L + 0.75(0.7E) + 0.75S",
        &[
            Term::Load(1.0, Dead),
            Term::Load(0.75, Live),
            Term::Load(0.525, Seismic),
            Term::Load(0.75, SnowNominal),
        ],
    ),
    LoadCombination::new("7", "7. 0.6D + 0.6W", &[Term::Load(0.6, Dead), Term::Load(0.6, WindStrength)]),
    LoadCombination::new("8", "8. 0.6D + 0.7E", &[Term::Load(0.6, Dead), Term::Load(0.7, Seismic)]),
];

// ============================================================================
// ASCE 7-22 (S strength, W nominal)
// ============================================================================

const LR_S22_R: &[(f64, ScopeVar)] = &[(1.0, RoofLive), (1.0, SnowStrength), (1.0, Rain)];
const LR_07S22_R: &[(f64, ScopeVar)] = &[(1.0, RoofLive), (0.7, SnowStrength), (1.0, Rain)];
const L_08W22: &[(f64, ScopeVar)] = &[(1.0, Live), (0.8, WindNominal)];

/// ASCE 7-22 Section 2.3.1 strength design combinations
pub const ASCE7_22_LRFD: &[LoadCombination] = &[
    LoadCombination::new("1", "1. 1.4D", &[Term::Load(1.4, Dead)]),
    LoadCombination::new(
        "2",
        "2. 1.2D + 1.6L + 0.5(Lr|S|R)",
        &[Term::Load(1.2, Dead), Term::Load(1.6, Live), Term::Max(0.5, LR_S22_R)],
    ),
    LoadCombination::new(
        "3a",
        "3a. 1.2D + 1.6(Lr|R) + (L|0.8W)",
        &[
            Term::Load(1.2, Dead),
            Term::Max(1.6, &[(1.0, RoofLive), (1.0, Rain)]),
            Term::Max(1.0, L_08W22),
        ],
    ),
    LoadCombination::new(
        "3b",
        "3b. 1.2D + 1.0S + (L|0.8W)",
        &[Term::Load(1.2, Dead), Term::Load(1.0, SnowStrength), Term::Max(1.0, L_08W22)],
    ),
    LoadCombination::new(
        "4",
        "4. 1.2D + 1.6W + L + 0.5(Lr|S|R)",
        &[
            Term::Load(1.2, Dead),
            Term::Load(1.6, WindNominal),
            Term::Load(1.0, Live),
            Term::Max(0.5, LR_S22_R),
        ],
    ),
    LoadCombination::new(
        "5",
        "5. 1.2D + 1.0E + L + 1.0S",
        &[
            Term::Load(1.2, Dead),
            Term::Load(1.0, Seismic),
            Term::Load(1.0, Live),
            Term::Load(1.0, SnowStrength),
        ],
    ),
    LoadCombination::new("6", "6. 0.9D + 1.6W", &[Term::Load(0.9, Dead), Term::Load(1.6, WindNominal)]),
    LoadCombination::new("7", "7. 0.9D + 1.0E", &[Term::Load(0.9, Dead), Term::Load(1.0, Seismic)]),
];

/// ASCE 7-22 Section 2.4.1 allowable stress design combinations
pub const ASCE7_22_ASD: &[LoadCombination] = &[
    LoadCombination::new("1", "1. D", &[Term::Load(1.0, Dead)]),
    LoadCombination::new("2", "2. D + L", &[Term::Load(1.0, Dead), Term::Load(1.0, Live)]),
    LoadCombination::new("3", "3. D + (Lr|0.7S|R)", &[Term::Load(1.0, Dead), Term::Max(1.0, LR_07S22_R)]),
    LoadCombination::new(
        "4",
        "4. D + 0.75L + 0.75(Lr|0.7S|R)",
        &[Term::Load(1.0, Dead), Term::Load(0.75, Live), Term::Max(0.75, LR_07S22_R)],
    ),
    LoadCombination::new("5a", "5a. D + W", &[Term::Load(1.0, Dead), Term::Load(1.0, WindNominal)]),
    LoadCombination::new("5b", "5b. D + 0.7E", &[Term::Load(1.0, Dead), Term::Load(0.7, Seismic)]),
    LoadCombination::new(
        "6a",
        "6a. D + 0.75L + 0.75W + 0.75(Lr|0.7S|R)",
        &[
            Term::Load(1.0, Dead),
            Term::Load(0.75, Live),
            Term::Load(0.75, WindNominal),
            Term::Max(0.75, LR_07S22_R),
        ],
    ),
    LoadCombination::new(
        "6b",
        "6b. D + 0.75L + 0.75(0.7E) + 0.75(0.7S)",
        &[
            Term::Load(1.0, Dead),
            Term::Load(0.75, Live),
            Term::Load(0.525, Seismic),
            Term::Load(0.525, SnowStrength),
        ],
    ),
    LoadCombination::new("7", "7. 0.6D + W", &[Term::Load(0.6, Dead), Term::Load(1.0, WindNominal)]),
    LoadCombination::new("8", "8. 0.6D + 0.7E", &[Term::Load(0.6, Dead), Term::Load(0.7, Seismic)]),
];

/// Combination table for an edition and design method
///
/// # Example
/// ```
/// use combo_core::loads::{formula_table, DesignMethod, Standard};
///
/// assert_eq!(formula_table(Standard::Asce7_16, DesignMethod::Lrfd).len(), 7);
/// assert_eq!(formula_table(Standard::Asce7_22, DesignMethod::Lrfd).len(), 8);
/// assert_eq!(formula_table(Standard::Asce7_22, DesignMethod::Asd).len(), 10);
/// ```
pub fn formula_table(standard: Standard, method: DesignMethod) -> &'static [LoadCombination] {
    match (standard, method) {
        (Standard::Asce7_16, DesignMethod::Lrfd) => ASCE7_16_LRFD,
        (Standard::Asce7_16, DesignMethod::Asd) => ASCE7_16_ASD,
        (Standard::Asce7_22, DesignMethod::Lrfd) => ASCE7_22_LRFD,
        (Standard::Asce7_22, DesignMethod::Asd) => ASCE7_22_ASD,
    }
}

/// First item whose value beats every earlier one under `better`.
///
/// Comparisons are strict, so ties keep the earliest item.
fn first_by<'a, T: 'a>(
    items: impl IntoIterator<Item = &'a T>,
    value: impl Fn(&T) -> f64,
    better: impl Fn(f64, f64) -> bool,
) -> Option<&'a T> {
    let mut best: Option<&'a T> = None;
    for item in items {
        match best {
            Some(current) if !better(value(item), value(current)) => {}
            _ => best = Some(item),
        }
    }
    best
}

/// First item with the largest value
pub fn first_max_by<'a, T: 'a>(
    items: impl IntoIterator<Item = &'a T>,
    value: impl Fn(&T) -> f64,
) -> Option<&'a T> {
    first_by(items, value, |a, b| a > b)
}

/// First item with the smallest value
pub fn first_min_by<'a, T: 'a>(
    items: impl IntoIterator<Item = &'a T>,
    value: impl Fn(&T) -> f64,
) -> Option<&'a T> {
    first_by(items, value, |a, b| a < b)
}

/// Find the governing (maximum) evaluated combination.
///
/// Ties keep the earliest entry, so the result follows table order rather
/// than anything numeric. Returns `None` for an empty slice.
pub fn find_governing_combination(results: &[EvaluatedCombination]) -> Option<&EvaluatedCombination> {
    first_max_by(results, |r| r.value)
}

/// Find the minimum evaluated combination (critical for uplift).
///
/// Same first-wins tie rule as [`find_governing_combination`].
pub fn find_minimum_combination(results: &[EvaluatedCombination]) -> Option<&EvaluatedCombination> {
    first_min_by(results, |r| r.value)
}
