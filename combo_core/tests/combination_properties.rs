//! End-to-end checks of the combination engine through its public API.

use std::env::temp_dir;
use std::fs;

use approx::assert_relative_eq;
use proptest::prelude::*;

use combo_core::file_io::{load_snapshot, save_snapshot, snapshot_path, InputSnapshot};
use combo_core::loads::{
    formula_table, normalize, DesignMethod, LoadCombination, LoadLevel, LoadScope, LoadSet,
    LoadType, Standard, Term,
};
use combo_core::units::UnitSystem;
use combo_core::{calculate, CombinationInput, CombinationReport, Scenario, ScenarioLoads, WindCase};

fn run(input: &CombinationInput) -> CombinationReport {
    calculate(input).expect("valid input")
}

fn value(results: &[combo_core::loads::EvaluatedCombination], id: &str) -> f64 {
    results
        .iter()
        .find(|r| r.id == id)
        .map(|r| r.value)
        .unwrap_or_else(|| panic!("combination {} missing", id))
}

#[test]
fn asce7_16_asd_roof_live_governs() {
    let mut input = CombinationInput::new(Standard::Asce7_16, DesignMethod::Asd, 20.0);
    input.roof_live = 20.0;
    let report = run(&input);

    let base = &report.base_combos;
    assert_relative_eq!(value(&base.results, "1"), 20.0);
    assert_relative_eq!(value(&base.results, "3"), 40.0);

    let governing = base.governing.as_ref().unwrap();
    assert_eq!(governing.id, "3");
    assert_relative_eq!(governing.value, 40.0);
}

#[test]
fn asce7_22_lrfd_nominal_snow_is_factored() {
    let mut input = CombinationInput::new(Standard::Asce7_22, DesignMethod::Lrfd, 50.0);
    input.live = 40.0;
    input
        .scenarios
        .insert(Scenario::BalancedSnow, ScenarioLoads::new(30.0, 0.0, 0.0));
    let report = run(&input);

    let eval = report.scenario(Scenario::BalancedSnow, WindCase::Max).unwrap();
    assert_eq!(eval.evaluation.scope.snow_strength, Some(48.0));
    assert_relative_eq!(value(&eval.evaluation.results, "2"), 148.0, epsilon = 1e-9);

    let note = eval.evaluation.adjustment_notes.snow.as_ref().unwrap();
    assert_eq!(note.original, 30.0);
    assert_eq!(note.adjusted, 48.0);
}

#[test]
fn pattern_trigger_is_strict() {
    let mut input = CombinationInput::new(Standard::Asce7_16, DesignMethod::Lrfd, 20.0);

    input.live = 100.0;
    let at = run(&input);
    assert!(!at.base_combos.pattern_load_required);
    assert!(at.base_combos.pattern_results.is_empty());

    input.live = 100.01;
    let above = run(&input);
    assert!(above.base_combos.pattern_load_required);
    assert_relative_eq!(
        value(&above.base_combos.pattern_results, "2"),
        1.2 * 20.0 + 1.6 * 0.75 * 100.01,
        epsilon = 1e-9
    );

    input.unit_system = UnitSystem::Metric;
    input.dead = 1.0;
    input.live = 4.79;
    assert!(!run(&input).base_combos.pattern_load_required);
    input.live = 4.8;
    assert!(run(&input).base_combos.pattern_load_required);
}

#[test]
fn wind_level_round_trip_on_7_16() {
    let nominal = LoadSet::new(15.0, 0.0).with_wind(10.0);
    let (scope, notes) = normalize(&nominal, Standard::Asce7_16, LoadLevel::Nominal);
    let adjusted = notes.wind.unwrap().adjusted;
    assert_eq!(adjusted, 16.67);
    assert_relative_eq!(scope.wind_strength.unwrap(), 10.0 / 0.6);

    let strength = LoadSet::new(15.0, 0.0).with_wind(adjusted);
    let (scope, notes) = normalize(&strength, Standard::Asce7_16, LoadLevel::Strength);
    assert_eq!(scope.wind_strength, Some(16.67));
    assert!(notes.is_empty());
}

#[test]
fn nycbc_forces_asce7_16_table() {
    let mut input = CombinationInput::new(Standard::Asce7_22, DesignMethod::Lrfd, 20.0);
    input.jurisdiction = "NYCBC 2022".to_string();
    input
        .scenarios
        .insert(Scenario::WindwardWall, ScenarioLoads::new(0.0, 10.0, -10.0));
    let report = run(&input);

    assert_eq!(report.standard, Standard::Asce7_16);
    let labels: Vec<&str> = report.base_combos.results.iter().map(|r| r.label.as_str()).collect();
    let expected: Vec<&str> = formula_table(Standard::Asce7_16, DesignMethod::Lrfd)
        .iter()
        .map(|c| c.label)
        .collect();
    assert_eq!(labels, expected);

    // Nominal wind is converted for 7-16
    let eval = report.scenario(Scenario::WindwardWall, WindCase::Max).unwrap();
    assert!(eval.evaluation.adjustment_notes.wind.is_some());
}

#[test]
fn envelope_ties_keep_first_scenario() {
    let mut input = CombinationInput::new(Standard::Asce7_22, DesignMethod::Asd, 10.0);
    let same = ScenarioLoads::new(0.0, 15.0, -15.0);
    input.scenarios.insert(Scenario::LeewardRoof, same);
    input.scenarios.insert(Scenario::WindwardWall, same);

    let first = run(&input);
    let max = first.envelope.overall_max.as_ref().unwrap();
    let min = first.envelope.overall_min.as_ref().unwrap();
    assert_eq!(max.scenario, Scenario::WindwardWall);
    assert_eq!(min.scenario, Scenario::WindwardWall);
    assert_eq!(max.combo, "5a. D + W");
    assert_eq!(min.combo, "7. 0.6D + W");

    for _ in 0..5 {
        assert_eq!(run(&input).envelope, first.envelope);
    }
}

#[test]
fn envelope_never_contains_base_combos() {
    let mut input = CombinationInput::new(Standard::Asce7_16, DesignMethod::Asd, 500.0);
    input.live = 150.0;
    input
        .scenarios
        .insert(Scenario::DriftSurcharge, ScenarioLoads::new(5.0, 1.0, -1.0));
    let report = run(&input);

    let table = formula_table(report.standard, report.method);
    let base_labels: Vec<&str> = table.iter().filter(|c| c.is_base()).map(|c| c.label).collect();
    assert!(!base_labels.is_empty());

    for s in &report.envelope.per_scenario {
        for combo in [&s.max.combo, &s.min.combo] {
            assert!(
                !base_labels.iter().any(|b| combo.starts_with(b)),
                "{} is a base combination",
                combo
            );
        }
    }
}

#[test]
fn scenarios_follow_canonical_order() {
    let json = r#"{
        "standard": "ASCE 7-22",
        "method": "ASD",
        "dead": 12.0,
        "scenarios": {
            "drift_surcharge": { "snow": 40.0 },
            "cc_wall": { "wind_max": 20.0, "wind_min": -30.0 },
            "windward_wall": { "wind_max": 10.0, "wind_min": -5.0 }
        }
    }"#;
    let input: CombinationInput = serde_json::from_str(json).unwrap();
    let report = run(&input);

    let order: Vec<Scenario> = report.envelope.per_scenario.iter().map(|s| s.scenario).collect();
    assert_eq!(
        order,
        vec![Scenario::WindwardWall, Scenario::ComponentsWall, Scenario::DriftSurcharge]
    );
}

#[test]
fn snapshot_file_round_trip() {
    let mut input = CombinationInput::new(Standard::Asce7_16, DesignMethod::Lrfd, 18.5);
    input.label = "Canopy".to_string();
    input.input_load_level = LoadLevel::Strength;
    input.unit_system = UnitSystem::Metric;
    input.seismic = 0.4;
    input
        .scenarios
        .insert(Scenario::UnbalancedLeewardSnow, ScenarioLoads::new(1.2, 0.0, 0.0));

    let path = snapshot_path(&temp_dir(), "combo_it_canopy");
    save_snapshot(&InputSnapshot::from_input(&input), &path).unwrap();
    let (back, warnings) = load_snapshot(&path).unwrap().to_input().unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(back, input);
    assert!(warnings.is_empty());
}

#[test]
fn validation_reports_every_problem() {
    let mut input = CombinationInput::new(Standard::Asce7_22, DesignMethod::Lrfd, -1.0);
    input.live = -2.0;
    input.roof_live = f64::NAN;
    let err = calculate(&input).unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_FAILED");
    assert_eq!(err.messages().len(), 3);
}

fn standard_strategy() -> impl Strategy<Value = Standard> {
    prop_oneof![Just(Standard::Asce7_16), Just(Standard::Asce7_22)]
}

fn method_strategy() -> impl Strategy<Value = DesignMethod> {
    prop_oneof![Just(DesignMethod::Asd), Just(DesignMethod::Lrfd)]
}

fn level_strategy() -> impl Strategy<Value = LoadLevel> {
    prop_oneof![Just(LoadLevel::Nominal), Just(LoadLevel::Strength)]
}

prop_compose! {
    fn input_strategy()(
        standard in standard_strategy(),
        method in method_strategy(),
        level in level_strategy(),
        dead in 0.1f64..400.0,
        live in 0.0f64..200.0,
        roof_live in 0.0f64..40.0,
        rain in 0.0f64..40.0,
        seismic in 0.0f64..60.0,
        snow in 0.0f64..80.0,
        w1 in -80.0f64..80.0,
        w2 in -80.0f64..80.0,
    ) -> CombinationInput {
        let mut input = CombinationInput::new(standard, method, dead);
        input.input_load_level = level;
        input.live = live;
        input.roof_live = roof_live;
        input.rain = rain;
        input.seismic = seismic;
        input
            .scenarios
            .insert(Scenario::WindwardRoof, ScenarioLoads::new(snow, w1.max(w2), w1.min(w2)));
        input
    }
}

/// Change in a combination's value from the wind terms alone, when every
/// wind term is a plain factored load. `None` when wind sits inside a max.
fn wind_share_difference(combo: &LoadCombination, hi: &LoadScope, lo: &LoadScope) -> Option<f64> {
    let mut total = 0.0;
    for term in combo.terms {
        match term {
            Term::Load(coef, var) if var.load_type() == LoadType::Wind => {
                total += coef * (hi.get(*var) - lo.get(*var));
            }
            Term::Load(..) => {}
            Term::Max(_, items) => {
                if items.iter().any(|(_, var)| var.load_type() == LoadType::Wind) {
                    return None;
                }
            }
        }
    }
    Some(total)
}

#[test]
fn wind_share_matches_normalized_wind() {
    // 7-16 LRFD, nominal wind 18 / -12 becomes 30 / -20 at strength level
    let mut input = CombinationInput::new(Standard::Asce7_16, DesignMethod::Lrfd, 20.0);
    input
        .scenarios
        .insert(Scenario::WindwardWall, ScenarioLoads::new(0.0, 18.0, -12.0));
    let report = run(&input);
    let max = report.scenario(Scenario::WindwardWall, WindCase::Max).unwrap();
    let min = report.scenario(Scenario::WindwardWall, WindCase::Min).unwrap();

    let diff = value(&max.evaluation.results, "4") - value(&min.evaluation.results, "4");
    assert_relative_eq!(diff, (18.0 + 12.0) / 0.6, epsilon = 1e-9);

    let case4 = &formula_table(Standard::Asce7_16, DesignMethod::Lrfd)[3];
    let share = wind_share_difference(case4, &max.evaluation.scope, &min.evaluation.scope).unwrap();
    assert_relative_eq!(share, 50.0, epsilon = 1e-9);
}

proptest! {
    #[test]
    fn evaluation_is_deterministic(input in input_strategy()) {
        let a = serde_json::to_string(&run(&input)).unwrap();
        let b = serde_json::to_string(&run(&input)).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn wind_extremes_differ_only_by_wind(input in input_strategy()) {
        let report = run(&input);
        let max = report.scenario(Scenario::WindwardRoof, WindCase::Max).unwrap();
        let min = report.scenario(Scenario::WindwardRoof, WindCase::Min).unwrap();
        let table = formula_table(report.standard, report.method);

        for ((combo, hi), lo) in table.iter().zip(&max.evaluation.results).zip(&min.evaluation.results) {
            if combo.references(LoadType::Wind) {
                // Every wind coefficient is positive
                prop_assert!(hi.value >= lo.value, "{}: {} < {}", combo.label, hi.value, lo.value);

                if let Some(share) = wind_share_difference(combo, &max.evaluation.scope, &min.evaluation.scope) {
                    let diff = hi.value - lo.value;
                    let tolerance = 1e-9 * (1.0 + hi.value.abs() + lo.value.abs());
                    prop_assert!(
                        (diff - share).abs() <= tolerance,
                        "{}: difference {} but wind share {}",
                        combo.label,
                        diff,
                        share
                    );
                }
            } else {
                prop_assert_eq!(hi.value.to_bits(), lo.value.to_bits(), "{}", combo.label);
            }
        }
    }
}
