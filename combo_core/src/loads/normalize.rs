//! Load-level normalization
//!
//! ASCE 7-16 writes its combinations with snow at nominal level and wind at
//! strength level; ASCE 7-22 flips both. [`normalize`] converts the entered
//! S and W into whichever level the active edition expects and records a
//! note for every non-trivial conversion.
//!
//! | Edition | Input level | S used            | W used            |
//! |---------|-------------|-------------------|-------------------|
//! | 7-16    | Nominal     | S (nominal)       | W / 0.6 (strength)|
//! | 7-16    | Strength    | S (nominal)       | W (strength)      |
//! | 7-22    | Nominal     | 1.6 S (strength)  | W (nominal)       |
//! | 7-22    | Strength    | S (strength)      | W (nominal)       |

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::load_types::LoadType;
use super::{LoadLevel, LoadSet, Standard};

/// ASD-to-strength wind factor (strength W = nominal W / 0.6)
pub const WIND_NOMINAL_FACTOR: f64 = 0.6;

/// Nominal-to-strength snow factor (strength S = 1.6 nominal S)
pub const SNOW_STRENGTH_FACTOR: f64 = 1.6;

/// A variable a combination formula can read from a [`LoadScope`].
///
/// Snow and wind each come in two flavours; a given edition only ever
/// populates one of each pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeVar {
    Dead,
    Live,
    RoofLive,
    Rain,
    Seismic,
    SnowNominal,
    SnowStrength,
    WindNominal,
    WindStrength,
}

impl ScopeVar {
    /// Underlying load category
    pub fn load_type(&self) -> LoadType {
        match self {
            ScopeVar::Dead => LoadType::Dead,
            ScopeVar::Live => LoadType::Live,
            ScopeVar::RoofLive => LoadType::LiveRoof,
            ScopeVar::Rain => LoadType::Rain,
            ScopeVar::Seismic => LoadType::Seismic,
            ScopeVar::SnowNominal | ScopeVar::SnowStrength => LoadType::Snow,
            ScopeVar::WindNominal | ScopeVar::WindStrength => LoadType::Wind,
        }
    }

    /// Whether `normalize` populates this variable for the given edition
    pub fn populated_for(&self, standard: Standard) -> bool {
        match (self, standard) {
            (ScopeVar::SnowNominal | ScopeVar::WindStrength, Standard::Asce7_16) => true,
            (ScopeVar::SnowStrength | ScopeVar::WindNominal, Standard::Asce7_22) => true,
            (ScopeVar::SnowNominal | ScopeVar::WindStrength, Standard::Asce7_22) => false,
            (ScopeVar::SnowStrength | ScopeVar::WindNominal, Standard::Asce7_16) => false,
            _ => true,
        }
    }
}

/// The values a formula table is evaluated against.
///
/// Produced by [`normalize`]. Only the snow/wind pair matching the edition is
/// `Some`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadScope {
    pub dead: f64,
    pub live: f64,
    pub roof_live: f64,
    pub rain: f64,
    pub seismic: f64,
    pub snow_nominal: Option<f64>,
    pub snow_strength: Option<f64>,
    pub wind_nominal: Option<f64>,
    pub wind_strength: Option<f64>,
}

impl LoadScope {
    /// Value of a variable. An unpopulated snow/wind variant reads as 0; the
    /// formula tables never reference the other edition's pair.
    pub fn get(&self, var: ScopeVar) -> f64 {
        match var {
            ScopeVar::Dead => self.dead,
            ScopeVar::Live => self.live,
            ScopeVar::RoofLive => self.roof_live,
            ScopeVar::Rain => self.rain,
            ScopeVar::Seismic => self.seismic,
            ScopeVar::SnowNominal => self.snow_nominal.unwrap_or(0.0),
            ScopeVar::SnowStrength => self.snow_strength.unwrap_or(0.0),
            ScopeVar::WindNominal => self.wind_nominal.unwrap_or(0.0),
            ScopeVar::WindStrength => self.wind_strength.unwrap_or(0.0),
        }
    }

    /// Copy of this scope with the live load replaced
    pub fn with_live(mut self, live: f64) -> Self {
        self.live = live;
        self
    }
}

/// Record of a single snow or wind level conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentNote {
    /// Load that was converted (Snow or Wind)
    pub load: LoadType,
    /// Entered value, rounded to 2 decimals
    pub original: f64,
    /// Value used in the formulas, rounded to 2 decimals
    pub adjusted: f64,
    /// Human-readable explanation for the report
    pub description: String,
}

/// Conversions applied by one [`normalize`] call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdjustmentNotes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snow: Option<AdjustmentNote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind: Option<AdjustmentNote>,
}

impl AdjustmentNotes {
    pub fn is_empty(&self) -> bool {
        self.snow.is_none() && self.wind.is_none()
    }

    /// Notes in S, W order
    pub fn iter(&self) -> impl Iterator<Item = &AdjustmentNote> {
        self.snow.iter().chain(self.wind.iter())
    }
}

/// Round to 2 decimal places for display
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert a load set into the scope expected by `standard`'s formula tables.
///
/// D, L, Lr, R and E pass through unchanged. A zero snow or wind input never
/// produces a note.
///
/// # Example
/// ```
/// use combo_core::loads::{normalize, LoadLevel, LoadSet, Standard};
///
/// let loads = LoadSet::new(15.0, 0.0).with_wind(10.0);
///
/// let (scope, notes) = normalize(&loads, Standard::Asce7_16, LoadLevel::Nominal);
/// assert!((scope.wind_strength.unwrap() - 16.6667).abs() < 1e-4);
/// assert_eq!(notes.wind.unwrap().adjusted, 16.67);
///
/// let (scope, notes) = normalize(&loads, Standard::Asce7_16, LoadLevel::Strength);
/// assert_eq!(scope.wind_strength, Some(10.0));
/// assert!(notes.is_empty());
/// ```
pub fn normalize(loads: &LoadSet, standard: Standard, input_level: LoadLevel) -> (LoadScope, AdjustmentNotes) {
    let mut scope = LoadScope {
        dead: loads.dead,
        live: loads.live,
        roof_live: loads.roof_live,
        rain: loads.rain,
        seismic: loads.seismic,
        ..Default::default()
    };
    let mut notes = AdjustmentNotes::default();

    match standard {
        Standard::Asce7_16 => {
            scope.snow_nominal = Some(loads.snow);
            let wind = match input_level {
                LoadLevel::Strength => loads.wind,
                LoadLevel::Nominal => loads.wind / WIND_NOMINAL_FACTOR,
            };
            scope.wind_strength = Some(wind);

            if input_level == LoadLevel::Nominal && loads.wind != 0.0 {
                debug!(original = loads.wind, adjusted = wind, "wind converted to strength level");
                notes.wind = Some(AdjustmentNote {
                    load: LoadType::Wind,
                    original: round2(loads.wind),
                    adjusted: round2(wind),
                    description: format!(
                        "{} expects strength-level wind: W = {:.2} / 0.6 = {:.2}",
                        standard,
                        loads.wind,
                        wind
                    ),
                });
            }
        }
        Standard::Asce7_22 => {
            scope.wind_nominal = Some(loads.wind);
            let snow = match input_level {
                LoadLevel::Strength => loads.snow,
                LoadLevel::Nominal => loads.snow * SNOW_STRENGTH_FACTOR,
            };
            scope.snow_strength = Some(snow);

            if input_level == LoadLevel::Nominal && loads.snow != 0.0 {
                debug!(original = loads.snow, adjusted = snow, "snow converted to strength level");
                notes.snow = Some(AdjustmentNote {
                    load: LoadType::Snow,
                    original: round2(loads.snow),
                    adjusted: round2(snow),
                    description: format!(
                        "{} expects strength-level snow: S = 1.6 x {:.2} = {:.2}",
                        standard,
                        loads.snow,
                        snow
                    ),
                });
            }
        }
    }

    (scope, notes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_7_16_nominal_wind_converted() {
        let loads = LoadSet::new(10.0, 0.0).with_wind(10.0).with_snow(25.0);
        let (scope, notes) = normalize(&loads, Standard::Asce7_16, LoadLevel::Nominal);

        assert!((scope.wind_strength.unwrap() - 10.0 / 0.6).abs() < 1e-12);
        assert_eq!(scope.snow_nominal, Some(25.0));
        assert_eq!(scope.snow_strength, None);
        assert_eq!(scope.wind_nominal, None);

        let note = notes.wind.expect("wind note");
        assert_eq!(note.original, 10.0);
        assert_eq!(note.adjusted, 16.67);
        assert!(notes.snow.is_none());
    }

    #[test]
    fn test_7_16_strength_wind_unchanged() {
        let loads = LoadSet::new(10.0, 0.0).with_wind(16.67);
        let (scope, notes) = normalize(&loads, Standard::Asce7_16, LoadLevel::Strength);
        assert_eq!(scope.wind_strength, Some(16.67));
        assert!(notes.is_empty());
    }

    #[test]
    fn test_7_22_nominal_snow_converted() {
        let loads = LoadSet::new(50.0, 40.0).with_snow(30.0).with_wind(20.0);
        let (scope, notes) = normalize(&loads, Standard::Asce7_22, LoadLevel::Nominal);

        assert!((scope.snow_strength.unwrap() - 48.0).abs() < 1e-12);
        assert_eq!(scope.wind_nominal, Some(20.0));
        assert_eq!(scope.snow_nominal, None);
        assert_eq!(scope.wind_strength, None);

        let note = notes.snow.expect("snow note");
        assert_eq!(note.original, 30.0);
        assert_eq!(note.adjusted, 48.0);
        assert!(notes.wind.is_none());
    }

    #[test]
    fn test_7_22_strength_snow_unchanged() {
        let loads = LoadSet::new(50.0, 0.0).with_snow(48.0);
        let (scope, notes) = normalize(&loads, Standard::Asce7_22, LoadLevel::Strength);
        assert_eq!(scope.snow_strength, Some(48.0));
        assert!(notes.is_empty());
    }

    #[test]
    fn test_zero_input_suppresses_note() {
        let loads = LoadSet::new(20.0, 0.0);
        let (_, notes) = normalize(&loads, Standard::Asce7_16, LoadLevel::Nominal);
        assert!(notes.is_empty());
        let (_, notes) = normalize(&loads, Standard::Asce7_22, LoadLevel::Nominal);
        assert!(notes.is_empty());
    }

    #[test]
    fn test_negative_wind_is_converted_with_sign() {
        let loads = LoadSet::new(20.0, 0.0).with_wind(-6.0);
        let (scope, notes) = normalize(&loads, Standard::Asce7_16, LoadLevel::Nominal);
        assert!((scope.wind_strength.unwrap() + 10.0).abs() < 1e-12);
        assert_eq!(notes.wind.unwrap().adjusted, -10.0);
    }

    #[test]
    fn test_base_loads_pass_through() {
        let loads = LoadSet::new(12.0, 40.0)
            .with_roof_live(20.0)
            .with_rain(5.0)
            .with_seismic(8.0);
        for standard in [Standard::Asce7_16, Standard::Asce7_22] {
            let (scope, _) = normalize(&loads, standard, LoadLevel::Nominal);
            assert_eq!(scope.dead, 12.0);
            assert_eq!(scope.live, 40.0);
            assert_eq!(scope.roof_live, 20.0);
            assert_eq!(scope.rain, 5.0);
            assert_eq!(scope.seismic, 8.0);
        }
    }

    #[test]
    fn test_populated_pairs_match_edition() {
        let loads = LoadSet::new(1.0, 1.0).with_snow(1.0).with_wind(1.0);
        for standard in [Standard::Asce7_16, Standard::Asce7_22] {
            let (scope, _) = normalize(&loads, standard, LoadLevel::Nominal);
            let populated = [
                (ScopeVar::SnowNominal, scope.snow_nominal.is_some()),
                (ScopeVar::SnowStrength, scope.snow_strength.is_some()),
                (ScopeVar::WindNominal, scope.wind_nominal.is_some()),
                (ScopeVar::WindStrength, scope.wind_strength.is_some()),
            ];
            for (var, is_some) in populated {
                assert_eq!(var.populated_for(standard), is_some, "{:?} {:?}", standard, var);
            }
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(16.666_666), 16.67);
        assert_eq!(round2(-10.004), -10.0);
    }
}
