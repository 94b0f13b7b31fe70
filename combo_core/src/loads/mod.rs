//! Load sets, code editions and load combinations per ASCE 7-16 / 7-22
//!
//! This module provides the types and functions that turn raw area loads
//! into factored combination values.
//!
//! # Overview
//!
//! - [`LoadType`] - The ASCE 7 load categories (D, L, Lr, S, R, W, E)
//! - [`LoadSet`] - One value per load type for a single evaluation
//! - [`Standard`] - ASCE 7-16 or ASCE 7-22, each with its own load-level convention
//! - [`LoadLevel`] - Whether S and W were entered at nominal or strength level
//! - [`normalize`] - Converts a LoadSet into the [`LoadScope`] a formula table expects
//! - [`LoadCombination`] - One code combination equation
//!
//! # Example
//!
//! ```
//! use combo_core::loads::{formula_table, normalize, DesignMethod, LoadLevel, LoadSet, Standard};
//!
//! let loads = LoadSet::new(50.0, 40.0).with_snow(30.0);
//! let (scope, notes) = normalize(&loads, Standard::Asce7_22, LoadLevel::Nominal);
//! assert_eq!(scope.snow_strength, Some(48.0));
//! assert!(notes.snow.is_some());
//!
//! let combos = formula_table(Standard::Asce7_22, DesignMethod::Lrfd);
//! let case2 = combos.iter().find(|c| c.id == "2").unwrap();
//! assert!((case2.evaluate(&scope) - 148.0).abs() < 1e-9);
//! ```

pub mod load_types;
pub mod normalize;
pub mod combinations;

pub use load_types::LoadType;
pub use normalize::{normalize, AdjustmentNote, AdjustmentNotes, LoadScope, ScopeVar};
pub use combinations::{
    evaluate_all,
    find_governing_combination,
    find_minimum_combination,
    formula_table,
    EvaluatedCombination,
    LoadCombination,
    Term,
    ASCE7_16_ASD,
    ASCE7_16_LRFD,
    ASCE7_22_ASD,
    ASCE7_22_LRFD,
};

use serde::{Deserialize, Serialize};

/// Jurisdiction whose building code adopts ASCE 7-16 regardless of the
/// edition selected for the run.
pub const NYCBC_2022: &str = "NYCBC 2022";

/// Design methodology selection
///
/// Structural design can use either Allowable Stress Design (ASD) or
/// Load and Resistance Factor Design (LRFD). The choice selects the
/// combination sub-table within a [`Standard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DesignMethod {
    /// Allowable Stress Design - uses service loads with safety factors on capacity
    #[serde(rename = "ASD", alias = "Asd", alias = "asd")]
    #[default]
    Asd,
    /// Load and Resistance Factor Design - uses factored loads with phi factors on capacity
    #[serde(rename = "LRFD", alias = "Lrfd", alias = "lrfd")]
    Lrfd,
}

impl DesignMethod {
    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            DesignMethod::Asd => "ASD (Allowable Stress Design)",
            DesignMethod::Lrfd => "LRFD (Load and Resistance Factor Design)",
        }
    }

    /// Short abbreviation
    pub fn code(&self) -> &'static str {
        match self {
            DesignMethod::Asd => "ASD",
            DesignMethod::Lrfd => "LRFD",
        }
    }

    /// Parse a snapshot/CLI identifier (case-insensitive)
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASD" => Some(DesignMethod::Asd),
            "LRFD" => Some(DesignMethod::Lrfd),
            _ => None,
        }
    }
}

impl std::fmt::Display for DesignMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// ASCE 7 edition used for the combination tables.
///
/// The editions disagree on the level at which snow and wind enter the
/// equations:
///
/// | Edition | Snow     | Wind     |
/// |---------|----------|----------|
/// | 7-16    | nominal  | strength |
/// | 7-22    | strength | nominal  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Standard {
    #[serde(rename = "ASCE 7-16", alias = "ASCE7-16")]
    Asce7_16,
    #[serde(rename = "ASCE 7-22", alias = "ASCE7-22")]
    #[default]
    Asce7_22,
}

impl Standard {
    /// Display name, also the serialized form
    pub fn code(&self) -> &'static str {
        match self {
            Standard::Asce7_16 => "ASCE 7-16",
            Standard::Asce7_22 => "ASCE 7-22",
        }
    }

    /// Parse a snapshot/CLI identifier ("ASCE 7-16", "ASCE7-22", "7-16", ...)
    pub fn from_code(s: &str) -> Option<Self> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        match compact.trim_start_matches("ASCE") {
            "7-16" | "716" => Some(Standard::Asce7_16),
            "7-22" | "722" => Some(Standard::Asce7_22),
            _ => None,
        }
    }

    /// Edition actually used for a run, after jurisdiction overrides.
    ///
    /// # Example
    /// ```
    /// use combo_core::loads::Standard;
    ///
    /// assert_eq!(Standard::Asce7_22.effective("NYCBC 2022"), Standard::Asce7_16);
    /// assert_eq!(Standard::Asce7_22.effective("IBC 2021"), Standard::Asce7_22);
    /// ```
    pub fn effective(self, jurisdiction: &str) -> Standard {
        if jurisdiction.trim().eq_ignore_ascii_case(NYCBC_2022) {
            Standard::Asce7_16
        } else {
            self
        }
    }
}

impl std::fmt::Display for Standard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Level at which the snow and wind inputs were entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoadLevel {
    /// Service-level values, as used directly in ASD
    #[serde(rename = "Nominal (Service/ASD)", alias = "Nominal", alias = "nominal")]
    #[default]
    Nominal,
    /// Values already at strength level
    #[serde(rename = "Strength (LRFD)", alias = "Strength", alias = "strength")]
    Strength,
}

impl LoadLevel {
    pub fn code(&self) -> &'static str {
        match self {
            LoadLevel::Nominal => "Nominal (Service/ASD)",
            LoadLevel::Strength => "Strength (LRFD)",
        }
    }

    /// Parse a snapshot/CLI identifier; anything starting with "nominal" or
    /// "strength" is accepted.
    pub fn from_code(s: &str) -> Option<Self> {
        let lower = s.trim().to_ascii_lowercase();
        if lower.starts_with("nominal") || lower.starts_with("service") {
            Some(LoadLevel::Nominal)
        } else if lower.starts_with("strength") {
            Some(LoadLevel::Strength)
        } else {
            None
        }
    }
}

impl std::fmt::Display for LoadLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One value per load type for a single evaluation.
///
/// Values are area loads (psf or kPa) in one consistent unit system. Wind is
/// signed; the rest are magnitudes.
///
/// # Example
/// ```
/// use combo_core::loads::LoadSet;
///
/// let set = LoadSet::new(20.0, 50.0).with_wind(-12.0);
///
/// assert_eq!(set.dead, 20.0);
/// assert_eq!(set.wind, -12.0);
/// assert_eq!(set.snow, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadSet {
    pub dead: f64,
    pub live: f64,
    pub roof_live: f64,
    pub rain: f64,
    pub snow: f64,
    pub wind: f64,
    pub seismic: f64,
}

impl LoadSet {
    /// Create a load set with dead and live load; everything else zero
    pub fn new(dead: f64, live: f64) -> Self {
        LoadSet {
            dead,
            live,
            ..Default::default()
        }
    }

    pub fn with_roof_live(mut self, value: f64) -> Self {
        self.roof_live = value;
        self
    }

    pub fn with_rain(mut self, value: f64) -> Self {
        self.rain = value;
        self
    }

    pub fn with_snow(mut self, value: f64) -> Self {
        self.snow = value;
        self
    }

    pub fn with_wind(mut self, value: f64) -> Self {
        self.wind = value;
        self
    }

    pub fn with_seismic(mut self, value: f64) -> Self {
        self.seismic = value;
        self
    }
}
