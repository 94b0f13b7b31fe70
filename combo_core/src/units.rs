//! # Unit Types
//!
//! Area-load units for combination inputs. Every load in a run is a pressure
//! in one consistent system; the unit system never changes a load factor.
//! It only selects warning thresholds and the display label.
//!
//! ## Example
//!
//! ```rust
//! use combo_core::units::UnitSystem;
//!
//! assert_eq!(UnitSystem::Imperial.pressure_label(), "psf");
//! assert_eq!(UnitSystem::Metric.pattern_load_threshold(), 4.79);
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Unit System
// ============================================================================

/// Unit system of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Imperial,
    Metric,
}

impl UnitSystem {
    /// Live load above which pattern live loading is checked (strictly greater).
    ///
    /// 100 psf, or its rounded metric equivalent 4.79 kPa.
    pub fn pattern_load_threshold(&self) -> f64 {
        match self {
            UnitSystem::Imperial => 100.0,
            UnitSystem::Metric => 4.79,
        }
    }

    /// Dead load above which a sanity warning is raised
    pub fn heavy_dead_load(&self) -> f64 {
        match self {
            UnitSystem::Imperial => 300.0,
            UnitSystem::Metric => 14.4,
        }
    }

    /// Pressure unit label for reports
    pub fn pressure_label(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "psf",
            UnitSystem::Metric => "kPa",
        }
    }

    /// Identifier used in snapshots and JSON
    pub fn code(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "imperial",
            UnitSystem::Metric => "metric",
        }
    }

    /// Parse a snapshot/CLI identifier (case-insensitive)
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "imperial" | "us" | "psf" => Some(UnitSystem::Imperial),
            "metric" | "si" | "kpa" => Some(UnitSystem::Metric),
            _ => None,
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_values_track_imperial() {
        // 1 kPa = 20.885 psf
        let psf_per_kpa = 20.885_434;
        let threshold = UnitSystem::Imperial.pattern_load_threshold() / psf_per_kpa;
        assert!((threshold - UnitSystem::Metric.pattern_load_threshold()).abs() < 0.01);

        let heavy = UnitSystem::Imperial.heavy_dead_load() / psf_per_kpa;
        assert!((heavy - UnitSystem::Metric.heavy_dead_load()).abs() < 0.05);
    }

    #[test]
    fn test_unit_system_codes() {
        assert_eq!(UnitSystem::from_code("Metric"), Some(UnitSystem::Metric));
        assert_eq!(UnitSystem::from_code(" imperial "), Some(UnitSystem::Imperial));
        assert_eq!(UnitSystem::from_code("furlongs"), None);

        let json = serde_json::to_string(&UnitSystem::Metric).unwrap();
        assert_eq!(json, "\"metric\"");
    }
}
