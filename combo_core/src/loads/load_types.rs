//! Load type definitions per ASCE 7
//!
//! The load categories that take part in the combination tables.

use serde::{Deserialize, Serialize};

/// Load types per ASCE 7 Section 2
///
/// Each load type has the standard abbreviation used in the combination
/// equations.
///
/// # Example
/// ```
/// use combo_core::loads::LoadType;
///
/// let dead = LoadType::Dead;
/// assert_eq!(dead.code(), "D");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadType {
    /// D - Dead load (self-weight of structure and permanent attachments)
    Dead,
    /// L - Live load (floor live load, occupancy)
    Live,
    /// Lr - Roof live load (maintenance, workers)
    LiveRoof,
    /// S - Snow load
    Snow,
    /// R - Rain load
    Rain,
    /// W - Wind load
    Wind,
    /// E - Seismic (earthquake) load
    Seismic,
}

impl LoadType {
    /// All load types in standard order
    pub const ALL: [LoadType; 7] = [
        LoadType::Dead,
        LoadType::Live,
        LoadType::LiveRoof,
        LoadType::Snow,
        LoadType::Rain,
        LoadType::Wind,
        LoadType::Seismic,
    ];

    /// Standard abbreviation code (D, L, Lr, S, R, W, E)
    ///
    /// # Example
    /// ```
    /// use combo_core::loads::LoadType;
    /// assert_eq!(LoadType::LiveRoof.code(), "Lr");
    /// ```
    pub fn code(&self) -> &'static str {
        match self {
            LoadType::Dead => "D",
            LoadType::Live => "L",
            LoadType::LiveRoof => "Lr",
            LoadType::Snow => "S",
            LoadType::Rain => "R",
            LoadType::Wind => "W",
            LoadType::Seismic => "E",
        }
    }

    /// Whether this load varies from one analysis scenario to the next.
    ///
    /// Combinations that reference none of these give the same value in
    /// every scenario and are reported once as base combinations.
    pub fn is_scenario_dependent(&self) -> bool {
        matches!(self, LoadType::Snow | LoadType::Wind | LoadType::Seismic)
    }
}

impl std::fmt::Display for LoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_type_codes() {
        let codes: Vec<&str> = LoadType::ALL.iter().map(|lt| lt.code()).collect();
        assert_eq!(codes, vec!["D", "L", "Lr", "S", "R", "W", "E"]);
    }

    #[test]
    fn test_scenario_dependent_loads() {
        assert!(LoadType::Snow.is_scenario_dependent());
        assert!(LoadType::Wind.is_scenario_dependent());
        assert!(LoadType::Seismic.is_scenario_dependent());
        assert!(!LoadType::Dead.is_scenario_dependent());
        assert!(!LoadType::LiveRoof.is_scenario_dependent());
    }

    #[test]
    fn test_load_type_serialization() {
        let json = serde_json::to_string(&LoadType::LiveRoof).unwrap();
        assert_eq!(json, "\"LiveRoof\"");
        let parsed: LoadType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, LoadType::LiveRoof);
    }
}
