//! # Combination Calculations
//!
//! Every calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Report` / `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input) -> Result<*Report, CalcError>` - Pure calculation function
//!
//! ## Modules
//!
//! - [`combo`] - Full run: base combinations, scenarios and envelope
//! - [`scenario`] - The ten analysis scenarios and their evaluation
//! - [`envelope`] - Governing maximum/minimum selection

pub mod combo;
pub mod envelope;
pub mod scenario;

pub use combo::{calculate, BaseCombos, CombinationInput, CombinationReport, FinalFormula};
pub use envelope::{GoverningEnvelope, GoverningValue, ScenarioEnvelope};
pub use scenario::{Scenario, ScenarioEvaluation, ScenarioLoads, WindCase};
