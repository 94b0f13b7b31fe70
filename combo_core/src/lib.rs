//! # combo_core - ASCE 7 Load Combination Engine
//!
//! `combo_core` evaluates the ASCE 7-16 and ASCE 7-22 load combination
//! tables (LRFD and ASD) for area loads, across the wall, roof and snow
//! scenarios of a building, and reports the governing envelope. All inputs
//! and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Deterministic**: Fixed table and scenario order; ties keep the first entry
//!
//! ## Quick Start
//!
//! ```rust
//! use combo_core::{calculate, CombinationInput, Scenario, ScenarioLoads};
//! use combo_core::loads::{DesignMethod, Standard};
//!
//! let mut input = CombinationInput::new(Standard::Asce7_22, DesignMethod::Lrfd, 15.0);
//! input.roof_live = 20.0;
//! input.scenarios.insert(Scenario::WindwardRoof, ScenarioLoads::new(30.0, 8.0, -22.0));
//!
//! let report = calculate(&input).unwrap();
//! let json = serde_json::to_string_pretty(&report).unwrap();
//! assert!(json.contains("windward_roof_wmax"));
//! ```
//!
//! ## Modules
//!
//! - [`loads`] - Load types, editions, level normalization and formula tables
//! - [`calculations`] - Scenario evaluation, envelope and the full run
//! - [`report`] - Text, Markdown and JSON rendering
//! - [`units`] - Unit systems and pressure conversions
//! - [`errors`] - Structured error types
//! - [`file_io`] - Input files and snapshots with atomic saves

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod loads;
pub mod report;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{
    calculate, CombinationInput, CombinationReport, GoverningEnvelope, Scenario, ScenarioLoads,
    WindCase,
};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_input, load_snapshot, save_snapshot, InputSnapshot};
pub use report::{render, ReportFormat};
