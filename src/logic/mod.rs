//! Progression logic: classification, bracket building, and the engine that ties them together.

mod bracket;
mod classification;
mod progression;

pub use bracket::{build_bracket, BracketPlan, Pairing};
pub use classification::{classify, resolve_group, resolve_tier, validate_rule, TierAssignment};
pub use progression::{GenerationFailure, GenerationReport, ProgressionEngine, PropagationResult};
