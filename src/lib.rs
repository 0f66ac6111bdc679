//! League progression: group classification into gold/silver/bronze cups and knockout brackets.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::EngineConfig;
pub use logic::{
    build_bracket, classify, resolve_group, resolve_tier, validate_rule, BracketPlan,
    GenerationFailure, GenerationReport, Pairing, ProgressionEngine, PropagationResult,
    TierAssignment,
};
pub use models::{
    BracketSlot, BuildError, CategoryEditionId, ClassificationRule, ClassifiedTeam, CupTier,
    EngineError, GroupId, Match, MatchId, MatchSpec, PersistenceError, Phase, PhaseId, PhaseKind,
    PhaseRules, PhaseSpec, RawClassificationRule, ResolutionError, Round, Side, SlotId, SlotSpec,
    SlotStatus, StandingsError, TeamId, TierPromotion, ValidationError,
};
pub use store::{MemoryStore, Persistence, Standing, StandingsProvider};
