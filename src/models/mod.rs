//! Data structures for league progression: tiers, phases, rules, bracket slots, matches.

mod bracket;
mod error;
mod rule;
mod tier;

pub use bracket::{BracketSlot, Match, MatchId, MatchSpec, Round, Side, SlotId, SlotSpec, SlotStatus};
pub use error::{
    BuildError, EngineError, PersistenceError, ResolutionError, StandingsError, ValidationError,
};
pub use rule::{ClassificationRule, ClassifiedTeam, GroupId, RawClassificationRule, TeamId, TierPromotion};
pub use tier::{CategoryEditionId, CupTier, Phase, PhaseId, PhaseKind, PhaseRules, PhaseSpec};
