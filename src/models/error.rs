//! Error types, one per failure class of the progression engine.

use crate::models::bracket::{MatchId, Round, SlotId};
use crate::models::rule::{GroupId, TeamId};
use crate::models::tier::{CupTier, PhaseId, PhaseKind};
use thiserror::Error;

/// Bad classification-rule configuration. Fix the configuration; never retried.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ValidationError {
    #[error("Position {position} is assigned to both {first} and {second}")]
    OverlappingPositions {
        position: u32,
        first: CupTier,
        second: CupTier,
    },

    #[error("The {tier} cup lists {listed} positions but promotes {declared} teams")]
    CountMismatch {
        tier: CupTier,
        declared: u32,
        listed: usize,
    },

    #[error("Rule promotes {promoted} teams but the group only has {group_size}")]
    CapacityExceeded { promoted: u64, group_size: u32 },

    #[error("Position {position} does not exist in a group of {group_size}")]
    PositionOutOfRange { position: u32, group_size: u32 },

    #[error("Invalid position '{0}'")]
    InvalidPosition(String),
}

/// The standings collaborator could not produce a complete ranking.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum StandingsError {
    #[error("Group {0} not found")]
    GroupNotFound(GroupId),

    #[error("Group {group} still has {remaining} unplayed matches")]
    Incomplete { group: GroupId, remaining: u32 },

    #[error("Standings service unavailable: {0}")]
    Unavailable(String),
}

/// Classification could not be resolved. Retryable once the group's data is complete.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ResolutionError {
    #[error("No classification rule registered for group {0}")]
    GroupNotFound(GroupId),

    #[error("Standings for group {group} unavailable: {source}")]
    StandingsUnavailable {
        group: GroupId,
        #[source]
        source: StandingsError,
    },

    #[error("Group {group} has no team in position {position}")]
    PositionMissing { group: GroupId, position: u32 },

    #[error("Rule of group {group} is invalid: {source}")]
    InvalidRule {
        group: GroupId,
        #[source]
        source: ValidationError,
    },
}

/// The team list handed to the bracket builder is unusable. Caller error.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BuildError {
    #[error("Cannot build a bracket for {0} teams (need 2, 4, 8 or 16)")]
    InvalidTeamCount(usize),

    #[error("Team {0} is seeded more than once")]
    DuplicateTeam(TeamId),

    #[error("The group stage has no bracket")]
    NotACup,

    #[error("Match dates fall outside the calendar")]
    DateOutOfRange,

    #[error("Matches must be at least one day apart (got {0})")]
    InvalidSpacing(i64),
}

/// Infrastructure failure in the persistence collaborator. Safe to retry per item.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum PersistenceError {
    #[error("An active {kind:?} phase already exists for the {tier} tier ({existing})")]
    PhaseAlreadyExists {
        existing: PhaseId,
        kind: PhaseKind,
        tier: CupTier,
    },

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Storage failure: {0}")]
    Storage(String),
}

/// Everything the progression engine can report.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Persistence(PersistenceError),

    #[error("An active {kind:?} phase already exists for the {tier} tier ({existing})")]
    PhaseAlreadyExists {
        existing: PhaseId,
        kind: PhaseKind,
        tier: CupTier,
    },

    #[error("Phase {0} not found")]
    PhaseNotFound(PhaseId),

    #[error("Phase {0} is no longer active")]
    PhaseInactive(PhaseId),

    #[error("Phase {phase} is a {kind:?} phase for the {tier} tier")]
    PhaseMismatch {
        phase: PhaseId,
        kind: PhaseKind,
        tier: CupTier,
    },

    #[error("A {kind:?} phase cannot belong to the {tier} tier")]
    InvalidPhase { kind: PhaseKind, tier: CupTier },

    #[error("Match {0} not found")]
    MatchNotFound(MatchId),

    #[error("Match {0} is not bound to a bracket slot")]
    MatchNotInBracket(MatchId),

    #[error("Slot {0} not found")]
    SlotNotFound(SlotId),

    #[error("Slot {sequence} of the {round} is already taken by other teams ({slot})")]
    SlotOccupied {
        slot: SlotId,
        round: Round,
        sequence: u32,
    },

    #[error("Slot {0} is still waiting for one of its teams")]
    SlotNotReady(SlotId),

    #[error("Team {team} does not play in slot {slot}")]
    WinnerNotInSlot { slot: SlotId, team: TeamId },

    #[error("Slot {slot} was already won by {decided}; refusing to change it to {requested}")]
    ResultConflict {
        slot: SlotId,
        decided: TeamId,
        requested: TeamId,
    },
}

impl From<PersistenceError> for EngineError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::PhaseAlreadyExists {
                existing,
                kind,
                tier,
            } => EngineError::PhaseAlreadyExists {
                existing,
                kind,
                tier,
            },
            other => EngineError::Persistence(other),
        }
    }
}
