//! Collaborator interfaces consumed by the engine: standings and persistence.
//!
//! Both are async traits so any backend (remote API, database, in-memory) can sit
//! behind the engine. [`MemoryStore`] implements both for the driver and tests.

mod memory;

pub use memory::MemoryStore;

use crate::models::{
    BracketSlot, CategoryEditionId, CupTier, GroupId, Match, MatchId, MatchSpec, PersistenceError,
    Phase, PhaseId, PhaseKind, PhaseSpec, Round, SlotId, SlotSpec, StandingsError, TeamId,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// One row of a group's final table.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub team: TeamId,
    /// 1 = best.
    pub position: u32,
    pub points: i32,
}

/// Source of group standings.
#[async_trait]
pub trait StandingsProvider: Send + Sync {
    /// Final table of `group`, ordered by position ascending.
    ///
    /// Must fail rather than return a partial table while group matches remain unplayed.
    async fn get_standings(&self, group: GroupId) -> Result<Vec<Standing>, StandingsError>;
}

/// Storage for phases, bracket slots and matches.
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Active phase occupying the (category-edition, kind, tier) key, if any.
    async fn find_active_phase(
        &self,
        category_edition: CategoryEditionId,
        kind: PhaseKind,
        tier: CupTier,
    ) -> PersistenceResult<Option<Phase>>;

    async fn get_phase(&self, id: PhaseId) -> PersistenceResult<Option<Phase>>;

    /// Fails with `PhaseAlreadyExists` if the key is taken.
    async fn create_phase(&self, spec: PhaseSpec) -> PersistenceResult<Phase>;

    async fn create_bracket_slot(&self, spec: SlotSpec) -> PersistenceResult<BracketSlot>;

    /// Store the teams and winner of an existing slot.
    async fn update_bracket_slot(&self, slot: &BracketSlot) -> PersistenceResult<()>;

    async fn find_slot(
        &self,
        phase: PhaseId,
        round: Round,
        sequence: u32,
    ) -> PersistenceResult<Option<BracketSlot>>;

    async fn get_slot(&self, id: SlotId) -> PersistenceResult<Option<BracketSlot>>;

    /// Every slot of a phase, ordered by round then sequence.
    async fn list_slots(&self, phase: PhaseId) -> PersistenceResult<Vec<BracketSlot>>;

    async fn create_match(&self, spec: MatchSpec) -> PersistenceResult<Match>;

    async fn get_match(&self, id: MatchId) -> PersistenceResult<Option<Match>>;

    async fn match_for_slot(&self, slot: SlotId) -> PersistenceResult<Option<Match>>;

    async fn record_match_result(&self, match_id: MatchId, winner: TeamId) -> PersistenceResult<()>;
}
