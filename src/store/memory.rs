//! In-memory standings and persistence, with injectable failures.

use super::{Persistence, PersistenceResult, Standing, StandingsProvider};
use crate::models::{
    BracketSlot, CategoryEditionId, CupTier, GroupId, Match, MatchId, MatchSpec, PersistenceError,
    Phase, PhaseId, PhaseKind, PhaseSpec, Round, SlotId, SlotSpec, StandingsError, TeamId,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    phases: HashMap<PhaseId, Phase>,
    slots: HashMap<SlotId, BracketSlot>,
    matches: HashMap<MatchId, Match>,
    standings: HashMap<GroupId, Result<Vec<Standing>, StandingsError>>,
    /// 1-based `create_bracket_slot` calls that fail.
    slot_failures: HashSet<usize>,
    slot_calls: usize,
    /// 1-based `create_match` calls that fail.
    match_failures: HashSet<usize>,
    match_calls: usize,
    writes: usize,
}

/// Thread-safe in-memory store. Locks are held only for the duration of one call.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> PersistenceResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| PersistenceError::Storage("lock error".to_string()))
    }

    /// Publish the final table of a group.
    pub fn set_standings(&self, group: GroupId, standings: Vec<Standing>) {
        if let Ok(mut g) = self.inner.lock() {
            g.standings.insert(group, Ok(standings));
        }
    }

    /// Mark a group as still having unplayed matches.
    pub fn set_standings_incomplete(&self, group: GroupId, remaining: u32) {
        if let Ok(mut g) = self.inner.lock() {
            g.standings
                .insert(group, Err(StandingsError::Incomplete { group, remaining }));
        }
    }

    /// Make the `n`th call (1-based) to `create_bracket_slot` fail.
    pub fn fail_slot_creation_on(&self, n: usize) {
        if let Ok(mut g) = self.inner.lock() {
            g.slot_failures.insert(n);
        }
    }

    /// Make the `n`th call (1-based) to `create_match` fail.
    pub fn fail_match_creation_on(&self, n: usize) {
        if let Ok(mut g) = self.inner.lock() {
            g.match_failures.insert(n);
        }
    }

    /// Close a phase, freeing its key for a new active phase.
    pub fn deactivate_phase(&self, id: PhaseId) {
        if let Ok(mut g) = self.inner.lock() {
            if let Some(phase) = g.phases.get_mut(&id) {
                phase.active = false;
            }
        }
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.inner.lock().map(|g| g.writes).unwrap_or_default()
    }

    pub fn slot_count(&self) -> usize {
        self.inner.lock().map(|g| g.slots.len()).unwrap_or_default()
    }

    pub fn matches(&self) -> Vec<Match> {
        let mut matches: Vec<Match> = self
            .inner
            .lock()
            .map(|g| g.matches.values().cloned().collect())
            .unwrap_or_default();
        matches.sort_by_key(|m| m.date);
        matches
    }
}

#[async_trait]
impl StandingsProvider for MemoryStore {
    async fn get_standings(&self, group: GroupId) -> Result<Vec<Standing>, StandingsError> {
        let g = self
            .inner
            .lock()
            .map_err(|_| StandingsError::Unavailable("lock error".to_string()))?;
        let mut standings = g
            .standings
            .get(&group)
            .cloned()
            .unwrap_or(Err(StandingsError::GroupNotFound(group)))?;
        standings.sort_by_key(|s| s.position);
        Ok(standings)
    }
}

#[async_trait]
impl Persistence for MemoryStore {
    async fn find_active_phase(
        &self,
        category_edition: CategoryEditionId,
        kind: PhaseKind,
        tier: CupTier,
    ) -> PersistenceResult<Option<Phase>> {
        let g = self.lock()?;
        Ok(g.phases
            .values()
            .find(|p| {
                p.active && p.category_edition == category_edition && p.kind == kind && p.tier == tier
            })
            .cloned())
    }

    async fn get_phase(&self, id: PhaseId) -> PersistenceResult<Option<Phase>> {
        Ok(self.lock()?.phases.get(&id).cloned())
    }

    async fn create_phase(&self, spec: PhaseSpec) -> PersistenceResult<Phase> {
        let mut g = self.lock()?;
        if let Some(existing) = g.phases.values().find(|p| p.conflicts_with(&spec)) {
            return Err(PersistenceError::PhaseAlreadyExists {
                existing: existing.id,
                kind: spec.kind,
                tier: spec.tier,
            });
        }
        let phase = Phase::from_spec(spec);
        g.phases.insert(phase.id, phase.clone());
        g.writes += 1;
        Ok(phase)
    }

    async fn create_bracket_slot(&self, spec: SlotSpec) -> PersistenceResult<BracketSlot> {
        let mut g = self.lock()?;
        g.slot_calls += 1;
        if g.slot_failures.contains(&g.slot_calls) {
            return Err(PersistenceError::Storage(format!(
                "injected failure on slot {} of {}",
                spec.sequence, spec.round
            )));
        }
        let slot = BracketSlot::from_spec(spec);
        g.slots.insert(slot.id, slot.clone());
        g.writes += 1;
        Ok(slot)
    }

    async fn update_bracket_slot(&self, slot: &BracketSlot) -> PersistenceResult<()> {
        let mut g = self.lock()?;
        let stored = g
            .slots
            .get_mut(&slot.id)
            .ok_or_else(|| PersistenceError::NotFound(format!("slot {}", slot.id)))?;
        *stored = slot.clone();
        g.writes += 1;
        Ok(())
    }

    async fn find_slot(
        &self,
        phase: PhaseId,
        round: Round,
        sequence: u32,
    ) -> PersistenceResult<Option<BracketSlot>> {
        let g = self.lock()?;
        Ok(g.slots
            .values()
            .find(|s| s.phase == phase && s.round == round && s.sequence == sequence)
            .cloned())
    }

    async fn get_slot(&self, id: SlotId) -> PersistenceResult<Option<BracketSlot>> {
        Ok(self.lock()?.slots.get(&id).cloned())
    }

    async fn list_slots(&self, phase: PhaseId) -> PersistenceResult<Vec<BracketSlot>> {
        let g = self.lock()?;
        let mut slots: Vec<BracketSlot> = g
            .slots
            .values()
            .filter(|s| s.phase == phase)
            .cloned()
            .collect();
        slots.sort_by_key(|s| (s.round, s.sequence));
        Ok(slots)
    }

    async fn create_match(&self, spec: MatchSpec) -> PersistenceResult<Match> {
        let mut g = self.lock()?;
        g.match_calls += 1;
        if g.match_failures.contains(&g.match_calls) {
            return Err(PersistenceError::Storage("injected failure on match".to_string()));
        }
        let m = Match::from_spec(spec);
        g.matches.insert(m.id, m.clone());
        g.writes += 1;
        Ok(m)
    }

    async fn get_match(&self, id: MatchId) -> PersistenceResult<Option<Match>> {
        Ok(self.lock()?.matches.get(&id).cloned())
    }

    async fn match_for_slot(&self, slot: SlotId) -> PersistenceResult<Option<Match>> {
        let g = self.lock()?;
        Ok(g.matches.values().find(|m| m.slot == Some(slot)).cloned())
    }

    async fn record_match_result(&self, match_id: MatchId, winner: TeamId) -> PersistenceResult<()> {
        let mut g = self.lock()?;
        let m = g
            .matches
            .get_mut(&match_id)
            .ok_or_else(|| PersistenceError::NotFound(format!("match {match_id}")))?;
        m.winner = Some(winner);
        g.writes += 1;
        Ok(())
    }
}
