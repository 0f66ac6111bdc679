//! Knockout progression: phase lifecycle, round generation and winner propagation.

use crate::config::EngineConfig;
use crate::logic::bracket::{build_bracket, BracketPlan, Pairing};
use crate::logic::classification::{resolve_group, resolve_tier, validate_rule, TierAssignment};
use crate::models::{
    BracketSlot, BuildError, ClassificationRule, CupTier, EngineError, GroupId, Match, MatchId,
    MatchSpec, Phase, PhaseId, PhaseKind, PhaseSpec, ResolutionError, Round, Side, SlotId,
    SlotSpec, SlotStatus, TeamId, ValidationError,
};
use crate::store::{Persistence, StandingsProvider};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// A pairing of a generated round that could not be persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationFailure {
    pub sequence: u32,
    pub error: EngineError,
}

/// Outcome of persisting one generated round, pairing by pairing.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationReport {
    pub round: Round,
    pub requested: usize,
    pub created: usize,
    pub failures: Vec<GenerationFailure>,
}

impl GenerationReport {
    pub fn is_complete(&self) -> bool {
        self.created == self.requested
    }
}

impl std::fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "created {} of {} brackets", self.created, self.requested)
    }
}

/// What registering one match result changed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PropagationResult {
    pub slot: SlotId,
    pub winner: TeamId,
    /// False when the same winner had already been recorded.
    pub changed: bool,
    /// Slot of the next round the winner moved into; `None` after the final.
    pub parent: Option<SlotId>,
    /// Both teams of the parent slot are now known.
    pub parent_ready: bool,
    /// Set when the decided slot was the final.
    pub champion: Option<TeamId>,
}

/// Orchestrates classification, bracket generation and result propagation.
///
/// Work for one tier's bracket must be issued sequentially by the caller
/// (round `r + 1` needs every winner of round `r`). Different tiers share no
/// state and may be driven concurrently through the same engine.
pub struct ProgressionEngine<S: ?Sized, P: ?Sized> {
    standings: Arc<S>,
    persistence: Arc<P>,
    config: EngineConfig,
    rules: HashMap<GroupId, ClassificationRule>,
}

impl<S, P> ProgressionEngine<S, P>
where
    S: StandingsProvider + ?Sized,
    P: Persistence + ?Sized,
{
    pub fn new(standings: Arc<S>, persistence: Arc<P>, config: EngineConfig) -> Self {
        Self {
            standings,
            persistence,
            config,
            rules: HashMap::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Attach a classification rule to a group. The rule is validated again here.
    pub fn register_group(
        &mut self,
        group: GroupId,
        rule: ClassificationRule,
    ) -> Result<(), ValidationError> {
        validate_rule(&rule, rule.team_count)?;
        self.rules.insert(group, rule);
        Ok(())
    }

    /// Which teams of `group` move on to each cup.
    pub async fn resolve_classification(
        &self,
        group: GroupId,
    ) -> Result<TierAssignment, ResolutionError> {
        let rule = self
            .rules
            .get(&group)
            .ok_or(ResolutionError::GroupNotFound(group))?;
        let assignment = resolve_group(self.standings.as_ref(), group, rule).await;
        if let Err(e) = &assignment {
            log::debug!("Classification of group {} not available: {}", group, e);
        }
        assignment
    }

    /// Seed list of `tier`: the promoted teams of `groups`, in the order given.
    pub async fn resolve_seeds(
        &self,
        groups: &[GroupId],
        tier: CupTier,
    ) -> Result<Vec<TeamId>, ResolutionError> {
        let rules = groups
            .iter()
            .map(|&group| {
                self.rules
                    .get(&group)
                    .map(|rule| (group, rule))
                    .ok_or(ResolutionError::GroupNotFound(group))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let seeds = resolve_tier(self.standings.as_ref(), &rules, tier).await?;
        Ok(seeds.into_iter().map(|t| t.team).collect())
    }

    /// Create a phase, refusing a second active phase for the same (category-edition, kind, tier).
    pub async fn create_phase(&self, spec: PhaseSpec) -> Result<Phase, EngineError> {
        let tier_fits = match spec.kind {
            PhaseKind::Group => !spec.tier.is_cup(),
            PhaseKind::Knockout => spec.tier.is_cup(),
        };
        if !tier_fits {
            return Err(EngineError::InvalidPhase {
                kind: spec.kind,
                tier: spec.tier,
            });
        }
        if let Some(existing) = self
            .persistence
            .find_active_phase(spec.category_edition, spec.kind, spec.tier)
            .await?
        {
            return Err(EngineError::PhaseAlreadyExists {
                existing: existing.id,
                kind: spec.kind,
                tier: spec.tier,
            });
        }
        let phase = self.persistence.create_phase(spec).await?;
        log::info!(
            "Created {:?} phase {} for the {} tier",
            phase.kind,
            phase.id,
            phase.tier
        );
        Ok(phase)
    }

    /// Build a round from `teams` and persist it pairing by pairing.
    ///
    /// A failed pairing does not stop the others and nothing is rolled back;
    /// the report says which pairings need another attempt. Re-running the same
    /// round is safe: pairings already stored with the same teams count as created.
    pub async fn generate_knockout_round(
        &self,
        tier: CupTier,
        phase_id: PhaseId,
        teams: &[TeamId],
        base_date: NaiveDate,
    ) -> Result<GenerationReport, EngineError> {
        let phase = self
            .persistence
            .get_phase(phase_id)
            .await?
            .ok_or(EngineError::PhaseNotFound(phase_id))?;
        if !phase.active {
            return Err(EngineError::PhaseInactive(phase_id));
        }
        if phase.kind != PhaseKind::Knockout || phase.tier != tier {
            return Err(EngineError::PhaseMismatch {
                phase: phase_id,
                kind: phase.kind,
                tier: phase.tier,
            });
        }

        let plan = build_bracket(teams, tier, base_date, self.config.spacing_days())?;

        let mut report = GenerationReport {
            round: plan.round,
            requested: plan.pairings.len(),
            created: 0,
            failures: Vec::new(),
        };
        for pairing in &plan.pairings {
            match self.persist_pairing(&plan, phase_id, pairing).await {
                Ok(()) => report.created += 1,
                Err(e) => {
                    log::warn!(
                        "Could not create slot {} of the {} {}: {}",
                        pairing.sequence,
                        tier,
                        plan.round,
                        e
                    );
                    report.failures.push(GenerationFailure {
                        sequence: pairing.sequence,
                        error: e,
                    });
                }
            }
        }
        log::info!("{} cup {}: {}", tier, plan.round, report);
        Ok(report)
    }

    async fn persist_pairing(
        &self,
        plan: &BracketPlan,
        phase: PhaseId,
        pairing: &Pairing,
    ) -> Result<(), EngineError> {
        let existing = self
            .persistence
            .find_slot(phase, plan.round, pairing.sequence)
            .await?;
        let slot = match existing {
            Some(slot)
                if slot.team_a == Some(pairing.team_a) && slot.team_b == Some(pairing.team_b) =>
            {
                slot
            }
            Some(slot) => {
                return Err(EngineError::SlotOccupied {
                    slot: slot.id,
                    round: plan.round,
                    sequence: pairing.sequence,
                })
            }
            None => {
                self.persistence
                    .create_bracket_slot(plan.slot_spec(phase, pairing))
                    .await?
            }
        };
        if self.persistence.match_for_slot(slot.id).await?.is_none() {
            let spec = plan.match_spec(phase, slot.id, pairing, self.config.venue.clone());
            self.persistence.create_match(spec).await?;
        }
        Ok(())
    }

    /// Record the winner of a bracket match and move them into the next round.
    ///
    /// Registering the winner a slot already has changes nothing (a failed
    /// propagation is completed, though). A different winner is refused.
    pub async fn on_match_result(
        &self,
        match_id: MatchId,
        winner: TeamId,
    ) -> Result<PropagationResult, EngineError> {
        let fixture = self
            .persistence
            .get_match(match_id)
            .await?
            .ok_or(EngineError::MatchNotFound(match_id))?;
        let slot_id = fixture
            .slot
            .ok_or(EngineError::MatchNotInBracket(match_id))?;
        let mut slot = self
            .persistence
            .get_slot(slot_id)
            .await?
            .ok_or(EngineError::SlotNotFound(slot_id))?;

        let changed = match slot.winner {
            Some(decided) if decided == winner => false,
            Some(decided) => {
                log::warn!(
                    "Refusing to change the winner of slot {} from {} to {}",
                    slot.id,
                    decided,
                    winner
                );
                return Err(EngineError::ResultConflict {
                    slot: slot.id,
                    decided,
                    requested: winner,
                });
            }
            None => {
                if slot.status() != SlotStatus::Ready {
                    return Err(EngineError::SlotNotReady(slot.id));
                }
                if !slot.has_team(winner) {
                    return Err(EngineError::WinnerNotInSlot {
                        slot: slot.id,
                        team: winner,
                    });
                }
                self.persistence.record_match_result(match_id, winner).await?;
                slot.winner = Some(winner);
                self.persistence.update_bracket_slot(&slot).await?;
                true
            }
        };

        self.propagate(&slot, winner, &fixture, changed).await
    }

    async fn propagate(
        &self,
        slot: &BracketSlot,
        winner: TeamId,
        fixture: &Match,
        changed: bool,
    ) -> Result<PropagationResult, EngineError> {
        let mut result = PropagationResult {
            slot: slot.id,
            winner,
            changed,
            parent: None,
            parent_ready: false,
            champion: None,
        };

        let Some((round, sequence, side)) = slot.parent_position() else {
            if changed {
                log::info!("{} cup champion: {}", slot.tier, winner);
            }
            result.champion = Some(winner);
            return Ok(result);
        };

        let existing = self.persistence.find_slot(slot.phase, round, sequence).await?;
        let parent = match existing {
            None => {
                let mut spec = SlotSpec {
                    phase: slot.phase,
                    tier: slot.tier,
                    round,
                    sequence,
                    team_a: None,
                    team_b: None,
                };
                match side {
                    Side::A => spec.team_a = Some(winner),
                    Side::B => spec.team_b = Some(winner),
                }
                self.persistence.create_bracket_slot(spec).await?
            }
            Some(mut parent) => match parent.team(side) {
                Some(team) if team == winner => parent,
                Some(team) => {
                    return Err(EngineError::ResultConflict {
                        slot: parent.id,
                        decided: team,
                        requested: winner,
                    })
                }
                None => {
                    parent.set_team(side, winner);
                    self.persistence.update_bracket_slot(&parent).await?;
                    parent
                }
            },
        };
        result.parent = Some(parent.id);

        if parent.status() == SlotStatus::Ready {
            result.parent_ready = true;
            if self.persistence.match_for_slot(parent.id).await?.is_none() {
                self.schedule_parent(slot, &parent, fixture).await?;
            }
        }
        Ok(result)
    }

    /// Schedule the match of a slot whose two teams just became known,
    /// `match_spacing_days` after the later of its two feeder matches.
    async fn schedule_parent(
        &self,
        child: &BracketSlot,
        parent: &BracketSlot,
        fixture: &Match,
    ) -> Result<(), EngineError> {
        let (Some(home), Some(away)) = (parent.team_a, parent.team_b) else {
            return Err(EngineError::SlotNotReady(parent.id));
        };
        let mut latest = fixture.date;
        if let Some(sibling) = self
            .persistence
            .find_slot(child.phase, child.round, child.sequence ^ 1)
            .await?
        {
            if let Some(m) = self.persistence.match_for_slot(sibling.id).await? {
                latest = latest.max(m.date);
            }
        }
        let date = Duration::try_days(self.config.spacing_days())
            .and_then(|offset| latest.checked_add_signed(offset))
            .ok_or(BuildError::DateOutOfRange)?;

        let m = self
            .persistence
            .create_match(MatchSpec {
                phase: parent.phase,
                slot: Some(parent.id),
                home,
                away,
                date,
                venue: self.config.venue.clone(),
            })
            .await?;
        log::info!(
            "{} cup {} slot {} ready, match {} on {}",
            parent.tier,
            parent.round,
            parent.sequence,
            m.id,
            m.date
        );
        Ok(())
    }

    /// Every slot of a knockout phase, by round then sequence.
    pub async fn bracket(&self, phase: PhaseId) -> Result<Vec<BracketSlot>, EngineError> {
        Ok(self.persistence.list_slots(phase).await?)
    }

    /// Winner of the phase's final, once decided.
    pub async fn champion(&self, phase: PhaseId) -> Result<Option<TeamId>, EngineError> {
        let final_slot = self.persistence.find_slot(phase, Round::Final, 0).await?;
        Ok(final_slot.and_then(|s| s.winner))
    }
}
