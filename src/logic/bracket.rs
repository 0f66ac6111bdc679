//! Knockout round construction: team count check, round naming, pairing and scheduling.

use crate::models::{BuildError, CupTier, MatchSpec, PhaseId, Round, SlotId, SlotSpec, TeamId};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One pairing of a planned round, before it is persisted.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    pub sequence: u32,
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub date: NaiveDate,
}

/// A round ready to be persisted, pairing by pairing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketPlan {
    pub tier: CupTier,
    pub round: Round,
    pub pairings: Vec<Pairing>,
}

impl BracketPlan {
    pub fn slot_spec(&self, phase: PhaseId, pairing: &Pairing) -> SlotSpec {
        SlotSpec {
            phase,
            tier: self.tier,
            round: self.round,
            sequence: pairing.sequence,
            team_a: Some(pairing.team_a),
            team_b: Some(pairing.team_b),
        }
    }

    /// Match deciding `slot`; team A plays at home.
    pub fn match_spec(
        &self,
        phase: PhaseId,
        slot: SlotId,
        pairing: &Pairing,
        venue: Option<String>,
    ) -> MatchSpec {
        MatchSpec {
            phase,
            slot: Some(slot),
            home: pairing.team_a,
            away: pairing.team_b,
            date: pairing.date,
            venue,
        }
    }
}

/// Pair `teams` into one knockout round.
///
/// 1. Team count must be 2, 4, 8 or 16 (no byes, no padding).
/// 2. Slot `k` pairs `teams[2k]` with `teams[2k + 1]`; seed order is kept as given.
/// 3. Slot `k` is played `k * spacing_days` days after `base_date`; spacing must be at least one day.
pub fn build_bracket(
    teams: &[TeamId],
    tier: CupTier,
    base_date: NaiveDate,
    spacing_days: i64,
) -> Result<BracketPlan, BuildError> {
    let round =
        Round::from_team_count(teams.len()).ok_or(BuildError::InvalidTeamCount(teams.len()))?;
    if !tier.is_cup() {
        return Err(BuildError::NotACup);
    }
    if spacing_days < 1 {
        return Err(BuildError::InvalidSpacing(spacing_days));
    }
    let mut seen = HashSet::new();
    if let Some(&dup) = teams.iter().find(|t| !seen.insert(**t)) {
        return Err(BuildError::DuplicateTeam(dup));
    }

    let pairings = teams
        .chunks_exact(2)
        .enumerate()
        .map(|(k, pair)| {
            let date = Duration::try_days(k as i64 * spacing_days)
                .and_then(|offset| base_date.checked_add_signed(offset))
                .ok_or(BuildError::DateOutOfRange)?;
            Ok(Pairing {
                sequence: k as u32,
                team_a: pair[0],
                team_b: pair[1],
                date,
            })
        })
        .collect::<Result<Vec<_>, BuildError>>()?;

    Ok(BracketPlan {
        tier,
        round,
        pairings,
    })
}
