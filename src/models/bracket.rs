//! Bracket slots ("llaves"), rounds, and the matches bound to them.

use crate::models::rule::TeamId;
use crate::models::tier::{CupTier, PhaseId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a bracket slot.
pub type SlotId = Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One layer of a single-elimination bracket.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Round {
    RoundOf16,
    QuarterFinal,
    SemiFinal,
    Final,
}

impl Round {
    /// Round played by `teams` teams; only 2, 4, 8 and 16 are supported.
    pub fn from_team_count(teams: usize) -> Option<Self> {
        match teams {
            2 => Some(Round::Final),
            4 => Some(Round::SemiFinal),
            8 => Some(Round::QuarterFinal),
            16 => Some(Round::RoundOf16),
            _ => None,
        }
    }

    pub fn team_count(self) -> usize {
        match self {
            Round::RoundOf16 => 16,
            Round::QuarterFinal => 8,
            Round::SemiFinal => 4,
            Round::Final => 2,
        }
    }

    pub fn slot_count(self) -> usize {
        self.team_count() / 2
    }

    /// The round the winners of this one play in; `None` after the final.
    pub fn next(self) -> Option<Self> {
        match self {
            Round::RoundOf16 => Some(Round::QuarterFinal),
            Round::QuarterFinal => Some(Round::SemiFinal),
            Round::SemiFinal => Some(Round::Final),
            Round::Final => None,
        }
    }

    /// Display name used by the admin screens.
    pub fn name(self) -> &'static str {
        match self {
            Round::RoundOf16 => "roundOf16",
            Round::QuarterFinal => "quarterfinal",
            Round::SemiFinal => "semifinal",
            Round::Final => "final",
        }
    }
}

impl std::fmt::Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which side of a slot a team occupies.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Side of the parent slot fed by the slot with this sequence number.
    pub fn for_sequence(sequence: u32) -> Self {
        if sequence % 2 == 0 {
            Side::A
        } else {
            Side::B
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    /// One or both teams still unknown.
    Pending,
    /// Both teams known, no winner yet.
    Ready,
    Decided,
}

/// Request to create a bracket slot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SlotSpec {
    pub phase: PhaseId,
    pub tier: CupTier,
    pub round: Round,
    pub sequence: u32,
    pub team_a: Option<TeamId>,
    pub team_b: Option<TeamId>,
}

/// One pairing in a knockout round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketSlot {
    pub id: SlotId,
    pub phase: PhaseId,
    pub tier: CupTier,
    pub round: Round,
    /// Position within the round, starting at 0.
    pub sequence: u32,
    pub team_a: Option<TeamId>,
    pub team_b: Option<TeamId>,
    pub winner: Option<TeamId>,
}

impl BracketSlot {
    pub fn from_spec(spec: SlotSpec) -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: spec.phase,
            tier: spec.tier,
            round: spec.round,
            sequence: spec.sequence,
            team_a: spec.team_a,
            team_b: spec.team_b,
            winner: None,
        }
    }

    pub fn status(&self) -> SlotStatus {
        match (self.team_a, self.team_b, self.winner) {
            (_, _, Some(_)) => SlotStatus::Decided,
            (Some(_), Some(_), None) => SlotStatus::Ready,
            _ => SlotStatus::Pending,
        }
    }

    pub fn has_team(&self, team: TeamId) -> bool {
        self.team_a == Some(team) || self.team_b == Some(team)
    }

    pub fn team(&self, side: Side) -> Option<TeamId> {
        match side {
            Side::A => self.team_a,
            Side::B => self.team_b,
        }
    }

    pub fn set_team(&mut self, side: Side, team: TeamId) {
        match side {
            Side::A => self.team_a = Some(team),
            Side::B => self.team_b = Some(team),
        }
    }

    /// Round, sequence and side this slot's winner moves to; `None` for the final.
    pub fn parent_position(&self) -> Option<(Round, u32, Side)> {
        self.round
            .next()
            .map(|round| (round, self.sequence / 2, Side::for_sequence(self.sequence)))
    }
}

/// Request to create a match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchSpec {
    pub phase: PhaseId,
    /// Bracket slot this match decides, if any.
    pub slot: Option<SlotId>,
    pub home: TeamId,
    pub away: TeamId,
    pub date: NaiveDate,
    pub venue: Option<String>,
}

/// A scheduled game ("partido").
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub phase: PhaseId,
    pub slot: Option<SlotId>,
    pub home: TeamId,
    pub away: TeamId,
    pub date: NaiveDate,
    pub venue: Option<String>,
    /// Winning team; `None` until played.
    pub winner: Option<TeamId>,
}

impl Match {
    pub fn from_spec(spec: MatchSpec) -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: spec.phase,
            slot: spec.slot,
            home: spec.home,
            away: spec.away,
            date: spec.date,
            venue: spec.venue,
            winner: None,
        }
    }
}
