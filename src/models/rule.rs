//! Classification rules: which finishing positions of a group feed which cup.

use crate::logic::validate_rule;
use crate::models::error::ValidationError;
use crate::models::tier::CupTier;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// Unique identifier for a group of the group stage.
pub type GroupId = Uuid;

/// Promotion settings for one cup tier.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TierPromotion {
    /// How many teams of the group are promoted into this tier.
    pub count: u32,
    /// Explicit finishing positions (1 = best). `None` means "next free positions".
    #[serde(default)]
    pub positions: Option<Vec<u32>>,
}

impl TierPromotion {
    pub fn none() -> Self {
        Self::default()
    }

    /// Promote the next `count` unclaimed positions.
    pub fn count(count: u32) -> Self {
        Self {
            count,
            positions: None,
        }
    }

    /// Promote exactly the listed positions.
    pub fn positions(positions: &[u32]) -> Self {
        let positions = positions.to_vec();
        Self {
            count: positions.len() as u32,
            positions: Some(positions),
        }
    }
}

/// Validated per-group promotion configuration.
///
/// [`ClassificationRule::new`] and [`ClassificationRule::parse`] run [`validate_rule`].
/// Fields stay public for serde, so a rule built by hand is unchecked until
/// `ProgressionEngine::register_group` or `classify` validates it again.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub team_count: u32,
    pub gold: TierPromotion,
    pub silver: TierPromotion,
    pub bronze: TierPromotion,
    #[serde(default)]
    pub description: String,
}

impl ClassificationRule {
    pub fn new(
        team_count: u32,
        gold: TierPromotion,
        silver: TierPromotion,
        bronze: TierPromotion,
    ) -> Result<Self, ValidationError> {
        let rule = Self {
            team_count,
            gold,
            silver,
            bronze,
            description: String::new(),
        };
        validate_rule(&rule, team_count)?;
        Ok(rule)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Parse the loosely typed form once, then validate against `group_size`.
    pub fn parse(raw: &RawClassificationRule, group_size: u32) -> Result<Self, ValidationError> {
        let rule = Self {
            team_count: group_size,
            gold: raw_promotion(raw.gold, raw.gold_positions.as_deref())?,
            silver: raw_promotion(raw.silver, raw.silver_positions.as_deref())?,
            bronze: raw_promotion(raw.bronze, raw.bronze_positions.as_deref())?,
            description: raw.description.clone().unwrap_or_default(),
        };
        validate_rule(&rule, group_size)?;
        Ok(rule)
    }

    pub fn promotion(&self, tier: CupTier) -> Option<&TierPromotion> {
        match tier {
            CupTier::Gold => Some(&self.gold),
            CupTier::Silver => Some(&self.silver),
            CupTier::Bronze => Some(&self.bronze),
            CupTier::General => None,
        }
    }

    /// Each cup with its promotion settings, in resolution order.
    pub fn cups(&self) -> [(CupTier, &TierPromotion); 3] {
        [
            (CupTier::Gold, &self.gold),
            (CupTier::Silver, &self.silver),
            (CupTier::Bronze, &self.bronze),
        ]
    }

    /// Sum of the three promotion counts, widened so form input cannot overflow it.
    pub fn promoted_total(&self) -> u64 {
        self.cups()
            .iter()
            .map(|(_, promotion)| u64::from(promotion.count))
            .sum()
    }
}

/// Classification rule as it arrives from an admin form: every field optional,
/// position lists as comma-separated text (e.g. `"1, 2"`).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RawClassificationRule {
    #[serde(default)]
    pub gold: Option<u32>,
    #[serde(default)]
    pub silver: Option<u32>,
    #[serde(default)]
    pub bronze: Option<u32>,
    #[serde(default)]
    pub gold_positions: Option<String>,
    #[serde(default)]
    pub silver_positions: Option<String>,
    #[serde(default)]
    pub bronze_positions: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A missing count with a list present defaults to the list's length.
fn raw_promotion(count: Option<u32>, positions: Option<&str>) -> Result<TierPromotion, ValidationError> {
    let positions = match positions {
        Some(text) if !text.trim().is_empty() => Some(parse_positions(text)?),
        _ => None,
    };
    let count = match (count, &positions) {
        (Some(c), _) => c,
        (None, Some(list)) => list.len() as u32,
        (None, None) => 0,
    };
    Ok(TierPromotion { count, positions })
}

fn parse_positions(text: &str) -> Result<Vec<u32>, ValidationError> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .map_err(|_| ValidationError::InvalidPosition(s.to_string()))
        })
        .collect()
}

/// A team's final standing in its group, as reported by the standings provider.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedTeam {
    pub team: TeamId,
    pub group: GroupId,
    /// 1 = best.
    pub position: u32,
    pub points: i32,
}
