//! Group classification: rule validation and promotion of finishing positions into cups.

use crate::models::{
    ClassificationRule, ClassifiedTeam, CupTier, GroupId, ResolutionError, TeamId, ValidationError,
};
use crate::store::{Standing, StandingsProvider};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Check a classification rule against the size of its group.
///
/// Checks run in a fixed order so the first reported error is stable:
/// overlapping positions, list/count mismatch, capacity, then position range.
pub fn validate_rule(rule: &ClassificationRule, group_size: u32) -> Result<(), ValidationError> {
    let mut owner: HashMap<u32, CupTier> = HashMap::new();
    for (tier, promotion) in rule.cups() {
        let Some(positions) = &promotion.positions else {
            continue;
        };
        for &position in positions {
            if let Some(&first) = owner.get(&position) {
                return Err(ValidationError::OverlappingPositions {
                    position,
                    first,
                    second: tier,
                });
            }
            owner.insert(position, tier);
        }
    }

    for (tier, promotion) in rule.cups() {
        if let Some(positions) = &promotion.positions {
            if positions.len() != promotion.count as usize {
                return Err(ValidationError::CountMismatch {
                    tier,
                    declared: promotion.count,
                    listed: positions.len(),
                });
            }
        }
    }

    let promoted = rule.promoted_total();
    if promoted > u64::from(group_size) {
        return Err(ValidationError::CapacityExceeded {
            promoted,
            group_size,
        });
    }

    if let Some(&position) = owner.keys().filter(|&&p| p == 0 || p > group_size).min() {
        return Err(ValidationError::PositionOutOfRange {
            position,
            group_size,
        });
    }

    Ok(())
}

/// Teams of one group promoted into each cup, ordered by finishing position.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TierAssignment {
    pub gold: Vec<ClassifiedTeam>,
    pub silver: Vec<ClassifiedTeam>,
    pub bronze: Vec<ClassifiedTeam>,
}

impl TierAssignment {
    /// Teams promoted into `tier`; the group stage tier is always empty.
    pub fn tier(&self, tier: CupTier) -> &[ClassifiedTeam] {
        match tier {
            CupTier::Gold => &self.gold,
            CupTier::Silver => &self.silver,
            CupTier::Bronze => &self.bronze,
            CupTier::General => &[],
        }
    }

    pub fn team_ids(&self, tier: CupTier) -> Vec<TeamId> {
        self.tier(tier).iter().map(|t| t.team).collect()
    }

    pub fn total(&self) -> usize {
        self.gold.len() + self.silver.len() + self.bronze.len()
    }
}

/// Apply `rule` to a group's standings.
///
/// Explicit tiers take their listed positions. The others take, gold first,
/// then silver, then bronze, the lowest positions nobody has claimed yet.
pub fn classify(
    group: GroupId,
    rule: &ClassificationRule,
    standings: &[Standing],
) -> Result<TierAssignment, ResolutionError> {
    validate_rule(rule, rule.team_count)
        .map_err(|source| ResolutionError::InvalidRule { group, source })?;

    let by_position: HashMap<u32, &Standing> =
        standings.iter().map(|s| (s.position, s)).collect();

    let mut claimed: BTreeSet<u32> = rule
        .cups()
        .iter()
        .filter_map(|(_, promotion)| promotion.positions.as_ref())
        .flatten()
        .copied()
        .collect();

    let mut assignment = TierAssignment::default();
    for (tier, promotion) in rule.cups() {
        let mut positions: Vec<u32> = match &promotion.positions {
            Some(list) => list.clone(),
            None => {
                let free: Vec<u32> = (1..=rule.team_count)
                    .filter(|p| !claimed.contains(p))
                    .take(promotion.count as usize)
                    .collect();
                claimed.extend(free.iter().copied());
                free
            }
        };
        positions.sort_unstable();

        let teams = positions
            .into_iter()
            .map(|position| {
                by_position
                    .get(&position)
                    .map(|s| ClassifiedTeam {
                        team: s.team,
                        group,
                        position,
                        points: s.points,
                    })
                    .ok_or(ResolutionError::PositionMissing { group, position })
            })
            .collect::<Result<Vec<_>, _>>()?;

        match tier {
            CupTier::Gold => assignment.gold = teams,
            CupTier::Silver => assignment.silver = teams,
            CupTier::Bronze => assignment.bronze = teams,
            CupTier::General => {}
        }
    }
    Ok(assignment)
}

/// Fetch a group's standings and classify them.
pub async fn resolve_group<S>(
    provider: &S,
    group: GroupId,
    rule: &ClassificationRule,
) -> Result<TierAssignment, ResolutionError>
where
    S: StandingsProvider + ?Sized,
{
    let standings = provider
        .get_standings(group)
        .await
        .map_err(|source| ResolutionError::StandingsUnavailable { group, source })?;
    classify(group, rule, &standings)
}

/// Seed list for one cup: every group's promoted teams, in group order, then finishing order.
pub async fn resolve_tier<S>(
    provider: &S,
    groups: &[(GroupId, &ClassificationRule)],
    tier: CupTier,
) -> Result<Vec<ClassifiedTeam>, ResolutionError>
where
    S: StandingsProvider + ?Sized,
{
    let mut seeds = Vec::new();
    for &(group, rule) in groups {
        let assignment = resolve_group(provider, group, rule).await?;
        seeds.extend_from_slice(assignment.tier(tier));
    }
    Ok(seeds)
}
