//! Cup tiers and phases.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a phase.
pub type PhaseId = Uuid;

/// Unique identifier for a category within one edition of a tournament.
pub type CategoryEditionId = Uuid;

/// Which competition a phase belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CupTier {
    Gold,
    Silver,
    Bronze,
    /// The group stage itself, not a knockout tier.
    General,
}

impl CupTier {
    /// The three knockout tiers, in resolution order.
    pub const CUPS: [CupTier; 3] = [CupTier::Gold, CupTier::Silver, CupTier::Bronze];

    pub fn is_cup(self) -> bool {
        self != CupTier::General
    }
}

impl std::fmt::Display for CupTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CupTier::Gold => "gold",
            CupTier::Silver => "silver",
            CupTier::Bronze => "bronze",
            CupTier::General => "general",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Group,
    Knockout,
}

/// Match rules for every game played in a phase.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PhaseRules {
    #[serde(default)]
    pub allow_draws: bool,
    #[serde(default)]
    pub allow_penalties: bool,
    #[serde(default)]
    pub home_and_away: bool,
}

/// Request to create a phase.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PhaseSpec {
    pub category_edition: CategoryEditionId,
    pub kind: PhaseKind,
    pub tier: CupTier,
    pub order: u32,
    #[serde(default)]
    pub rules: PhaseRules,
}

/// One stage of a category's competition.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub id: PhaseId,
    pub category_edition: CategoryEditionId,
    pub kind: PhaseKind,
    pub tier: CupTier,
    /// Sequence order within the category.
    pub order: u32,
    pub rules: PhaseRules,
    pub active: bool,
}

impl Phase {
    /// Materialize a spec as a new active phase with a fresh id.
    pub fn from_spec(spec: PhaseSpec) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_edition: spec.category_edition,
            kind: spec.kind,
            tier: spec.tier,
            order: spec.order,
            rules: spec.rules,
            active: true,
        }
    }

    /// True when this phase occupies the (category-edition, kind, tier) key of `spec`.
    pub fn conflicts_with(&self, spec: &PhaseSpec) -> bool {
        self.active
            && self.category_edition == spec.category_edition
            && self.kind == spec.kind
            && self.tier == spec.tier
    }
}
