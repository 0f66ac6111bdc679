//! Property tests for bracket building, rule validation and classification.

use chrono::{Duration, NaiveDate};
use league_progression::{
    build_bracket, classify, validate_rule, BuildError, ClassificationRule, CupTier, Round,
    Standing, TierPromotion, ValidationError,
};
use proptest::prelude::*;
use std::collections::HashSet;
use uuid::Uuid;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

proptest! {
    #[test]
    fn valid_counts_give_half_as_many_slots(exp in 1u32..=4, spacing in 1i64..10) {
        let n = 2usize.pow(exp);
        let seeds: Vec<_> = (0..n).map(|_| Uuid::new_v4()).collect();
        let plan = build_bracket(&seeds, CupTier::Gold, base_date(), spacing).unwrap();

        prop_assert_eq!(plan.pairings.len(), n / 2);
        prop_assert_eq!(Some(plan.round), Round::from_team_count(n));
        for (k, pairing) in plan.pairings.iter().enumerate() {
            prop_assert_eq!(pairing.sequence as usize, k);
            prop_assert_eq!(pairing.team_a, seeds[2 * k]);
            prop_assert_eq!(pairing.team_b, seeds[2 * k + 1]);
        }
        for w in plan.pairings.windows(2) {
            prop_assert_eq!(w[1].date - w[0].date, Duration::days(spacing));
        }
    }

    #[test]
    fn other_counts_fail(n in 0usize..40) {
        prop_assume!(![2, 4, 8, 16].contains(&n));
        let seeds: Vec<_> = (0..n).map(|_| Uuid::new_v4()).collect();
        prop_assert_eq!(
            build_bracket(&seeds, CupTier::Gold, base_date(), 3),
            Err(BuildError::InvalidTeamCount(n))
        );
    }

    #[test]
    fn shared_position_is_always_an_overlap(
        shared in 1u32..=8,
        gold_extra in proptest::collection::vec(1u32..=8, 0..3),
        bronze_count in 0u32..20,
    ) {
        let mut gold: Vec<u32> = gold_extra.into_iter().filter(|&p| p != shared).collect();
        gold.dedup();
        gold.push(shared);
        let rule = ClassificationRule {
            team_count: 8,
            gold: TierPromotion::positions(&gold),
            silver: TierPromotion::positions(&[shared]),
            bronze: TierPromotion::count(bronze_count),
            description: String::new(),
        };
        let is_overlap = matches!(
            validate_rule(&rule, 8),
            Err(ValidationError::OverlappingPositions { .. })
        );
        prop_assert!(is_overlap);
    }

    #[test]
    fn classification_accounts_for_every_promoted_team(
        size in 2u32..=10,
        gold in 0u32..4,
        silver in 0u32..4,
        bronze in 0u32..4,
    ) {
        prop_assume!(gold + silver + bronze <= size);
        let rule = ClassificationRule::new(
            size,
            TierPromotion::count(gold),
            TierPromotion::count(silver),
            TierPromotion::count(bronze),
        )
        .unwrap();
        let table: Vec<Standing> = (1..=size)
            .map(|position| Standing { team: Uuid::new_v4(), position, points: 0 })
            .collect();

        let assignment = classify(Uuid::new_v4(), &rule, &table).unwrap();
        let all: Vec<_> = CupTier::CUPS
            .iter()
            .flat_map(|&tier| assignment.team_ids(tier))
            .collect();
        let distinct: HashSet<_> = all.iter().collect();
        prop_assert_eq!(all.len() as u32, gold + silver + bronze);
        prop_assert_eq!(distinct.len(), all.len());
    }
}
