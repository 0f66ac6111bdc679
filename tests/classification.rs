//! Integration tests for classification rules and group resolution.

use league_progression::{
    classify, resolve_tier, validate_rule, ClassificationRule, CupTier, EngineConfig,
    MemoryStore, ProgressionEngine, RawClassificationRule, ResolutionError, Standing,
    StandingsError, TeamId, TierPromotion, ValidationError,
};
use std::sync::Arc;
use uuid::Uuid;

fn standings(n: u32) -> (Vec<TeamId>, Vec<Standing>) {
    let teams: Vec<TeamId> = (0..n).map(|_| Uuid::new_v4()).collect();
    let table = teams
        .iter()
        .enumerate()
        .map(|(i, &team)| Standing {
            team,
            position: i as u32 + 1,
            points: 3 * (n as i32 - i as i32),
        })
        .collect();
    (teams, table)
}

#[test]
fn overlapping_positions_are_rejected() {
    let rule = ClassificationRule {
        team_count: 4,
        gold: TierPromotion::positions(&[1, 2]),
        silver: TierPromotion::positions(&[2]),
        bronze: TierPromotion::none(),
        description: String::new(),
    };
    assert_eq!(
        validate_rule(&rule, 4),
        Err(ValidationError::OverlappingPositions {
            position: 2,
            first: CupTier::Gold,
            second: CupTier::Silver,
        })
    );
}

#[test]
fn list_length_must_match_count() {
    let rule = ClassificationRule {
        team_count: 4,
        gold: TierPromotion {
            count: 2,
            positions: Some(vec![1]),
        },
        silver: TierPromotion::none(),
        bronze: TierPromotion::none(),
        description: String::new(),
    };
    assert!(matches!(
        validate_rule(&rule, 4),
        Err(ValidationError::CountMismatch {
            tier: CupTier::Gold,
            declared: 2,
            listed: 1
        })
    ));
}

#[test]
fn promoting_more_teams_than_the_group_has_fails() {
    let err = ClassificationRule::new(
        4,
        TierPromotion::count(2),
        TierPromotion::count(2),
        TierPromotion::count(1),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ValidationError::CapacityExceeded {
            promoted: 5,
            group_size: 4
        }
    );
}

#[test]
fn huge_raw_counts_cannot_wrap_past_the_capacity_check() {
    let raw = RawClassificationRule {
        gold: Some(u32::MAX),
        silver: Some(1),
        ..Default::default()
    };
    assert_eq!(
        ClassificationRule::parse(&raw, 4),
        Err(ValidationError::CapacityExceeded {
            promoted: u64::from(u32::MAX) + 1,
            group_size: 4
        })
    );
}

#[test]
fn explicit_position_outside_the_group_fails() {
    let err = ClassificationRule::new(
        4,
        TierPromotion::positions(&[1, 5]),
        TierPromotion::none(),
        TierPromotion::none(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ValidationError::PositionOutOfRange {
            position: 5,
            group_size: 4
        }
    );
}

#[test]
fn leaving_teams_unpromoted_is_allowed() {
    let rule = ClassificationRule::new(
        6,
        TierPromotion::count(2),
        TierPromotion::none(),
        TierPromotion::none(),
    );
    assert!(rule.is_ok());
}

#[test]
fn raw_rule_is_parsed_from_comma_separated_text() {
    let raw = RawClassificationRule {
        gold_positions: Some("1, 2".to_string()),
        silver: Some(1),
        silver_positions: Some(" 3 ".to_string()),
        bronze_positions: Some("  ".to_string()),
        description: Some("top two to gold".to_string()),
        ..Default::default()
    };
    let rule = ClassificationRule::parse(&raw, 4).unwrap();
    assert_eq!(rule.gold, TierPromotion::positions(&[1, 2]));
    assert_eq!(rule.silver, TierPromotion::positions(&[3]));
    assert_eq!(rule.bronze, TierPromotion::none());
    assert_eq!(rule.description, "top two to gold");
}

#[test]
fn raw_rule_with_garbage_position_fails() {
    let raw = RawClassificationRule {
        gold_positions: Some("1,two".to_string()),
        ..Default::default()
    };
    assert_eq!(
        ClassificationRule::parse(&raw, 4),
        Err(ValidationError::InvalidPosition("two".to_string()))
    );
}

#[test]
fn raw_rule_count_disagreeing_with_list_fails() {
    let raw = RawClassificationRule {
        gold: Some(3),
        gold_positions: Some("1,2".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        ClassificationRule::parse(&raw, 4),
        Err(ValidationError::CountMismatch { .. })
    ));
}

#[test]
fn explicit_lists_pick_listed_positions() {
    let group = Uuid::new_v4();
    let (teams, table) = standings(4);
    let rule = ClassificationRule::new(
        4,
        TierPromotion::positions(&[1, 2]),
        TierPromotion::positions(&[3]),
        TierPromotion::none(),
    )
    .unwrap();

    let assignment = classify(group, &rule, &table).unwrap();
    assert_eq!(assignment.team_ids(CupTier::Gold), vec![teams[0], teams[1]]);
    assert_eq!(assignment.team_ids(CupTier::Silver), vec![teams[2]]);
    assert!(assignment.bronze.is_empty());
    assert!(assignment.gold.iter().all(|t| t.group == group));
}

#[test]
fn counts_take_positions_in_gold_silver_bronze_order() {
    let (teams, table) = standings(6);
    let rule = ClassificationRule::new(
        6,
        TierPromotion::count(2),
        TierPromotion::count(2),
        TierPromotion::count(1),
    )
    .unwrap();

    let assignment = classify(Uuid::new_v4(), &rule, &table).unwrap();
    assert_eq!(assignment.team_ids(CupTier::Gold), vec![teams[0], teams[1]]);
    assert_eq!(assignment.team_ids(CupTier::Silver), vec![teams[2], teams[3]]);
    assert_eq!(assignment.team_ids(CupTier::Bronze), vec![teams[4]]);
    assert_eq!(assignment.total(), 5);
}

#[test]
fn count_tiers_skip_positions_claimed_by_lists() {
    let (teams, table) = standings(5);
    let rule = ClassificationRule::new(
        5,
        TierPromotion::count(2),
        TierPromotion::positions(&[1]),
        TierPromotion::count(1),
    )
    .unwrap();

    let assignment = classify(Uuid::new_v4(), &rule, &table).unwrap();
    assert_eq!(assignment.team_ids(CupTier::Silver), vec![teams[0]]);
    assert_eq!(assignment.team_ids(CupTier::Gold), vec![teams[1], teams[2]]);
    assert_eq!(assignment.team_ids(CupTier::Bronze), vec![teams[3]]);
}

#[test]
fn missing_position_names_group_and_position() {
    let group = Uuid::new_v4();
    let (_, mut table) = standings(4);
    table.retain(|s| s.position != 3);
    let rule = ClassificationRule::new(
        4,
        TierPromotion::positions(&[1, 2]),
        TierPromotion::positions(&[3]),
        TierPromotion::none(),
    )
    .unwrap();

    assert_eq!(
        classify(group, &rule, &table),
        Err(ResolutionError::PositionMissing { group, position: 3 })
    );
}

#[tokio::test]
async fn tier_seeds_follow_group_order_then_position() {
    let store = MemoryStore::new();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let (teams_a, table_a) = standings(4);
    let (teams_b, table_b) = standings(4);
    store.set_standings(a, table_a);
    store.set_standings(b, table_b);
    let rule = ClassificationRule::new(
        4,
        TierPromotion::count(2),
        TierPromotion::count(1),
        TierPromotion::none(),
    )
    .unwrap();

    let gold = resolve_tier(&store, &[(a, &rule), (b, &rule)], CupTier::Gold)
        .await
        .unwrap();
    let ids: Vec<TeamId> = gold.iter().map(|t| t.team).collect();
    assert_eq!(ids, vec![teams_a[0], teams_a[1], teams_b[0], teams_b[1]]);
}

#[tokio::test]
async fn incomplete_standings_are_reported_not_guessed() {
    let store = MemoryStore::new();
    let group = Uuid::new_v4();
    store.set_standings_incomplete(group, 2);
    let rule = ClassificationRule::new(
        4,
        TierPromotion::count(2),
        TierPromotion::none(),
        TierPromotion::none(),
    )
    .unwrap();

    let err = resolve_tier(&store, &[(group, &rule)], CupTier::Gold)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ResolutionError::StandingsUnavailable {
            group,
            source: StandingsError::Incomplete {
                group,
                remaining: 2
            },
        }
    );
}

#[test]
fn hand_built_rule_is_checked_again_before_use() {
    let group = Uuid::new_v4();
    let (_, table) = standings(4);
    let rule = ClassificationRule {
        team_count: 4,
        gold: TierPromotion::positions(&[1, 2]),
        silver: TierPromotion::positions(&[2]),
        bronze: TierPromotion::none(),
        description: String::new(),
    };
    let expected = ValidationError::OverlappingPositions {
        position: 2,
        first: CupTier::Gold,
        second: CupTier::Silver,
    };

    assert_eq!(
        classify(group, &rule, &table),
        Err(ResolutionError::InvalidRule {
            group,
            source: expected.clone()
        })
    );

    let store = Arc::new(MemoryStore::new());
    let mut engine = ProgressionEngine::new(store.clone(), store, EngineConfig::default());
    assert_eq!(engine.register_group(group, rule), Err(expected));
}
