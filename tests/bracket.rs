//! Integration tests for knockout round construction.

use chrono::NaiveDate;
use league_progression::{build_bracket, BuildError, CupTier, Round, TeamId};
use uuid::Uuid;

fn teams(n: usize) -> Vec<TeamId> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 11, 7).unwrap()
}

#[test]
fn eight_teams_make_a_quarterfinal() {
    let seeds = teams(8);
    let plan = build_bracket(&seeds, CupTier::Gold, base_date(), 3).unwrap();

    assert_eq!(plan.round, Round::QuarterFinal);
    assert_eq!(plan.round.name(), "quarterfinal");
    assert_eq!(plan.pairings.len(), 4);

    let first = &plan.pairings[0];
    assert_eq!((first.team_a, first.team_b), (seeds[0], seeds[1]));
    assert_eq!(first.date, base_date());

    let last = &plan.pairings[3];
    assert_eq!(last.sequence, 3);
    assert_eq!((last.team_a, last.team_b), (seeds[6], seeds[7]));
    assert_eq!(last.date, NaiveDate::from_ymd_opt(2026, 11, 16).unwrap());
}

#[test]
fn round_names_follow_team_count() {
    for (n, name) in [(2, "final"), (4, "semifinal"), (8, "quarterfinal"), (16, "roundOf16")] {
        let plan = build_bracket(&teams(n), CupTier::Silver, base_date(), 3).unwrap();
        assert_eq!(plan.round.name(), name);
        assert_eq!(plan.pairings.len(), n / 2);
    }
}

#[test]
fn unsupported_counts_are_rejected() {
    for n in [0, 1, 3, 6, 12, 32] {
        assert_eq!(
            build_bracket(&teams(n), CupTier::Gold, base_date(), 3),
            Err(BuildError::InvalidTeamCount(n))
        );
    }
}

#[test]
fn group_stage_tier_has_no_bracket() {
    assert_eq!(
        build_bracket(&teams(4), CupTier::General, base_date(), 3),
        Err(BuildError::NotACup)
    );
}

#[test]
fn duplicate_seed_is_rejected() {
    let mut seeds = teams(4);
    seeds[3] = seeds[1];
    assert_eq!(
        build_bracket(&seeds, CupTier::Bronze, base_date(), 3),
        Err(BuildError::DuplicateTeam(seeds[1]))
    );
}

#[test]
fn plan_specs_carry_phase_and_slot() {
    let seeds = teams(2);
    let plan = build_bracket(&seeds, CupTier::Gold, base_date(), 3).unwrap();
    let (phase, slot) = (Uuid::new_v4(), Uuid::new_v4());
    let pairing = &plan.pairings[0];

    let slot_spec = plan.slot_spec(phase, pairing);
    assert_eq!(slot_spec.round, Round::Final);
    assert_eq!(slot_spec.team_a, Some(seeds[0]));
    assert_eq!(slot_spec.team_b, Some(seeds[1]));

    let match_spec = plan.match_spec(phase, slot, pairing, Some("Estadio Central".to_string()));
    assert_eq!(match_spec.slot, Some(slot));
    assert_eq!(match_spec.home, seeds[0]);
    assert_eq!(match_spec.away, seeds[1]);
    assert_eq!(match_spec.venue.as_deref(), Some("Estadio Central"));
}

#[test]
fn rounds_chain_to_the_final() {
    assert_eq!(Round::RoundOf16.next(), Some(Round::QuarterFinal));
    assert_eq!(Round::QuarterFinal.next(), Some(Round::SemiFinal));
    assert_eq!(Round::SemiFinal.next(), Some(Round::Final));
    assert_eq!(Round::Final.next(), None);
    assert_eq!(Round::Final.slot_count(), 1);
}

#[test]
fn spacing_below_one_day_is_refused() {
    for spacing in [0, -3] {
        assert_eq!(
            build_bracket(&teams(4), CupTier::Gold, base_date(), spacing),
            Err(BuildError::InvalidSpacing(spacing))
        );
    }
}
