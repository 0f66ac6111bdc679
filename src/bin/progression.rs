//! Driver: resolve a category's group classification and generate the first knockout round.
//! Run with: cargo run --bin progression -- scenario.json
//! Logging via RUST_LOG (default info). Scheduling via env: MATCH_SPACING_DAYS, DEFAULT_VENUE.
//!
//! Scenario file:
//! {
//!   "tier": "gold",
//!   "base_date": "2026-11-07",
//!   "groups": [
//!     { "name": "A", "rule": { "gold_positions": "1,2", "silver": 1 },
//!       "standings": [ { "team": "Lions", "points": 9 }, ... ] }
//!   ]
//! }
//! Standings are listed best first; position is the index + 1.

use chrono::NaiveDate;
use league_progression::{
    ClassificationRule, CupTier, EngineConfig, MemoryStore, PhaseKind, PhaseRules, PhaseSpec,
    ProgressionEngine, RawClassificationRule, Standing, TeamId,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Deserialize)]
struct Scenario {
    tier: CupTier,
    base_date: NaiveDate,
    #[serde(default)]
    rules: PhaseRules,
    groups: Vec<GroupEntry>,
}

#[derive(Deserialize)]
struct GroupEntry {
    name: String,
    #[serde(default)]
    rule: RawClassificationRule,
    standings: Vec<StandingEntry>,
}

#[derive(Deserialize)]
struct StandingEntry {
    team: String,
    #[serde(default)]
    points: i32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: progression <scenario.json>")?;
    let scenario: Scenario = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    let config = EngineConfig::from_env();
    log::info!(
        "Loaded {} groups from {} (matches every {} days)",
        scenario.groups.len(),
        path,
        config.match_spacing_days
    );

    let store = Arc::new(MemoryStore::new());
    let mut engine = ProgressionEngine::new(store.clone(), store.clone(), config);
    let mut names: HashMap<TeamId, String> = HashMap::new();
    let mut group_ids = Vec::new();

    for group in &scenario.groups {
        let id = Uuid::new_v4();
        let standings: Vec<Standing> = group
            .standings
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let team = Uuid::new_v4();
                names.insert(team, entry.team.clone());
                Standing {
                    team,
                    position: i as u32 + 1,
                    points: entry.points,
                }
            })
            .collect();
        let rule = ClassificationRule::parse(&group.rule, standings.len() as u32)
            .map_err(|e| format!("group {}: {}", group.name, e))?;
        store.set_standings(id, standings);
        engine.register_group(id, rule)?;
        group_ids.push(id);
    }

    let phase = engine
        .create_phase(PhaseSpec {
            category_edition: Uuid::new_v4(),
            kind: PhaseKind::Knockout,
            tier: scenario.tier,
            order: 2,
            rules: scenario.rules,
        })
        .await?;
    let seeds = engine.resolve_seeds(&group_ids, scenario.tier).await?;
    let report = engine
        .generate_knockout_round(scenario.tier, phase.id, &seeds, scenario.base_date)
        .await?;

    println!("{} cup {}: {}", scenario.tier, report.round, report);
    let name = |id: Option<TeamId>| {
        id.and_then(|id| names.get(&id).cloned())
            .unwrap_or_else(|| "?".to_string())
    };
    let dates: HashMap<_, _> = store
        .matches()
        .into_iter()
        .filter_map(|m| m.slot.map(|slot| (slot, m.date)))
        .collect();
    for slot in engine.bracket(phase.id).await? {
        let date = dates
            .get(&slot.id)
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unscheduled".to_string());
        println!(
            "  [{}] {} vs {} on {}",
            slot.sequence,
            name(slot.team_a),
            name(slot.team_b),
            date
        );
    }
    for failure in &report.failures {
        println!("  [{}] failed: {}", failure.sequence, failure.error);
    }
    Ok(())
}
