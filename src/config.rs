//! Engine configuration.

use serde::Deserialize;
use std::num::NonZeroU32;

const DEFAULT_MATCH_SPACING_DAYS: NonZeroU32 = match NonZeroU32::new(3) {
    Some(days) => days,
    None => NonZeroU32::MIN,
};

/// Scheduling settings applied to every generated match.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Days between consecutive matches of one round, and between a round and the next.
    /// Zero is rejected at deserialization so match dates always move forward.
    #[serde(default = "default_match_spacing_days")]
    pub match_spacing_days: NonZeroU32,
    /// Venue stamped on generated matches; `None` leaves it to the organizers.
    #[serde(default)]
    pub venue: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            match_spacing_days: default_match_spacing_days(),
            venue: None,
        }
    }
}

impl EngineConfig {
    /// Read `MATCH_SPACING_DAYS` and `DEFAULT_VENUE`, falling back to defaults
    /// when a variable is missing or not a positive number of days.
    pub fn from_env() -> Self {
        let match_spacing_days = std::env::var("MATCH_SPACING_DAYS")
            .ok()
            .and_then(|d| d.trim().parse::<NonZeroU32>().ok())
            .unwrap_or_else(default_match_spacing_days);
        let venue = std::env::var("DEFAULT_VENUE")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        Self {
            match_spacing_days,
            venue,
        }
    }

    /// Spacing in the signed form date arithmetic works with.
    pub fn spacing_days(&self) -> i64 {
        i64::from(self.match_spacing_days.get())
    }
}

fn default_match_spacing_days() -> NonZeroU32 {
    DEFAULT_MATCH_SPACING_DAYS
}
