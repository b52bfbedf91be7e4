//! The `Program` data model (spec.md §3).

use serde::{Deserialize, Serialize};

/// One catalog entry: a broadcastable program and all metadata the
/// precomputer needs to decide where it may legally air.
///
/// Unknown JSON fields are ignored by `serde_json` by default; every
/// optional field below defaults to its "no restriction" value when
/// absent, matching the original catalog's shape
/// (`examples/original_source/airtime/src/loader.py::Program`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub id: String,
    pub title: String,
    pub genre: String,
    #[serde(default)]
    pub subgenre: String,
    pub duration_minutes: u32,
    pub cost: i64,
    pub base_audience: i64,
    pub origin: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub age_rating: String,

    // Rights envelope.
    #[serde(default)]
    pub rights_start: Option<String>,
    #[serde(default)]
    pub rights_end: Option<String>,
    #[serde(default)]
    pub in_production: bool,

    // Rerun policy.
    #[serde(default)]
    pub last_broadcast_date: Option<String>,
    #[serde(default)]
    pub min_rerun_days: Option<i64>,

    // Series metadata.
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub episode: Option<u32>,
    #[serde(default)]
    pub total_episodes: Option<u32>,
    #[serde(default)]
    pub max_episodes_per_week: Option<u32>,
    #[serde(default)]
    pub usual_day: Option<String>,
    #[serde(default)]
    pub usual_time: Option<String>,
    #[serde(default)]
    pub previous_episode: Option<String>,

    // Editorial tags.
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_exclusive: bool,
    #[serde(default)]
    pub independent: bool,
    #[serde(default)]
    pub first_broadcast: bool,
    #[serde(default)]
    pub health_magazine: bool,

    // Slot hints.
    #[serde(default)]
    pub preferred_slots: Vec<String>,
    #[serde(default)]
    pub forbidden_slots: Vec<String>,
    #[serde(default)]
    pub compatible_genres: Vec<String>,
    #[serde(default)]
    pub incompatible_genres: Vec<String>,

    // Hard pinning.
    #[serde(default)]
    pub fixed_time: Option<String>,
    #[serde(default)]
    pub fixed_days: Vec<String>,

    #[serde(default)]
    pub target_audience: Vec<String>,
}

impl Program {
    pub fn is_series(&self) -> bool {
        self.episode.is_some()
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed_time.is_some()
    }
}

/// Builds the two synthetic "JT+Météo" pseudo-programs (spec.md §3 "Fixed
/// news blocks"), pinned to every day of the week at 13:00 and 20:00.
pub fn injected_news_blocks() -> Vec<Program> {
    let day_names: Vec<String> = crate::time::DAY_NAMES_FR.iter().map(|s| s.to_string()).collect();
    [("JT+Meteo_13", "13:00"), ("JT+Meteo_20", "20:00")]
        .into_iter()
        .map(|(id, start)| Program {
            id: id.to_string(),
            title: id.replace('_', " "),
            genre: "JT".to_string(),
            subgenre: "JT+Météo".to_string(),
            duration_minutes: 40,
            cost: 0,
            base_audience: 800_000,
            origin: "France".to_string(),
            year: 2026,
            age_rating: "Tout public".to_string(),
            rights_start: None,
            rights_end: None,
            in_production: false,
            last_broadcast_date: None,
            min_rerun_days: None,
            season: None,
            episode: None,
            total_episodes: None,
            max_episodes_per_week: None,
            usual_day: None,
            usual_time: None,
            previous_episode: None,
            is_new: false,
            is_exclusive: false,
            independent: false,
            first_broadcast: false,
            health_magazine: false,
            preferred_slots: Vec::new(),
            forbidden_slots: Vec::new(),
            compatible_genres: Vec::new(),
            incompatible_genres: Vec::new(),
            fixed_time: Some(start.to_string()),
            fixed_days: day_names.clone(),
            target_audience: Vec::new(),
        })
        .collect()
}
