//! Turns a raw catalog into a scored, capped instance the solver can consume.

pub mod capping;
pub mod eligibility;

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::catalog::{injected_news_blocks, Program};
use crate::config::{self, EUROPEAN_ORIGINS, FICTION_GENRES, MAX_CANDIDATES_PER_SLOT};
use crate::error::PrecomputeError;
use crate::time::{self, DAYS_PER_WEEK, SLOT_MINUTES, SLOTS_PER_DAY};

use capping::{cap_candidates, Candidate};
use eligibility::{is_eligible, EligibilityContext};

/// Key identifying one candidate placement: program starts at `(day, slot)`.
pub type Cell = (usize, u32);

/// Everything the model builder needs, derived once from the catalog.
pub struct Precomputed {
    pub programs: Vec<Program>,
    pub genre_id: HashMap<String, usize>,
    pub duration_slots: Vec<u32>,
    pub is_french: Vec<bool>,
    pub is_european: Vec<bool>,
    pub is_independent: Vec<bool>,
    pub is_fiction: Vec<bool>,
    /// Milli-minutes of ad time per minute of runtime, for the rolling ad-limit check.
    pub ad_rate_milli: Vec<i64>,
    /// `program_idx -> (day, slot)` for programs pinned to a fixed broadcast time.
    pub fixed_start: HashMap<usize, (usize, u32)>,
    /// `(day, slot) -> program indices` allowed to start there, after capping.
    pub candidates: HashMap<Cell, Vec<usize>>,
    /// Expected viewer count, floored to an integer and stored as `f64`.
    pub audience: HashMap<(Cell, usize), f64>,
    /// Expected ad revenue in euros, floored to an integer and stored as `f64`.
    pub revenue: HashMap<(Cell, usize), f64>,
    /// `revenue - cost` in euros; exact since both operands are integers.
    pub profit: HashMap<(Cell, usize), f64>,
}

impl Precomputed {
    pub fn program(&self, idx: usize) -> &Program {
        &self.programs[idx]
    }
}

/// Number of ad breaks a program of `duration_min` minutes in `genre` carries.
///
/// Ground-truthed on `config.py::ad_breaks_for_program`: programs under 30
/// minutes carry none; films cap at two; everything else gets one break per
/// 30 minutes of runtime.
pub fn ad_breaks_for_program(genre: &str, duration_min: u32) -> u32 {
    if duration_min < 30 {
        return 0;
    }
    if genre == "Film" {
        (duration_min / 45).min(2)
    } else {
        duration_min / 30
    }
}

/// Builds the full precomputed instance for the week starting `week_start`.
pub fn build_precomputed(
    mut programs: Vec<Program>,
    week_start: NaiveDate,
) -> Result<Precomputed, PrecomputeError> {
    programs.extend(injected_news_blocks());

    let genre_id = assign_genre_ids(&programs);
    let duration_slots: Vec<u32> =
        programs.iter().map(|p| p.duration_minutes.div_ceil(SLOT_MINUTES)).collect();
    let is_french: Vec<bool> = programs.iter().map(|p| p.origin == "France").collect();
    let is_european: Vec<bool> =
        programs.iter().map(|p| EUROPEAN_ORIGINS.contains(&p.origin.as_str())).collect();
    let is_independent: Vec<bool> = programs.iter().map(|p| p.independent).collect();
    let is_fiction: Vec<bool> = programs.iter().map(|p| FICTION_GENRES.contains(&p.genre.as_str())).collect();
    let ad_rate_milli: Vec<i64> = programs
        .iter()
        .map(|p| {
            let breaks = ad_breaks_for_program(&p.genre, p.duration_minutes);
            if p.duration_minutes == 0 {
                0
            } else {
                (breaks as i64 * config::AD_BREAK_MINUTES * 1000) / p.duration_minutes as i64
            }
        })
        .collect();

    let fixed_start = build_fixed_start(&programs)?;

    let ctx = EligibilityContext { week_start };
    let mut candidates: HashMap<Cell, Vec<usize>> = HashMap::new();
    let mut audience: HashMap<(Cell, usize), f64> = HashMap::new();
    let mut revenue: HashMap<(Cell, usize), f64> = HashMap::new();
    let mut profit: HashMap<(Cell, usize), f64> = HashMap::new();

    for day in 0..DAYS_PER_WEEK {
        for slot in 0..SLOTS_PER_DAY {
            let cell: Cell = (day, slot);
            let fixed_here = fixed_start
                .iter()
                .find(|(_, &(d, s))| d == day && s == slot)
                .map(|(&idx, _)| idx);

            let mut raw: Vec<Candidate> = Vec::new();
            for (idx, program) in programs.iter().enumerate() {
                if let Some(&(fd, fs)) = fixed_start.get(&idx) {
                    if (fd, fs) != (day, slot) {
                        continue;
                    }
                } else if !is_eligible(program, day, slot, duration_slots[idx], &ctx) {
                    continue;
                }
                raw.push(Candidate {
                    program_idx: idx,
                    genre: &program.genre,
                    audience: score_audience(program, day, slot),
                    cost: program.cost,
                });
            }
            if raw.is_empty() {
                continue;
            }

            let kept = cap_candidates(&raw, MAX_CANDIDATES_PER_SLOT, fixed_here);
            for idx in &kept {
                let program = &programs[*idx];
                let a = score_audience(program, day, slot);
                let r = score_revenue(program, day, slot, a);
                audience.insert((cell, *idx), a);
                revenue.insert((cell, *idx), r);
                profit.insert((cell, *idx), r - program.cost as f64);
            }
            candidates.insert(cell, kept);
        }
    }

    Ok(Precomputed {
        programs,
        genre_id,
        duration_slots,
        is_french,
        is_european,
        is_independent,
        is_fiction,
        ad_rate_milli,
        fixed_start,
        candidates,
        audience,
        revenue,
        profit,
    })
}

fn assign_genre_ids(programs: &[Program]) -> HashMap<String, usize> {
    let mut ids = HashMap::new();
    for p in programs {
        let next = ids.len();
        ids.entry(p.genre.clone()).or_insert(next);
    }
    ids
}

fn build_fixed_start(programs: &[Program]) -> Result<HashMap<usize, (usize, u32)>, PrecomputeError> {
    let mut fixed = HashMap::new();
    let mut occupied: HashMap<(usize, u32), String> = HashMap::new();
    for (idx, program) in programs.iter().enumerate() {
        let Some(fixed_time) = program.fixed_time.as_deref() else { continue };
        let Some(slot) = time::slot_index_from_hhmm(fixed_time) else { continue };
        for day_name in &program.fixed_days {
            let Some(day) = time::DAY_NAMES_FR.iter().position(|d| d == day_name) else { continue };
            if slot >= SLOTS_PER_DAY {
                return Err(PrecomputeError::FixedBlockOutOfRange {
                    program_id: program.id.clone(),
                    day,
                    slot,
                });
            }
            if let Some(existing) = occupied.get(&(day, slot)) {
                return Err(PrecomputeError::FixedBlockConflict {
                    day,
                    slot,
                    first: existing.clone(),
                    second: program.id.clone(),
                });
            }
            occupied.insert((day, slot), program.id.clone());
            fixed.insert(idx, (day, slot));
        }
    }
    Ok(fixed)
}

/// Expected audience for `program` if it starts at `(day, slot)`, using the
/// precomputer's authoritative time-band table (never the legacy heuristic's table).
/// Floored to an integer viewer count, per spec.md §3.
fn score_audience(program: &Program, day: usize, slot: u32) -> f64 {
    let band = time::band_for_slot(slot);
    (program.base_audience as f64 * band.audience_multiplier * time::day_coefficient(day)).floor()
}

/// Expected ad revenue for `program` if it starts at `(day, slot)`. Ad
/// minutes are `breaks * AD_BREAK_MINUTES`, not `breaks` alone. Floored to
/// an integer euro amount, per spec.md §3.
fn score_revenue(program: &Program, day: usize, slot: u32, audience: f64) -> f64 {
    let band = time::band_for_slot(slot);
    let breaks = ad_breaks_for_program(&program.genre, program.duration_minutes);
    let ad_minutes = breaks as f64 * config::AD_BREAK_MINUTES as f64;
    let _ = day;
    (audience / 1000.0 * band.cpm * ad_minutes).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ad_breaks_match_spec() {
        assert_eq!(ad_breaks_for_program("Film", 20), 0);
        assert_eq!(ad_breaks_for_program("Film", 90), 2);
        assert_eq!(ad_breaks_for_program("Film", 300), 2);
        assert_eq!(ad_breaks_for_program("Magazine", 60), 2);
        assert_eq!(ad_breaks_for_program("Magazine", 45), 1);
    }

    #[test]
    fn injected_news_blocks_are_fixed_every_day() {
        let programs = vec![];
        let week_start = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        let pre = build_precomputed(programs, week_start).unwrap();
        assert_eq!(pre.fixed_start.len(), 2 * DAYS_PER_WEEK);
    }

    #[test]
    fn fixed_conflict_is_detected() {
        let mut p1 = minimal_program("a");
        p1.fixed_time = Some("13:00".into());
        p1.fixed_days = vec!["Lundi".into()];
        let mut p2 = minimal_program("b");
        p2.fixed_time = Some("13:00".into());
        p2.fixed_days = vec!["Lundi".into()];
        let err = build_fixed_start(&[p1, p2]).unwrap_err();
        assert!(matches!(err, PrecomputeError::FixedBlockConflict { .. }));
    }

    fn minimal_program(id: &str) -> Program {
        Program {
            id: id.into(),
            title: id.into(),
            genre: "Magazine".into(),
            subgenre: String::new(),
            duration_minutes: 30,
            cost: 100,
            base_audience: 100_000,
            origin: "France".into(),
            year: 2020,
            age_rating: String::new(),
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
            fixed_time: None,
            fixed_days: Vec::new(),
            target_audience: Vec::new(),
        }
    }
}
