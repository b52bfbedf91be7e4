//! Per-cell eligibility filters.
//!
//! Each filter answers one narrow question about whether `program` may be
//! the first slot of a broadcast starting at `(day, slot)`. They are applied
//! in this order (ground-truthed on
//! `examples/original_source/airtime/src/preprocess.py::build_precomputed`):
//! fit, availability, rerun rule, age signal, new-content pinning,
//! exclusivity cooldown, series habit.

use chrono::{Days, NaiveDate};

use crate::catalog::Program;
use crate::config;
use crate::time::{self, SLOTS_PER_DAY};

/// Calendar context a filter needs to resolve relative dates against.
#[derive(Debug, Clone, Copy)]
pub struct EligibilityContext {
    pub week_start: NaiveDate,
}

impl EligibilityContext {
    pub fn date_for_day(&self, day: usize) -> NaiveDate {
        self.week_start + Days::new(day as u64)
    }
}

/// Does the program fit entirely within the broadcast day if started at `slot`?
pub fn fits(slot: u32, duration_slots: u32) -> bool {
    slot + duration_slots <= SLOTS_PER_DAY
}

/// Is the program generally available (not still in production, and within
/// its rights window if one is declared)?
pub fn is_available(program: &Program, ctx: &EligibilityContext, day: usize) -> bool {
    if program.in_production {
        return false;
    }
    let date = ctx.date_for_day(day);
    if let Some(start) = program.rights_start.as_deref().and_then(parse_date) {
        if date < start {
            return false;
        }
    }
    if let Some(end) = program.rights_end.as_deref().and_then(parse_date) {
        if date > end {
            return false;
        }
    }
    true
}

/// Enforces the minimum gap since this program's last broadcast. An explicit
/// `min_rerun_days` on the program always wins over the genre default.
pub fn passes_rerun_rule(program: &Program, ctx: &EligibilityContext, day: usize) -> bool {
    let Some(last) = program.last_broadcast_date.as_deref().and_then(parse_date) else {
        return true;
    };
    let gap_days = program
        .min_rerun_days
        .or_else(|| config::default_rerun_gap_days(&program.genre));
    let Some(gap_days) = gap_days else { return true };
    let date = ctx.date_for_day(day);
    (date - last).num_days() >= gap_days
}

/// Age-rated content may not start before its age-appropriate watershed.
pub fn passes_age_signal(program: &Program, slot: u32) -> bool {
    match config::min_start_slot_for_age_rating(&program.age_rating) {
        Some(min_slot) => slot >= min_slot,
        None => true,
    }
}

/// Newly-acquired content is pinned to the high-visibility Access
/// Prime / Prime Time window, so it airs when it can build an audience.
pub fn passes_new_content_pinning(program: &Program, slot: u32) -> bool {
    if !program.is_new {
        return true;
    }
    let access_prime_start = 144;
    let prime_time_end = 198;
    (access_prime_start..prime_time_end).contains(&slot)
}

/// Exclusive content observes a long cooldown after its last broadcast,
/// on top of (not instead of) the ordinary rerun rule.
pub fn passes_exclusivity_cooldown(program: &Program, ctx: &EligibilityContext, day: usize) -> bool {
    if !program.is_exclusive {
        return true;
    }
    let Some(last) = program.last_broadcast_date.as_deref().and_then(parse_date) else {
        return true;
    };
    let date = ctx.date_for_day(day);
    (date - last).num_days() >= config::EXCLUSIVE_COOLDOWN_DAYS
}

/// A series with an established weekly slot is tolerated only within a
/// narrow window around its usual day and time, to keep viewer habits intact.
pub fn passes_series_habit(program: &Program, day: usize, slot: u32) -> bool {
    let (Some(usual_day), Some(usual_time)) = (program.usual_day.as_deref(), program.usual_time.as_deref()) else {
        return true;
    };
    let Some(usual_day_idx) = time::DAY_NAMES_FR.iter().position(|d| *d == usual_day) else {
        return true;
    };
    if day != usual_day_idx {
        return false;
    }
    let Some(usual_slot) = time::slot_index_from_hhmm(usual_time) else {
        return true;
    };
    let delta = slot as i32 - usual_slot as i32;
    delta.abs() <= config::USUAL_TIME_TOLERANCE_SLOTS
}

/// Applies every filter in the canonical order; short-circuits on first failure.
pub fn is_eligible(
    program: &Program,
    day: usize,
    slot: u32,
    duration_slots: u32,
    ctx: &EligibilityContext,
) -> bool {
    fits(slot, duration_slots)
        && is_available(program, ctx, day)
        && passes_rerun_rule(program, ctx, day)
        && passes_age_signal(program, slot)
        && passes_new_content_pinning(program, slot)
        && passes_exclusivity_cooldown(program, ctx, day)
        && passes_series_habit(program, day, slot)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> EligibilityContext {
        EligibilityContext { week_start: NaiveDate::from_ymd_opt(2026, 8, 3).unwrap() }
    }

    fn base_program() -> Program {
        Program {
            id: "p".into(),
            title: "P".into(),
            genre: "Film".into(),
            subgenre: String::new(),
            duration_minutes: 90,
            cost: 1000,
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

    #[test]
    fn fit_rejects_overflow() {
        assert!(!fits(235, 18));
        assert!(fits(220, 18));
    }

    #[test]
    fn in_production_is_unavailable() {
        let mut p = base_program();
        p.in_production = true;
        assert!(!is_available(&p, &ctx(), 0));
    }

    #[test]
    fn rerun_rule_blocks_too_soon() {
        let mut p = base_program();
        p.genre = "Film".into();
        p.last_broadcast_date = Some("2026-07-20".into()); // 14 days before week_start
        assert!(!passes_rerun_rule(&p, &ctx(), 0)); // Film default is 90 days
    }

    #[test]
    fn explicit_rerun_days_overrides_genre_default() {
        let mut p = base_program();
        p.last_broadcast_date = Some("2026-07-20".into());
        p.min_rerun_days = Some(10);
        assert!(passes_rerun_rule(&p, &ctx(), 0));
    }

    #[test]
    fn age_signal_blocks_early_slots() {
        let mut p = base_program();
        p.age_rating = "-16".into();
        assert!(!passes_age_signal(&p, 0));
        let min_slot = time::slot_index_from_hhmm("22:30").unwrap();
        assert!(passes_age_signal(&p, min_slot));
    }

    #[test]
    fn series_habit_confines_to_usual_window() {
        let mut p = base_program();
        p.usual_day = Some("Lundi".into());
        p.usual_time = Some("20:00".into());
        let usual_slot = time::slot_index_from_hhmm("20:00").unwrap();
        assert!(passes_series_habit(&p, 0, usual_slot));
        assert!(!passes_series_habit(&p, 1, usual_slot));
        assert!(!passes_series_habit(&p, 0, usual_slot + 10));
    }
}
