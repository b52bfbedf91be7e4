//! Legacy greedy heuristic, selected via `--solver legacy`.
//!
//! A single left-to-right, best-first fill pass: no backtracking, no
//! quota/variety/alternation awareness, no local-search refinement. It
//! exists as a fast fallback when a solver backend is unavailable or too
//! slow for the catalog size, not as a competitor to the constraint solvers.
//! Ground-truthed on the legacy scoring path in
//! `examples/original_source/airtime/src/audience.py` and `revenue.py`; the
//! refinement pass those modules feed into (`evaluator.py`'s local search)
//! is out of scope here (SPEC_FULL.md Non-goals).
//!
//! Deliberately uses its own CPM table, distinct from [`crate::time::TIME_BANDS`]:
//! the original catalog ships two independent cost tables (one for the
//! CP-model precomputer, one inherited by the legacy heuristic), and
//! preserving that discrepancy rather than unifying it keeps this backend's
//! output directly comparable to the legacy system it fell back from.

use crate::precompute::Precomputed;
use crate::solver::{SolveResult, SolveStatus};
use crate::time::{band_for_slot, DAYS_PER_WEEK, SLOTS_PER_DAY};

/// Legacy per-band CPM table (euros per thousand impressions), distinct from
/// the precomputer's authoritative table.
fn legacy_cpm(band_name: &str) -> f64 {
    match band_name {
        "Matin" => 7.0,
        "Matinée" => 5.0,
        "Midi" => 9.0,
        "Après-midi" => 6.0,
        "Access Prime" => 11.0,
        "Prime Time" => 15.0,
        "Deuxième partie" => 10.0,
        "Nuit" => 4.0,
        _ => 5.0,
    }
}

/// Legacy audience estimate: the precomputer's band multiplier and day
/// coefficient, a "heritage" adjustment toward the previous slot's audience,
/// and a small bonus for the program's own preferred slots.
fn legacy_audience(pre: &Precomputed, day: usize, slot: u32, program_idx: usize, previous_audience: Option<f64>) -> f64 {
    let program = pre.program(program_idx);
    let band = band_for_slot(slot);
    let mut audience = program.base_audience as f64 * band.audience_multiplier * crate::time::day_coefficient(day);

    if let Some(prev) = previous_audience {
        let ratio = (prev / audience.max(1.0)).clamp(0.8, 1.2);
        audience *= ratio;
    }

    let hhmm = crate::time::hhmm_from_slot_index(slot);
    if program.preferred_slots.iter().any(|s| s == &hhmm) {
        audience *= 1.05;
    }

    audience
}

fn legacy_profit(pre: &Precomputed, day: usize, slot: u32, program_idx: usize, previous_audience: f64) -> (f64, f64) {
    let program = pre.program(program_idx);
    let band = band_for_slot(slot);
    let audience = legacy_audience(pre, day, slot, program_idx, Some(previous_audience));
    let breaks = crate::precompute::ad_breaks_for_program(&program.genre, program.duration_minutes);
    let revenue = audience * legacy_cpm(band.name) / 1000.0 * breaks as f64;
    (audience, revenue - program.cost as f64)
}

/// Runs the greedy fill pass over the whole week.
pub fn run(pre: &Precomputed) -> SolveResult {
    let mut starts = Vec::new();
    let mut objective = 0.0;

    for day in 0..DAYS_PER_WEEK {
        let mut covered_until = 0u32;
        let mut previous_audience = 0.0f64;
        let mut slot = 0u32;
        while slot < SLOTS_PER_DAY {
            if slot < covered_until {
                slot += 1;
                continue;
            }
            let Some(candidates) = pre.candidates.get(&(day, slot)) else {
                slot += 1;
                continue;
            };

            let best = candidates
                .iter()
                .copied()
                .map(|p| {
                    let (audience, profit) = legacy_profit(pre, day, slot, p, previous_audience);
                    (p, audience, profit)
                })
                .max_by(|a, b| a.2.partial_cmp(&b.2).unwrap());

            let Some((program_idx, audience, profit)) = best else {
                slot += 1;
                continue;
            };

            starts.push(((day, slot), program_idx));
            objective += profit;
            previous_audience = audience;
            covered_until = slot + pre.duration_slots[program_idx];
            slot += 1;
        }
    }

    SolveResult { status: SolveStatus::Feasible, objective, best_bound: objective, starts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn legacy_fill_never_overlaps() {
        let pre = crate::precompute::build_precomputed(
            Vec::new(),
            NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(),
        )
        .unwrap();
        let result = run(&pre);

        for day in 0..DAYS_PER_WEEK {
            let mut placements: Vec<(u32, u32)> = result
                .starts
                .iter()
                .filter(|&&((d, _), _)| d == day)
                .map(|&((_, s), p)| (s, s + pre.duration_slots[p]))
                .collect();
            placements.sort();
            for pair in placements.windows(2) {
                assert!(pair[0].1 <= pair[1].0, "overlap on day {day}: {:?}", pair);
            }
        }
    }

    #[test]
    fn legacy_cpm_table_differs_from_precomputer_table() {
        // The two tables happen to agree on a couple of bands, but are not
        // the same table — some bands must disagree.
        let any_different = crate::time::TIME_BANDS.iter().any(|band| legacy_cpm(band.name) != band.cpm);
        assert!(any_different, "legacy table must stay independent from the precomputer's table");
    }
}
