//! Turns a [`SolveResult`] back into the human- and dashboard-facing grid.
//!
//! Ground-truthed on `examples/original_source/airtime/src/export.py::starts_to_schedule`.

use std::collections::HashMap;

use crate::config::TOTAL_WEEKLY_BUDGET;
use crate::precompute::Precomputed;
use crate::solver::SolveResult;
use crate::time::{self, DAY_NAMES_FR};

use super::{BudgetSummary, Schedule, ScheduleDay, ScheduleItem};

pub fn materialize(pre: &Precomputed, result: &SolveResult) -> Schedule {
    let mut by_day: HashMap<usize, Vec<(u32, usize)>> = HashMap::new();
    for &((day, slot), program_idx) in &result.starts {
        by_day.entry(day).or_default().push((slot, program_idx));
    }

    let mut weekly_cost = 0i64;
    let mut weekly_revenue = 0.0f64;

    let mut days = Vec::with_capacity(DAY_NAMES_FR.len());
    for (day_idx, day_name) in DAY_NAMES_FR.iter().enumerate() {
        let mut placements = by_day.remove(&day_idx).unwrap_or_default();
        placements.sort_by_key(|&(slot, program_idx)| (slot, program_idx));

        let mut items = Vec::with_capacity(placements.len());
        let mut day_cost = 0i64;
        let mut day_revenue = 0.0f64;

        for (slot, program_idx) in placements {
            let program = pre.program(program_idx);
            let duration_slots = pre.duration_slots[program_idx];
            let revenue = pre
                .revenue
                .get(&((day_idx, slot), program_idx))
                .copied()
                .unwrap_or(0.0);

            day_cost += program.cost;
            day_revenue += revenue;

            items.push(ScheduleItem {
                start_slot: slot,
                end_slot: slot + duration_slots,
                start_hhmm: time::hhmm_from_slot_index(slot),
                end_hhmm: time::hhmm_from_slot_index(slot + duration_slots),
                program_id: program.id.clone(),
                title: program.title.clone(),
                genre: program.genre.clone(),
                subgenre: program.subgenre.clone(),
                duration_minutes: program.duration_minutes,
                cost: program.cost,
                ad_revenue: revenue,
            });
        }

        weekly_cost += day_cost;
        weekly_revenue += day_revenue;

        days.push(ScheduleDay {
            day: day_name.to_string(),
            items,
            day_cost,
            day_revenue,
            day_profit: day_revenue - day_cost as f64,
        });
    }

    let budget_summary = BudgetSummary {
        weekly_cost,
        weekly_revenue,
        weekly_profit: weekly_revenue - weekly_cost as f64,
        budget_limit: TOTAL_WEEKLY_BUDGET,
        budget_used_pct: 100.0 * weekly_cost as f64 / TOTAL_WEEKLY_BUDGET as f64,
    };

    Schedule { days, budget_summary, meta: serde_json::Map::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::SolveStatus;
    use chrono::NaiveDate;

    #[test]
    fn empty_result_produces_seven_empty_days() {
        let pre = crate::precompute::build_precomputed(
            Vec::new(),
            NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(),
        )
        .unwrap();
        let result = SolveResult {
            status: SolveStatus::Infeasible,
            objective: 0.0,
            best_bound: 0.0,
            starts: Vec::new(),
        };
        let schedule = materialize(&pre, &result);
        assert_eq!(schedule.days.len(), 7);
        assert!(schedule.days.iter().all(|d| d.items.is_empty()));
        assert_eq!(schedule.budget_summary.weekly_cost, 0);
    }
}
