//! Constraint model construction and solver backends.
//!
//! Two backends are exposed under the same [`SolveResult`] contract: the
//! primary `"ortools"`-tagged backend (a MIP model built with `good_lp` and
//! solved in-process via HiGHS — no pure-Rust binding to Google's OR-Tools
//! library is available in the retrieved corpus, so this substitution is the
//! closest real equivalent; see `DESIGN.md`) and a `"minizinc"`-tagged
//! backend that shells out to an external `minizinc` process, mirroring
//! `examples/original_source/airtime/src/minizinc_solver.py`.

#[cfg(feature = "ortools-backend")]
pub mod highs_backend;
pub mod minizinc_backend;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::precompute::Cell;

/// Which backend produced (or should produce) a [`SolveResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backend {
    #[serde(rename = "ortools")]
    Ortools,
    #[serde(rename = "minizinc")]
    Minizinc,
}

/// Solver invocation parameters, mirroring `main.py`'s CLI flags.
#[derive(Debug, Clone)]
pub struct SchedulingParams {
    pub backend: Backend,
    pub time_limit_secs: u64,
    /// Relative MIP gap at which the solver may stop early; `0.0` disables early stop.
    pub relative_gap: f64,
    /// Path to a prior schedule's JSON output, used to warm-start the search.
    pub hint_path: Option<PathBuf>,
    pub num_workers: u32,
}

impl Default for SchedulingParams {
    fn default() -> Self {
        Self {
            backend: Backend::Ortools,
            time_limit_secs: 600,
            relative_gap: 0.001,
            hint_path: None,
            num_workers: 8,
        }
    }
}

/// Outcome of one solve attempt.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub status: SolveStatus,
    pub objective: f64,
    pub best_bound: f64,
    /// Every chosen placement, `(day, slot) -> program index`, one per covered cell.
    pub starts: Vec<(Cell, usize)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    Unknown,
}

/// Reads a warm-start hint file (a previously-materialized `Schedule`'s JSON)
/// into the set of `(day, slot, program_id)` keys it selected. Backends treat
/// a missing or malformed hint file as "no hint" rather than an error,
/// matching `ortools_solver.py`'s hint loader.
pub fn load_hint_keys(path: &std::path::Path) -> std::collections::HashSet<(usize, u32, String)> {
    let Ok(raw) = std::fs::read_to_string(path) else { return Default::default() };
    let Ok(schedule) = serde_json::from_str::<crate::schedule::Schedule>(&raw) else {
        return Default::default();
    };
    schedule
        .days
        .iter()
        .enumerate()
        .flat_map(|(day, d)| d.items.iter().map(move |item| (day, item.start_slot, item.program_id.clone())))
        .collect()
}
