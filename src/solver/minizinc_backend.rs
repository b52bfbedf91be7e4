//! Finite-domain backend: shells out to an external `minizinc` process.
//!
//! Ground-truthed on `examples/original_source/airtime/src/minizinc_solver.py`:
//! the coefficient tables are serialized to a `.dzn` parameter file alongside
//! the bundled `assets/grid_model.mzn` model, and `minizinc` is invoked
//! against the `gecode` solver with a wall-clock time limit. This backend
//! only encodes coverage, fixes, and the budget ceiling — the full quota,
//! variety, alternation and ad-limit constraints live in the primary
//! `"ortools"`-tagged backend ([`super::highs_backend`]); see `DESIGN.md`.

use std::fmt::Write as _;
use std::path::Path;
use std::process::Command;

use crate::error::SolveError;
use crate::precompute::Precomputed;
use crate::time::{DAYS_PER_WEEK, SLOTS_PER_DAY};

use super::{SchedulingParams, SolveResult, SolveStatus};

const MODEL_PATH: &str = "assets/grid_model.mzn";

pub fn solve(pre: &Precomputed, params: &SchedulingParams) -> Result<SolveResult, SolveError> {
    let program_count = pre.programs.len();
    let dzn = write_dzn(pre, program_count);

    let data_file = tempfile::Builder::new()
        .suffix(".dzn")
        .tempfile()
        .map_err(|source| SolveError::ProcessSpawn { command: "mktemp".into(), source })?;
    std::fs::write(data_file.path(), dzn)
        .map_err(|source| SolveError::ProcessSpawn { command: "write dzn".into(), source })?;

    let output = Command::new("minizinc")
        .arg("--solver")
        .arg("gecode")
        .arg("--time-limit")
        .arg((params.time_limit_secs * 1000).to_string())
        .arg("--output-mode")
        .arg("json")
        .arg(MODEL_PATH)
        .arg(data_file.path())
        .output()
        .map_err(|source| SolveError::ProcessSpawn { command: "minizinc".into(), source })?;

    if !output.status.success() {
        return Err(SolveError::BackendFailed {
            backend: "minizinc",
            message: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    parse_solution(pre, &String::from_utf8_lossy(&output.stdout))
}

fn write_dzn(pre: &Precomputed, program_count: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "D = {};", DAYS_PER_WEEK);
    let _ = writeln!(out, "S = {};", SLOTS_PER_DAY);
    let _ = writeln!(out, "P = {};", program_count);
    let _ = writeln!(out, "weekly_budget = {};", crate::config::TOTAL_WEEKLY_BUDGET);

    let _ = write!(out, "cost = [");
    for (i, program) in pre.programs.iter().enumerate() {
        if i > 0 {
            let _ = write!(out, ", ");
        }
        let _ = write!(out, "{}", program.cost);
    }
    let _ = writeln!(out, "];");

    let _ = write!(out, "dur = [");
    for (i, &d) in pre.duration_slots.iter().enumerate() {
        if i > 0 {
            let _ = write!(out, ", ");
        }
        let _ = write!(out, "{}", d);
    }
    let _ = writeln!(out, "];");

    let _ = writeln!(out, "fixed_prog = array2d(1..{}, 1..{}, [", DAYS_PER_WEEK, SLOTS_PER_DAY);
    for day in 0..DAYS_PER_WEEK {
        for slot in 0..SLOTS_PER_DAY {
            let fixed = pre
                .fixed_start
                .iter()
                .find(|(_, &(d, s))| d == day && s == slot)
                .map(|(&idx, _)| idx + 1)
                .unwrap_or(0);
            let _ = write!(out, "{}, ", fixed);
        }
    }
    let _ = writeln!(out, "]);");

    let _ = writeln!(
        out,
        "allowed = array3d(1..{}, 1..{}, 1..{}, [",
        DAYS_PER_WEEK, SLOTS_PER_DAY, program_count
    );
    for day in 0..DAYS_PER_WEEK {
        for slot in 0..SLOTS_PER_DAY {
            let allowed_here = pre.candidates.get(&(day, slot));
            for p in 0..program_count {
                let is_allowed = allowed_here.is_some_and(|v| v.contains(&p));
                let _ = write!(out, "{}, ", is_allowed);
            }
        }
    }
    let _ = writeln!(out, "]);");

    let _ = writeln!(
        out,
        "score = array3d(1..{}, 1..{}, 1..{}, [",
        DAYS_PER_WEEK, SLOTS_PER_DAY, program_count
    );
    for day in 0..DAYS_PER_WEEK {
        for slot in 0..SLOTS_PER_DAY {
            for p in 0..program_count {
                let s = pre.profit.get(&((day, slot), p)).copied().unwrap_or(0.0) as i64;
                let _ = write!(out, "{}, ", s);
            }
        }
    }
    let _ = writeln!(out, "]);");

    out
}

/// Parses the last JSON solution object MiniZinc's `--output-mode json`
/// streams to stdout (later solutions strictly improve on earlier ones).
fn parse_solution(pre: &Precomputed, stdout: &str) -> Result<SolveResult, SolveError> {
    let last_json = stdout
        .lines()
        .filter(|l| l.trim_start().starts_with('{'))
        .last()
        .ok_or_else(|| SolveError::BackendFailed {
            backend: "minizinc",
            message: "no solution object in minizinc output".into(),
        })?;

    let value: serde_json::Value =
        serde_json::from_str(last_json).map_err(|e| SolveError::BackendFailed {
            backend: "minizinc",
            message: e.to_string(),
        })?;

    let x = value
        .get("x")
        .and_then(|v| v.as_array())
        .ok_or_else(|| SolveError::BackendFailed {
            backend: "minizinc",
            message: "missing `x` array in solution".into(),
        })?;

    let mut starts = Vec::new();
    for (day, day_row) in x.iter().enumerate() {
        let Some(day_row) = day_row.as_array() else { continue };
        for (slot, slot_row) in day_row.iter().enumerate() {
            let Some(slot_row) = slot_row.as_array() else { continue };
            for (p, chosen) in slot_row.iter().enumerate() {
                if chosen.as_bool().unwrap_or(false) {
                    starts.push(((day, slot as u32), p));
                }
            }
        }
    }

    let objective = starts
        .iter()
        .map(|&(cell, p)| pre.profit.get(&(cell, p)).copied().unwrap_or(0.0))
        .sum();

    Ok(SolveResult { status: SolveStatus::Feasible, objective, best_bound: objective, starts })
}

pub fn model_path() -> &'static Path {
    Path::new(MODEL_PATH)
}
