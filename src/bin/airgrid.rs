//! CLI entrypoint: catalog -> precompute -> solve -> materialize -> JSON.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use airgrid::precompute::build_precomputed;
use airgrid::schedule::materialize;
use airgrid::solver::{Backend, SchedulingParams};

#[derive(Parser, Debug)]
#[command(name = "airgrid", about = "Weekly TV program grid optimizer")]
struct Cli {
    /// Path to the program catalog JSON file.
    #[arg(long, default_value = "data/programs.json")]
    programs: PathBuf,

    /// Which scheduling backend to use.
    #[arg(long, value_enum, default_value_t = SolverArg::Ortools)]
    solver: SolverArg,

    /// Wall-clock solve time limit, in seconds.
    #[arg(long, default_value_t = 600)]
    time_limit: u64,

    /// Path to a prior schedule's JSON, used to warm-start the search.
    #[arg(long, default_value = "schedule.json")]
    hint: PathBuf,

    /// Relative MIP optimality gap at which the solver may stop early.
    #[arg(long, default_value_t = 0.001)]
    gap: f64,

    /// ISO date (YYYY-MM-DD) of the Monday the produced week starts on.
    /// Defaults to the next upcoming Monday.
    #[arg(long)]
    week_start: Option<String>,

    /// Where to write the materialized schedule.
    #[arg(long, default_value = "schedule.json")]
    out: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SolverArg {
    Ortools,
    Minizinc,
    Legacy,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    info!(path = %cli.programs.display(), "loading catalog");
    let programs = airgrid::catalog::load_catalog(&cli.programs)?;
    info!(count = programs.len(), "catalog loaded");

    let week_start = match &cli.week_start {
        Some(s) => chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")?,
        None => next_monday(),
    };
    info!(%week_start, "scheduling week");

    let pre = build_precomputed(programs, week_start)?;
    info!(cells = pre.candidates.len(), "precomputation complete");

    let result = match cli.solver {
        SolverArg::Ortools => {
            #[cfg(feature = "ortools-backend")]
            {
                let params = SchedulingParams {
                    backend: Backend::Ortools,
                    time_limit_secs: cli.time_limit,
                    relative_gap: cli.gap,
                    hint_path: cli.hint.exists().then_some(cli.hint.clone()),
                    num_workers: 8,
                };
                airgrid::solver::highs_backend::solve(&pre, &params)?
            }
            #[cfg(not(feature = "ortools-backend"))]
            {
                anyhow::bail!("binary was built without the `ortools-backend` feature")
            }
        }
        SolverArg::Minizinc => {
            let params = SchedulingParams {
                backend: Backend::Minizinc,
                time_limit_secs: cli.time_limit,
                relative_gap: cli.gap,
                hint_path: cli.hint.exists().then_some(cli.hint.clone()),
                num_workers: 8,
            };
            airgrid::solver::minizinc_backend::solve(&pre, &params)?
        }
        SolverArg::Legacy => airgrid::heuristic::run(&pre),
    };
    info!(objective = result.objective, placements = result.starts.len(), "solve complete");

    let mut schedule = materialize(&pre, &result);
    schedule.meta.insert("solver".into(), solver_tag(cli.solver).into());
    schedule.meta.insert("week_start".into(), week_start.to_string().into());
    if !matches!(cli.solver, SolverArg::Legacy) {
        schedule.meta.insert("status".into(), format!("{:?}", result.status).to_uppercase().into());
        schedule.meta.insert("objective".into(), (result.objective.round() as i64).into());
        schedule.meta.insert("best_bound".into(), (result.best_bound.round() as i64).into());
    }

    let json = serde_json::to_string_pretty(&schedule)?;
    std::fs::write(&cli.out, json)?;
    info!(path = %cli.out.display(), "schedule written");

    let exit_ok = matches!(
        result.status,
        airgrid::solver::SolveStatus::Optimal | airgrid::solver::SolveStatus::Feasible
    ) || matches!(cli.solver, SolverArg::Legacy);
    if !exit_ok {
        std::process::exit(1);
    }

    Ok(())
}

fn solver_tag(solver: SolverArg) -> &'static str {
    match solver {
        SolverArg::Ortools => "ortools",
        SolverArg::Minizinc => "minizinc",
        SolverArg::Legacy => "legacy",
    }
}

fn next_monday() -> chrono::NaiveDate {
    use chrono::{Datelike, Weekday};
    let today = chrono::Local::now().date_naive();
    let days_until_monday = (7 - today.weekday().num_days_from_monday()) % 7;
    let days_until_monday = if days_until_monday == 0 { 7 } else { days_until_monday };
    today + chrono::Days::new(days_until_monday as u64)
}
