//! The materialized weekly grid: the crate's final output contract.

mod materializer;

pub use materializer::materialize;

use serde::{Deserialize, Serialize};

/// One broadcast placement in the final grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub start_slot: u32,
    pub end_slot: u32,
    pub start_hhmm: String,
    pub end_hhmm: String,
    pub program_id: String,
    pub title: String,
    pub genre: String,
    pub subgenre: String,
    pub duration_minutes: u32,
    pub cost: i64,
    pub ad_revenue: f64,
}

/// One day's placements, with daily rollups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDay {
    pub day: String,
    pub items: Vec<ScheduleItem>,
    pub day_cost: i64,
    pub day_revenue: f64,
    pub day_profit: f64,
}

/// Weekly budget rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub weekly_cost: i64,
    pub weekly_revenue: f64,
    pub weekly_profit: f64,
    pub budget_limit: i64,
    pub budget_used_pct: f64,
}

/// The final weekly grid: seven days of placements plus a budget rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub days: Vec<ScheduleDay>,
    pub budget_summary: BudgetSummary,
    #[serde(default)]
    pub meta: serde_json::Map<String, serde_json::Value>,
}
