//! Crate-wide error types.
//!
//! One `thiserror`-derived enum per pipeline stage, so callers can match on
//! the failure kind: catalog loading, precomputation, model building, and
//! solving each get their own error type, composed into a single top-level
//! `Error` for the CLI boundary.

use thiserror::Error;

/// Errors raised while loading and parsing the program catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("catalog is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("program at index {index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },
}

/// Errors raised while building the `Precomputed` instance.
#[derive(Error, Debug)]
pub enum PrecomputeError {
    #[error("fixed block for program `{program_id}` lies outside the broadcast day (day {day}, slot {slot})")]
    FixedBlockOutOfRange { program_id: String, day: usize, slot: u32 },

    #[error("two fixed blocks claim day {day} slot {slot}: `{first}` and `{second}`")]
    FixedBlockConflict { day: usize, slot: u32, first: String, second: String },
}

/// Errors raised while building the constraint model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error(
        "fixed program `{program_id}` at day {day} slot {slot} was filtered out of allowed_starts \
         (most likely by the `{likely_rule}` rule) before the model could pin it"
    )]
    FixedProgramUnavailable { program_id: String, day: usize, slot: u32, likely_rule: &'static str },
}

/// Errors raised while invoking a solver backend.
#[derive(Error, Debug)]
pub enum SolveError {
    #[error("solver backend `{backend}` failed: {message}")]
    BackendFailed { backend: &'static str, message: String },

    #[error("failed to invoke external solver process `{command}`: {source}")]
    ProcessSpawn { command: String, #[source] source: std::io::Error },
}

/// Top-level crate error, composing every stage's error type for the CLI boundary.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Precompute(#[from] PrecomputeError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Solve(#[from] SolveError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
