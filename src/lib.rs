//! Rule-based tuberculosis symptom triage.
//!
//! The `triage` module holds the scoring engine, evaluation metrics and the
//! consultation service; `config`, `telemetry` and `error` carry the ambient
//! runtime concerns shared by the HTTP service and the CLI.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod triage;
