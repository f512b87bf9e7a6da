//! Symptom intake, scoring, classification and evaluation for TBC screening.
//!
//! `engine` is the pure core: it never touches storage or I/O. Everything around it
//! (intake coercion, the store, the service facade and the HTTP router) is plumbing
//! that feeds it validated answers and persists what it returns.

pub mod catalog;
pub mod domain;
pub mod engine;
pub mod export;
pub mod intake;
pub mod metrics;
pub mod repository;
pub mod router;
pub mod service;
pub mod statistics;
pub mod store;

#[cfg(test)]
mod tests;

pub use catalog::{
    CatalogError, KeywordWeight, QuestionCatalog, QuestionCategory, QuestionItem, QuestionKind,
};
pub use domain::{
    AnswerSet, ConsultationId, ConsultationRecord, ConsultationView, DisplayTag, IntakeForm,
    MatchedKeyword, RespondentMetadata, RiskTier, ScoringResult, Subtype,
};
pub use engine::TriageEngine;
pub use intake::{ConsultationRequest, IntakeError, IntakeGuard};
pub use metrics::{evaluate, EvaluationReport, LabeledPrediction};
pub use repository::{ConsultationRepository, NewConsultation, RepositoryError};
pub use router::consultation_router;
pub use service::{ConsultationService, ConsultationServiceError};
pub use statistics::ConsultationStatistics;
pub use store::ConsultationStore;
