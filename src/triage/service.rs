use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{ConsultationId, ConsultationRecord, RiskTier};
use super::engine::TriageEngine;
use super::intake::{ConsultationRequest, IntakeError, IntakeGuard};
use super::metrics::{evaluate_records, EvaluationReport};
use super::repository::{ConsultationRepository, NewConsultation, RepositoryError};
use super::statistics::ConsultationStatistics;

/// Service composing intake validation, the triage engine and the consultation store.
pub struct ConsultationService<R> {
    guard: IntakeGuard,
    engine: Arc<TriageEngine>,
    repository: Arc<R>,
}

impl<R> ConsultationService<R>
where
    R: ConsultationRepository + 'static,
{
    pub fn new(repository: Arc<R>, engine: TriageEngine) -> Self {
        Self {
            guard: IntakeGuard,
            engine: Arc::new(engine),
            repository,
        }
    }

    pub fn engine(&self) -> &TriageEngine {
        &self.engine
    }

    /// Validate, score and persist one questionnaire.
    pub fn submit(
        &self,
        request: ConsultationRequest,
    ) -> Result<ConsultationRecord, ConsultationServiceError> {
        let form = self.guard.form_from_request(request)?;
        let result = self.engine.analyze_form(&form);

        let record = self.repository.insert(NewConsultation { form, result })?;
        info!(
            id = %record.id,
            total_score = record.result.total_score,
            tier = record.result.tier.label(),
            keywords = record.result.matched_keywords.len(),
            "consultation scored"
        );
        Ok(record)
    }

    /// Fetch a stored consultation for API responses.
    pub fn get(&self, id: &ConsultationId) -> Result<ConsultationRecord, ConsultationServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Attach (or clear) the reviewer label. Labels outside the tier vocabulary are rejected.
    pub fn label(
        &self,
        id: &ConsultationId,
        raw_label: Option<&str>,
    ) -> Result<ConsultationRecord, ConsultationServiceError> {
        let ground_truth = match raw_label.map(str::trim).filter(|label| !label.is_empty()) {
            Some(label) => Some(
                RiskTier::from_label(label)
                    .ok_or_else(|| ConsultationServiceError::UnknownLabel(label.to_string()))?,
            ),
            None => None,
        };

        let record = self.repository.set_ground_truth(id, ground_truth)?;
        info!(id = %record.id, ground_truth = ?ground_truth, "ground truth recorded");
        Ok(record)
    }

    /// Recompute evaluation metrics over the current labeled snapshot.
    pub fn evaluation(&self) -> Result<EvaluationReport, ConsultationServiceError> {
        let labeled = self.repository.labeled()?;
        let report = evaluate_records(&labeled);
        if !report.has_sufficient_data {
            warn!(
                labeled = report.sample_count,
                "evaluation skipped: not enough labeled consultations"
            );
        }
        Ok(report)
    }

    pub fn statistics(&self) -> Result<ConsultationStatistics, ConsultationServiceError> {
        let records = self.repository.all()?;
        Ok(ConsultationStatistics::from_records(&records))
    }

    pub fn consultations(&self) -> Result<Vec<ConsultationRecord>, ConsultationServiceError> {
        Ok(self.repository.all()?)
    }
}

/// Error raised by the consultation service.
#[derive(Debug, thiserror::Error)]
pub enum ConsultationServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error("unknown ground truth label '{0}'")]
    UnknownLabel(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
