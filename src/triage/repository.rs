use super::domain::{ConsultationId, ConsultationRecord, IntakeForm, RiskTier, ScoringResult};

/// A scored questionnaire waiting for the store to assign its id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewConsultation {
    pub form: IntakeForm,
    pub result: ScoringResult,
}

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Inserting stores the respondent and the result as one unit.
pub trait ConsultationRepository: Send + Sync {
    fn insert(&self, consultation: NewConsultation) -> Result<ConsultationRecord, RepositoryError>;
    fn fetch(&self, id: &ConsultationId) -> Result<Option<ConsultationRecord>, RepositoryError>;
    fn set_ground_truth(
        &self,
        id: &ConsultationId,
        ground_truth: Option<RiskTier>,
    ) -> Result<ConsultationRecord, RepositoryError>;
    /// Every stored consultation, oldest first.
    fn all(&self) -> Result<Vec<ConsultationRecord>, RepositoryError>;

    /// Consultations carrying a reviewer label.
    fn labeled(&self) -> Result<Vec<ConsultationRecord>, RepositoryError> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|record| record.ground_truth.is_some())
            .collect())
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("journal line {line} is corrupt: {source}")]
    Corrupt {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl RepositoryError {
    /// Conflicts and outages may succeed on retry; missing or corrupt data will not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict | Self::Unavailable(_))
    }
}
