use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use crate::triage::domain::{
    AnswerSet, ConsultationId, ConsultationRecord, IntakeForm, RespondentMetadata, RiskTier,
};
use crate::triage::engine::TriageEngine;
use crate::triage::intake::ConsultationRequest;
use crate::triage::repository::{ConsultationRepository, NewConsultation, RepositoryError};
use crate::triage::store::ConsultationStore;
use crate::triage::{consultation_router, ConsultationService};

pub(super) fn answers(keys: &[&str]) -> AnswerSet {
    keys.iter().map(|key| (*key, true)).collect()
}

pub(super) fn engine() -> TriageEngine {
    TriageEngine::default()
}

pub(super) fn respondent() -> RespondentMetadata {
    RespondentMetadata {
        name: "Dewi".to_string(),
        age: 29,
        gender: "Perempuan".to_string(),
        location: "Yogyakarta".to_string(),
    }
}

pub(super) fn form(symptoms: &[&str], risks: &[&str], narrative: &str) -> IntakeForm {
    IntakeForm {
        respondent: respondent(),
        symptoms: answers(symptoms),
        risk_factors: answers(risks),
        narrative: narrative.to_string(),
    }
}

/// A stored record with a fixed timestamp, for statistics and export tests.
pub(super) fn record(
    sequence: u32,
    form: IntakeForm,
    ground_truth: Option<RiskTier>,
) -> ConsultationRecord {
    let result = engine().analyze_form(&form);
    ConsultationRecord {
        id: ConsultationId(format!("cst-{sequence:06}")),
        created_at: Utc
            .with_ymd_and_hms(2024, 3, 1, 8, 0, 0)
            .single()
            .expect("valid timestamp")
            + chrono::Duration::minutes(i64::from(sequence)),
        form,
        result,
        ground_truth,
    }
}

pub(super) fn high_risk_request() -> ConsultationRequest {
    serde_json::from_value(json!({
        "nama": "Rahmat",
        "usia": 52,
        "jenis_kelamin": "Laki-laki",
        "lokasi": "Medan",
        "gejala": {"batuk_darah": true},
        "faktor_risiko": {"hiv": true},
        "cerita": "Sering demam"
    }))
    .expect("valid request")
}

pub(super) fn minimal_request() -> ConsultationRequest {
    ConsultationRequest::default()
}

pub(super) fn build_service() -> (ConsultationService<ConsultationStore>, Arc<ConsultationStore>) {
    let store = Arc::new(ConsultationStore::in_memory());
    let service = ConsultationService::new(store.clone(), engine());
    (service, store)
}

pub(super) fn router_with_service(service: ConsultationService<ConsultationStore>) -> axum::Router {
    consultation_router(Arc::new(service))
}

/// Store whose every operation fails, for error-path tests.
pub(super) struct UnavailableRepository;

impl ConsultationRepository for UnavailableRepository {
    fn insert(&self, _consultation: NewConsultation) -> Result<ConsultationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ConsultationId) -> Result<Option<ConsultationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn set_ground_truth(
        &self,
        _id: &ConsultationId,
        _ground_truth: Option<RiskTier>,
    ) -> Result<ConsultationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<ConsultationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Store that records how often it was scanned, to prove reports are recomputed.
#[derive(Default)]
pub(super) struct CountingRepository {
    pub(super) inner: ConsultationStore,
    pub(super) scans: Mutex<usize>,
}

impl ConsultationRepository for CountingRepository {
    fn insert(&self, consultation: NewConsultation) -> Result<ConsultationRecord, RepositoryError> {
        self.inner.insert(consultation)
    }

    fn fetch(&self, id: &ConsultationId) -> Result<Option<ConsultationRecord>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn set_ground_truth(
        &self,
        id: &ConsultationId,
        ground_truth: Option<RiskTier>,
    ) -> Result<ConsultationRecord, RepositoryError> {
        self.inner.set_ground_truth(id, ground_truth)
    }

    fn all(&self) -> Result<Vec<ConsultationRecord>, RepositoryError> {
        *self.scans.lock().expect("scan mutex poisoned") += 1;
        self.inner.all()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}
