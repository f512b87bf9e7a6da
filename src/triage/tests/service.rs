use super::common::*;
use crate::triage::domain::{ConsultationId, RiskTier, Subtype};
use crate::triage::intake::IntakeError;
use crate::triage::repository::{ConsultationRepository, RepositoryError};
use crate::triage::{ConsultationService, ConsultationServiceError};
use serde_json::json;
use std::sync::Arc;

#[test]
fn submit_scores_and_persists_the_consultation() {
    let (service, store) = build_service();

    let record = service.submit(high_risk_request()).expect("submission succeeds");

    assert_eq!(record.result.total_score, 10);
    assert_eq!(record.result.tier, RiskTier::High);
    assert_eq!(record.form.respondent.name, "Rahmat");
    assert_eq!(record.form.narrative, "sering demam");
    assert!(record.ground_truth.is_none());

    let stored = store
        .fetch(&record.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored, record);
}

#[test]
fn submit_rejects_malformed_answers_without_persisting() {
    let (service, store) = build_service();
    let request = serde_json::from_value(json!({ "gejala": "batuk" })).expect("valid json");

    match service.submit(request) {
        Err(ConsultationServiceError::Intake(IntakeError::MalformedAnswers { field })) => {
            assert_eq!(field, "symptoms")
        }
        other => panic!("expected intake error, got {other:?}"),
    }
    assert!(store.all().expect("all").is_empty());
}

#[test]
fn submit_propagates_repository_failures() {
    let service = ConsultationService::new(Arc::new(UnavailableRepository), engine());

    match service.submit(minimal_request()) {
        Err(ConsultationServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected unavailable repository, got {other:?}"),
    }
}

#[test]
fn get_propagates_not_found() {
    let (service, _) = build_service();

    match service.get(&ConsultationId("cst-404404".to_string())) {
        Err(ConsultationServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found error, got {other:?}"),
    }
}

#[test]
fn label_accepts_stored_and_short_tier_names() {
    let (service, _) = build_service();
    let record = service.submit(minimal_request()).expect("submission succeeds");

    let labeled = service
        .label(&record.id, Some("RISIKO RENDAH"))
        .expect("label succeeds");
    assert_eq!(labeled.ground_truth, Some(RiskTier::Low));

    let relabeled = service
        .label(&record.id, Some("high"))
        .expect("relabel succeeds");
    assert_eq!(relabeled.ground_truth, Some(RiskTier::High));
    assert_eq!(relabeled.result, record.result);
    assert_eq!(relabeled.created_at, record.created_at);

    let cleared = service.label(&record.id, None).expect("clear succeeds");
    assert!(cleared.ground_truth.is_none());

    let blank = service.label(&record.id, Some("  ")).expect("blank clears");
    assert!(blank.ground_truth.is_none());
}

#[test]
fn label_rejects_labels_outside_the_tier_vocabulary() {
    let (service, store) = build_service();
    let record = service.submit(minimal_request()).expect("submission succeeds");

    match service.label(&record.id, Some("RISIKO EKSTREM")) {
        Err(ConsultationServiceError::UnknownLabel(label)) => assert_eq!(label, "RISIKO EKSTREM"),
        other => panic!("expected unknown label error, got {other:?}"),
    }
    assert!(store.labeled().expect("labeled").is_empty());
}

#[test]
fn evaluation_requires_five_labeled_consultations() {
    let (service, _) = build_service();
    let mut ids = Vec::new();
    for _ in 0..5 {
        ids.push(service.submit(high_risk_request()).expect("submit").id);
    }

    for id in &ids[..4] {
        service.label(id, Some("RISIKO TINGGI")).expect("label");
    }
    let report = service.evaluation().expect("evaluation runs");
    assert!(!report.has_sufficient_data);
    assert_eq!(report.sample_count, 4);

    service.label(&ids[4], Some("RISIKO SEDANG")).expect("label");
    let report = service.evaluation().expect("evaluation runs");
    assert!(report.has_sufficient_data);
    let metrics = report.metrics.expect("metrics computed");
    assert!((metrics.accuracy - 0.8).abs() < 1e-9);
    assert_eq!(metrics.confusion_matrix[RiskTier::Moderate.index()][RiskTier::High.index()], 1);
}

#[test]
fn reports_are_recomputed_on_every_call() {
    let repository = Arc::new(CountingRepository::default());
    let service = ConsultationService::new(repository.clone(), engine());

    service.evaluation().expect("first evaluation");
    service.submit(high_risk_request()).expect("submit");
    service.evaluation().expect("second evaluation");
    service.statistics().expect("statistics");

    assert_eq!(*repository.scans.lock().expect("scan mutex poisoned"), 3);
}

#[test]
fn statistics_reflect_submissions() {
    let (service, _) = build_service();
    service.submit(high_risk_request()).expect("submit");
    service.submit(minimal_request()).expect("submit");

    let statistics = service.statistics().expect("statistics");
    assert_eq!(statistics.total, 2);
    assert_eq!(statistics.tier_count(RiskTier::High), 1);
    assert_eq!(statistics.tier_count(RiskTier::Minimal), 1);
    assert_eq!(statistics.average_score, 5.0);
    assert_eq!(statistics.male, 1);
}

#[test]
fn minimal_submission_uses_sentinel_subtype() {
    let (service, _) = build_service();
    let record = service.submit(minimal_request()).expect("submit");
    assert_eq!(record.result.subtypes, vec![Subtype::Unspecified]);
    assert_eq!(record.form.respondent.name, "Anonim");
}
