use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::catalog::{QuestionItem, QuestionKind};
use super::domain::ConsultationId;
use super::intake::ConsultationRequest;
use super::metrics::EvaluationReport;
use super::repository::{ConsultationRepository, RepositoryError};
use super::service::{ConsultationService, ConsultationServiceError};
use super::statistics::ConsultationStatistics;

/// Body of a ground-truth update. `null` clears the label.
#[derive(Debug, Clone, Deserialize)]
pub struct GroundTruthRequest {
    #[serde(default)]
    pub ground_truth: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionListView<'a> {
    pub kind: QuestionKind,
    pub questions: &'a [QuestionItem],
}

#[derive(Debug, Serialize)]
pub struct StatisticsReportView {
    pub statistics: ConsultationStatistics,
    pub evaluation: EvaluationReport,
}

/// Router builder exposing HTTP endpoints for intake, labeling and reporting.
pub fn consultation_router<R>(service: Arc<ConsultationService<R>>) -> Router
where
    R: ConsultationRepository + 'static,
{
    Router::new()
        .route("/api/v1/questions/:kind", get(questions_handler::<R>))
        .route("/api/v1/consultations", post(submit_handler::<R>))
        .route(
            "/api/v1/consultations/:consultation_id",
            get(consultation_handler::<R>),
        )
        .route(
            "/api/v1/consultations/:consultation_id/ground-truth",
            put(ground_truth_handler::<R>),
        )
        .route(
            "/api/v1/reports/statistics",
            get(statistics_handler::<R>),
        )
        .route(
            "/api/v1/reports/evaluation",
            get(evaluation_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn questions_handler<R>(
    State(service): State<Arc<ConsultationService<R>>>,
    Path(kind): Path<String>,
) -> Response
where
    R: ConsultationRepository + 'static,
{
    match QuestionKind::parse(&kind) {
        Some(kind) => {
            let view = QuestionListView {
                kind,
                questions: service.engine().catalog().questions(kind),
            };
            (StatusCode::OK, Json(view)).into_response()
        }
        None => {
            let payload = json!({
                "error": format!("unknown question list '{kind}'"),
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ConsultationService<R>>>,
    payload: Result<Json<ConsultationRequest>, JsonRejection>,
) -> Response
where
    R: ConsultationRepository + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };

    // The store may append to its journal file; keep that off the async workers.
    match tokio::task::spawn_blocking(move || service.submit(request)).await {
        Ok(Ok(record)) => (StatusCode::CREATED, Json(record.view())).into_response(),
        Ok(Err(error)) => error_response(error),
        Err(join_error) => join_failure_response(join_error),
    }
}

pub(crate) async fn consultation_handler<R>(
    State(service): State<Arc<ConsultationService<R>>>,
    Path(consultation_id): Path<String>,
) -> Response
where
    R: ConsultationRepository + 'static,
{
    match service.get(&ConsultationId(consultation_id)) {
        Ok(record) => (StatusCode::OK, Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn ground_truth_handler<R>(
    State(service): State<Arc<ConsultationService<R>>>,
    Path(consultation_id): Path<String>,
    payload: Result<Json<GroundTruthRequest>, JsonRejection>,
) -> Response
where
    R: ConsultationRepository + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };

    let id = ConsultationId(consultation_id);
    let labeled =
        tokio::task::spawn_blocking(move || service.label(&id, request.ground_truth.as_deref()))
            .await;
    match labeled {
        Ok(Ok(record)) => (StatusCode::OK, Json(record.view())).into_response(),
        Ok(Err(error)) => error_response(error),
        Err(join_error) => join_failure_response(join_error),
    }
}

pub(crate) async fn statistics_handler<R>(
    State(service): State<Arc<ConsultationService<R>>>,
) -> Response
where
    R: ConsultationRepository + 'static,
{
    let report = service.statistics().and_then(|statistics| {
        let evaluation = service.evaluation()?;
        Ok(StatisticsReportView {
            statistics,
            evaluation,
        })
    });

    match report {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn evaluation_handler<R>(
    State(service): State<Arc<ConsultationService<R>>>,
) -> Response
where
    R: ConsultationRepository + 'static,
{
    match service.evaluation() {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ConsultationServiceError) -> Response {
    let status = match &error {
        ConsultationServiceError::Intake(_) | ConsultationServiceError::UnknownLabel(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ConsultationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ConsultationServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ConsultationServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}

/// Body extraction failures keep axum's status code but use the same `{"error": ...}` shape.
fn rejection_response(rejection: JsonRejection) -> Response {
    let payload = json!({
        "error": rejection.body_text(),
    });
    (rejection.status(), Json(payload)).into_response()
}

fn join_failure_response(join_error: tokio::task::JoinError) -> Response {
    error!(error = %join_error, "consultation write task failed");
    let payload = json!({
        "error": "consultation write did not complete",
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}
