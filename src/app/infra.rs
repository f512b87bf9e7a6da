use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tbc_triage::config::StorageConfig;
use tbc_triage::triage::{ConsultationService, ConsultationStore, RepositoryError, TriageEngine};
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Open the journal named by `APP_DATA_FILE`, or fall back to a throwaway in-memory store.
pub(crate) fn open_store(storage: &StorageConfig) -> Result<ConsultationStore, RepositoryError> {
    match &storage.data_file {
        Some(path) => ConsultationStore::open(path),
        None => {
            warn!("APP_DATA_FILE not set; consultations are kept in memory only");
            Ok(ConsultationStore::in_memory())
        }
    }
}

pub(crate) fn consultation_service(
    store: ConsultationStore,
) -> ConsultationService<ConsultationStore> {
    ConsultationService::new(Arc::new(store), TriageEngine::default())
}
