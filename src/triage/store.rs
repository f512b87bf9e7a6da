use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info};

use super::domain::{ConsultationId, ConsultationRecord, RiskTier};
use super::repository::{ConsultationRepository, NewConsultation, RepositoryError};

const ID_PREFIX: &str = "cst-";

/// Consultation store backed by memory and, optionally, an append-only JSON-lines journal.
///
/// Every insert or label change appends the full record as one line. On open the
/// journal is replayed and the last line for an id wins.
#[derive(Debug, Clone, Default)]
pub struct ConsultationStore {
    state: Arc<Mutex<StoreState>>,
    journal: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct StoreState {
    records: Vec<ConsultationRecord>,
    next_sequence: u64,
}

impl ConsultationStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let mut state = StoreState::default();

        if path.exists() {
            let file = File::open(&path).map_err(unavailable)?;
            for (index, line) in BufReader::new(file).lines().enumerate() {
                let line = line.map_err(unavailable)?;
                if line.trim().is_empty() {
                    continue;
                }
                let record: ConsultationRecord =
                    serde_json::from_str(&line).map_err(|source| RepositoryError::Corrupt {
                        line: index + 1,
                        source,
                    })?;
                state.replay(record);
            }
        } else if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(unavailable)?;
        }

        info!(
            path = %path.display(),
            records = state.records.len(),
            "consultation journal opened"
        );

        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            journal: Some(path),
        })
    }

    pub fn journal_path(&self) -> Option<&Path> {
        self.journal.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }

    fn append(&self, record: &ConsultationRecord) -> Result<(), RepositoryError> {
        let Some(path) = &self.journal else {
            return Ok(());
        };
        let line = serde_json::to_string(record)
            .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(unavailable)?;
        writeln!(file, "{line}").map_err(unavailable)?;
        debug!(id = %record.id, "consultation journaled");
        Ok(())
    }
}

impl StoreState {
    fn replay(&mut self, record: ConsultationRecord) {
        if let Some(sequence) = sequence_of(&record.id) {
            self.next_sequence = self.next_sequence.max(sequence);
        }
        match self.records.iter_mut().find(|stored| stored.id == record.id) {
            Some(stored) => *stored = record,
            None => self.records.push(record),
        }
    }

    fn allocate_id(&mut self) -> ConsultationId {
        self.next_sequence += 1;
        ConsultationId(format!("{ID_PREFIX}{:06}", self.next_sequence))
    }
}

fn sequence_of(id: &ConsultationId) -> Option<u64> {
    id.0.strip_prefix(ID_PREFIX)?.parse().ok()
}

fn unavailable(err: std::io::Error) -> RepositoryError {
    RepositoryError::Unavailable(err.to_string())
}

impl ConsultationRepository for ConsultationStore {
    fn insert(&self, consultation: NewConsultation) -> Result<ConsultationRecord, RepositoryError> {
        let mut state = self.lock()?;
        let id = state.allocate_id();
        if state.records.iter().any(|stored| stored.id == id) {
            return Err(RepositoryError::Conflict);
        }

        let record = ConsultationRecord {
            id,
            created_at: Utc::now(),
            form: consultation.form,
            result: consultation.result,
            ground_truth: None,
        };

        self.append(&record)?;
        state.records.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ConsultationId) -> Result<Option<ConsultationRecord>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.records.iter().find(|stored| &stored.id == id).cloned())
    }

    fn set_ground_truth(
        &self,
        id: &ConsultationId,
        ground_truth: Option<RiskTier>,
    ) -> Result<ConsultationRecord, RepositoryError> {
        let mut state = self.lock()?;
        let position = state
            .records
            .iter()
            .position(|stored| &stored.id == id)
            .ok_or(RepositoryError::NotFound)?;

        let mut updated = state.records[position].clone();
        updated.ground_truth = ground_truth;
        self.append(&updated)?;
        state.records[position] = updated.clone();
        Ok(updated)
    }

    fn all(&self) -> Result<Vec<ConsultationRecord>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.records.clone())
    }
}
