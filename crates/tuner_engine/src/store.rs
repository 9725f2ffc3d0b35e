use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tuner_logging::tuner_warn;

use crate::persist::{AtomicFileWriter, PersistError};
use crate::JobId;

const STATE_FILENAME: &str = ".tuner_state.ron";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedState {
    jobs: Vec<JobId>,
    last_dataset_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state serialization failed: {0}")]
    Serialize(String),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Durable client-local record of every job this client submitted, plus the
/// last-used dataset id. Shared by the poll loop (reads) and the submission
/// coordinator (writes); every mutation rewrites the state file atomically,
/// so concurrent writers are last-writer-wins per call.
#[derive(Debug, Clone)]
pub struct JobStore {
    dir: PathBuf,
}

impl JobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILENAME)
    }

    /// Registry ids in submission order. Missing or malformed state reads
    /// as empty rather than failing.
    pub fn load(&self) -> Vec<JobId> {
        self.read_state().jobs
    }

    pub fn last_dataset(&self) -> Option<String> {
        self.read_state().last_dataset_id
    }

    /// Appends a job id and persists immediately. Ids already present are
    /// kept at their original position.
    pub fn append(&self, id: JobId) -> Result<(), StoreError> {
        let mut state = self.read_state();
        if !state.jobs.contains(&id) {
            state.jobs.push(id);
        }
        self.write_state(&state)
    }

    pub fn set_last_dataset(&self, dataset_id: &str) -> Result<(), StoreError> {
        let mut state = self.read_state();
        state.last_dataset_id = Some(dataset_id.to_string());
        self.write_state(&state)
    }

    /// Registers a freshly accepted job and remembers its dataset in one
    /// persisted write, so a crash cannot leave only half the record.
    pub fn record_submission(&self, id: JobId, dataset_id: &str) -> Result<(), StoreError> {
        let mut state = self.read_state();
        if !state.jobs.contains(&id) {
            state.jobs.push(id);
        }
        state.last_dataset_id = Some(dataset_id.to_string());
        self.write_state(&state)
    }

    fn read_state(&self) -> PersistedState {
        let path = self.state_path();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return PersistedState::default();
            }
            Err(err) => {
                tuner_warn!("Failed to read persisted state from {:?}: {}", path, err);
                return PersistedState::default();
            }
        };

        match ron::from_str(&content) {
            Ok(state) => state,
            Err(err) => {
                tuner_warn!("Failed to parse persisted state from {:?}: {}", path, err);
                PersistedState::default()
            }
        }
    }

    fn write_state(&self, state: &PersistedState) -> Result<(), StoreError> {
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(state, pretty)
            .map_err(|err| StoreError::Serialize(err.to_string()))?;
        let writer = AtomicFileWriter::new(self.dir.clone());
        writer.write(STATE_FILENAME, &content)?;
        Ok(())
    }
}
