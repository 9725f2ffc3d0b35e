use crate::selection::Selection;
use crate::state::{BaseModelChoice, JobId, JobState, SessionState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    /// Number of jobs the client tracks, including ones the last pass could
    /// not fetch.
    pub known_jobs: usize,
    pub jobs: Vec<JobRowView>,
    pub adapters: Vec<AdapterOptionView>,
    pub base_models: Vec<BaseModelChoice>,
    pub selection: Option<Selection>,
    pub no_trained_models: bool,
    pub last_dataset: Option<String>,
    pub status_line: Option<String>,
    pub last_response: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub job_id: JobId,
    pub status: JobState,
    pub dataset_id: u64,
    pub epochs: u32,
    pub adapter_ready: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterOptionView {
    pub job_id: JobId,
    pub base_model: String,
    pub selected: bool,
}
