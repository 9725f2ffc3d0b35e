use std::fmt;

use serde::Deserialize;

pub type JobId = u64;

/// Server-side job lifecycle states. Wire values outside the known set
/// decode as `Unknown` so one odd job never poisons a poll pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Authoritative job snapshot as served by `GET /jobs/{id}`.
///
/// Replaced wholesale every poll pass; never mutated locally. Fields the
/// client does not consume (timestamps and the like) are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub status: JobStatus,
    pub dataset_id: u64,
    #[serde(default)]
    pub base_model: String,
    #[serde(default = "default_epochs")]
    pub epochs: u32,
    #[serde(default)]
    pub adapter_path: Option<String>,
}

fn default_epochs() -> u32 {
    1
}

/// One entry of `GET /models/trained`. The first entry is the directory's
/// designated default for adapter selection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrainedModelSummary {
    pub job_id: JobId,
    pub base_model: String,
}

/// One entry of the base-model catalog (`GET /models`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BaseModelEntry {
    pub id: String,
    pub name: String,
}

/// Everything the engine reports back to its consumer. One event per
/// completed poll pass; one event per finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// One complete poll pass: successes only, registry order, never partial.
    PollPublished { jobs: Vec<JobRecord> },
    TrainedModels(Vec<TrainedModelSummary>),
    BaseModels(Vec<BaseModelEntry>),
    DirectoryFailed { message: String },
    SubmissionAccepted { job_id: JobId, dataset_id: String },
    SubmissionFailed { message: String },
    InferenceCompleted { response: String },
    InferenceFailed { message: String },
    DatasetUploaded { dataset_id: String },
    UploadFailed { message: String },
    AdapterDownloaded {
        job_id: JobId,
        path: std::path::PathBuf,
        sha256: String,
    },
    DownloadFailed { job_id: JobId, message: String },
}

/// Failure talking to the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ServiceError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceErrorKind {
    InvalidUrl,
    /// Server reachable, resource absent or not ready yet.
    NotFound,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
}

impl fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceErrorKind::InvalidUrl => write!(f, "invalid url"),
            ServiceErrorKind::NotFound => write!(f, "not found"),
            ServiceErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            ServiceErrorKind::Timeout => write!(f, "timeout"),
            ServiceErrorKind::Network => write!(f, "network error"),
            ServiceErrorKind::Decode => write!(f, "undecodable response"),
        }
    }
}
