//! Tuner engine: service IO, the poll loop, and the persistent job store.
mod api;
mod download;
mod engine;
mod persist;
mod poller;
mod store;
mod submit;
mod types;

pub use api::{HttpServiceClient, ServiceApi, ServiceSettings};
pub use download::{download_adapter_to, DownloadError, DownloadedAdapter};
pub use engine::{EngineCommand, EngineCommander, EngineHandle};
pub use persist::{ensure_dir, AtomicFileWriter, PersistError};
pub use poller::{poll_loop, ChannelEventSink, EventSink, PollSettings};
pub use store::{JobStore, StoreError};
pub use submit::{Submission, SubmissionCoordinator, SubmitError};
pub use types::{
    BaseModelEntry, EngineEvent, JobId, JobRecord, JobStatus, ServiceError, ServiceErrorKind,
    TrainedModelSummary,
};
