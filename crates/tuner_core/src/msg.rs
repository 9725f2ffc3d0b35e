#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Persisted registry and last-used dataset restored at startup.
    RegistryRestored {
        jobs: Vec<crate::JobId>,
        last_dataset: Option<String>,
    },
    /// One complete poll pass, successes only, in registry order.
    PollPublished { jobs: Vec<crate::JobSnapshot> },
    /// Fresh adapter listing from the directory.
    TrainedModelsLoaded(Vec<crate::TrainedModel>),
    /// Fresh base-model catalog from the directory.
    BaseModelsLoaded(Vec<crate::BaseModelChoice>),
    /// A listing refresh could not reach the directory.
    ListingsFailed { reason: String },
    /// User asked to re-pull the adapter and base-model listings.
    ListingsRefreshRequested,
    /// User asked to redraw the dashboard.
    RedrawRequested,
    /// User asked to queue a training run.
    TrainRequested {
        dataset_id: String,
        base_model: String,
        epochs: Option<u32>,
    },
    /// Engine accepted the submission and persisted the new job id.
    TrainAccepted {
        job_id: crate::JobId,
        dataset_id: String,
    },
    TrainRejected { reason: String },
    /// User picked an adapter for inference.
    AdapterSelected { job_id: crate::JobId },
    /// User submitted a prompt against the current selection.
    InferRequested { prompt: String },
    InferCompleted { response: String },
    InferFailed { reason: String },
    /// User asked to upload a dataset file.
    UploadRequested { name: String, path: String },
    DatasetUploaded { dataset_id: String },
    UploadFailed { reason: String },
    /// User asked to download a job's adapter artifact.
    DownloadRequested { job_id: crate::JobId },
    AdapterDownloaded { job_id: crate::JobId, path: String },
    DownloadFailed { job_id: crate::JobId, reason: String },
    /// User asked to leave; polling must stop before exit.
    QuitRequested,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
