#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartPolling,
    StopPolling,
    RefreshTrainedModels,
    RefreshBaseModels,
    SubmitTraining {
        dataset_id: String,
        base_model: String,
        epochs: u32,
    },
    RunInference {
        base_model: String,
        adapter_job_id: crate::JobId,
        prompt: String,
    },
    UploadDataset {
        name: String,
        path: String,
    },
    DownloadAdapter {
        job_id: crate::JobId,
    },
}
