use std::sync::Arc;

use thiserror::Error;
use tuner_logging::tuner_error;

use crate::{JobId, JobStore, ServiceApi, ServiceError};

#[derive(Debug, Error)]
pub enum SubmitError {
    /// Rejected locally; no network call was made.
    #[error("{0}")]
    Validation(String),
    #[error("submission rejected: {0}")]
    Service(#[from] ServiceError),
}

/// An accepted submission. `persisted` is false in the rare case where the
/// service accepted the job but the local registry write failed; the job
/// exists server-side either way, so the id is still reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub job_id: JobId,
    pub dataset_id: String,
    pub persisted: bool,
}

/// Validates and posts a new training request, then registers the job id
/// and the dataset id in the persistent store as one write.
pub struct SubmissionCoordinator {
    api: Arc<dyn ServiceApi>,
    store: Arc<JobStore>,
}

impl SubmissionCoordinator {
    pub fn new(api: Arc<dyn ServiceApi>, store: Arc<JobStore>) -> Self {
        Self { api, store }
    }

    pub async fn submit(
        &self,
        dataset_id: &str,
        base_model: &str,
        epochs: Option<u32>,
    ) -> Result<Submission, SubmitError> {
        let dataset_id = dataset_id.trim();
        if dataset_id.is_empty() {
            return Err(SubmitError::Validation("dataset id is required".into()));
        }
        let epochs = epochs.unwrap_or(1);

        let job_id = self
            .api
            .start_training(dataset_id, base_model, epochs)
            .await?;

        let persisted = match self.store.record_submission(job_id, dataset_id) {
            Ok(()) => true,
            Err(err) => {
                tuner_error!("job {job_id} accepted but not recorded locally: {err}");
                false
            }
        };

        Ok(Submission {
            job_id,
            dataset_id: dataset_id.to_string(),
            persisted,
        })
    }
}
