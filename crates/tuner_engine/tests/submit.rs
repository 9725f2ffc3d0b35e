use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use tuner_engine::{
    BaseModelEntry, JobId, JobRecord, JobStore, ServiceApi, ServiceError, ServiceErrorKind,
    SubmissionCoordinator, SubmitError, TrainedModelSummary,
};

/// Stub service that records training calls and answers from a canned
/// outcome. Directory methods are never exercised by these tests.
struct StubApi {
    accept: Option<JobId>,
    calls: AtomicUsize,
    seen_epochs: Mutex<Vec<u32>>,
}

impl StubApi {
    fn accepting(job_id: JobId) -> Self {
        Self {
            accept: Some(job_id),
            calls: AtomicUsize::new(0),
            seen_epochs: Mutex::new(Vec::new()),
        }
    }

    fn rejecting() -> Self {
        Self {
            accept: None,
            calls: AtomicUsize::new(0),
            seen_epochs: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ServiceApi for StubApi {
    async fn fetch_job(&self, id: JobId) -> Result<JobRecord, ServiceError> {
        Err(ServiceError {
            kind: ServiceErrorKind::NotFound,
            message: format!("stub has no job {id}"),
        })
    }

    async fn list_trained_models(&self) -> Result<Vec<TrainedModelSummary>, ServiceError> {
        Ok(Vec::new())
    }

    async fn list_base_models(&self) -> Result<Vec<BaseModelEntry>, ServiceError> {
        Ok(Vec::new())
    }

    async fn start_training(
        &self,
        _dataset_id: &str,
        _base_model: &str,
        epochs: u32,
    ) -> Result<JobId, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_epochs.lock().unwrap().push(epochs);
        match self.accept {
            Some(id) => Ok(id),
            None => Err(ServiceError {
                kind: ServiceErrorKind::HttpStatus(500),
                message: "stub rejects".to_string(),
            }),
        }
    }

    async fn run_inference(
        &self,
        _base_model: &str,
        _adapter_job_id: JobId,
        _prompt: &str,
    ) -> Result<String, ServiceError> {
        Ok(String::new())
    }

    async fn upload_dataset(
        &self,
        _name: &str,
        _file_name: &str,
        _bytes: Vec<u8>,
    ) -> Result<String, ServiceError> {
        Ok(String::new())
    }

    async fn download_adapter(&self, _job_id: JobId) -> Result<Vec<u8>, ServiceError> {
        Ok(Vec::new())
    }
}

fn coordinator(api: Arc<StubApi>, dir: &TempDir) -> (SubmissionCoordinator, Arc<JobStore>) {
    let store = Arc::new(JobStore::new(dir.path()));
    (
        SubmissionCoordinator::new(api, store.clone()),
        store,
    )
}

#[tokio::test]
async fn blank_dataset_fails_validation_without_any_side_effects() {
    let dir = TempDir::new().unwrap();
    let api = Arc::new(StubApi::accepting(42));
    let (coordinator, store) = coordinator(api.clone(), &dir);

    let err = coordinator.submit("   ", "gpt2", Some(3)).await.unwrap_err();
    assert!(matches!(err, SubmitError::Validation(_)));
    assert_eq!(api.calls(), 0);
    assert!(store.load().is_empty());
    assert_eq!(store.last_dataset(), None);
}

#[tokio::test]
async fn accepted_submission_registers_job_and_dataset() {
    let dir = TempDir::new().unwrap();
    let api = Arc::new(StubApi::accepting(42));
    let (coordinator, store) = coordinator(api.clone(), &dir);

    let submission = coordinator
        .submit("ds1", "llama-7b", Some(2))
        .await
        .expect("accepted");
    assert_eq!(submission.job_id, 42);
    assert_eq!(submission.dataset_id, "ds1");
    assert!(submission.persisted);

    assert_eq!(store.load(), vec![42]);
    assert_eq!(store.last_dataset(), Some("ds1".to_string()));
    assert_eq!(api.calls(), 1);
}

#[tokio::test]
async fn epochs_default_to_one_when_unspecified() {
    let dir = TempDir::new().unwrap();
    let api = Arc::new(StubApi::accepting(7));
    let (coordinator, _store) = coordinator(api.clone(), &dir);

    coordinator.submit("ds1", "gpt2", None).await.expect("accepted");
    assert_eq!(*api.seen_epochs.lock().unwrap(), vec![1]);
}

#[tokio::test]
async fn rejected_submission_leaves_the_store_untouched() {
    let dir = TempDir::new().unwrap();
    let api = Arc::new(StubApi::rejecting());
    let (coordinator, store) = coordinator(api.clone(), &dir);

    let err = coordinator.submit("ds1", "gpt2", Some(1)).await.unwrap_err();
    assert!(matches!(err, SubmitError::Service(_)));
    assert_eq!(api.calls(), 1);
    assert!(store.load().is_empty());
    assert_eq!(store.last_dataset(), None);
}
