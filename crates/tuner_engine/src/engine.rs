use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use tokio_util::sync::CancellationToken;
use tuner_logging::{tuner_info, tuner_warn};

use crate::download;
use crate::poller::{self, ChannelEventSink, EventSink, PollSettings};
use crate::submit::SubmissionCoordinator;
use crate::{EngineEvent, JobId, JobStore, ServiceApi};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    SubmitTraining {
        dataset_id: String,
        base_model: String,
        epochs: u32,
    },
    RunInference {
        base_model: String,
        adapter_job_id: JobId,
        prompt: String,
    },
    UploadDataset {
        name: String,
        path: PathBuf,
    },
    DownloadAdapter {
        job_id: JobId,
    },
    RefreshTrainedModels,
    RefreshBaseModels,
}

/// Owns the engine thread: one tokio runtime running the poll loop plus one
/// task per submitted command. Results come back over a single event
/// channel, so the consumer sees poll passes and command outcomes in one
/// serialized stream.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    cancel: CancellationToken,
}

/// Cloneable command/stop side of an [`EngineHandle`], for callers that do
/// not consume events.
#[derive(Clone)]
pub struct EngineCommander {
    cmd_tx: mpsc::Sender<EngineCommand>,
    cancel: CancellationToken,
}

impl EngineCommander {
    pub fn submit(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }

    /// Cancels the poll loop; honored before the next pass issues fetches.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl EngineHandle {
    pub fn new(
        api: Arc<dyn ServiceApi>,
        store: Arc<JobStore>,
        settings: PollSettings,
        download_dir: PathBuf,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let poll_cancel = cancel.clone();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));

            runtime.spawn(poller::poll_loop(
                api.clone(),
                store.clone(),
                settings,
                poll_cancel,
                sink.clone(),
            ));

            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let store = store.clone();
                let sink = sink.clone();
                let download_dir = download_dir.clone();
                runtime.spawn(async move {
                    handle_command(command, api, store, download_dir, sink).await;
                });
            }
            tuner_info!("engine thread exiting");
        });

        Self {
            cmd_tx,
            event_rx,
            cancel,
        }
    }

    pub fn commander(&self) -> EngineCommander {
        EngineCommander {
            cmd_tx: self.cmd_tx.clone(),
            cancel: self.cancel.clone(),
        }
    }

    pub fn submit(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }

    /// Blocks until the next engine event; `None` once the engine is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Cancels the poll loop; honored before the next pass issues fetches.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

async fn handle_command(
    command: EngineCommand,
    api: Arc<dyn ServiceApi>,
    store: Arc<JobStore>,
    download_dir: PathBuf,
    sink: Arc<dyn EventSink>,
) {
    match command {
        EngineCommand::SubmitTraining {
            dataset_id,
            base_model,
            epochs,
        } => {
            let coordinator = SubmissionCoordinator::new(api, store);
            match coordinator
                .submit(&dataset_id, &base_model, Some(epochs))
                .await
            {
                Ok(submission) => sink.emit(EngineEvent::SubmissionAccepted {
                    job_id: submission.job_id,
                    dataset_id: submission.dataset_id,
                }),
                Err(err) => sink.emit(EngineEvent::SubmissionFailed {
                    message: err.to_string(),
                }),
            }
        }
        EngineCommand::RunInference {
            base_model,
            adapter_job_id,
            prompt,
        } => match api.run_inference(&base_model, adapter_job_id, &prompt).await {
            Ok(response) => sink.emit(EngineEvent::InferenceCompleted { response }),
            Err(err) => sink.emit(EngineEvent::InferenceFailed {
                message: err.to_string(),
            }),
        },
        EngineCommand::UploadDataset { name, path } => {
            // File IO stays on the engine side so the UI thread never blocks.
            match std::fs::read(&path) {
                Ok(bytes) => {
                    let file_name = path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("dataset.bin")
                        .to_string();
                    match api.upload_dataset(&name, &file_name, bytes).await {
                        Ok(dataset_id) => {
                            if let Err(err) = store.set_last_dataset(&dataset_id) {
                                tuner_warn!("uploaded dataset {dataset_id} not remembered: {err}");
                            }
                            sink.emit(EngineEvent::DatasetUploaded { dataset_id });
                        }
                        Err(err) => sink.emit(EngineEvent::UploadFailed {
                            message: err.to_string(),
                        }),
                    }
                }
                Err(err) => sink.emit(EngineEvent::UploadFailed {
                    message: err.to_string(),
                }),
            }
        }
        EngineCommand::DownloadAdapter { job_id } => {
            match download::download_adapter_to(api.as_ref(), job_id, &download_dir).await {
                Ok(artifact) => sink.emit(EngineEvent::AdapterDownloaded {
                    job_id,
                    path: artifact.path,
                    sha256: artifact.sha256,
                }),
                Err(err) => sink.emit(EngineEvent::DownloadFailed {
                    job_id,
                    message: err.to_string(),
                }),
            }
        }
        EngineCommand::RefreshTrainedModels => match api.list_trained_models().await {
            Ok(models) => sink.emit(EngineEvent::TrainedModels(models)),
            Err(err) => sink.emit(EngineEvent::DirectoryFailed {
                message: err.to_string(),
            }),
        },
        EngineCommand::RefreshBaseModels => match api.list_base_models().await {
            Ok(models) => sink.emit(EngineEvent::BaseModels(models)),
            Err(err) => sink.emit(EngineEvent::DirectoryFailed {
                message: err.to_string(),
            }),
        },
    }
}
