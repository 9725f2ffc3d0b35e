use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use tuner_core::{BaseModelChoice, Effect, JobSnapshot, JobState, Msg, TrainedModel};
use tuner_engine::{
    EngineCommand, EngineCommander, EngineEvent, EngineHandle, JobRecord, JobStatus, JobStore,
    PollSettings, ServiceApi,
};
use tuner_logging::tuner_info;

/// Executes core effects against the engine and pumps engine events back
/// into the message channel.
pub(crate) struct EffectRunner {
    commander: EngineCommander,
}

impl EffectRunner {
    pub(crate) fn new(
        msg_tx: mpsc::Sender<Msg>,
        api: Arc<dyn ServiceApi>,
        store: Arc<JobStore>,
        settings: PollSettings,
        download_dir: PathBuf,
    ) -> Self {
        let engine = EngineHandle::new(api, store, settings, download_dir);
        let commander = engine.commander();
        spawn_event_loop(engine, msg_tx);
        Self { commander }
    }

    pub(crate) fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartPolling => {
                    // The poll loop starts with the engine thread; nothing
                    // to do here until an explicit restart exists.
                }
                Effect::StopPolling => self.commander.stop(),
                Effect::RefreshTrainedModels => {
                    self.commander.submit(EngineCommand::RefreshTrainedModels);
                }
                Effect::RefreshBaseModels => {
                    self.commander.submit(EngineCommand::RefreshBaseModels);
                }
                Effect::SubmitTraining {
                    dataset_id,
                    base_model,
                    epochs,
                } => {
                    tuner_info!(
                        "submit training dataset={dataset_id} base_model={base_model} epochs={epochs}"
                    );
                    self.commander.submit(EngineCommand::SubmitTraining {
                        dataset_id,
                        base_model,
                        epochs,
                    });
                }
                Effect::RunInference {
                    base_model,
                    adapter_job_id,
                    prompt,
                } => {
                    self.commander.submit(EngineCommand::RunInference {
                        base_model,
                        adapter_job_id,
                        prompt,
                    });
                }
                Effect::UploadDataset { name, path } => {
                    self.commander.submit(EngineCommand::UploadDataset {
                        name,
                        path: PathBuf::from(path),
                    });
                }
                Effect::DownloadAdapter { job_id } => {
                    self.commander
                        .submit(EngineCommand::DownloadAdapter { job_id });
                }
            }
        }
    }
}

fn spawn_event_loop(engine: EngineHandle, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Some(event) = engine.recv() {
            if msg_tx.send(map_event(event)).is_err() {
                break;
            }
        }
    });
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PollPublished { jobs } => Msg::PollPublished {
            jobs: jobs.into_iter().map(map_record).collect(),
        },
        EngineEvent::TrainedModels(models) => Msg::TrainedModelsLoaded(
            models
                .into_iter()
                .map(|m| TrainedModel {
                    job_id: m.job_id,
                    base_model: m.base_model,
                })
                .collect(),
        ),
        EngineEvent::BaseModels(models) => Msg::BaseModelsLoaded(
            models
                .into_iter()
                .map(|m| BaseModelChoice {
                    id: m.id,
                    name: m.name,
                })
                .collect(),
        ),
        EngineEvent::DirectoryFailed { message } => Msg::ListingsFailed { reason: message },
        EngineEvent::SubmissionAccepted { job_id, dataset_id } => {
            Msg::TrainAccepted { job_id, dataset_id }
        }
        EngineEvent::SubmissionFailed { message } => Msg::TrainRejected { reason: message },
        EngineEvent::InferenceCompleted { response } => Msg::InferCompleted { response },
        EngineEvent::InferenceFailed { message } => Msg::InferFailed { reason: message },
        EngineEvent::DatasetUploaded { dataset_id } => Msg::DatasetUploaded { dataset_id },
        EngineEvent::UploadFailed { message } => Msg::UploadFailed { reason: message },
        EngineEvent::AdapterDownloaded {
            job_id,
            path,
            sha256,
        } => {
            tuner_info!("adapter {job_id} sha256 {sha256}");
            Msg::AdapterDownloaded {
                job_id,
                path: path.display().to_string(),
            }
        }
        EngineEvent::DownloadFailed { job_id, message } => Msg::DownloadFailed {
            job_id,
            reason: message,
        },
    }
}

fn map_record(record: JobRecord) -> JobSnapshot {
    JobSnapshot {
        id: record.id,
        status: map_status(record.status),
        dataset_id: record.dataset_id,
        base_model: record.base_model,
        epochs: record.epochs,
        adapter_ready: record.adapter_path.is_some(),
    }
}

fn map_status(status: JobStatus) -> JobState {
    match status {
        JobStatus::Queued => JobState::Queued,
        JobStatus::Running => JobState::Running,
        JobStatus::Completed => JobState::Completed,
        JobStatus::Failed => JobState::Failed,
        JobStatus::Unknown => JobState::Unknown,
    }
}
