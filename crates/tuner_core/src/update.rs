use crate::{selection, AdapterChoice, AppState, Effect, Msg, SessionState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::RegistryRestored { jobs, last_dataset } => {
            state.restore(jobs, last_dataset);
            vec![
                Effect::StartPolling,
                Effect::RefreshTrainedModels,
                Effect::RefreshBaseModels,
            ]
        }
        Msg::PollPublished { jobs } => {
            state.apply_poll(jobs);
            Vec::new()
        }
        Msg::TrainedModelsLoaded(models) => {
            state.apply_trained_models(models);
            Vec::new()
        }
        Msg::BaseModelsLoaded(models) => {
            state.set_base_models(models);
            Vec::new()
        }
        Msg::ListingsFailed { reason } => {
            state.set_status(format!("listing failed: {reason}"));
            Vec::new()
        }
        Msg::ListingsRefreshRequested => {
            vec![Effect::RefreshTrainedModels, Effect::RefreshBaseModels]
        }
        Msg::RedrawRequested => {
            state.mark_dirty();
            Vec::new()
        }
        Msg::TrainRequested {
            dataset_id,
            base_model,
            epochs,
        } => {
            // Same local gate the submission coordinator enforces: a blank
            // dataset id never reaches the network.
            if dataset_id.trim().is_empty() {
                state.set_status("upload a dataset first");
                Vec::new()
            } else {
                state.set_status("queuing training run");
                vec![Effect::SubmitTraining {
                    dataset_id,
                    base_model,
                    epochs: epochs.unwrap_or(1),
                }]
            }
        }
        Msg::TrainAccepted { job_id, dataset_id } => {
            state.register_job(job_id, dataset_id);
            state.set_status(format!("training queued (job {job_id})"));
            Vec::new()
        }
        Msg::TrainRejected { reason } => {
            state.set_status(format!("training failed: {reason}"));
            Vec::new()
        }
        Msg::AdapterSelected { job_id } => {
            match selection::resolve(job_id, state.trained()) {
                Ok(sel) => state.pin_selection(sel),
                // Invariant breach: the picker is populated from the same
                // listing we resolve against. Leave the selection as-is.
                Err(selection::SelectionError::NotFound(_)) => {}
            }
            Vec::new()
        }
        Msg::InferRequested { prompt } => match state.adapter().clone() {
            AdapterChoice::Selected(sel) => {
                state.set_status("generating");
                vec![Effect::RunInference {
                    base_model: sel.base_model,
                    adapter_job_id: sel.adapter_id,
                    prompt,
                }]
            }
            AdapterChoice::NoTrainedModels => {
                state.set_status("no trained models found");
                Vec::new()
            }
        },
        Msg::InferCompleted { response } => {
            state.set_response(response);
            state.set_status("response ready");
            Vec::new()
        }
        Msg::InferFailed { reason } => {
            state.set_status(format!("inference failed: {reason}"));
            Vec::new()
        }
        Msg::UploadRequested { name, path } => {
            if name.trim().is_empty() || path.trim().is_empty() {
                state.set_status("enter a dataset name and file");
                Vec::new()
            } else {
                state.set_status("uploading");
                vec![Effect::UploadDataset { name, path }]
            }
        }
        Msg::DatasetUploaded { dataset_id } => {
            state.remember_dataset(dataset_id.clone());
            state.set_status(format!("uploaded dataset {dataset_id}"));
            Vec::new()
        }
        Msg::UploadFailed { reason } => {
            state.set_status(format!("upload failed: {reason}"));
            Vec::new()
        }
        Msg::DownloadRequested { job_id } => {
            state.set_status(format!("downloading adapter for job {job_id}"));
            vec![Effect::DownloadAdapter { job_id }]
        }
        Msg::AdapterDownloaded { job_id, path } => {
            state.set_status(format!("adapter for job {job_id} saved to {path}"));
            Vec::new()
        }
        Msg::DownloadFailed { job_id, reason } => {
            state.set_status(format!("adapter {job_id} not ready: {reason}"));
            Vec::new()
        }
        Msg::QuitRequested => {
            if state.session() == SessionState::Polling {
                state.stop_session();
                vec![Effect::StopPolling]
            } else {
                Vec::new()
            }
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
