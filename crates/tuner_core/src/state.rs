use std::fmt;

use crate::selection::{self, AdapterChoice};
use crate::view_model::{AdapterOptionView, AppViewModel, JobRowView};

pub type JobId = u64;

/// Client-side mirror of a server job status. Wire values the client does
/// not recognize map to `Unknown` rather than failing the whole row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Queued,
    Running,
    Completed,
    Failed,
    Unknown,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Queued => write!(f, "queued"),
            JobState::Running => write!(f, "running"),
            JobState::Completed => write!(f, "completed"),
            JobState::Failed => write!(f, "failed"),
            JobState::Unknown => write!(f, "unknown"),
        }
    }
}

/// One server-authoritative job row from a completed poll pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSnapshot {
    pub id: JobId,
    pub status: JobState,
    pub dataset_id: u64,
    pub base_model: String,
    pub epochs: u32,
    pub adapter_ready: bool,
}

/// One entry of the trained-adapter listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainedModel {
    pub job_id: JobId,
    pub base_model: String,
}

/// One entry of the base-model catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseModelChoice {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Polling,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: SessionState,
    registry: Vec<JobId>,
    jobs: Vec<JobSnapshot>,
    trained: Vec<TrainedModel>,
    base_models: Vec<BaseModelChoice>,
    adapter: AdapterChoice,
    adapter_pinned: bool,
    last_dataset: Option<String>,
    status_line: Option<String>,
    last_response: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let selection = match &self.adapter {
            AdapterChoice::NoTrainedModels => None,
            AdapterChoice::Selected(sel) => Some(sel.clone()),
        };
        let adapters = self
            .trained
            .iter()
            .map(|m| AdapterOptionView {
                job_id: m.job_id,
                base_model: m.base_model.clone(),
                selected: selection
                    .as_ref()
                    .is_some_and(|sel| sel.job_id == m.job_id),
            })
            .collect();
        AppViewModel {
            session: self.session,
            known_jobs: self.registry.len(),
            jobs: self
                .jobs
                .iter()
                .map(|job| JobRowView {
                    job_id: job.id,
                    status: job.status,
                    dataset_id: job.dataset_id,
                    epochs: job.epochs,
                    adapter_ready: job.adapter_ready,
                })
                .collect(),
            adapters,
            base_models: self.base_models.clone(),
            selection,
            no_trained_models: self.trained.is_empty(),
            last_dataset: self.last_dataset.clone(),
            status_line: self.status_line.clone(),
            last_response: self.last_response.clone(),
            dirty: self.dirty,
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn adapter(&self) -> &AdapterChoice {
        &self.adapter
    }

    pub fn last_dataset(&self) -> Option<&str> {
        self.last_dataset.as_deref()
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn restore(&mut self, registry: Vec<JobId>, last_dataset: Option<String>) {
        self.registry = registry;
        self.last_dataset = last_dataset;
        self.session = SessionState::Polling;
        self.dirty = true;
    }

    /// Replaces the rendered job rows wholesale with one completed poll pass.
    pub(crate) fn apply_poll(&mut self, jobs: Vec<JobSnapshot>) {
        if self.jobs != jobs {
            self.jobs = jobs;
            self.dirty = true;
        }
    }

    /// Applies a fresh adapter listing, keeping a manual selection when the
    /// selected job is still listed. A vanished selection falls back to the
    /// listing default and releases the pin.
    pub(crate) fn apply_trained_models(&mut self, models: Vec<TrainedModel>) {
        self.trained = models;
        let pinned_id = match (&self.adapter, self.adapter_pinned) {
            (AdapterChoice::Selected(sel), true) => Some(sel.job_id),
            _ => None,
        };
        self.adapter = match pinned_id.and_then(|id| selection::resolve(id, &self.trained).ok()) {
            Some(sel) => AdapterChoice::Selected(sel),
            None => {
                self.adapter_pinned = false;
                match selection::resolve_default(&self.trained) {
                    Some(sel) => AdapterChoice::Selected(sel),
                    None => AdapterChoice::NoTrainedModels,
                }
            }
        };
        self.dirty = true;
    }

    pub(crate) fn set_base_models(&mut self, models: Vec<BaseModelChoice>) {
        self.base_models = models;
        self.dirty = true;
    }

    /// Applies a user adapter pick that already resolved against the listing.
    pub(crate) fn pin_selection(&mut self, sel: crate::Selection) {
        self.adapter = AdapterChoice::Selected(sel);
        self.adapter_pinned = true;
        self.dirty = true;
    }

    /// Mirrors a registered submission into the in-memory registry view.
    /// The persistent store has already recorded it.
    pub(crate) fn register_job(&mut self, job_id: JobId, dataset_id: String) {
        if !self.registry.contains(&job_id) {
            self.registry.push(job_id);
        }
        self.last_dataset = Some(dataset_id);
        self.dirty = true;
    }

    pub(crate) fn remember_dataset(&mut self, dataset_id: String) {
        self.last_dataset = Some(dataset_id);
        self.dirty = true;
    }

    pub(crate) fn set_status(&mut self, line: impl Into<String>) {
        self.status_line = Some(line.into());
        self.dirty = true;
    }

    pub(crate) fn set_response(&mut self, response: String) {
        self.last_response = Some(response);
        self.dirty = true;
    }

    pub(crate) fn stop_session(&mut self) {
        self.session = SessionState::Stopped;
        self.dirty = true;
    }

    pub(crate) fn trained(&self) -> &[TrainedModel] {
        &self.trained
    }
}
