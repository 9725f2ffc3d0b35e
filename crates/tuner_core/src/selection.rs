use thiserror::Error;

use crate::state::{JobId, TrainedModel};

/// The user's current (job, base model, adapter) choice for inference.
///
/// `adapter_id` always equals `job_id` (one adapter per training job) and
/// `base_model` is always taken from the same listing entry. The pair only
/// ever changes as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub job_id: JobId,
    pub base_model: String,
    pub adapter_id: JobId,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AdapterChoice {
    /// The service reported no trained adapters; nothing is selectable.
    #[default]
    NoTrainedModels,
    Selected(Selection),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The picked job id is not in the listing the picker was populated
    /// from. This is an internal invariant breach, not user error.
    #[error("job {0} is not in the trained-model listing")]
    NotFound(JobId),
}

/// Default selection for a fresh listing: the first entry, which the
/// directory orders most-relevant-first. Empty listing means no selection.
pub fn resolve_default(models: &[TrainedModel]) -> Option<Selection> {
    models.first().map(to_selection)
}

/// Resolves an explicit pick against the listing, yielding both dependent
/// fields from the same entry.
pub fn resolve(job_id: JobId, models: &[TrainedModel]) -> Result<Selection, SelectionError> {
    models
        .iter()
        .find(|m| m.job_id == job_id)
        .map(to_selection)
        .ok_or(SelectionError::NotFound(job_id))
}

fn to_selection(model: &TrainedModel) -> Selection {
    Selection {
        job_id: model.job_id,
        base_model: model.base_model.clone(),
        adapter_id: model.job_id,
    }
}
