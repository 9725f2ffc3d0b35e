//! Tuner core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod selection;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use selection::{resolve, resolve_default, AdapterChoice, Selection, SelectionError};
pub use state::{
    AppState, BaseModelChoice, JobId, JobSnapshot, JobState, SessionState, TrainedModel,
};
pub use update::update;
pub use view_model::{AdapterOptionView, AppViewModel, JobRowView};
