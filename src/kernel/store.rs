use super::state::GatewayFailure;
use super::{Action, AppState, Effect};
use crate::models::NameError;

mod blobs;
mod contents;
mod layout;
mod panels;
mod playback;
mod projects;

#[derive(Debug, Default)]
pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
    /// Set when this dispatch rejected the submitted name.
    pub rejected: Option<NameError>,
}

impl DispatchResult {
    fn changed(state_changed: bool) -> Self {
        Self {
            effects: Vec::new(),
            state_changed,
            rejected: None,
        }
    }

    fn with_effects(effects: Vec<Effect>, state_changed: bool) -> Self {
        Self {
            effects,
            state_changed,
            rejected: None,
        }
    }
}

pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::LoadProjects
            | Action::ProjectsLoaded(_)
            | Action::CreateProject { .. }
            | Action::ProjectCreated(_)
            | Action::EditProject { .. }
            | Action::ProjectEdited { .. }
            | Action::DeleteProject { .. }
            | Action::ProjectDeleted { .. }
            | Action::OpenProject { .. }
            | Action::ProjectOpened { .. }
            | Action::CloseProject => self.reduce_project_action(action),

            Action::CreateBlob { .. }
            | Action::BlobCreated(_)
            | Action::RenameBlob { .. }
            | Action::BlobRenamed { .. }
            | Action::DeleteBlob { .. }
            | Action::BlobDeleted { .. }
            | Action::RefreshBlobs
            | Action::BlobsRefreshed(_)
            | Action::SetBlobOpen { .. }
            | Action::SetCreating { .. }
            | Action::BeginCreate(_)
            | Action::CancelCreate
            | Action::OpenDirectoryRecursive { .. }
            | Action::CollapseAll
            | Action::SelectBlob { .. } => self.reduce_blob_action(action),

            Action::OpenPanel(_)
            | Action::CreatePanel(_)
            | Action::SetActivePanel(_)
            | Action::RemovePanel(_)
            | Action::SetPanelPin { .. } => self.reduce_panel_action(action),

            Action::FileOpened { .. } | Action::EditText { .. } | Action::FileRecompiled { .. } => {
                self.reduce_contents_action(action)
            }

            Action::PlaybackAdvance(_)
            | Action::PlaybackRetreat
            | Action::PlaybackRestart
            | Action::PlaybackResetLast
            | Action::PlaybackSetPendingJoin(_)
            | Action::PlaybackEnterChoice { .. }
            | Action::PlaybackExitFrame
            | Action::PlaybackRender => self.reduce_playback_action(action),

            Action::SaveLayout | Action::LayoutSaved => self.reduce_layout_action(action),

            Action::GatewayFailed { op, error } => {
                self.state.last_gateway_error = Some(GatewayFailure { op, error });
                DispatchResult::changed(true)
            }
            Action::ClearInputError => {
                DispatchResult::changed(self.state.input_error.take().is_some())
            }
        }
    }

    fn reject_input(&mut self, error: NameError) -> DispatchResult {
        tracing::debug!(error = %error, "input rejected");
        self.state.input_error = Some(error.clone());
        DispatchResult {
            rejected: Some(error),
            ..DispatchResult::changed(true)
        }
    }

    fn accept_input(&mut self) -> bool {
        self.state.input_error.take().is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
