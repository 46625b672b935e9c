//! Async orchestrator around the store.
//!
//! Intents go through `Store::dispatch`; the resulting effects are executed
//! against the gateway one at a time, and each confirmed response is fed back
//! as an action. Local state for gateway-backed operations therefore changes
//! only after the gateway succeeds.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use super::autosave::LayoutAutosave;
use crate::kernel::playback::{PlaybackFrame, RenderedLine};
use crate::kernel::services::ports::{GatewayError, GatewayOp, WorkspaceGateway};
use crate::kernel::services::{kernel_bus, KernelBusReceiver, KernelBusSender, KernelMessage};
use crate::kernel::{Action, AppState, DispatchResult, Effect, PanelRef, Store};
use crate::models::{BlobId, BlobKind, BlobNode, CreationIntent, NameError, Panel, PanelId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceError {
    Validation(NameError),
    Gateway { op: GatewayOp, source: GatewayError },
    NoProject,
}

impl fmt::Display for WorkspaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceError::Validation(e) => write!(f, "{}", e),
            WorkspaceError::Gateway { op, source } => write!(f, "{} failed: {}", op, source),
            WorkspaceError::NoProject => write!(f, "no project is open"),
        }
    }
}

impl std::error::Error for WorkspaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkspaceError::Gateway { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkspaceError>;

/// What the gateway handed back while running a batch of effects.
#[derive(Debug, Default)]
struct Outcome {
    created_blob: Option<BlobId>,
    created_project: Option<String>,
}

pub struct Workspace {
    store: Store,
    gateway: Arc<dyn WorkspaceGateway>,
    bus_tx: KernelBusSender,
    bus_rx: KernelBusReceiver,
    revision: watch::Sender<u64>,
    autosave: Option<LayoutAutosave>,
}

impl Workspace {
    pub fn new(state: AppState, gateway: Arc<dyn WorkspaceGateway>) -> Self {
        let (bus_tx, bus_rx) = kernel_bus();
        let (revision, _) = watch::channel(0);
        Self {
            store: Store::new(state),
            gateway,
            bus_tx,
            bus_rx,
            revision,
            autosave: None,
        }
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    /// Receives the state revision after every change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    pub fn bus(&self) -> KernelBusSender {
        self.bus_tx.clone()
    }

    // Read accessors.

    pub fn active_panel(&self) -> Option<&Panel> {
        self.state().panels.active_panel()
    }

    pub fn current_file(&self) -> Option<BlobId> {
        self.state().current_file
    }

    pub fn blob(&self, id: BlobId) -> Option<&BlobNode> {
        self.state().blobs.get(id)
    }

    pub fn playback_frame(&self) -> Option<&PlaybackFrame> {
        self.state().playback.frame()
    }

    pub fn preview(&self) -> &[RenderedLine] {
        &self.state().preview
    }

    // Projects.

    pub async fn load_projects(&mut self) -> Result<()> {
        self.perform(Action::LoadProjects).await.map(drop)
    }

    /// Returns the id of the new project.
    pub async fn create_project(&mut self, name: &str, description: &str) -> Result<String> {
        let outcome = self
            .perform(Action::CreateProject {
                name: name.to_string(),
                description: description.to_string(),
            })
            .await?;
        outcome.created_project.ok_or(WorkspaceError::Gateway {
            op: GatewayOp::CreateProject,
            source: GatewayError::Rejected("created project was not applied".to_string()),
        })
    }

    pub async fn edit_project(&mut self, id: &str, name: &str, description: &str) -> Result<()> {
        self.perform(Action::EditProject {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        })
        .await
        .map(drop)
    }

    pub async fn delete_project(&mut self, id: &str) -> Result<()> {
        self.perform(Action::DeleteProject { id: id.to_string() })
            .await
            .map(drop)
    }

    pub async fn open_project(&mut self, id: &str) -> Result<()> {
        if self.state().projects.get(id).is_none() {
            return Err(WorkspaceError::NoProject);
        }
        self.perform(Action::OpenProject { id: id.to_string() })
            .await
            .map(drop)
    }

    /// Saves the layout of the open project and returns to the title screen.
    pub async fn close_project(&mut self) -> Result<()> {
        self.unmount();
        self.perform(Action::CloseProject).await.map(drop)
    }

    // Blob tree.

    /// `name` is the bare name; files get the document extension appended.
    pub async fn create_blob(
        &mut self,
        name: &str,
        kind: BlobKind,
        parent: Option<BlobId>,
    ) -> Result<BlobId> {
        self.require_project()?;
        let outcome = self
            .perform(Action::CreateBlob {
                name: name.to_string(),
                kind,
                parent,
            })
            .await?;
        outcome.created_blob.ok_or(WorkspaceError::Gateway {
            op: GatewayOp::CreateBlob,
            source: GatewayError::Rejected("created blob was not applied".to_string()),
        })
    }

    pub async fn rename_blob(&mut self, id: BlobId, name: &str) -> Result<()> {
        self.require_project()?;
        self.perform(Action::RenameBlob {
            id,
            name: name.to_string(),
        })
        .await
        .map(drop)
    }

    /// Deletes `id` and its subtree, closing every panel bound to a removed
    /// file in the same step.
    pub async fn delete_blob(&mut self, id: BlobId) -> Result<()> {
        self.require_project()?;
        self.perform(Action::DeleteBlob { id }).await.map(drop)
    }

    pub async fn refresh_blobs(&mut self) -> Result<()> {
        self.require_project()?;
        self.perform(Action::RefreshBlobs).await.map(drop)
    }

    pub fn set_blob_open(&mut self, id: BlobId, open: bool) -> bool {
        self.apply(Action::SetBlobOpen { id, open }).state_changed
    }

    pub fn set_creating(&mut self, id: BlobId, intent: CreationIntent) -> bool {
        self.apply(Action::SetCreating { id, intent }).state_changed
    }

    pub fn begin_create(&mut self, kind: BlobKind) -> bool {
        self.apply(Action::BeginCreate(kind)).state_changed
    }

    pub fn cancel_create(&mut self) -> bool {
        self.apply(Action::CancelCreate).state_changed
    }

    pub fn open_directory_recursive(&mut self, id: BlobId) -> bool {
        self.apply(Action::OpenDirectoryRecursive { id }).state_changed
    }

    pub fn collapse_all(&mut self) -> bool {
        self.apply(Action::CollapseAll).state_changed
    }

    /// Folders become the creation target; files open in a panel.
    pub async fn select_blob(&mut self, id: BlobId) -> Result<()> {
        self.perform(Action::SelectBlob { id }).await.map(drop)
    }

    pub fn clear_input_error(&mut self) -> bool {
        self.apply(Action::ClearInputError).state_changed
    }

    // Panels.

    pub async fn open_panel(&mut self, target: PanelRef) -> Result<()> {
        self.perform(Action::OpenPanel(target)).await.map(drop)
    }

    pub async fn create_panel(&mut self, panel: Panel) -> Result<()> {
        self.perform(Action::CreatePanel(panel)).await.map(drop)
    }

    pub async fn set_active_panel(&mut self, id: PanelId) -> Result<()> {
        self.perform(Action::SetActivePanel(id)).await.map(drop)
    }

    pub async fn remove_panel(&mut self, id: PanelId) -> Result<()> {
        self.perform(Action::RemovePanel(id)).await.map(drop)
    }

    pub fn set_panel_pin(&mut self, id: PanelId, pinned: bool) -> bool {
        self.apply(Action::SetPanelPin { id, pinned }).state_changed
    }

    // File contents.

    pub async fn edit_text(&mut self, id: BlobId, text: &str) -> Result<()> {
        self.perform(Action::EditText {
            id,
            text: text.to_string(),
        })
        .await
        .map(drop)
    }

    // Playback.

    pub fn advance(&mut self, n: usize) -> bool {
        self.apply(Action::PlaybackAdvance(n)).state_changed
    }

    pub fn retreat(&mut self) -> bool {
        self.apply(Action::PlaybackRetreat).state_changed
    }

    pub fn restart(&mut self) -> bool {
        self.apply(Action::PlaybackRestart).state_changed
    }

    pub fn reset_last(&mut self) -> bool {
        self.apply(Action::PlaybackResetLast).state_changed
    }

    pub fn set_pending_join(&mut self, pending: bool) -> bool {
        self.apply(Action::PlaybackSetPendingJoin(pending))
            .state_changed
    }

    pub fn enter_choice(&mut self, block: usize, choice: usize) -> bool {
        self.apply(Action::PlaybackEnterChoice { block, choice })
            .state_changed
    }

    pub fn exit_frame(&mut self) -> bool {
        self.apply(Action::PlaybackExitFrame).state_changed
    }

    pub fn render(&mut self) -> &[RenderedLine] {
        self.apply(Action::PlaybackRender);
        self.preview()
    }

    // Layout persistence.

    pub async fn save_layout(&mut self) -> Result<()> {
        self.perform(Action::SaveLayout).await.map(drop)
    }

    /// Starts the periodic layout save. Must be called inside a tokio
    /// runtime; a second call restarts the timer.
    pub fn mount(&mut self) {
        let interval = self.state().config.autosave_interval;
        self.autosave = LayoutAutosave::start(interval, self.bus_tx.clone());
    }

    pub fn unmount(&mut self) {
        if let Some(autosave) = self.autosave.take() {
            autosave.cancel();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.autosave.as_ref().is_some_and(LayoutAutosave::is_running)
    }

    /// Final save, then teardown of the timer.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.unmount();
        let saved = self.save_layout().await;
        if let Err(e) = &saved {
            tracing::warn!(error = %e, "final layout save failed");
        }
        saved
    }

    /// Applies every queued bus message without waiting.
    pub async fn pump(&mut self) -> Result<usize> {
        let mut applied = 0;
        while let Ok(KernelMessage::Action(action)) = self.bus_rx.try_recv() {
            self.perform(action).await?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Waits for the next bus message and applies it.
    pub async fn pump_next(&mut self) -> Result<()> {
        match self.bus_rx.recv().await {
            Some(KernelMessage::Action(action)) => self.perform(action).await.map(drop),
            None => Ok(()),
        }
    }

    fn require_project(&self) -> Result<()> {
        match self.state().projects.current_id() {
            Some(_) => Ok(()),
            None => Err(WorkspaceError::NoProject),
        }
    }

    fn apply(&mut self, action: Action) -> DispatchResult {
        let result = self.store.dispatch(action);
        if result.state_changed {
            self.revision.send_modify(|r| *r += 1);
        }
        result
    }

    /// Dispatches `action` and runs its effects. A name rejected by this
    /// dispatch surfaces as `Validation`.
    async fn perform(&mut self, action: Action) -> Result<Outcome> {
        let result = self.apply(action);
        if let Some(error) = result.rejected {
            return Err(WorkspaceError::Validation(error));
        }
        self.run_effects(result.effects).await
    }

    /// Runs the effects of one intent in order. Only those effects decide the
    /// outcome. A failed follow-up queued by a confirmation (loading the
    /// successor panel's file, say) is recorded in state and logged; the
    /// operation it followed stays committed.
    async fn run_effects(&mut self, effects: Vec<Effect>) -> Result<Outcome> {
        let mut outcome = Outcome::default();
        let mut queue: VecDeque<(Effect, bool)> =
            effects.into_iter().map(|effect| (effect, true)).collect();
        while let Some((effect, primary)) = queue.pop_front() {
            let op = effect.op();
            tracing::debug!(op = %op, primary, "gateway call");
            let action = match self.execute(effect).await {
                Ok(action) => action,
                Err(error) => {
                    tracing::warn!(op = %op, error = %error, primary, "gateway call failed");
                    self.apply(Action::GatewayFailed {
                        op,
                        error: error.clone(),
                    });
                    if primary {
                        return Err(WorkspaceError::Gateway { op, source: error });
                    }
                    continue;
                }
            };
            match &action {
                Action::BlobCreated(node) => outcome.created_blob = Some(node.id),
                Action::ProjectCreated(project) => {
                    outcome.created_project = Some(project.id().to_string())
                }
                _ => {}
            }
            let result = self.apply(action);
            queue.extend(result.effects.into_iter().map(|effect| (effect, false)));
        }
        Ok(outcome)
    }

    async fn execute(&self, effect: Effect) -> std::result::Result<Action, GatewayError> {
        let gateway = Arc::clone(&self.gateway);
        let action = match effect {
            Effect::ListProjects => Action::ProjectsLoaded(gateway.list_projects().await?),
            Effect::CreateProject { name, description } => {
                Action::ProjectCreated(gateway.create_project(name, description).await?)
            }
            Effect::EditProject {
                id,
                name,
                description,
            } => {
                gateway
                    .edit_project(id.clone(), name.clone(), description.clone())
                    .await?;
                Action::ProjectEdited {
                    id,
                    name,
                    description,
                }
            }
            Effect::DeleteProject { id } => {
                gateway.delete_project(id.clone()).await?;
                Action::ProjectDeleted { id }
            }
            Effect::InitProject { id } => {
                let snapshot = gateway.init_project(id.clone()).await?;
                Action::ProjectOpened { id, snapshot }
            }
            Effect::CreateBlob {
                name,
                is_folder,
                parent,
            } => Action::BlobCreated(gateway.create_blob(name, is_folder, parent).await?),
            Effect::RenameBlob { id, name } => {
                gateway.rename_blob(id, name.clone()).await?;
                Action::BlobRenamed { id, name }
            }
            Effect::DeleteBlob { id } => {
                gateway.delete_blob(id).await?;
                Action::BlobDeleted { id }
            }
            Effect::RefreshBlobs => Action::BlobsRefreshed(gateway.refresh_blobs().await?),
            Effect::OpenFile(id) => Action::FileOpened {
                id,
                contents: gateway.open_file(id).await?,
            },
            Effect::RecompileFile { id, content } => Action::FileRecompiled {
                id,
                result: gateway.recompile_file(id, content).await?,
            },
            Effect::SaveLayout(layout) => {
                gateway.save_workspace_layout(layout).await?;
                Action::LayoutSaved
            }
        };
        Ok(action)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/workspace.rs"]
mod tests;
