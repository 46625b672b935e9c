use crate::kernel::panels::PanelRef;
use crate::kernel::services::ports::{GatewayError, GatewayOp};
use crate::models::{
    BlobId, BlobKind, BlobNode, CreationIntent, FileContents, Panel, PanelId, Project,
    ProjectSnapshot, Recompiled, TreeSnapshot,
};

/// Everything that can change `AppState`.
///
/// Intents backed by the gateway (`CreateBlob`, `RenameBlob`, ...) only
/// produce effects; their `*ed` counterparts carry the confirmed result back.
#[derive(Debug, Clone)]
pub enum Action {
    LoadProjects,
    ProjectsLoaded(Vec<Project>),
    CreateProject {
        name: String,
        description: String,
    },
    ProjectCreated(Project),
    EditProject {
        id: String,
        name: String,
        description: String,
    },
    ProjectEdited {
        id: String,
        name: String,
        description: String,
    },
    DeleteProject {
        id: String,
    },
    ProjectDeleted {
        id: String,
    },
    OpenProject {
        id: String,
    },
    ProjectOpened {
        id: String,
        snapshot: ProjectSnapshot,
    },
    CloseProject,

    CreateBlob {
        name: String,
        kind: BlobKind,
        parent: Option<BlobId>,
    },
    BlobCreated(BlobNode),
    RenameBlob {
        id: BlobId,
        name: String,
    },
    BlobRenamed {
        id: BlobId,
        name: String,
    },
    DeleteBlob {
        id: BlobId,
    },
    BlobDeleted {
        id: BlobId,
    },
    RefreshBlobs,
    BlobsRefreshed(TreeSnapshot),
    SetBlobOpen {
        id: BlobId,
        open: bool,
    },
    SetCreating {
        id: BlobId,
        intent: CreationIntent,
    },
    /// Starts inline creation under the selected folder, or at root.
    BeginCreate(BlobKind),
    CancelCreate,
    OpenDirectoryRecursive {
        id: BlobId,
    },
    CollapseAll,
    SelectBlob {
        id: BlobId,
    },

    OpenPanel(PanelRef),
    CreatePanel(Panel),
    SetActivePanel(PanelId),
    RemovePanel(PanelId),
    SetPanelPin {
        id: PanelId,
        pinned: bool,
    },

    FileOpened {
        id: BlobId,
        contents: FileContents,
    },
    EditText {
        id: BlobId,
        text: String,
    },
    FileRecompiled {
        id: BlobId,
        result: Recompiled,
    },

    PlaybackAdvance(usize),
    PlaybackRetreat,
    PlaybackRestart,
    PlaybackResetLast,
    PlaybackSetPendingJoin(bool),
    PlaybackEnterChoice {
        block: usize,
        choice: usize,
    },
    PlaybackExitFrame,
    PlaybackRender,

    SaveLayout,
    LayoutSaved,

    GatewayFailed {
        op: GatewayOp,
        error: GatewayError,
    },
    ClearInputError,
}
