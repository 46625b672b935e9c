use crate::kernel::services::ports::GatewayOp;
use crate::models::{BlobId, WorkspaceLayout};

/// Gateway requests produced by the store; `app::Workspace` runs them.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ListProjects,
    CreateProject {
        name: String,
        description: String,
    },
    EditProject {
        id: String,
        name: String,
        description: String,
    },
    DeleteProject {
        id: String,
    },
    InitProject {
        id: String,
    },
    CreateBlob {
        name: String,
        is_folder: bool,
        parent: Option<BlobId>,
    },
    RenameBlob {
        id: BlobId,
        name: String,
    },
    DeleteBlob {
        id: BlobId,
    },
    RefreshBlobs,
    OpenFile(BlobId),
    RecompileFile {
        id: BlobId,
        content: String,
    },
    SaveLayout(WorkspaceLayout),
}

impl Effect {
    pub fn op(&self) -> GatewayOp {
        match self {
            Effect::ListProjects => GatewayOp::ListProjects,
            Effect::CreateProject { .. } => GatewayOp::CreateProject,
            Effect::EditProject { .. } => GatewayOp::EditProject,
            Effect::DeleteProject { .. } => GatewayOp::DeleteProject,
            Effect::InitProject { .. } => GatewayOp::InitProject,
            Effect::CreateBlob { .. } => GatewayOp::CreateBlob,
            Effect::RenameBlob { .. } => GatewayOp::RenameBlob,
            Effect::DeleteBlob { .. } => GatewayOp::DeleteBlob,
            Effect::RefreshBlobs => GatewayOp::RefreshBlobs,
            Effect::OpenFile(_) => GatewayOp::OpenFile,
            Effect::RecompileFile { .. } => GatewayOp::RecompileFile,
            Effect::SaveLayout(_) => GatewayOp::SaveLayout,
        }
    }
}
