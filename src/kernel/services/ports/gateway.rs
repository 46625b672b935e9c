//! Contract of the external backend: persistence, compilation and blob-tree
//! mutation. Transport is the adapter's business.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::models::{
    BlobId, BlobNode, FileContents, Project, ProjectSnapshot, Recompiled, WorkspaceLayout,
};

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

pub type GatewayFuture<'a, T> = Pin<Box<dyn Future<Output = GatewayResult<T>> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    NotFound(String),
    NameTaken(String),
    Rejected(String),
    Unavailable(String),
    Serialization(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::NotFound(what) => write!(f, "not found: {}", what),
            GatewayError::NameTaken(name) => write!(f, "name already taken: {}", name),
            GatewayError::Rejected(msg) => write!(f, "request rejected: {}", msg),
            GatewayError::Unavailable(msg) => write!(f, "backend unavailable: {}", msg),
            GatewayError::Serialization(msg) => write!(f, "malformed payload: {}", msg),
        }
    }
}

impl std::error::Error for GatewayError {}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Serialization(err.to_string())
    }
}

/// Which gateway call an error or log line refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    CreateBlob,
    RenameBlob,
    DeleteBlob,
    RefreshBlobs,
    OpenFile,
    RecompileFile,
    ListProjects,
    CreateProject,
    EditProject,
    DeleteProject,
    InitProject,
    SaveLayout,
}

impl GatewayOp {
    pub fn name(self) -> &'static str {
        match self {
            Self::CreateBlob => "create_blob",
            Self::RenameBlob => "rename_blob",
            Self::DeleteBlob => "delete_blob",
            Self::RefreshBlobs => "refresh_blobs",
            Self::OpenFile => "open_file",
            Self::RecompileFile => "recompile_file",
            Self::ListProjects => "list_projects",
            Self::CreateProject => "create_project",
            Self::EditProject => "edit_project",
            Self::DeleteProject => "delete_project",
            Self::InitProject => "init_project",
            Self::SaveLayout => "save_workspace_layout",
        }
    }
}

impl fmt::Display for GatewayOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub trait WorkspaceGateway: Send + Sync {
    /// `name` already carries the document extension for files.
    fn create_blob(
        &self,
        name: String,
        is_folder: bool,
        parent: Option<BlobId>,
    ) -> GatewayFuture<'_, BlobNode>;

    fn rename_blob(&self, id: BlobId, name: String) -> GatewayFuture<'_, ()>;

    fn delete_blob(&self, id: BlobId) -> GatewayFuture<'_, ()>;

    fn refresh_blobs(&self) -> GatewayFuture<'_, crate::models::TreeSnapshot>;

    fn open_file(&self, id: BlobId) -> GatewayFuture<'_, FileContents>;

    fn recompile_file(&self, id: BlobId, content: String) -> GatewayFuture<'_, Recompiled>;

    fn list_projects(&self) -> GatewayFuture<'_, Vec<Project>>;

    fn create_project(&self, name: String, description: String) -> GatewayFuture<'_, Project>;

    fn edit_project(
        &self,
        id: String,
        name: String,
        description: String,
    ) -> GatewayFuture<'_, ()>;

    fn delete_project(&self, id: String) -> GatewayFuture<'_, ()>;

    fn init_project(&self, id: String) -> GatewayFuture<'_, ProjectSnapshot>;

    fn save_workspace_layout(&self, layout: WorkspaceLayout) -> GatewayFuture<'_, ()>;
}
