use rustc_hash::FxHashMap;

use crate::kernel::panels::PanelsState;
use crate::kernel::playback::{PlaybackState, RenderedLine};
use crate::kernel::projects::ProjectsState;
use crate::kernel::services::ports::{GatewayError, GatewayOp, WorkspaceConfig};
use crate::models::{
    AstBlock, BlobId, BlobTree, CreationIntent, FileContents, NameError, WorkspaceLayout,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    TitleScreen,
    Editor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayFailure {
    pub op: GatewayOp,
    pub error: GatewayError,
}

pub struct AppState {
    pub config: WorkspaceConfig,
    pub page: Page,
    pub projects: ProjectsState,
    pub blobs: BlobTree,
    /// Inline creation at root level (no folder row to carry the intent).
    pub root_creating: CreationIntent,
    pub panels: PanelsState,
    /// Explorer selection; a file here is the document shown in the editor.
    pub current_file: Option<BlobId>,
    pub contents: FxHashMap<BlobId, FileContents>,
    pub playback: PlaybackState,
    pub preview: Vec<RenderedLine>,
    /// Inline validation message for the input that triggered it.
    pub input_error: Option<NameError>,
    pub last_gateway_error: Option<GatewayFailure>,
}

impl AppState {
    pub fn new(config: WorkspaceConfig) -> Self {
        Self {
            config,
            page: Page::TitleScreen,
            projects: ProjectsState::new(),
            blobs: BlobTree::new(),
            root_creating: CreationIntent::None,
            panels: PanelsState::new(),
            current_file: None,
            contents: FxHashMap::default(),
            playback: PlaybackState::new(),
            preview: Vec::new(),
            input_error: None,
            last_gateway_error: None,
        }
    }

    /// The file whose panel is active, if any.
    pub fn active_file(&self) -> Option<BlobId> {
        self.panels.active_panel().and_then(|p| p.file_id)
    }

    pub fn compiled_blocks(&self, file: BlobId) -> Option<&[AstBlock]> {
        self.contents
            .get(&file)
            .and_then(|c| c.compiled_content.as_ref())
            .map(|doc| doc.blocks.as_slice())
    }

    pub fn layout(&self) -> WorkspaceLayout {
        WorkspaceLayout {
            open_panels: self.panels.panels().to_vec(),
            pinned_panels: self.panels.pinned_ids(),
            open_folders: self.blobs.open_folders(),
            last_open: self.panels.active().cloned(),
        }
    }

    /// Drops everything tied to the open project.
    pub fn reset_workspace(&mut self) {
        self.blobs = BlobTree::new();
        self.root_creating = CreationIntent::None;
        self.panels.clear();
        self.current_file = None;
        self.contents.clear();
        self.playback.clear();
        self.preview.clear();
        self.input_error = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;
