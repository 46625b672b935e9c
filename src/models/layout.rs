//! Persisted workspace layout: what was open when the project was last saved.

use serde::{Deserialize, Serialize};

use super::blob_tree::BlobId;
use super::panel::{Panel, PanelId};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceLayout {
    #[serde(default)]
    pub open_panels: Vec<Panel>,
    #[serde(default)]
    pub pinned_panels: Vec<PanelId>,
    #[serde(default)]
    pub open_folders: Vec<BlobId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_open: Option<PanelId>,
}

impl WorkspaceLayout {
    pub fn is_empty(&self) -> bool {
        self.open_panels.is_empty() && self.open_folders.is_empty() && self.last_open.is_none()
    }
}
