//! Editor tab model.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::blob_tree::BlobId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(String);

impl PanelId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// File-bound panels are keyed by their file id.
    pub fn for_file(id: BlobId) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub id: PanelId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<BlobId>,
    pub name: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<char>,
}

impl Panel {
    pub fn for_file(file_id: BlobId, name: impl Into<String>) -> Self {
        Self {
            id: PanelId::for_file(file_id),
            file_id: Some(file_id),
            name: name.into(),
            pinned: false,
            icon: None,
        }
    }

    pub fn synthetic(id: impl Into<String>, name: impl Into<String>, icon: Option<char>) -> Self {
        Self {
            id: PanelId::new(id),
            file_id: None,
            name: name.into(),
            pinned: false,
            icon,
        }
    }

    pub fn is_file_bound(&self) -> bool {
        self.file_id.is_some()
    }
}
