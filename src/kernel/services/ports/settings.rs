use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::config::WorkspaceConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub workspace: WorkspaceSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autosave_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_name_length: Option<usize>,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        let defaults = WorkspaceConfig::default();
        Self {
            document_extension: Some(defaults.document_extension),
            autosave_secs: Some(defaults.autosave_interval.as_secs()),
            max_name_length: Some(defaults.max_name_len),
        }
    }
}

impl Settings {
    pub fn workspace_config(&self) -> WorkspaceConfig {
        let mut config = WorkspaceConfig::default();
        if let Some(ext) = self
            .workspace
            .document_extension
            .as_ref()
            .filter(|e| !e.is_empty())
        {
            config.document_extension = if ext.starts_with('.') {
                ext.clone()
            } else {
                format!(".{}", ext)
            };
        }
        if let Some(secs) = self.workspace.autosave_secs.filter(|s| *s > 0) {
            config.autosave_interval = Duration::from_secs(secs);
        }
        if let Some(max) = self.workspace.max_name_length.filter(|m| *m > 0) {
            config.max_name_len = max;
        }
        config
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
