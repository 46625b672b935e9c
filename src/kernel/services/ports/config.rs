use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkspaceConfig {
    pub document_extension: String,
    pub autosave_interval: Duration,
    pub max_name_len: usize,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            document_extension: ".md".to_string(),
            autosave_interval: Duration::from_secs(30),
            max_name_len: 255,
        }
    }
}

impl WorkspaceConfig {
    pub fn with_autosave_interval(mut self, interval: Duration) -> Self {
        self.autosave_interval = interval;
        self
    }
}
