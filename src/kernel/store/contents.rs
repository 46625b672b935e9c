use crate::kernel::{Action, Effect};

impl super::Store {
    pub(super) fn reduce_contents_action(&mut self, action: Action) -> super::DispatchResult {
        match action {
            Action::FileOpened { id, contents } => {
                if !self.state.blobs.is_file(id) {
                    tracing::debug!(file = %id, "dropping contents of unknown file");
                    return super::DispatchResult::changed(false);
                }
                self.state.contents.insert(id, contents);
                if self.state.active_file() == Some(id) {
                    self.sync_playback();
                }
                super::DispatchResult::changed(true)
            }
            Action::EditText { id, text } => {
                if !self.state.blobs.is_file(id) {
                    return super::DispatchResult::changed(false);
                }
                let entry = self.state.contents.entry(id).or_default();
                if entry.text_content.as_deref() == Some(text.as_str()) {
                    return super::DispatchResult::changed(false);
                }
                entry.text_content = Some(text.clone());
                super::DispatchResult::with_effects(
                    vec![Effect::RecompileFile { id, content: text }],
                    true,
                )
            }
            Action::FileRecompiled { id, result } => {
                let Some(entry) = self.state.contents.get_mut(&id) else {
                    return super::DispatchResult::changed(false);
                };
                let compiled_changed = entry.compiled_content != result.compiled_content;
                entry.diagnostics = result.diagnostics;
                entry.compiled_content = result.compiled_content;
                if compiled_changed && self.state.active_file() == Some(id) {
                    self.sync_playback();
                }
                super::DispatchResult::changed(true)
            }
            _ => super::DispatchResult::changed(false),
        }
    }
}
