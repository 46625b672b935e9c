use rustc_hash::FxHashSet;

use crate::kernel::panels::{PanelRef, Succession};
use crate::kernel::{Action, Effect};
use crate::models::{BlobId, Panel, PanelId};

impl super::Store {
    pub(super) fn reduce_panel_action(&mut self, action: Action) -> super::DispatchResult {
        match action {
            Action::OpenPanel(target) => {
                if let Some(existing) = self.state.panels.resolve(&target) {
                    let id = existing.id.clone();
                    return self.set_active_panel(id);
                }
                match target {
                    PanelRef::File(file) => {
                        let Some(node) = self.state.blobs.get(file).filter(|n| !n.is_folder())
                        else {
                            return super::DispatchResult::changed(false);
                        };
                        let panel = Panel::for_file(file, node.name.clone());
                        self.create_panel(panel)
                    }
                    // Synthetic panels are only created explicitly.
                    PanelRef::Panel(_) => super::DispatchResult::changed(false),
                }
            }
            Action::CreatePanel(panel) => {
                if self.state.panels.get(&panel.id).is_some() {
                    return self.set_active_panel(panel.id);
                }
                self.create_panel(panel)
            }
            Action::SetActivePanel(id) => self.set_active_panel(id),
            Action::RemovePanel(id) => {
                let Some(removal) = self.state.panels.remove(&id) else {
                    return super::DispatchResult::changed(false);
                };
                let effects = match removal.succession {
                    Succession::Unchanged => Vec::new(),
                    Succession::Activated(next) => {
                        tracing::debug!(closed = %id, next = %next, "panel succession");
                        self.on_panel_activated()
                    }
                    Succession::Cleared => {
                        if removal.panel.is_file_bound() {
                            self.state.current_file = None;
                        }
                        self.sync_playback();
                        Vec::new()
                    }
                };
                super::DispatchResult::with_effects(effects, true)
            }
            Action::SetPanelPin { id, pinned } => {
                super::DispatchResult::changed(self.state.panels.set_pin(&id, pinned))
            }
            _ => super::DispatchResult::changed(false),
        }
    }

    fn create_panel(&mut self, panel: Panel) -> super::DispatchResult {
        if panel
            .file_id
            .is_some_and(|file| !self.state.blobs.is_file(file))
        {
            return super::DispatchResult::changed(false);
        }
        self.state.panels.create(panel);
        let effects = self.on_panel_activated();
        super::DispatchResult::with_effects(effects, true)
    }

    fn set_active_panel(&mut self, id: PanelId) -> super::DispatchResult {
        if self.state.panels.active() == Some(&id) {
            return super::DispatchResult::changed(false);
        }
        if !self.state.panels.activate(&id) {
            return super::DispatchResult::changed(false);
        }
        let effects = self.on_panel_activated();
        super::DispatchResult::with_effects(effects, true)
    }

    /// Side effects of a panel becoming active: file-bound panels select
    /// their file, reveal its ancestry and load it unless cached.
    pub(super) fn on_panel_activated(&mut self) -> Vec<Effect> {
        let Some(file) = self.state.active_file() else {
            self.sync_playback();
            return Vec::new();
        };
        self.state.current_file = Some(file);
        self.state.blobs.open_directory_recursive(file);
        self.sync_playback();
        if self.state.contents.contains_key(&file) {
            Vec::new()
        } else {
            vec![Effect::OpenFile(file)]
        }
    }

    /// Closes every panel bound to one of `files` as a single step, then
    /// settles activation once on whichever panel survives.
    pub(super) fn close_panels_of(&mut self, files: &FxHashSet<BlobId>) -> Vec<Effect> {
        let doomed: Vec<PanelId> = self
            .state
            .panels
            .panels()
            .iter()
            .filter(|p| p.file_id.is_some_and(|f| files.contains(&f)))
            .map(|p| p.id.clone())
            .collect();

        let mut active_lost = false;
        for id in &doomed {
            if let Some(removal) = self.state.panels.remove(id) {
                active_lost |= removal.succession != Succession::Unchanged;
            }
        }

        self.state.contents.retain(|id, _| !files.contains(id));
        if self.state.current_file.is_some_and(|f| files.contains(&f)) {
            self.state.current_file = None;
        }

        if !active_lost {
            return Vec::new();
        }
        tracing::debug!(closed = doomed.len(), "closed panels of removed blobs");
        if self.state.panels.active().is_none() {
            self.state.current_file = None;
        }
        self.on_panel_activated()
    }
}
