use rustc_hash::FxHashSet;

use crate::kernel::state::Page;
use crate::kernel::{Action, Effect};
use crate::models::{Panel, PanelId, WorkspaceLayout};

impl super::Store {
    pub(super) fn reduce_layout_action(&mut self, action: Action) -> super::DispatchResult {
        match action {
            Action::SaveLayout => {
                if self.state.page != Page::Editor || self.state.projects.current_id().is_none() {
                    return super::DispatchResult::changed(false);
                }
                super::DispatchResult::with_effects(
                    vec![Effect::SaveLayout(self.state.layout())],
                    false,
                )
            }
            Action::LayoutSaved => {
                tracing::trace!("workspace layout saved");
                super::DispatchResult::changed(false)
            }
            _ => super::DispatchResult::changed(false),
        }
    }

    /// Re-applies a saved layout onto a freshly mounted tree. Panels whose
    /// file no longer exists are dropped; list order is preserved.
    pub(super) fn restore_layout(&mut self, layout: WorkspaceLayout) -> Vec<Effect> {
        for folder in &layout.open_folders {
            self.state.blobs.set_open(*folder, true);
        }

        let pinned: FxHashSet<PanelId> = layout.pinned_panels.into_iter().collect();
        let mut seen: FxHashSet<PanelId> = FxHashSet::default();
        let panels: Vec<Panel> = layout
            .open_panels
            .into_iter()
            .filter(|panel| seen.insert(panel.id.clone()))
            .filter_map(|mut panel| {
                if let Some(file) = panel.file_id {
                    let node = self.state.blobs.get(file).filter(|n| !n.is_folder())?;
                    panel.name = node.name.clone();
                }
                panel.pinned |= pinned.contains(&panel.id);
                Some(panel)
            })
            .collect();

        tracing::debug!(panels = panels.len(), "restoring workspace layout");
        self.state.panels.restore(panels, layout.last_open);
        if self.state.panels.active().is_some() {
            self.on_panel_activated()
        } else {
            Vec::new()
        }
    }
}
