use rustc_hash::FxHashSet;

use crate::kernel::panels::PanelRef;
use crate::kernel::{Action, Effect};
use crate::models::{BlobId, BlobKind, CreationIntent};

impl super::Store {
    pub(super) fn reduce_blob_action(&mut self, action: Action) -> super::DispatchResult {
        match action {
            Action::CreateBlob { name, kind, parent } => {
                let validated = self.state.blobs.validate_name(
                    parent,
                    &name,
                    kind,
                    &self.state.config.document_extension,
                    self.state.config.max_name_len,
                    None,
                );
                match validated {
                    Err(error) => self.reject_input(error),
                    Ok(name) => {
                        let cleared = self.accept_input();
                        super::DispatchResult::with_effects(
                            vec![Effect::CreateBlob {
                                name,
                                is_folder: kind == BlobKind::Folder,
                                parent,
                            }],
                            cleared,
                        )
                    }
                }
            }
            Action::BlobCreated(node) => {
                let parent = node.parent;
                let id = node.id;
                if let Err(error) = self.state.blobs.insert(node) {
                    tracing::debug!(blob = %id, error = %error, "ignoring created blob");
                    return super::DispatchResult::changed(false);
                }
                self.state.blobs.clear_creating();
                self.state.root_creating = CreationIntent::None;
                if let Some(parent) = parent {
                    self.state.blobs.set_open(parent, true);
                }
                super::DispatchResult::changed(true)
            }
            Action::RenameBlob { id, name } => {
                let Some(node) = self.state.blobs.get(id) else {
                    return super::DispatchResult::changed(false);
                };
                let (kind, parent, current) = (node.kind(), node.parent, node.name.clone());
                let validated = self.state.blobs.validate_name(
                    parent,
                    &name,
                    kind,
                    &self.state.config.document_extension,
                    self.state.config.max_name_len,
                    Some(id),
                );
                match validated {
                    Err(error) => self.reject_input(error),
                    Ok(name) if name == current => {
                        super::DispatchResult::changed(self.accept_input())
                    }
                    Ok(name) => {
                        let cleared = self.accept_input();
                        super::DispatchResult::with_effects(
                            vec![Effect::RenameBlob { id, name }],
                            cleared,
                        )
                    }
                }
            }
            Action::BlobRenamed { id, name } => {
                if !self.state.blobs.rename(id, name.as_str()) {
                    return super::DispatchResult::changed(false);
                }
                self.state.panels.rename_file_panel(id, &name);
                super::DispatchResult::changed(true)
            }
            Action::DeleteBlob { id } => {
                if !self.state.blobs.contains(id) {
                    return super::DispatchResult::changed(false);
                }
                super::DispatchResult::with_effects(vec![Effect::DeleteBlob { id }], false)
            }
            Action::BlobDeleted { id } => {
                let removed = self.state.blobs.remove_subtree(id);
                if removed.is_empty() {
                    return super::DispatchResult::changed(false);
                }
                tracing::debug!(blob = %id, removed = removed.len(), "blob subtree deleted");
                let removed: FxHashSet<BlobId> = removed.into_iter().collect();
                let effects = self.close_panels_of(&removed);
                super::DispatchResult::with_effects(effects, true)
            }
            Action::RefreshBlobs => {
                super::DispatchResult::with_effects(vec![Effect::RefreshBlobs], false)
            }
            Action::BlobsRefreshed(snapshot) => {
                let before: Vec<BlobId> = self.state.blobs.ids().collect();
                self.state.blobs.replace_preserving_open(snapshot);
                let vanished: FxHashSet<BlobId> = before
                    .into_iter()
                    .filter(|id| !self.state.blobs.contains(*id))
                    .collect();
                let effects = self.close_panels_of(&vanished);
                for panel in self.state.panels.panels().to_vec() {
                    let Some(file) = panel.file_id else {
                        continue;
                    };
                    if let Some(node) = self.state.blobs.get(file) {
                        let name = node.name.clone();
                        self.state.panels.rename_file_panel(file, &name);
                    }
                }
                super::DispatchResult::with_effects(effects, true)
            }
            Action::SetBlobOpen { id, open } => {
                super::DispatchResult::changed(self.state.blobs.set_open(id, open))
            }
            Action::SetCreating { id, intent } => {
                super::DispatchResult::changed(self.state.blobs.set_creating(id, intent))
            }
            Action::BeginCreate(kind) => {
                let intent = CreationIntent::from_kind(Some(kind));
                let mut changed = self.state.blobs.clear_creating();
                let folder = self
                    .state
                    .current_file
                    .filter(|id| self.state.blobs.is_folder(*id));
                match folder {
                    Some(folder) => {
                        changed |= self.state.root_creating != CreationIntent::None;
                        self.state.root_creating = CreationIntent::None;
                        changed |= self.state.blobs.set_creating(folder, intent);
                        changed |= self.state.blobs.set_open(folder, true);
                    }
                    None => {
                        changed |= self.state.root_creating != intent;
                        self.state.root_creating = intent;
                    }
                }
                super::DispatchResult::changed(changed)
            }
            Action::CancelCreate => {
                let mut changed = self.state.blobs.clear_creating();
                changed |= self.state.root_creating != CreationIntent::None;
                self.state.root_creating = CreationIntent::None;
                changed |= self.accept_input();
                super::DispatchResult::changed(changed)
            }
            Action::OpenDirectoryRecursive { id } => {
                super::DispatchResult::changed(self.state.blobs.open_directory_recursive(id))
            }
            Action::CollapseAll => super::DispatchResult::changed(self.state.blobs.collapse_all()),
            Action::SelectBlob { id } => {
                if self.state.blobs.is_folder(id) {
                    let changed = self.state.current_file != Some(id);
                    self.state.current_file = Some(id);
                    return super::DispatchResult::changed(changed);
                }
                if self.state.blobs.is_file(id) {
                    return self.reduce_panel_action(Action::OpenPanel(PanelRef::File(id)));
                }
                super::DispatchResult::changed(false)
            }
            _ => super::DispatchResult::changed(false),
        }
    }
}
