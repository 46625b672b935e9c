//! Open editor tabs with a single active selection.
//!
//! New panels are prepended. Closing the active panel activates whatever now
//! sits at its old index, else the panel before it, else nothing.

use crate::models::{BlobId, Panel, PanelId};

/// How a panel is addressed by an open request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelRef {
    File(BlobId),
    Panel(PanelId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelStatus {
    Idle,
    Active(PanelId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Succession {
    /// The removed panel was not active.
    Unchanged,
    Activated(PanelId),
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRemoval {
    pub panel: Panel,
    pub index: usize,
    pub succession: Succession,
}

#[derive(Debug, Default, Clone)]
pub struct PanelsState {
    panels: Vec<Panel>,
    active: Option<PanelId>,
}

impl PanelsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn active(&self) -> Option<&PanelId> {
        self.active.as_ref()
    }

    pub fn status(&self) -> PanelStatus {
        match &self.active {
            None => PanelStatus::Idle,
            Some(id) => PanelStatus::Active(id.clone()),
        }
    }

    pub fn active_panel(&self) -> Option<&Panel> {
        self.active.as_ref().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &PanelId) -> Option<&Panel> {
        self.panels.iter().find(|p| &p.id == id)
    }

    pub fn position(&self, id: &PanelId) -> Option<usize> {
        self.panels.iter().position(|p| &p.id == id)
    }

    pub fn find_by_file(&self, file: BlobId) -> Option<&Panel> {
        self.panels.iter().find(|p| p.file_id == Some(file))
    }

    pub fn resolve(&self, target: &PanelRef) -> Option<&Panel> {
        match target {
            PanelRef::File(file) => self.find_by_file(*file),
            PanelRef::Panel(id) => self.get(id),
        }
    }

    /// Prepends `panel` and makes it active. An id already in the list is
    /// re-activated in place instead.
    pub fn create(&mut self, panel: Panel) -> bool {
        if self.get(&panel.id).is_some() {
            return self.activate(&panel.id);
        }
        self.active = Some(panel.id.clone());
        self.panels.insert(0, panel);
        true
    }

    pub fn activate(&mut self, id: &PanelId) -> bool {
        if self.get(id).is_none() || self.active.as_ref() == Some(id) {
            return false;
        }
        self.active = Some(id.clone());
        true
    }

    pub fn remove(&mut self, id: &PanelId) -> Option<PanelRemoval> {
        let index = self.position(id)?;
        let panel = self.panels.remove(index);

        if self.active.as_ref() != Some(id) {
            return Some(PanelRemoval {
                panel,
                index,
                succession: Succession::Unchanged,
            });
        }

        let successor = self
            .panels
            .get(index)
            .or_else(|| index.checked_sub(1).and_then(|prev| self.panels.get(prev)))
            .map(|p| p.id.clone());

        let succession = match successor {
            Some(next) => {
                self.active = Some(next.clone());
                Succession::Activated(next)
            }
            None => {
                self.active = None;
                Succession::Cleared
            }
        };

        Some(PanelRemoval {
            panel,
            index,
            succession,
        })
    }

    pub fn set_pin(&mut self, id: &PanelId, pinned: bool) -> bool {
        let Some(panel) = self.panels.iter_mut().find(|p| &p.id == id) else {
            return false;
        };
        if panel.pinned == pinned {
            return false;
        }
        panel.pinned = pinned;
        true
    }

    /// Relabels the panel bound to `file`; id and position are kept.
    pub fn rename_file_panel(&mut self, file: BlobId, name: &str) -> bool {
        let Some(panel) = self.panels.iter_mut().find(|p| p.file_id == Some(file)) else {
            return false;
        };
        if panel.name == name {
            return false;
        }
        panel.name = name.to_string();
        true
    }

    /// Pinned panels first, otherwise list order. Read-time only.
    pub fn presentation_order(&self) -> Vec<&Panel> {
        let (mut pinned, rest): (Vec<&Panel>, Vec<&Panel>) =
            self.panels.iter().partition(|p| p.pinned);
        pinned.extend(rest);
        pinned
    }

    pub fn pinned_ids(&self) -> Vec<PanelId> {
        self.panels
            .iter()
            .filter(|p| p.pinned)
            .map(|p| p.id.clone())
            .collect()
    }

    /// Replaces the list wholesale (layout restore). The active pointer is
    /// kept only if it still names a panel.
    pub fn restore(&mut self, panels: Vec<Panel>, active: Option<PanelId>) {
        self.panels = panels;
        self.active = active.filter(|id| self.get(id).is_some());
    }

    pub fn clear(&mut self) {
        self.panels.clear();
        self.active = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/panels.rs"]
mod tests;
