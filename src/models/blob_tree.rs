//! Project blob tree: files and folders keyed by gateway-assigned ids.
//!
//! `parent` and `children` are id lookups into the same map, never
//! references. Root-level ids live in `global`, in insertion order.

use regex::Regex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobId(u32);

impl BlobId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlobKind {
    File,
    Folder,
}

/// Transient inline-creation state of a folder row.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CreationIntent {
    #[default]
    None,
    CreatingFile,
    CreatingFolder,
}

impl CreationIntent {
    pub fn from_kind(kind: Option<BlobKind>) -> Self {
        match kind {
            None => Self::None,
            Some(BlobKind::File) => Self::CreatingFile,
            Some(BlobKind::Folder) => Self::CreatingFolder,
        }
    }

    pub fn kind(self) -> Option<BlobKind> {
        match self {
            Self::None => None,
            Self::CreatingFile => Some(BlobKind::File),
            Self::CreatingFolder => Some(BlobKind::Folder),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FolderState {
    pub children: Vec<BlobId>,
    pub is_open: bool,
    pub creating: CreationIntent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlobBody {
    File,
    Folder(FolderState),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BlobRecord", into = "BlobRecord")]
pub struct BlobNode {
    pub id: BlobId,
    pub name: String,
    pub parent: Option<BlobId>,
    pub body: BlobBody,
}

impl BlobNode {
    pub fn new_file(id: BlobId, name: impl Into<String>, parent: Option<BlobId>) -> Self {
        Self {
            id,
            name: name.into(),
            parent,
            body: BlobBody::File,
        }
    }

    pub fn new_folder(id: BlobId, name: impl Into<String>, parent: Option<BlobId>) -> Self {
        Self {
            id,
            name: name.into(),
            parent,
            body: BlobBody::Folder(FolderState::default()),
        }
    }

    pub fn kind(&self) -> BlobKind {
        match self.body {
            BlobBody::File => BlobKind::File,
            BlobBody::Folder(_) => BlobKind::Folder,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.body, BlobBody::Folder(_))
    }

    pub fn children(&self) -> Option<&[BlobId]> {
        match &self.body {
            BlobBody::File => None,
            BlobBody::Folder(folder) => Some(&folder.children),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(&self.body, BlobBody::Folder(folder) if folder.is_open)
    }

    pub fn creating(&self) -> CreationIntent {
        match &self.body {
            BlobBody::File => CreationIntent::None,
            BlobBody::Folder(folder) => folder.creating,
        }
    }

    fn folder_mut(&mut self) -> Option<&mut FolderState> {
        match &mut self.body {
            BlobBody::File => None,
            BlobBody::Folder(folder) => Some(folder),
        }
    }
}

/// Wire shape exchanged with the gateway: `children` present iff folder.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlobRecord {
    id: BlobId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<BlobId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<BlobId>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    is_open: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_creating: Option<BlobKind>,
}

impl From<BlobRecord> for BlobNode {
    fn from(record: BlobRecord) -> Self {
        let body = match record.children {
            None => BlobBody::File,
            Some(children) => BlobBody::Folder(FolderState {
                children,
                is_open: record.is_open,
                creating: CreationIntent::from_kind(record.is_creating),
            }),
        };
        Self {
            id: record.id,
            name: record.name,
            parent: record.parent,
            body,
        }
    }
}

impl From<BlobNode> for BlobRecord {
    fn from(node: BlobNode) -> Self {
        let (children, is_open, is_creating) = match node.body {
            BlobBody::File => (None, false, None),
            BlobBody::Folder(folder) => (
                Some(folder.children),
                folder.is_open,
                folder.creating.kind(),
            ),
        };
        Self {
            id: node.id,
            name: node.name,
            parent: node.parent,
            children,
            is_open,
            is_creating,
        }
    }
}

/// Full tree as returned by the gateway when a project is opened or refreshed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub blobs: FxHashMap<BlobId, BlobNode>,
    pub global: Vec<BlobId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobTreeError {
    UnknownBlob(BlobId),
    ParentNotFolder(BlobId),
    DuplicateId(BlobId),
}

impl fmt::Display for BlobTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlobTreeError::UnknownBlob(id) => write!(f, "unknown blob {}", id),
            BlobTreeError::ParentNotFolder(id) => write!(f, "blob {} is not a folder", id),
            BlobTreeError::DuplicateId(id) => write!(f, "blob {} already exists", id),
        }
    }
}

impl std::error::Error for BlobTreeError {}

/// Inline validation failure for a file, folder or project name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    Empty,
    Reserved(String),
    IllegalCharacter(char),
    TooLong(usize),
    AlreadyExists(String),
    ParentNotFolder,
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameError::Empty => write!(f, "A name must be provided."),
            NameError::Reserved(name) => write!(f, "\"{}\" is a reserved name.", name),
            NameError::IllegalCharacter(ch) => {
                write!(f, "The character {:?} is not allowed in names.", ch)
            }
            NameError::TooLong(max) => write!(f, "Names are limited to {} characters.", max),
            NameError::AlreadyExists(name) => {
                write!(f, "A file or folder named \"{}\" already exists here.", name)
            }
            NameError::ParentNotFolder => write!(f, "The target location is not a folder."),
        }
    }
}

impl std::error::Error for NameError {}

fn illegal_chars() -> &'static Regex {
    static ILLEGAL: OnceLock<Regex> = OnceLock::new();
    ILLEGAL.get_or_init(|| match Regex::new(r#"[\\/:*?"<>|\x00-\x1F]"#) {
        Ok(re) => re,
        Err(e) => unreachable!("illegal character pattern is static: {e}"),
    })
}

/// Checks the shape of a bare name: non-empty, not reserved, no path or
/// control characters, within `max_len` characters.
pub fn check_name_format(name: &str, max_len: usize) -> Result<(), NameError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(NameError::Empty);
    }
    if trimmed == "." || trimmed == ".." {
        return Err(NameError::Reserved(trimmed.to_string()));
    }
    if let Some(m) = illegal_chars().find(name) {
        if let Some(ch) = m.as_str().chars().next() {
            return Err(NameError::IllegalCharacter(ch));
        }
    }
    if name.chars().count() > max_len {
        return Err(NameError::TooLong(max_len));
    }
    Ok(())
}

/// The name a blob is stored under. Files always get the document extension
/// appended, even when the typed name already ends with it.
pub fn stored_name(name: &str, kind: BlobKind, extension: &str) -> String {
    match kind {
        BlobKind::Folder => name.to_string(),
        BlobKind::File => format!("{}{}", name, extension),
    }
}

/// The editable part of a stored name (extension stripped for files).
pub fn display_stem<'a>(name: &'a str, kind: BlobKind, extension: &str) -> &'a str {
    match kind {
        BlobKind::Folder => name,
        BlobKind::File => name.strip_suffix(extension).unwrap_or(name),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRow {
    pub id: BlobId,
    pub depth: u16,
    pub name: String,
    pub kind: BlobKind,
    pub is_open: bool,
    pub creating: CreationIntent,
}

#[derive(Debug, Clone, Default)]
pub struct BlobTree {
    blobs: FxHashMap<BlobId, BlobNode>,
    global: Vec<BlobId>,
}

impl BlobTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: TreeSnapshot) -> Self {
        Self {
            blobs: snapshot.blobs,
            global: snapshot.global,
        }
    }

    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            blobs: self.blobs.clone(),
            global: self.global.clone(),
        }
    }

    pub fn get(&self, id: BlobId) -> Option<&BlobNode> {
        self.blobs.get(&id)
    }

    pub fn contains(&self, id: BlobId) -> bool {
        self.blobs.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = BlobId> + '_ {
        self.blobs.keys().copied()
    }

    pub fn global(&self) -> &[BlobId] {
        &self.global
    }

    pub fn is_folder(&self, id: BlobId) -> bool {
        self.blobs.get(&id).is_some_and(BlobNode::is_folder)
    }

    pub fn is_file(&self, id: BlobId) -> bool {
        self.blobs.get(&id).is_some_and(|n| !n.is_folder())
    }

    /// Ordered child ids of `parent`, or the root-level list when `None`.
    pub fn children_of(&self, parent: Option<BlobId>) -> &[BlobId] {
        match parent {
            None => &self.global,
            Some(id) => self
                .blobs
                .get(&id)
                .and_then(BlobNode::children)
                .unwrap_or(&[]),
        }
    }

    pub fn insert(&mut self, node: BlobNode) -> Result<(), BlobTreeError> {
        if self.blobs.contains_key(&node.id) {
            return Err(BlobTreeError::DuplicateId(node.id));
        }
        let id = node.id;
        match node.parent {
            Some(parent) => {
                let parent_node = self
                    .blobs
                    .get_mut(&parent)
                    .ok_or(BlobTreeError::UnknownBlob(parent))?;
                let folder = parent_node
                    .folder_mut()
                    .ok_or(BlobTreeError::ParentNotFolder(parent))?;
                folder.children.push(id);
            }
            None => self.global.push(id),
        }
        self.blobs.insert(id, node);
        Ok(())
    }

    /// Renames in place; id, parent and sibling position are untouched.
    pub fn rename(&mut self, id: BlobId, name: impl Into<String>) -> bool {
        let Some(node) = self.blobs.get_mut(&id) else {
            return false;
        };
        let name = name.into();
        if node.name == name {
            return false;
        }
        node.name = name;
        true
    }

    /// Removes `id` and every descendant, detaching `id` from its parent
    /// (or from `global`). Returns the removed ids; empty if `id` is unknown.
    pub fn remove_subtree(&mut self, id: BlobId) -> Vec<BlobId> {
        let Some(parent) = self.blobs.get(&id).map(|n| n.parent) else {
            return Vec::new();
        };

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.blobs.remove(&current) {
                if let Some(children) = node.children() {
                    stack.extend(children.iter().copied());
                }
                removed.push(current);
            }
        }

        match parent.and_then(|p| self.blobs.get_mut(&p)) {
            Some(parent_node) => {
                if let Some(folder) = parent_node.folder_mut() {
                    folder.children.retain(|child| *child != id);
                }
            }
            None => self.global.retain(|g| *g != id),
        }

        removed
    }

    pub fn set_open(&mut self, id: BlobId, open: bool) -> bool {
        let Some(folder) = self.blobs.get_mut(&id).and_then(BlobNode::folder_mut) else {
            return false;
        };
        if folder.is_open == open {
            return false;
        }
        folder.is_open = open;
        true
    }

    pub fn set_creating(&mut self, id: BlobId, intent: CreationIntent) -> bool {
        let Some(folder) = self.blobs.get_mut(&id).and_then(BlobNode::folder_mut) else {
            return false;
        };
        if folder.creating == intent {
            return false;
        }
        folder.creating = intent;
        true
    }

    /// Clears the creating intent on every folder; returns whether any was set.
    pub fn clear_creating(&mut self) -> bool {
        let mut changed = false;
        for node in self.blobs.values_mut() {
            if let Some(folder) = node.folder_mut() {
                if folder.creating != CreationIntent::None {
                    folder.creating = CreationIntent::None;
                    changed = true;
                }
            }
        }
        changed
    }

    /// Opens `id` (if a folder) and every ancestor folder up to the root.
    pub fn open_directory_recursive(&mut self, id: BlobId) -> bool {
        let mut changed = false;
        let mut current = Some(id);
        let mut remaining = self.blobs.len();
        while let Some(cur) = current {
            let Some(node) = self.blobs.get_mut(&cur) else {
                break;
            };
            if let Some(folder) = node.folder_mut() {
                if !folder.is_open {
                    folder.is_open = true;
                    changed = true;
                }
            }
            current = node.parent;
            if remaining == 0 {
                break;
            }
            remaining -= 1;
        }
        changed
    }

    pub fn collapse_all(&mut self) -> bool {
        let mut changed = false;
        for node in self.blobs.values_mut() {
            if let Some(folder) = node.folder_mut() {
                if folder.is_open {
                    folder.is_open = false;
                    changed = true;
                }
            }
        }
        changed
    }

    pub fn open_folders(&self) -> Vec<BlobId> {
        let mut open: Vec<BlobId> = self
            .blobs
            .values()
            .filter(|n| n.is_open())
            .map(|n| n.id)
            .collect();
        open.sort();
        open
    }

    /// Replaces the whole tree, keeping the expansion state of ids that
    /// survive the refresh.
    pub fn replace_preserving_open(&mut self, snapshot: TreeSnapshot) {
        let open = self.open_folders();
        self.blobs = snapshot.blobs;
        self.global = snapshot.global;
        for id in open {
            self.set_open(id, true);
        }
    }

    /// Children of `parent` in display order: folders first, then files,
    /// each alphabetical. Storage order is not affected.
    pub fn sorted_children(&self, parent: Option<BlobId>) -> Vec<BlobId> {
        let mut ids: Vec<&BlobNode> = self
            .children_of(parent)
            .iter()
            .filter_map(|id| self.blobs.get(id))
            .collect();
        ids.sort_by(|a, b| {
            b.is_folder()
                .cmp(&a.is_folder())
                .then_with(|| a.name.cmp(&b.name))
        });
        ids.into_iter().map(|n| n.id).collect()
    }

    pub fn flatten_for_view(&self) -> Vec<BlobRow> {
        let mut rows = Vec::new();
        let mut stack: Vec<(BlobId, u16)> = self
            .sorted_children(None)
            .into_iter()
            .rev()
            .map(|id| (id, 0))
            .collect();

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.blobs.get(&id) else {
                continue;
            };
            rows.push(BlobRow {
                id,
                depth,
                name: node.name.clone(),
                kind: node.kind(),
                is_open: node.is_open(),
                creating: node.creating(),
            });
            if node.is_open() {
                for child in self.sorted_children(Some(id)).into_iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }

        rows
    }

    /// Validates a new or renamed blob name against format rules and
    /// sibling collisions. Returns the name to send to the gateway.
    pub fn validate_name(
        &self,
        parent: Option<BlobId>,
        name: &str,
        kind: BlobKind,
        extension: &str,
        max_len: usize,
        exclude: Option<BlobId>,
    ) -> Result<String, NameError> {
        if let Some(parent) = parent {
            if !self.is_folder(parent) {
                return Err(NameError::ParentNotFolder);
            }
        }
        check_name_format(name, max_len)?;

        let candidate = stored_name(name.trim(), kind, extension);
        let taken = self
            .children_of(parent)
            .iter()
            .filter(|id| Some(**id) != exclude)
            .filter_map(|id| self.blobs.get(id))
            .any(|sibling| sibling.name == candidate);
        if taken {
            return Err(NameError::AlreadyExists(candidate));
        }
        Ok(candidate)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/blob_tree.rs"]
mod tests;
