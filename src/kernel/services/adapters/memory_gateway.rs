//! In-process gateway backed by plain maps.
//!
//! Behaves like the real backend where the engine can observe it: ids are
//! assigned here, sibling names are unique, blob calls need an initialised
//! project. Failures can be injected per operation for tests and demos.

use std::sync::{Arc, Mutex, MutexGuard};

use rustc_hash::FxHashMap;

use crate::kernel::services::ports::{
    GatewayError, GatewayFuture, GatewayOp, GatewayResult, WorkspaceGateway,
};
use crate::models::{
    BlobId, BlobNode, BlobTree, FileContents, Project, ProjectMetadata, ProjectSnapshot,
    Recompiled, TreeSnapshot, WorkspaceLayout,
};

pub type Compiler = Arc<dyn Fn(&str) -> Recompiled + Send + Sync>;

struct ProjectRecord {
    project: Project,
    tree: BlobTree,
    texts: FxHashMap<BlobId, String>,
    layout: Option<WorkspaceLayout>,
}

#[derive(Default)]
struct Inner {
    projects: Vec<ProjectRecord>,
    current: Option<String>,
    next_blob: u32,
    next_project: u32,
    failures: FxHashMap<GatewayOp, GatewayError>,
    calls: Vec<GatewayOp>,
}

impl Inner {
    fn begin(&mut self, op: GatewayOp) -> GatewayResult<()> {
        self.calls.push(op);
        match self.failures.remove(&op) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn record(&self, id: &str) -> GatewayResult<&ProjectRecord> {
        self.projects
            .iter()
            .find(|r| r.project.id() == id)
            .ok_or_else(|| GatewayError::NotFound(format!("project {}", id)))
    }

    fn current_mut(&mut self) -> GatewayResult<&mut ProjectRecord> {
        let id = self
            .current
            .clone()
            .ok_or_else(|| GatewayError::Rejected("no project is open".to_string()))?;
        self.projects
            .iter_mut()
            .find(|r| r.project.id() == id)
            .ok_or(GatewayError::NotFound(format!("project {}", id)))
    }
}

pub struct MemoryGateway {
    inner: Mutex<Inner>,
    compiler: Compiler,
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::with_compiler(|_| Recompiled::default())
    }

    pub fn with_compiler<F>(compiler: F) -> Self
    where
        F: Fn(&str) -> Recompiled + Send + Sync + 'static,
    {
        Self {
            inner: Mutex::new(Inner {
                next_blob: 1,
                next_project: 1,
                ..Inner::default()
            }),
            compiler: Arc::new(compiler),
        }
    }

    /// Makes the next call of `op` fail with `error`.
    pub fn fail_next(&self, op: GatewayOp, error: GatewayError) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.failures.insert(op, error);
        }
    }

    pub fn calls(&self) -> Vec<GatewayOp> {
        self.inner
            .lock()
            .map(|inner| inner.calls.clone())
            .unwrap_or_default()
    }

    pub fn saved_layout(&self, project: &str) -> Option<WorkspaceLayout> {
        let inner = self.inner.lock().ok()?;
        inner.record(project).ok()?.layout.clone()
    }

    pub fn tree_of(&self, project: &str) -> Option<TreeSnapshot> {
        let inner = self.inner.lock().ok()?;
        Some(inner.record(project).ok()?.tree.snapshot())
    }

    fn lock(&self) -> GatewayResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| GatewayError::Unavailable("gateway state poisoned".to_string()))
    }

    fn run<T, F>(&self, op: GatewayOp, f: F) -> GatewayResult<T>
    where
        F: FnOnce(&mut Inner) -> GatewayResult<T>,
    {
        let mut inner = self.lock()?;
        inner.begin(op)?;
        f(&mut inner)
    }

    fn compile(&self, text: &str) -> Recompiled {
        (self.compiler)(text)
    }
}

fn ready<'a, T: Send + 'a>(result: GatewayResult<T>) -> GatewayFuture<'a, T> {
    Box::pin(std::future::ready(result))
}

fn ensure_unique(
    tree: &BlobTree,
    parent: Option<BlobId>,
    name: &str,
    exclude: Option<BlobId>,
) -> GatewayResult<()> {
    let taken = tree
        .children_of(parent)
        .iter()
        .filter(|id| Some(**id) != exclude)
        .filter_map(|id| tree.get(*id))
        .any(|n| n.name == name);
    if taken {
        return Err(GatewayError::NameTaken(name.to_string()));
    }
    Ok(())
}

impl WorkspaceGateway for MemoryGateway {
    fn create_blob(
        &self,
        name: String,
        is_folder: bool,
        parent: Option<BlobId>,
    ) -> GatewayFuture<'_, BlobNode> {
        ready(self.run(GatewayOp::CreateBlob, |inner| {
            let id = BlobId::new(inner.next_blob);
            let record = inner.current_mut()?;
            if let Some(parent) = parent {
                if !record.tree.contains(parent) {
                    return Err(GatewayError::NotFound(format!("blob {}", parent)));
                }
                if !record.tree.is_folder(parent) {
                    return Err(GatewayError::Rejected(format!("blob {} is not a folder", parent)));
                }
            }
            ensure_unique(&record.tree, parent, &name, None)?;

            let node = if is_folder {
                BlobNode::new_folder(id, name, parent)
            } else {
                record.texts.insert(id, String::new());
                BlobNode::new_file(id, name, parent)
            };
            record
                .tree
                .insert(node.clone())
                .map_err(|e| GatewayError::Rejected(e.to_string()))?;
            inner.next_blob += 1;
            Ok(node)
        }))
    }

    fn rename_blob(&self, id: BlobId, name: String) -> GatewayFuture<'_, ()> {
        ready(self.run(GatewayOp::RenameBlob, |inner| {
            let record = inner.current_mut()?;
            let parent = record
                .tree
                .get(id)
                .map(|n| n.parent)
                .ok_or_else(|| GatewayError::NotFound(format!("blob {}", id)))?;
            ensure_unique(&record.tree, parent, &name, Some(id))?;
            record.tree.rename(id, name);
            Ok(())
        }))
    }

    fn delete_blob(&self, id: BlobId) -> GatewayFuture<'_, ()> {
        ready(self.run(GatewayOp::DeleteBlob, |inner| {
            let record = inner.current_mut()?;
            let removed = record.tree.remove_subtree(id);
            if removed.is_empty() {
                return Err(GatewayError::NotFound(format!("blob {}", id)));
            }
            for blob in removed {
                record.texts.remove(&blob);
            }
            Ok(())
        }))
    }

    fn refresh_blobs(&self) -> GatewayFuture<'_, TreeSnapshot> {
        ready(self.run(GatewayOp::RefreshBlobs, |inner| {
            Ok(inner.current_mut()?.tree.snapshot())
        }))
    }

    fn open_file(&self, id: BlobId) -> GatewayFuture<'_, FileContents> {
        let text = self.run(GatewayOp::OpenFile, |inner| {
            let record = inner.current_mut()?;
            record
                .texts
                .get(&id)
                .cloned()
                .ok_or_else(|| GatewayError::NotFound(format!("file {}", id)))
        });
        ready(text.map(|text| {
            let compiled = self.compile(&text);
            FileContents {
                text_content: Some(text),
                diagnostics: compiled.diagnostics,
                compiled_content: compiled.compiled_content,
            }
        }))
    }

    fn recompile_file(&self, id: BlobId, content: String) -> GatewayFuture<'_, Recompiled> {
        let stored = self.run(GatewayOp::RecompileFile, |inner| {
            let record = inner.current_mut()?;
            let text = record
                .texts
                .get_mut(&id)
                .ok_or_else(|| GatewayError::NotFound(format!("file {}", id)))?;
            text.clone_from(&content);
            Ok(())
        });
        ready(stored.map(|()| self.compile(&content)))
    }

    fn list_projects(&self) -> GatewayFuture<'_, Vec<Project>> {
        ready(self.run(GatewayOp::ListProjects, |inner| {
            Ok(inner.projects.iter().map(|r| r.project.clone()).collect())
        }))
    }

    fn create_project(&self, name: String, description: String) -> GatewayFuture<'_, Project> {
        ready(self.run(GatewayOp::CreateProject, |inner| {
            if inner
                .projects
                .iter()
                .any(|r| r.project.name().eq_ignore_ascii_case(&name))
            {
                return Err(GatewayError::NameTaken(name));
            }
            let id = format!("project-{}", inner.next_project);
            inner.next_project += 1;
            let project = Project {
                metadata: ProjectMetadata {
                    id: id.clone(),
                    name,
                    description,
                },
                directory: format!("memory://{}", id),
            };
            inner.projects.push(ProjectRecord {
                project: project.clone(),
                tree: BlobTree::new(),
                texts: FxHashMap::default(),
                layout: None,
            });
            Ok(project)
        }))
    }

    fn edit_project(
        &self,
        id: String,
        name: String,
        description: String,
    ) -> GatewayFuture<'_, ()> {
        ready(self.run(GatewayOp::EditProject, |inner| {
            let record = inner
                .projects
                .iter_mut()
                .find(|r| r.project.id() == id)
                .ok_or_else(|| GatewayError::NotFound(format!("project {}", id)))?;
            record.project.metadata.name = name;
            record.project.metadata.description = description;
            Ok(())
        }))
    }

    fn delete_project(&self, id: String) -> GatewayFuture<'_, ()> {
        ready(self.run(GatewayOp::DeleteProject, |inner| {
            let index = inner
                .projects
                .iter()
                .position(|r| r.project.id() == id)
                .ok_or_else(|| GatewayError::NotFound(format!("project {}", id)))?;
            inner.projects.remove(index);
            if inner.current.as_deref() == Some(id.as_str()) {
                inner.current = None;
            }
            Ok(())
        }))
    }

    fn init_project(&self, id: String) -> GatewayFuture<'_, ProjectSnapshot> {
        ready(self.run(GatewayOp::InitProject, |inner| {
            let record = inner.record(&id)?;
            let snapshot = ProjectSnapshot {
                file_explorer: record.tree.snapshot(),
                layout: record.layout.clone(),
            };
            inner.current = Some(id);
            Ok(snapshot)
        }))
    }

    fn save_workspace_layout(&self, layout: WorkspaceLayout) -> GatewayFuture<'_, ()> {
        ready(self.run(GatewayOp::SaveLayout, |inner| {
            inner.current_mut()?.layout = Some(layout);
            Ok(())
        }))
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/memory_gateway.rs"]
mod tests;
