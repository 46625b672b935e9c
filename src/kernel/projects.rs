//! Local mirror of the project list shown on the title screen.

use crate::models::{NameError, Project};

#[derive(Debug, Default, Clone)]
pub struct ProjectsState {
    projects: Vec<Project>,
    current: Option<String>,
}

impl ProjectsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id() == id)
    }

    pub fn current(&self) -> Option<&Project> {
        self.current.as_deref().and_then(|id| self.get(id))
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn set_current(&mut self, id: Option<String>) -> bool {
        if self.current == id {
            return false;
        }
        self.current = id;
        true
    }

    pub fn replace_all(&mut self, projects: Vec<Project>) -> bool {
        if self.projects == projects {
            return false;
        }
        self.projects = projects;
        true
    }

    /// Inserts or replaces by id.
    pub fn upsert(&mut self, project: Project) -> bool {
        match self.projects.iter_mut().find(|p| p.id() == project.id()) {
            Some(existing) if *existing == project => false,
            Some(existing) => {
                *existing = project;
                true
            }
            None => {
                self.projects.push(project);
                true
            }
        }
    }

    pub fn update_metadata(&mut self, id: &str, name: &str, description: &str) -> bool {
        let Some(project) = self.projects.iter_mut().find(|p| p.id() == id) else {
            return false;
        };
        if project.metadata.name == name && project.metadata.description == description {
            return false;
        }
        project.metadata.name = name.to_string();
        project.metadata.description = description.to_string();
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<Project> {
        let index = self.projects.iter().position(|p| p.id() == id)?;
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }
        Some(self.projects.remove(index))
    }

    /// Project names must be non-empty and unique (case-insensitive).
    pub fn validate_name(&self, name: &str, exclude: Option<&str>) -> Result<String, NameError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }
        let taken = self
            .projects
            .iter()
            .filter(|p| Some(p.id()) != exclude)
            .any(|p| p.name().eq_ignore_ascii_case(trimmed));
        if taken {
            return Err(NameError::AlreadyExists(trimmed.to_string()));
        }
        Ok(trimmed.to_string())
    }
}
