use crate::kernel::state::Page;
use crate::kernel::{Action, Effect};
use crate::models::BlobTree;

impl super::Store {
    pub(super) fn reduce_project_action(&mut self, action: Action) -> super::DispatchResult {
        match action {
            Action::LoadProjects => {
                super::DispatchResult::with_effects(vec![Effect::ListProjects], false)
            }
            Action::ProjectsLoaded(projects) => {
                super::DispatchResult::changed(self.state.projects.replace_all(projects))
            }
            Action::CreateProject { name, description } => {
                match self.state.projects.validate_name(&name, None) {
                    Err(error) => self.reject_input(error),
                    Ok(name) => {
                        let cleared = self.accept_input();
                        super::DispatchResult::with_effects(
                            vec![Effect::CreateProject { name, description }],
                            cleared,
                        )
                    }
                }
            }
            Action::ProjectCreated(project) => {
                super::DispatchResult::changed(self.state.projects.upsert(project))
            }
            Action::EditProject {
                id,
                name,
                description,
            } => {
                if self.state.projects.get(&id).is_none() {
                    return super::DispatchResult::changed(false);
                }
                match self.state.projects.validate_name(&name, Some(id.as_str())) {
                    Err(error) => self.reject_input(error),
                    Ok(name) => {
                        let cleared = self.accept_input();
                        super::DispatchResult::with_effects(
                            vec![Effect::EditProject {
                                id,
                                name,
                                description,
                            }],
                            cleared,
                        )
                    }
                }
            }
            Action::ProjectEdited {
                id,
                name,
                description,
            } => super::DispatchResult::changed(self.state.projects.update_metadata(
                &id,
                &name,
                &description,
            )),
            Action::DeleteProject { id } => {
                if self.state.projects.get(&id).is_none() {
                    return super::DispatchResult::changed(false);
                }
                super::DispatchResult::with_effects(vec![Effect::DeleteProject { id }], false)
            }
            Action::ProjectDeleted { id } => {
                let was_current = self.state.projects.current_id() == Some(id.as_str());
                if self.state.projects.remove(&id).is_none() {
                    return super::DispatchResult::changed(false);
                }
                if was_current {
                    self.state.reset_workspace();
                    self.state.page = Page::TitleScreen;
                }
                super::DispatchResult::changed(true)
            }
            Action::OpenProject { id } => {
                if self.state.projects.get(&id).is_none() {
                    return super::DispatchResult::changed(false);
                }
                super::DispatchResult::with_effects(vec![Effect::InitProject { id }], false)
            }
            Action::ProjectOpened { id, snapshot } => {
                self.state.reset_workspace();
                self.state.blobs = BlobTree::from_snapshot(snapshot.file_explorer);
                self.state.projects.set_current(Some(id));
                self.state.page = Page::Editor;
                let effects = match snapshot.layout {
                    Some(layout) => self.restore_layout(layout),
                    None => Vec::new(),
                };
                super::DispatchResult::with_effects(effects, true)
            }
            Action::CloseProject => {
                if self.state.page != Page::Editor {
                    return super::DispatchResult::changed(false);
                }
                let mut effects = Vec::new();
                if self.state.projects.current_id().is_some() {
                    effects.push(Effect::SaveLayout(self.state.layout()));
                }
                self.state.reset_workspace();
                self.state.projects.set_current(None);
                self.state.page = Page::TitleScreen;
                super::DispatchResult::with_effects(effects, true)
            }
            _ => super::DispatchResult::changed(false),
        }
    }
}
