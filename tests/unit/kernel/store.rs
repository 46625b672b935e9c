use super::*;
use crate::kernel::panels::PanelRef;
use crate::kernel::services::ports::{GatewayError, GatewayOp, WorkspaceConfig};
use crate::kernel::state::Page;
use crate::models::{
    AstBlock, BlobId, BlobKind, BlobNode, BlobTree, CompiledDocument, CreationIntent,
    FileContents, NameError, Panel, PanelId, Project, ProjectMetadata, ProjectSnapshot,
    Recompiled, WorkspaceLayout,
};

const CHAPTER: BlobId = BlobId::new(1);
const SCENE: BlobId = BlobId::new(2);
const NOTES: BlobId = BlobId::new(3);
const SUB: BlobId = BlobId::new(4);
const DEEP: BlobId = BlobId::new(5);

/// Chapter/ { Scene.md, Sub/ { Deep.md } }, Notes.md
fn sample_tree() -> BlobTree {
    let mut tree = BlobTree::new();
    tree.insert(BlobNode::new_folder(CHAPTER, "Chapter", None)).unwrap();
    tree.insert(BlobNode::new_file(SCENE, "Scene.md", Some(CHAPTER)))
        .unwrap();
    tree.insert(BlobNode::new_file(NOTES, "Notes.md", None)).unwrap();
    tree.insert(BlobNode::new_folder(SUB, "Sub", Some(CHAPTER))).unwrap();
    tree.insert(BlobNode::new_file(DEEP, "Deep.md", Some(SUB))).unwrap();
    tree
}

fn new_store() -> Store {
    let mut state = AppState::new(WorkspaceConfig::default());
    state.blobs = sample_tree();
    state.page = Page::Editor;
    Store::new(state)
}

fn compiled(blocks: Vec<AstBlock>) -> FileContents {
    FileContents {
        text_content: Some(String::new()),
        diagnostics: Vec::new(),
        compiled_content: Some(CompiledDocument {
            title: None,
            blocks,
        }),
    }
}

fn open_file(store: &mut Store, file: BlobId) -> Vec<Effect> {
    store.dispatch(Action::OpenPanel(PanelRef::File(file))).effects
}

fn project(id: &str, name: &str) -> Project {
    Project {
        metadata: ProjectMetadata {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
        },
        directory: String::new(),
    }
}

#[test]
fn create_blob_validates_before_requesting() {
    let mut store = new_store();

    let result = store.dispatch(Action::CreateBlob {
        name: "Scene".to_string(),
        kind: BlobKind::File,
        parent: Some(CHAPTER),
    });
    assert!(result.effects.is_empty());
    assert_eq!(
        store.state.input_error,
        Some(NameError::AlreadyExists("Scene.md".to_string()))
    );

    let result = store.dispatch(Action::CreateBlob {
        name: "Scene2".to_string(),
        kind: BlobKind::File,
        parent: Some(CHAPTER),
    });
    assert!(store.state.input_error.is_none());
    assert_eq!(
        result.effects,
        vec![Effect::CreateBlob {
            name: "Scene2.md".to_string(),
            is_folder: false,
            parent: Some(CHAPTER),
        }]
    );
    // Nothing local happens until the gateway confirms.
    assert_eq!(store.state.blobs.len(), 5);
}

#[test]
fn blob_created_inserts_and_clears_creation_intent() {
    let mut store = new_store();
    store.dispatch(Action::SelectBlob { id: CHAPTER });
    store.dispatch(Action::BeginCreate(BlobKind::File));
    assert_eq!(
        store.state.blobs.get(CHAPTER).unwrap().creating(),
        CreationIntent::CreatingFile
    );
    assert!(store.state.blobs.get(CHAPTER).unwrap().is_open());

    let result = store.dispatch(Action::BlobCreated(BlobNode::new_file(
        BlobId::new(9),
        "New.md",
        Some(CHAPTER),
    )));
    assert!(result.state_changed);
    assert_eq!(
        store.state.blobs.children_of(Some(CHAPTER)),
        &[SCENE, SUB, BlobId::new(9)]
    );
    assert_eq!(
        store.state.blobs.get(CHAPTER).unwrap().creating(),
        CreationIntent::None
    );
}

#[test]
fn begin_create_without_folder_targets_root() {
    let mut store = new_store();
    store.dispatch(Action::BeginCreate(BlobKind::Folder));
    assert_eq!(store.state.root_creating, CreationIntent::CreatingFolder);

    store.dispatch(Action::CancelCreate);
    assert_eq!(store.state.root_creating, CreationIntent::None);
}

#[test]
fn rename_updates_panel_label_in_place() {
    let mut store = new_store();
    open_file(&mut store, NOTES);
    open_file(&mut store, SCENE);
    let before: Vec<PanelId> = store.state.panels.panels().iter().map(|p| p.id.clone()).collect();

    let result = store.dispatch(Action::RenameBlob {
        id: SCENE,
        name: "Intro".to_string(),
    });
    assert_eq!(
        result.effects,
        vec![Effect::RenameBlob {
            id: SCENE,
            name: "Intro.md".to_string(),
        }]
    );
    assert_eq!(store.state.blobs.get(SCENE).unwrap().name, "Scene.md");

    store.dispatch(Action::BlobRenamed {
        id: SCENE,
        name: "Intro.md".to_string(),
    });
    assert_eq!(store.state.blobs.get(SCENE).unwrap().name, "Intro.md");
    assert_eq!(store.state.blobs.children_of(Some(CHAPTER))[0], SCENE);
    let after: Vec<PanelId> = store.state.panels.panels().iter().map(|p| p.id.clone()).collect();
    assert_eq!(before, after);
    let panel = store.state.panels.find_by_file(SCENE).unwrap();
    assert_eq!(panel.name, "Intro.md");
    assert_eq!(panel.id, PanelId::for_file(SCENE));
}

#[test]
fn rename_to_same_name_is_noop() {
    let mut store = new_store();
    let result = store.dispatch(Action::RenameBlob {
        id: SCENE,
        name: "Scene".to_string(),
    });
    assert!(result.effects.is_empty());
    assert!(store.state.input_error.is_none());
}

#[test]
fn open_panel_reveals_ancestors_and_requests_content() {
    let mut store = new_store();
    let effects = open_file(&mut store, DEEP);

    assert_eq!(effects, vec![Effect::OpenFile(DEEP)]);
    assert_eq!(store.state.current_file, Some(DEEP));
    assert!(store.state.blobs.get(SUB).unwrap().is_open());
    assert!(store.state.blobs.get(CHAPTER).unwrap().is_open());
    assert_eq!(
        store.state.panels.active(),
        Some(&PanelId::for_file(DEEP))
    );
}

#[test]
fn reopening_cached_file_does_not_reload_or_reorder() {
    let mut store = new_store();
    open_file(&mut store, NOTES);
    store.dispatch(Action::FileOpened {
        id: NOTES,
        contents: compiled(Vec::new()),
    });
    open_file(&mut store, SCENE);

    let effects = open_file(&mut store, NOTES);
    assert!(effects.is_empty());
    let ids: Vec<&PanelId> = store.state.panels.panels().iter().map(|p| &p.id).collect();
    assert_eq!(ids, vec![&PanelId::for_file(SCENE), &PanelId::for_file(NOTES)]);
    assert_eq!(store.state.current_file, Some(NOTES));
}

#[test]
fn open_panel_ignores_folders_and_unknown_ids() {
    let mut store = new_store();
    assert!(!store.dispatch(Action::OpenPanel(PanelRef::File(CHAPTER))).state_changed);
    assert!(!store
        .dispatch(Action::OpenPanel(PanelRef::File(BlobId::new(99))))
        .state_changed);
    assert!(store.state.panels.is_empty());
}

#[test]
fn removing_active_middle_panel_activates_right_neighbour() {
    let mut store = new_store();
    // Prepending yields [P1=Notes, P2=Scene, P3=Deep].
    open_file(&mut store, DEEP);
    open_file(&mut store, SCENE);
    open_file(&mut store, NOTES);
    store.dispatch(Action::SetActivePanel(PanelId::for_file(SCENE)));

    let result = store.dispatch(Action::RemovePanel(PanelId::for_file(SCENE)));

    let ids: Vec<&PanelId> = store.state.panels.panels().iter().map(|p| &p.id).collect();
    assert_eq!(ids, vec![&PanelId::for_file(NOTES), &PanelId::for_file(DEEP)]);
    assert_eq!(store.state.panels.active(), Some(&PanelId::for_file(DEEP)));
    assert_eq!(store.state.current_file, Some(DEEP));
    assert_eq!(result.effects, vec![Effect::OpenFile(DEEP)]);
}

#[test]
fn removing_last_file_panel_clears_current_file() {
    let mut store = new_store();
    open_file(&mut store, NOTES);
    store.dispatch(Action::RemovePanel(PanelId::for_file(NOTES)));

    assert!(store.state.panels.active().is_none());
    assert!(store.state.current_file.is_none());
}

#[test]
fn synthetic_panel_keeps_current_file() {
    let mut store = new_store();
    open_file(&mut store, NOTES);
    let settings = Panel::synthetic("settings", "Settings", Some('⚙'));
    store.dispatch(Action::CreatePanel(settings.clone()));
    assert_eq!(store.state.panels.active(), Some(&settings.id));
    assert_eq!(store.state.current_file, Some(NOTES));

    store.dispatch(Action::RemovePanel(PanelId::for_file(NOTES)));
    store.dispatch(Action::RemovePanel(settings.id));
    assert!(store.state.panels.is_empty());
    assert_eq!(store.state.current_file, Some(NOTES));
}

#[test]
fn deleting_folder_closes_bound_panels_and_clears_selection() {
    let mut store = new_store();
    open_file(&mut store, SCENE);
    store.dispatch(Action::FileOpened {
        id: SCENE,
        contents: compiled(vec![AstBlock::paragraph("x")]),
    });

    let result = store.dispatch(Action::DeleteBlob { id: CHAPTER });
    assert_eq!(result.effects, vec![Effect::DeleteBlob { id: CHAPTER }]);
    assert!(store.state.blobs.contains(CHAPTER));

    store.dispatch(Action::BlobDeleted { id: CHAPTER });
    for id in [CHAPTER, SCENE, SUB, DEEP] {
        assert!(!store.state.blobs.contains(id));
    }
    assert_eq!(store.state.blobs.global(), &[NOTES]);
    assert!(store.state.panels.is_empty());
    assert!(store.state.panels.active().is_none());
    assert!(store.state.current_file.is_none());
    assert!(!store.state.contents.contains_key(&SCENE));
    assert!(store.state.playback.frame().is_none());
}

#[test]
fn cascade_delete_activates_only_the_surviving_panel() {
    let mut store = new_store();
    // [Scene, Deep, Notes], Scene active.
    open_file(&mut store, NOTES);
    open_file(&mut store, DEEP);
    open_file(&mut store, SCENE);

    let result = store.dispatch(Action::BlobDeleted { id: CHAPTER });

    assert_eq!(store.state.panels.panels().len(), 1);
    assert_eq!(store.state.panels.active(), Some(&PanelId::for_file(NOTES)));
    assert_eq!(store.state.current_file, Some(NOTES));
    assert_eq!(result.effects, vec![Effect::OpenFile(NOTES)]);
}

#[test]
fn deleting_unknown_blob_is_noop() {
    let mut store = new_store();
    assert!(store.dispatch(Action::DeleteBlob { id: BlobId::new(42) }).effects.is_empty());
    assert!(!store.dispatch(Action::BlobDeleted { id: BlobId::new(42) }).state_changed);
}

#[test]
fn loaded_content_drives_playback_with_join() {
    let mut store = new_store();
    open_file(&mut store, NOTES);
    store.dispatch(Action::FileOpened {
        id: NOTES,
        contents: compiled(vec![
            AstBlock::paragraph("Hello"),
            AstBlock::join(),
            AstBlock::paragraph(" world"),
        ]),
    });
    assert_eq!(store.state.playback.frame().unwrap().reveal_index(), 0);
    assert!(store.state.preview.is_empty());

    store.dispatch(Action::PlaybackAdvance(1));
    assert_eq!(store.state.preview.len(), 1);
    assert_eq!(store.state.preview[0].text, "Hello");

    store.dispatch(Action::PlaybackAdvance(1));
    assert_eq!(store.state.playback.frame().unwrap().reveal_index(), 3);
    assert_eq!(store.state.preview.len(), 1);
    assert_eq!(store.state.preview[0].text, "Hello world");

    assert!(!store.dispatch(Action::PlaybackAdvance(1)).state_changed);
    store.dispatch(Action::PlaybackRestart);
    assert!(store.state.preview.is_empty());
}

#[test]
fn retreat_at_start_reports_no_change() {
    let mut store = new_store();
    open_file(&mut store, NOTES);
    store.dispatch(Action::FileOpened {
        id: NOTES,
        contents: compiled(vec![AstBlock::paragraph("a")]),
    });
    assert!(!store.dispatch(Action::PlaybackRetreat).state_changed);
    assert_eq!(store.state.playback.frame().unwrap().reveal_index(), 0);
}

#[test]
fn edit_text_requests_recompile_and_resets_playback() {
    let mut store = new_store();
    open_file(&mut store, NOTES);
    store.dispatch(Action::FileOpened {
        id: NOTES,
        contents: compiled(vec![AstBlock::paragraph("old")]),
    });
    store.dispatch(Action::PlaybackAdvance(1));

    let result = store.dispatch(Action::EditText {
        id: NOTES,
        text: "new".to_string(),
    });
    assert_eq!(
        result.effects,
        vec![Effect::RecompileFile {
            id: NOTES,
            content: "new".to_string(),
        }]
    );
    assert_eq!(
        store.state.contents[&NOTES].text_content.as_deref(),
        Some("new")
    );

    store.dispatch(Action::FileRecompiled {
        id: NOTES,
        result: Recompiled {
            diagnostics: Vec::new(),
            compiled_content: Some(CompiledDocument {
                title: None,
                blocks: vec![AstBlock::paragraph("new"), AstBlock::paragraph("more")],
            }),
        },
    });
    let frame = store.state.playback.frame().unwrap();
    assert_eq!(frame.blocks().len(), 2);
    assert_eq!(frame.reveal_index(), 0);
}

#[test]
fn stale_file_opened_is_dropped() {
    let mut store = new_store();
    let result = store.dispatch(Action::FileOpened {
        id: BlobId::new(77),
        contents: FileContents::default(),
    });
    assert!(!result.state_changed);
    assert!(store.state.contents.is_empty());
}

#[test]
fn refresh_keeps_expansion_and_drops_vanished_panels() {
    let mut store = new_store();
    open_file(&mut store, NOTES);
    open_file(&mut store, DEEP);

    let mut fresh = sample_tree();
    fresh.remove_subtree(SUB);
    store.dispatch(Action::BlobsRefreshed(fresh.snapshot()));

    assert!(store.state.blobs.get(CHAPTER).unwrap().is_open());
    assert!(!store.state.blobs.contains(DEEP));
    assert_eq!(store.state.panels.panels().len(), 1);
    assert_eq!(store.state.panels.active(), Some(&PanelId::for_file(NOTES)));
}

#[test]
fn project_open_restores_layout() {
    let mut state = AppState::new(WorkspaceConfig::default());
    state.projects.replace_all(vec![project("p1", "Saga")]);
    let mut store = Store::new(state);

    let result = store.dispatch(Action::OpenProject {
        id: "p1".to_string(),
    });
    assert_eq!(
        result.effects,
        vec![Effect::InitProject {
            id: "p1".to_string()
        }]
    );
    assert_eq!(store.state.page, Page::TitleScreen);

    let layout = WorkspaceLayout {
        open_panels: vec![
            Panel::for_file(SCENE, "stale label"),
            Panel::for_file(BlobId::new(99), "Gone.md"),
            Panel::for_file(NOTES, "Notes.md"),
        ],
        pinned_panels: vec![PanelId::for_file(NOTES)],
        open_folders: vec![SUB],
        last_open: Some(PanelId::for_file(SCENE)),
    };
    let result = store.dispatch(Action::ProjectOpened {
        id: "p1".to_string(),
        snapshot: ProjectSnapshot {
            file_explorer: sample_tree().snapshot(),
            layout: Some(layout),
        },
    });

    assert_eq!(store.state.page, Page::Editor);
    assert_eq!(store.state.projects.current_id(), Some("p1"));
    let panels = store.state.panels.panels();
    assert_eq!(panels.len(), 2);
    assert_eq!(panels[0].name, "Scene.md");
    assert!(panels[1].pinned);
    assert!(store.state.blobs.get(SUB).unwrap().is_open());
    assert_eq!(store.state.current_file, Some(SCENE));
    assert_eq!(result.effects, vec![Effect::OpenFile(SCENE)]);
}

#[test]
fn save_layout_only_in_open_project() {
    let mut state = AppState::new(WorkspaceConfig::default());
    state.projects.replace_all(vec![project("p1", "Saga")]);
    let mut store = Store::new(state);
    assert!(store.dispatch(Action::SaveLayout).effects.is_empty());

    store.dispatch(Action::ProjectOpened {
        id: "p1".to_string(),
        snapshot: ProjectSnapshot {
            file_explorer: sample_tree().snapshot(),
            layout: None,
        },
    });
    open_file(&mut store, DEEP);
    store.dispatch(Action::SetPanelPin {
        id: PanelId::for_file(DEEP),
        pinned: true,
    });

    let effects = store.dispatch(Action::SaveLayout).effects;
    let [Effect::SaveLayout(layout)] = effects.as_slice() else {
        panic!("expected a single layout save, got {:?}", effects);
    };
    assert_eq!(layout.open_panels.len(), 1);
    assert_eq!(layout.pinned_panels, vec![PanelId::for_file(DEEP)]);
    assert_eq!(layout.open_folders, vec![CHAPTER, SUB]);
    assert_eq!(layout.last_open, Some(PanelId::for_file(DEEP)));
}

#[test]
fn close_project_saves_then_resets() {
    let mut state = AppState::new(WorkspaceConfig::default());
    state.projects.replace_all(vec![project("p1", "Saga")]);
    let mut store = Store::new(state);
    store.dispatch(Action::ProjectOpened {
        id: "p1".to_string(),
        snapshot: ProjectSnapshot::default(),
    });

    let result = store.dispatch(Action::CloseProject);
    assert!(matches!(result.effects.as_slice(), [Effect::SaveLayout(_)]));
    assert_eq!(store.state.page, Page::TitleScreen);
    assert!(store.state.projects.current().is_none());
    assert!(store.state.blobs.is_empty());
}

#[test]
fn project_names_are_validated_inline() {
    let mut state = AppState::new(WorkspaceConfig::default());
    state.projects.replace_all(vec![project("p1", "Saga")]);
    let mut store = Store::new(state);

    let result = store.dispatch(Action::CreateProject {
        name: " ".to_string(),
        description: String::new(),
    });
    assert!(result.effects.is_empty());
    assert_eq!(store.state.input_error, Some(NameError::Empty));

    let result = store.dispatch(Action::CreateProject {
        name: "Epic".to_string(),
        description: "d".to_string(),
    });
    assert_eq!(result.effects.len(), 1);
    assert!(store.state.input_error.is_none());
}

#[test]
fn gateway_failure_is_recorded() {
    let mut store = new_store();
    let result = store.dispatch(Action::GatewayFailed {
        op: GatewayOp::DeleteBlob,
        error: GatewayError::Unavailable("offline".to_string()),
    });
    assert!(result.state_changed);
    let failure = store.state.last_gateway_error.as_ref().unwrap();
    assert_eq!(failure.op, GatewayOp::DeleteBlob);
    assert_eq!(store.state.blobs.len(), 5);
}

#[test]
fn rejection_is_reported_only_by_the_rejecting_dispatch() {
    let mut store = new_store();
    let result = store.dispatch(Action::CreateBlob {
        name: "  ".to_string(),
        kind: BlobKind::File,
        parent: None,
    });
    assert_eq!(result.rejected, Some(NameError::Empty));

    let result = store.dispatch(Action::RenameBlob {
        id: BlobId::new(42),
        name: "Z".to_string(),
    });
    assert!(result.rejected.is_none());
    assert!(result.effects.is_empty());
    assert_eq!(store.state.input_error, Some(NameError::Empty));
}

#[test]
fn typed_extension_is_not_stripped() {
    let mut store = new_store();
    let result = store.dispatch(Action::CreateBlob {
        name: "notes.md".to_string(),
        kind: BlobKind::File,
        parent: None,
    });
    assert_eq!(
        result.effects,
        vec![Effect::CreateBlob {
            name: "notes.md.md".to_string(),
            is_folder: false,
            parent: None,
        }]
    );
}
