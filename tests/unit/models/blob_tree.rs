use super::*;

fn id(raw: u32) -> BlobId {
    BlobId::new(raw)
}

// Chapter1/{Scene1.md, Notes/{Draft.md}}, Appendix.md
fn sample_tree() -> BlobTree {
    let mut tree = BlobTree::new();
    tree.insert(BlobNode::new_folder(id(1), "Chapter1", None))
        .unwrap();
    tree.insert(BlobNode::new_file(id(2), "Scene1.md", Some(id(1))))
        .unwrap();
    tree.insert(BlobNode::new_folder(id(3), "Notes", Some(id(1))))
        .unwrap();
    tree.insert(BlobNode::new_file(id(4), "Draft.md", Some(id(3))))
        .unwrap();
    tree.insert(BlobNode::new_file(id(5), "Appendix.md", None))
        .unwrap();
    tree
}

#[test]
fn insert_appends_to_parent_or_global() {
    let tree = sample_tree();
    assert_eq!(tree.global(), &[id(1), id(5)]);
    assert_eq!(tree.children_of(Some(id(1))), &[id(2), id(3)]);
    assert_eq!(tree.children_of(Some(id(3))), &[id(4)]);
    assert!(tree.children_of(Some(id(2))).is_empty());
}

#[test]
fn insert_rejects_file_parent_and_duplicate_ids() {
    let mut tree = sample_tree();
    assert_eq!(
        tree.insert(BlobNode::new_file(id(9), "x.md", Some(id(2)))),
        Err(BlobTreeError::ParentNotFolder(id(2)))
    );
    assert_eq!(
        tree.insert(BlobNode::new_file(id(9), "x.md", Some(id(42)))),
        Err(BlobTreeError::UnknownBlob(id(42)))
    );
    assert_eq!(
        tree.insert(BlobNode::new_file(id(5), "again.md", None)),
        Err(BlobTreeError::DuplicateId(id(5)))
    );
    assert!(!tree.contains(id(9)));
}

#[test]
fn rename_keeps_id_parent_and_position() {
    let mut tree = sample_tree();
    assert!(tree.rename(id(2), "Intro.md"));

    let node = tree.get(id(2)).unwrap();
    assert_eq!(node.name, "Intro.md");
    assert_eq!(node.parent, Some(id(1)));
    assert_eq!(tree.children_of(Some(id(1))), &[id(2), id(3)]);

    assert!(!tree.rename(id(2), "Intro.md"));
    assert!(!tree.rename(id(77), "Ghost.md"));
}

#[test]
fn remove_subtree_removes_every_descendant() {
    let mut tree = sample_tree();
    let mut removed = tree.remove_subtree(id(1));
    removed.sort();

    assert_eq!(removed, vec![id(1), id(2), id(3), id(4)]);
    for gone in [1, 2, 3, 4] {
        assert!(!tree.contains(id(gone)));
    }
    assert_eq!(tree.global(), &[id(5)]);
    assert_eq!(tree.len(), 1);
}

#[test]
fn remove_subtree_detaches_from_parent() {
    let mut tree = sample_tree();
    tree.remove_subtree(id(3));
    assert_eq!(tree.children_of(Some(id(1))), &[id(2)]);
    assert!(!tree.contains(id(4)));
}

#[test]
fn remove_unknown_is_noop() {
    let mut tree = sample_tree();
    assert!(tree.remove_subtree(id(99)).is_empty());
    assert_eq!(tree.len(), 5);
}

#[test]
fn set_open_only_applies_to_folders() {
    let mut tree = sample_tree();
    assert!(tree.set_open(id(1), true));
    assert!(tree.get(id(1)).unwrap().is_open());
    assert!(!tree.set_open(id(1), true));
    assert!(!tree.set_open(id(2), true));
    assert!(!tree.get(id(2)).unwrap().is_open());
}

#[test]
fn open_directory_recursive_opens_every_ancestor() {
    let mut tree = sample_tree();
    assert!(tree.open_directory_recursive(id(4)));
    assert!(tree.get(id(3)).unwrap().is_open());
    assert!(tree.get(id(1)).unwrap().is_open());

    tree.collapse_all();
    assert!(tree.open_directory_recursive(id(3)));
    assert!(tree.get(id(3)).unwrap().is_open());
    assert!(tree.get(id(1)).unwrap().is_open());

    assert!(!tree.open_directory_recursive(id(4)));
}

#[test]
fn creating_intent_round_trips_through_kind() {
    let mut tree = sample_tree();
    assert!(tree.set_creating(id(3), CreationIntent::CreatingFile));
    assert_eq!(tree.get(id(3)).unwrap().creating().kind(), Some(BlobKind::File));
    assert!(!tree.set_creating(id(2), CreationIntent::CreatingFolder));
    assert!(tree.clear_creating());
    assert_eq!(tree.get(id(3)).unwrap().creating(), CreationIntent::None);
}

#[test]
fn flatten_for_view_lists_folders_first_and_respects_expansion() {
    let mut tree = sample_tree();
    let rows = tree.flatten_for_view();
    let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Chapter1", "Appendix.md"]);

    tree.set_open(id(1), true);
    let rows = tree.flatten_for_view();
    let names: Vec<_> = rows.iter().map(|r| (r.name.as_str(), r.depth)).collect();
    assert_eq!(
        names,
        vec![
            ("Chapter1", 0),
            ("Notes", 1),
            ("Scene1.md", 1),
            ("Appendix.md", 0)
        ]
    );
}

#[test]
fn replace_preserving_open_keeps_surviving_expansion() {
    let mut tree = sample_tree();
    tree.set_open(id(1), true);
    tree.set_open(id(3), true);

    let mut fresh = BlobTree::new();
    fresh
        .insert(BlobNode::new_folder(id(1), "Chapter1", None))
        .unwrap();
    fresh
        .insert(BlobNode::new_folder(id(8), "New", None))
        .unwrap();
    tree.replace_preserving_open(fresh.snapshot());

    assert!(tree.get(id(1)).unwrap().is_open());
    assert!(!tree.get(id(8)).unwrap().is_open());
    assert!(!tree.contains(id(3)));
}

#[test]
fn validate_name_suffixes_files_and_detects_collisions() {
    let tree = sample_tree();
    assert_eq!(
        tree.validate_name(Some(id(1)), "Scene2", BlobKind::File, ".md", 255, None),
        Ok("Scene2.md".to_string())
    );
    assert_eq!(
        tree.validate_name(Some(id(1)), "Scene1", BlobKind::File, ".md", 255, None),
        Err(NameError::AlreadyExists("Scene1.md".to_string()))
    );
    assert_eq!(
        tree.validate_name(Some(id(1)), "Scene1", BlobKind::File, ".md", 255, Some(id(2))),
        Ok("Scene1.md".to_string())
    );
    assert_eq!(
        tree.validate_name(None, "Chapter1", BlobKind::Folder, ".md", 255, None),
        Err(NameError::AlreadyExists("Chapter1".to_string()))
    );
    assert_eq!(
        tree.validate_name(Some(id(2)), "x", BlobKind::File, ".md", 255, None),
        Err(NameError::ParentNotFolder)
    );
}

#[test]
fn name_format_rules() {
    assert_eq!(check_name_format("  ", 10), Err(NameError::Empty));
    assert_eq!(
        check_name_format("..", 10),
        Err(NameError::Reserved("..".to_string()))
    );
    assert_eq!(
        check_name_format("a/b", 10),
        Err(NameError::IllegalCharacter('/'))
    );
    assert_eq!(
        check_name_format("what?", 10),
        Err(NameError::IllegalCharacter('?'))
    );
    assert_eq!(check_name_format("abcdefghijk", 10), Err(NameError::TooLong(10)));
    assert!(check_name_format("Chapter 1", 10).is_ok());
}

#[test]
fn stored_name_and_stem() {
    assert_eq!(stored_name("Intro", BlobKind::File, ".md"), "Intro.md");
    assert_eq!(stored_name("Intro.md", BlobKind::File, ".md"), "Intro.md.md");
    assert_eq!(stored_name("Intro", BlobKind::Folder, ".md"), "Intro");
    assert_eq!(display_stem("Intro.md", BlobKind::File, ".md"), "Intro");
    assert_eq!(display_stem("Intro.md", BlobKind::Folder, ".md"), "Intro.md");
}

#[test]
fn wire_format_has_children_only_for_folders() {
    let folder = BlobNode::new_folder(id(1), "Chapter1", None);
    let file = BlobNode::new_file(id(2), "Scene1.md", Some(id(1)));

    let folder_json = serde_json::to_value(&folder).unwrap();
    let file_json = serde_json::to_value(&file).unwrap();
    assert_eq!(folder_json["children"], serde_json::json!([]));
    assert!(file_json.get("children").is_none());
    assert_eq!(file_json["parent"], serde_json::json!(1));

    let parsed: BlobNode = serde_json::from_str(
        r#"{"id":3,"name":"Notes","children":[4],"isOpen":true,"isCreating":"File"}"#,
    )
    .unwrap();
    assert_eq!(parsed.children(), Some(&[id(4)][..]));
    assert!(parsed.is_open());
    assert_eq!(parsed.creating(), CreationIntent::CreatingFile);
}

#[test]
fn snapshot_round_trips_through_json_map_keys() {
    let tree = sample_tree();
    let json = serde_json::to_string(&tree.snapshot()).unwrap();
    let parsed: TreeSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, tree.snapshot());
}
