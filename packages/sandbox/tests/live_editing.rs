use scene_parser::{parse, IdAllocator, NodeId};
use scene_sandbox::{Sandbox, StructureAction, SCENE_ID_ATTR};

async fn session(markup: &str, style: &str) -> Sandbox {
    let ids = IdAllocator::new();
    let (model, _) = parse(markup, style, &ids).unwrap();
    let mut sandbox = Sandbox::new(ids);
    sandbox.project(markup, style, "", &model).await.unwrap();
    sandbox
}

fn id(s: &str) -> NodeId {
    NodeId::from(s)
}

#[tokio::test]
async fn test_style_edit_round_trips_to_markup() {
    let mut sandbox = session("<p>Hello</p>", "").await;

    assert!(sandbox.set_style(&id("node_2"), "color", "red"));

    let saved = sandbox.serialize().unwrap();
    assert!(saved.html.contains("color: red"));
    assert!(saved.html.contains("Hello"));
}

#[tokio::test]
async fn test_style_edit_leaves_other_declarations_intact() {
    let markup = r#"<p style="background: url(data:image/png;base64,AAAA); --Brand: red; color: blue">x</p>"#;
    let mut sandbox = session(markup, "").await;

    assert!(sandbox.set_style(&id("node_2"), "color", "red"));

    let saved = sandbox.serialize().unwrap();
    assert!(saved
        .html
        .contains("background: url(data:image/png;base64,AAAA); --Brand: red; color: red;"));
}

#[tokio::test]
async fn test_every_stamped_id_matches_model() {
    let markup = "<header><h1>T</h1></header><main><p>a</p><p>b</p></main>";
    let ids = IdAllocator::new();
    let (model, _) = parse(markup, "", &ids).unwrap();
    let mut sandbox = Sandbox::new(ids);
    let stamped = sandbox.project(markup, "", "", &model).await.unwrap();

    let element_ids: Vec<NodeId> = model
        .ids()
        .into_iter()
        .filter(|nid| model.find(nid).is_some_and(|n| n.is_element()))
        .cloned()
        .collect();
    assert_eq!(stamped, element_ids.len());
    for nid in &element_ids {
        assert!(sandbox.contains(nid), "{} not stamped", nid);
    }
}

#[tokio::test]
async fn test_structural_sequence() {
    let mut sandbox = session("<section><p>a</p></section>", "").await;
    let before = sandbox.outline().unwrap().count();

    let added = sandbox
        .execute(&id("node_2"), StructureAction::AddChild, "span")
        .unwrap();
    let added_id = added.created_id.unwrap();
    assert_eq!(sandbox.outline().unwrap().count(), before + 1);

    let copy = sandbox
        .execute(&added_id, StructureAction::DuplicateNode, "")
        .unwrap();
    let copy_id = copy.created_id.unwrap();
    assert_ne!(copy_id, added_id);

    let wrapper = sandbox
        .execute(&copy_id, StructureAction::WrapDiv, "")
        .unwrap();
    assert!(sandbox.contains(&wrapper.created_id.unwrap()));

    let removed = sandbox
        .execute(&id("node_2"), StructureAction::DeleteNode, "")
        .unwrap();
    assert_eq!(removed.removed_id, Some(id("node_2")));
    assert_eq!(sandbox.outline().unwrap().count(), 1);
    assert!(!sandbox.contains(&copy_id));
}

#[tokio::test]
async fn test_root_survives_delete() {
    let mut sandbox = session("<p>x</p>", "").await;

    assert!(sandbox
        .execute(&id("node_1"), StructureAction::DeleteNode, "")
        .is_none());
    assert_eq!(
        sandbox.outline().unwrap().id,
        Some(id("node_1"))
    );
}

#[tokio::test]
async fn test_saved_markup_keeps_identity_attribute() {
    let mut sandbox = session("<p>x</p>", "").await;
    sandbox.add_child(&id("node_1"), "div").unwrap();

    let saved = sandbox.serialize().unwrap();
    assert_eq!(saved.html.matches(SCENE_ID_ATTR).count(), 2);
}
