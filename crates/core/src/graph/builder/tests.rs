use super::*;
use crate::room::RoomTemplateCollection;

fn collection(name: &str) -> CollectionRef {
    RoomTemplateCollection::new(name, Vec::new()).into_shared()
}

fn children_of(builder: &LevelGraphBuilder, id: NodeId) -> Vec<NodeId> {
    let graph = builder.graph().expect("builder has a graph");
    let graph = graph.borrow();
    graph.node(id).expect("node exists").children().to_vec()
}

#[test]
fn first_add_creates_root_and_later_adds_extend_head() {
    let hall = collection("hall");
    let mut builder = LevelGraphBuilder::new();
    assert_eq!(builder.head(), None);

    builder.add(&hall).unwrap().add(&hall).unwrap().add(&hall).unwrap();

    assert_eq!(builder.head(), Some(NodeId(2)));
    let graph = builder.into_graph().expect("no forks alive");
    assert_eq!(graph.len(), 3);
    assert_eq!(graph.root().children(), &[NodeId(1)]);
    assert_eq!(graph.node(NodeId(2)).and_then(|node| node.parent()), Some(NodeId(1)));
}

#[test]
fn jump_to_returns_to_labeled_node_after_head_advanced() {
    let hall = collection("hall");
    let mut builder = LevelGraphBuilder::new();
    builder.add(&hall).unwrap().label("hub").unwrap().add(&hall).unwrap().add(&hall).unwrap();
    assert_eq!(builder.head(), Some(NodeId(2)));

    builder.jump_to("hub").unwrap().add(&hall).unwrap();

    assert_eq!(children_of(&builder, NodeId(0)), vec![NodeId(1), NodeId(3)]);
}

#[test]
fn relabeling_points_at_the_most_recent_node() {
    let hall = collection("hall");
    let mut builder = LevelGraphBuilder::new();
    builder.add(&hall).unwrap().label("x").unwrap().add(&hall).unwrap().label("x").unwrap();
    builder.add(&hall).unwrap();

    builder.jump_to("x").unwrap();

    assert_eq!(builder.head(), Some(NodeId(1)));
}

#[test]
fn jump_to_unknown_label_fails_and_keeps_head() {
    let hall = collection("hall");
    let mut builder = LevelGraphBuilder::new();
    builder.add(&hall).unwrap();

    let error = builder.jump_to("missing").unwrap_err();

    assert_eq!(error, BuilderError::UnknownLabel("missing".to_string()));
    assert_eq!(builder.head(), Some(NodeId(0)));
}

#[test]
fn scope_pair_restores_head_after_detour() {
    let hall = collection("hall");
    let closet = collection("closet");
    let mut builder = LevelGraphBuilder::new();
    builder.add(&hall).unwrap().add(&hall).unwrap();
    let before = builder.head();

    builder.enter_scope().unwrap();
    builder.add(&closet).unwrap().label("deep").unwrap().add(&closet).unwrap();
    builder.exit_scope().unwrap();

    assert_eq!(builder.head(), before);
    assert_eq!(builder.scope_depth(), 0);

    builder.add(&hall).unwrap();
    assert_eq!(children_of(&builder, NodeId(1)), vec![NodeId(2), NodeId(4)]);
}

#[test]
fn nested_scopes_unwind_in_reverse_order() {
    let hall = collection("hall");
    let mut builder = LevelGraphBuilder::new();
    builder.add(&hall).unwrap().enter_scope().unwrap();
    builder.add(&hall).unwrap().enter_scope().unwrap();
    builder.add(&hall).unwrap();
    assert_eq!(builder.scope_depth(), 2);

    builder.exit_scope().unwrap();
    assert_eq!(builder.head(), Some(NodeId(1)));
    builder.exit_scope().unwrap();
    assert_eq!(builder.head(), Some(NodeId(0)));
}

#[test]
fn exit_scope_without_enter_fails() {
    let hall = collection("hall");
    let mut builder = LevelGraphBuilder::new();
    builder.add(&hall).unwrap();

    assert_eq!(builder.exit_scope().unwrap_err(), BuilderError::EmptyScopeStack);
    assert_eq!(builder.head(), Some(NodeId(0)));
}

#[test]
fn cursor_operations_before_first_add_report_missing_head() {
    let mut builder = LevelGraphBuilder::new();

    assert_eq!(builder.label("start").unwrap_err(), BuilderError::NoHead);
    assert_eq!(builder.enter_scope().unwrap_err(), BuilderError::NoHead);
    assert_eq!(builder.fork().unwrap_err(), BuilderError::NoHead);
    assert_eq!(builder.into_graph().unwrap_err(), BuilderError::NoHead);
}

#[test]
fn fork_adds_siblings_without_moving_parent_head() {
    let hall = collection("hall");
    let side = collection("side");
    let mut main = LevelGraphBuilder::new();
    main.add(&hall).unwrap();
    let mut left = main.fork().unwrap();
    let mut right = main.fork().unwrap();

    main.add(&hall).unwrap();
    left.add(&side).unwrap().add(&side).unwrap();
    right.add(&side).unwrap();

    assert_eq!(main.head(), Some(NodeId(1)));
    assert_eq!(left.head(), Some(NodeId(3)));
    assert_eq!(right.head(), Some(NodeId(4)));
    assert_eq!(children_of(&main, NodeId(0)), vec![NodeId(1), NodeId(2), NodeId(4)]);
}

#[test]
fn fork_at_label_starts_from_labeled_node() {
    let hall = collection("hall");
    let mut main = LevelGraphBuilder::new();
    main.add(&hall).unwrap().label("entry").unwrap().add(&hall).unwrap().add(&hall).unwrap();

    let mut branch = main.fork_at("entry").unwrap();
    branch.add(&hall).unwrap();

    assert_eq!(branch.head(), Some(NodeId(3)));
    assert_eq!(children_of(&main, NodeId(0)), vec![NodeId(1), NodeId(3)]);
    assert_eq!(
        main.fork_at("nowhere").unwrap_err(),
        BuilderError::UnknownLabel("nowhere".to_string())
    );
}

#[test]
fn forks_do_not_inherit_or_leak_labels() {
    let hall = collection("hall");
    let mut main = LevelGraphBuilder::new();
    main.add(&hall).unwrap().label("main-only").unwrap();

    let mut branch = main.fork().unwrap();
    assert_eq!(
        branch.jump_to("main-only").unwrap_err(),
        BuilderError::UnknownLabel("main-only".to_string())
    );

    branch.add(&hall).unwrap().label("branch-only").unwrap();
    assert!(main.jump_to("branch-only").is_err());
    assert!(branch.jump_to("branch-only").is_ok());
}

#[test]
fn forks_do_not_inherit_scopes() {
    let hall = collection("hall");
    let mut main = LevelGraphBuilder::new();
    main.add(&hall).unwrap().enter_scope().unwrap();

    let mut branch = main.fork().unwrap();

    assert_eq!(branch.scope_depth(), 0);
    assert_eq!(branch.exit_scope().unwrap_err(), BuilderError::EmptyScopeStack);
    assert!(main.exit_scope().is_ok());
}

#[test]
fn into_graph_waits_for_forks_to_be_dropped() {
    let hall = collection("hall");
    let mut main = LevelGraphBuilder::new();
    main.add(&hall).unwrap();
    let mut branch = main.fork().unwrap();
    branch.add(&hall).unwrap();

    let shared = main.graph().expect("graph exists");
    drop(branch);
    drop(shared);
    let graph = main.into_graph().expect("last handle");
    assert_eq!(graph.len(), 2);
}

#[test]
fn into_graph_reports_live_forks() {
    let hall = collection("hall");
    let mut main = LevelGraphBuilder::new();
    main.add(&hall).unwrap();
    let _branch = main.fork().unwrap();

    assert_eq!(main.into_graph().unwrap_err(), BuilderError::GraphStillShared(1));
}

#[test]
fn add_while_graph_is_borrowed_fails_without_mutating() {
    let hall = collection("hall");
    let mut builder = LevelGraphBuilder::new();
    builder.add(&hall).unwrap();
    let shared = builder.graph().expect("builder has a graph");

    {
        let view = shared.borrow();
        assert_eq!(builder.add(&hall).unwrap_err(), BuilderError::GraphBorrowed);
        assert_eq!(view.len(), 1);
    }
    assert_eq!(builder.head(), Some(NodeId::ROOT));

    builder.add(&hall).unwrap();
    assert_eq!(shared.borrow().len(), 2);
}
