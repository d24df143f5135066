use super::*;

fn item(id: &str) -> Node {
    Node::item(TodoItem::new(id, format!("task {id}"), 0))
}

#[test]
fn root_uses_reserved_id() {
    let root = Node::root("Home");
    assert_eq!(root.id(), ROOT_ID);
    assert!(root.is_root());
    assert!(root.to_todo_item().is_none());
}

#[test]
fn insert_child_clamps_index_and_keeps_order() {
    let mut node = item("a");
    assert_eq!(node.insert_child("b".into(), None), 0);
    assert_eq!(node.insert_child("c".into(), Some(10)), 1);
    assert_eq!(node.insert_child("d".into(), Some(0)), 0);
    let ids: Vec<&str> = node.child_ids().collect();
    assert_eq!(ids, vec!["d", "b", "c"]);
}

#[test]
fn remove_child_reports_former_position() {
    let mut node = item("a");
    node.insert_child("b".into(), None);
    node.insert_child("c".into(), None);
    assert_eq!(node.remove_child("c"), Some(1));
    assert_eq!(node.remove_child("missing"), None);
    assert_eq!(node.position_of("b"), Some(0));
}

#[test]
fn structural_change_drops_size_cache_but_keeps_lines() {
    let mut node = item("a");
    node.set_cached_height(10.0);
    node.set_cached_width(20.0);
    node.set_cached_lines(vec!["task a".into()]);
    node.insert_child("b".into(), None);
    assert_eq!(node.cached_height(), None);
    assert_eq!(node.cached_width(), None);
    assert_eq!(node.cached_lines(), Some(&["task a".to_string()][..]));
}

#[test]
fn replacing_text_drops_wrapped_lines() {
    let mut node = item("a");
    node.set_cached_lines(vec!["task a".into()]);
    assert_eq!(node.set_text("renamed".into()), Some("task a".to_string()));
    assert_eq!(node.cached_lines(), None);
    assert_eq!(node.item_content().map(|c| c.text.as_str()), Some("renamed"));
}

#[test]
fn todo_item_round_trips_through_node() {
    let original = TodoItem {
        id: "x".into(),
        text: "Buy milk".into(),
        done: true,
        creation_time: 42,
    };
    let node = Node::item(original.clone());
    assert_eq!(node.to_todo_item(), Some(original));
}
