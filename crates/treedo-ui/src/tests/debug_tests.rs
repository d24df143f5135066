use super::*;
use treedo_core::{deserialize_project, SerializedItem, SerializedProject};

fn project() -> Project {
    let item = |id: &str, done: bool, children: &[&str]| SerializedItem {
        id: id.to_string(),
        text: id.to_uppercase(),
        done,
        creation_time: 0,
        children: children.iter().map(|c| c.to_string()).collect(),
    };
    deserialize_project(&SerializedProject {
        id: "p1".into(),
        name: "Home".into(),
        items: vec![item("a", false, &["b"]), item("b", true, &[])],
        root_children: vec!["a".into()],
    })
    .unwrap()
}

#[test]
fn outline_is_indented_by_depth() {
    let text = format_tree(&project());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "=== Project Home (p1) ===");
    assert_eq!(lines[1], "Root \"Home\"");
    assert_eq!(lines[2], "  [ ] a \"A\"");
    assert_eq!(lines[3], "    [x] b \"B\"");
}

#[test]
fn laid_out_nodes_show_bounds() {
    let mut project = project();
    project
        .root_mut()
        .set_bounding_box(treedo_ui_graphics::Rect::new(1.0, 2.0, 3.0, 4.0));
    let text = format_tree(&project);
    assert!(text.contains("Root \"Home\" @ (1.0, 2.0) 3.0x4.0"));
}

#[test]
fn logging_a_frame_does_not_panic() {
    log_recorded_frame(&[]);
}
