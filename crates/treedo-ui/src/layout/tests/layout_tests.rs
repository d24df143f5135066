use super::*;
use treedo_core::{deserialize_project, Engine, SerializedItem, SerializedProject};
use treedo_render_common::{DrawOp, Paint, RecordingSurface};
use treedo_testing::{add_item, engine_with_project, RecordingStorage};

// With the recording surface every character is half the font size wide:
// items (28px) are one line tall up to 18 characters, giving 92 x 400 boxes;
// the root "Home" (38px) is 122 x 400.
const ITEM_H: f32 = 92.0;
const ITEM_W: f32 = 400.0;
const ROOT_H: f32 = 122.0;
const ROOT_W: f32 = 400.0;

fn home() -> Engine {
    engine_with_project(RecordingStorage::new(), "Home")
}

fn layout() -> LayoutEngine {
    LayoutEngine::default()
}

fn bbox(engine: &Engine, id: &str) -> Rect {
    engine
        .current_project()
        .unwrap()
        .node(id)
        .unwrap()
        .bounding_box()
        .unwrap()
}

fn draw(engine: &mut Engine, surface: &mut RecordingSurface, pointer: PointerContext) -> bool {
    layout()
        .draw_tree(
            engine.current_project_mut().unwrap(),
            surface,
            Point::new(32.0, 0.0),
            &pointer,
        )
        .unwrap()
}

#[test]
fn intrinsic_sizes_follow_metrics() {
    let mut engine = home();
    add_item(&mut engine, "a", ROOT_ID);
    let surface = RecordingSurface::new();
    let project = engine.current_project_mut().unwrap();
    let engine_layout = layout();
    let item = engine_layout.intrinsic_size(project.node_mut("a").unwrap(), &surface);
    assert_eq!(item, Size::new(ITEM_W, ITEM_H));
    let root = engine_layout.intrinsic_size(project.root_mut(), &surface);
    assert_eq!(root, Size::new(ROOT_W, ROOT_H));
}

#[test]
fn wrapped_items_grow_by_line_height() {
    let mut engine = home();
    let item = engine.new_item("water the plants then feed the cat and walk the dog");
    let id = item.id.clone();
    engine.add_todo_item(item, ROOT_ID).unwrap();
    let surface = RecordingSurface::new();
    let project = engine.current_project_mut().unwrap();
    let node = project.node_mut(&id).unwrap();
    let size = layout().intrinsic_size(node, &surface);
    let lines = node.cached_lines().unwrap().len();
    assert_eq!(lines, 3);
    assert_eq!(size.height, 3.0 * 28.0 + 2.0 * 4.0 + 64.0);
}

#[test]
fn total_height_sums_children_and_gaps() {
    let mut engine = home();
    add_item(&mut engine, "a", ROOT_ID);
    add_item(&mut engine, "b", ROOT_ID);
    add_item(&mut engine, "c", "a");
    let surface = RecordingSurface::new();
    let project = engine.current_project_mut().unwrap();
    let engine_layout = layout();
    assert_eq!(engine_layout.total_height(project, "b", &surface).unwrap(), ITEM_H);
    assert_eq!(engine_layout.total_height(project, "a", &surface).unwrap(), ITEM_H);
    assert_eq!(
        engine_layout.total_height(project, ROOT_ID, &surface).unwrap(),
        2.0 * ITEM_H + 64.0
    );
    assert_eq!(project.root().cached_height(), Some(2.0 * ITEM_H + 64.0));
}

#[test]
fn total_width_adds_widest_child_column() {
    let mut engine = home();
    add_item(&mut engine, "a", ROOT_ID);
    add_item(&mut engine, "b", "a");
    let surface = RecordingSurface::new();
    let project = engine.current_project_mut().unwrap();
    let engine_layout = layout();
    assert_eq!(engine_layout.total_width(project, "b", &surface).unwrap(), ITEM_W + 164.0);
    assert_eq!(
        engine_layout.total_width(project, ROOT_ID, &surface).unwrap(),
        ROOT_W + 164.0 + ITEM_W + 164.0 + ITEM_W + 164.0
    );
}

#[test]
fn leaf_total_width_keeps_the_trailing_gap() {
    let mut engine = home();
    add_item(&mut engine, "a", ROOT_ID);
    let surface = RecordingSurface::new();
    let project = engine.current_project_mut().unwrap();
    let engine_layout = layout();
    assert_eq!(engine_layout.total_width(project, "a", &surface).unwrap(), ITEM_W + 164.0);
    assert_eq!(project.node("a").unwrap().cached_width(), Some(ITEM_W + 164.0));
}

#[test]
fn memoized_height_is_refreshed_after_mutation() {
    let mut engine = home();
    add_item(&mut engine, "a", ROOT_ID);
    let surface = RecordingSurface::new();
    let engine_layout = layout();
    let before = engine_layout
        .total_height(engine.current_project_mut().unwrap(), ROOT_ID, &surface)
        .unwrap();
    assert_eq!(before, ITEM_H);
    add_item(&mut engine, "b", "a");
    add_item(&mut engine, "c", "a");
    let after = engine_layout
        .total_height(engine.current_project_mut().unwrap(), ROOT_ID, &surface)
        .unwrap();
    assert_eq!(after, 2.0 * ITEM_H + 64.0);
    engine.remove_todo_item("c", treedo_core::OrphanPolicy::KillAll).unwrap();
    let removed = engine_layout
        .total_height(engine.current_project_mut().unwrap(), ROOT_ID, &surface)
        .unwrap();
    assert_eq!(removed, ITEM_H);
}

#[test]
fn nodes_are_centred_against_their_subtree() {
    let mut engine = home();
    add_item(&mut engine, "a", ROOT_ID);
    add_item(&mut engine, "b", ROOT_ID);
    let mut surface = RecordingSurface::new();
    assert!(!draw(&mut engine, &mut surface, PointerContext::default()));

    let total = 2.0 * ITEM_H + 64.0;
    assert_eq!(
        bbox(&engine, ROOT_ID),
        Rect::new(32.0, total / 2.0 - ROOT_H / 2.0, ROOT_W, ROOT_H)
    );
    let child_x = 32.0 + ROOT_W + 164.0;
    assert_eq!(bbox(&engine, "a"), Rect::new(child_x, 0.0, ITEM_W, ITEM_H));
    assert_eq!(
        bbox(&engine, "b"),
        Rect::new(child_x, ITEM_H + 64.0, ITEM_W, ITEM_H)
    );
}

#[test]
fn connectors_run_from_anchor_to_each_child() {
    let mut engine = home();
    add_item(&mut engine, "a", ROOT_ID);
    add_item(&mut engine, "b", ROOT_ID);
    let mut surface = RecordingSurface::new();
    draw(&mut engine, &mut surface, PointerContext::default());

    let total = 2.0 * ITEM_H + 64.0;
    let anchor = Point::new(32.0 + ROOT_W + 32.0, total / 2.0);
    let grey = Palette::red().root_connector;
    let anchors: Vec<&DrawOp> = surface
        .operations()
        .iter()
        .filter(|op| matches!(op, DrawOp::Arc { paint: Paint::Fill(color), radius, .. } if *color == grey && *radius == 6.0))
        .collect();
    assert_eq!(anchors.len(), 1);
    match anchors[0] {
        DrawOp::Arc { center, .. } => assert_eq!(*center, anchor),
        other => panic!("unexpected {other:?}"),
    }

    let to_x = 32.0 + ROOT_W + 164.0 - 32.0;
    let lines: Vec<&Vec<Point>> = surface
        .operations()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Polyline { points, closed: false, .. } => Some(points),
            _ => None,
        })
        .collect();
    assert_eq!(
        lines,
        vec![
            &vec![
                anchor,
                Point::new(to_x - 32.0, ITEM_H / 2.0),
                Point::new(to_x, ITEM_H / 2.0)
            ],
            &vec![
                anchor,
                Point::new(to_x - 32.0, ITEM_H + 64.0 + ITEM_H / 2.0),
                Point::new(to_x, ITEM_H + 64.0 + ITEM_H / 2.0)
            ],
        ]
    );
    let heads = surface
        .operations()
        .iter()
        .filter(|op| matches!(op, DrawOp::Polyline { closed: true, .. }))
        .count();
    assert_eq!(heads, 2);
    assert!(surface.operations().iter().any(|op| matches!(
        op,
        DrawOp::Polyline { points, closed: true, .. }
            if points[1] == Point::new(to_x + 16.0, ITEM_H / 2.0)
    )));
}

#[test]
fn leaves_draw_no_connectors() {
    let mut engine = home();
    let mut surface = RecordingSurface::new();
    draw(&mut engine, &mut surface, PointerContext::default());
    assert!(surface
        .operations()
        .iter()
        .all(|op| !matches!(op, DrawOp::Polyline { .. })));
}

#[test]
fn root_is_a_pill_with_centred_name() {
    let mut engine = home();
    let mut surface = RecordingSurface::new();
    draw(&mut engine, &mut surface, PointerContext::default());
    let root_box = bbox(&engine, ROOT_ID);
    match &surface.operations()[0] {
        DrawOp::RoundedRect { rect, radius, .. } => {
            assert_eq!(*rect, root_box);
            assert_eq!(*radius, ROOT_H / 2.0);
        }
        other => panic!("unexpected {other:?}"),
    }
    match &surface.operations()[1] {
        DrawOp::Text {
            value,
            origin,
            align,
            ..
        } => {
            assert_eq!(value, "Home");
            assert_eq!(*align, treedo_ui_graphics::TextAlign::Center);
            assert_eq!(
                *origin,
                Point::new(root_box.x + ROOT_W / 2.0, root_box.y + 42.0)
            );
        }
        other => panic!("unexpected {other:?}"),
    }
}

fn item_box_origin(surface: &RecordingSurface) -> Point {
    let fill = Palette::red().fill;
    surface
        .operations()
        .iter()
        .find_map(|op| match op {
            DrawOp::RoundedRect {
                rect,
                radius,
                paint: Paint::Fill(color),
            } if *color == fill && *radius == 16.0 => Some(rect.origin()),
            _ => None,
        })
        .unwrap()
}

#[test]
fn hover_and_press_change_elevation() {
    let mut engine = home();
    add_item(&mut engine, "a", ROOT_ID);
    let child_x = 32.0 + ROOT_W + 164.0;
    let inside = Point::new(child_x + 10.0, 50.0);

    let mut surface = RecordingSurface::new();
    assert!(!draw(&mut engine, &mut surface, PointerContext::default()));
    let idle = item_box_origin(&surface);
    let item = bbox(&engine, "a");
    assert_eq!(idle, Point::new(item.x - 8.0, item.y - 8.0));

    let mut surface = RecordingSurface::new();
    assert!(draw(&mut engine, &mut surface, PointerContext::at(inside)));
    assert_eq!(item_box_origin(&surface), Point::new(item.x - 12.0, item.y - 12.0));

    let mut surface = RecordingSurface::new();
    assert!(draw(&mut engine, &mut surface, PointerContext::pressed_at(inside)));
    assert_eq!(item_box_origin(&surface), Point::new(item.x - 4.0, item.y - 4.0));
}

#[test]
fn item_text_starts_inside_padding() {
    let mut engine = home();
    add_item(&mut engine, "a", ROOT_ID);
    let mut surface = RecordingSurface::new();
    draw(&mut engine, &mut surface, PointerContext::default());
    let lifted = item_box_origin(&surface);
    let origin = surface
        .operations()
        .iter()
        .find_map(|op| match op {
            DrawOp::Text { value, origin, .. } if value == "a" => Some(*origin),
            _ => None,
        })
        .unwrap();
    assert_eq!(origin, Point::new(lifted.x + 24.0, lifted.y + 32.0));
}

#[test]
fn done_items_get_a_filled_check() {
    let mut engine = home();
    add_item(&mut engine, "a", ROOT_ID);
    let stroke = Palette::red().stroke;
    let count_filled = |surface: &RecordingSurface| {
        surface
            .operations()
            .iter()
            .filter(|op| matches!(op, DrawOp::Arc { paint: Paint::Fill(color), .. } if *color == stroke))
            .count()
    };
    let mut surface = RecordingSurface::new();
    draw(&mut engine, &mut surface, PointerContext::default());
    assert_eq!(count_filled(&surface), 0);

    engine.set_item_done("a", true).unwrap();
    let mut surface = RecordingSurface::new();
    draw(&mut engine, &mut surface, PointerContext::default());
    assert_eq!(count_filled(&surface), 1);
}

#[test]
fn hit_test_prefers_first_match_and_uses_inclusive_edges() {
    let mut engine = home();
    add_item(&mut engine, "a", ROOT_ID);
    add_item(&mut engine, "b", ROOT_ID);
    let mut surface = RecordingSurface::new();
    draw(&mut engine, &mut surface, PointerContext::default());
    let project = engine.current_project().unwrap();
    let engine_layout = layout();

    let a = bbox(&engine, "a");
    let edge = Point::new(a.right(), a.bottom());
    assert_eq!(
        engine_layout.item_at_point(project, edge).unwrap(),
        Some("a".to_string())
    );
    let root = bbox(&engine, ROOT_ID);
    assert_eq!(
        engine_layout.item_at_point(project, root.origin()).unwrap(),
        Some(ROOT_ID.to_string())
    );
    let gap = Point::new(a.x + 10.0, a.bottom() + 1.0);
    assert_eq!(engine_layout.item_at_point(project, gap).unwrap(), None);
}

#[test]
fn hit_test_before_layout_is_an_error() {
    let mut engine = home();
    let engine_layout = layout();
    assert_eq!(
        engine_layout.item_at_point(engine.current_project().unwrap(), Point::ZERO),
        Err(LayoutError::NotLaidOut {
            id: ROOT_ID.to_string()
        })
    );

    let mut surface = RecordingSurface::new();
    draw(&mut engine, &mut surface, PointerContext::default());
    add_item(&mut engine, "late", ROOT_ID);
    assert_eq!(
        engine_layout.item_at_point(engine.current_project().unwrap(), Point::new(-100.0, -100.0)),
        Err(LayoutError::NotLaidOut { id: "late".into() })
    );
}

#[test]
fn empty_item_text_is_invalid_content() {
    let mut project = deserialize_project(&SerializedProject {
        id: "p".into(),
        name: "Home".into(),
        items: vec![SerializedItem {
            id: "blank".into(),
            text: String::new(),
            done: false,
            creation_time: 0,
            children: Vec::new(),
        }],
        root_children: vec!["blank".into()],
    })
    .unwrap();
    let mut surface = RecordingSurface::new();
    let result = layout().draw_tree(&mut project, &mut surface, Point::ZERO, &PointerContext::default());
    assert_eq!(
        result,
        Err(LayoutError::InvalidContent { id: "blank".into() })
    );
    assert!(project.contains("blank"));
}

#[test]
fn wrapped_lines_are_cached_until_text_changes() {
    let mut engine = home();
    add_item(&mut engine, "a", ROOT_ID);
    let mut surface = RecordingSurface::new();
    draw(&mut engine, &mut surface, PointerContext::default());
    let cached = |engine: &Engine| {
        engine
            .current_project()
            .unwrap()
            .node("a")
            .unwrap()
            .cached_lines()
            .map(|lines| lines.to_vec())
    };
    assert_eq!(cached(&engine), Some(vec!["a".to_string()]));
    engine.set_item_text("a", "renamed").unwrap();
    assert_eq!(cached(&engine), None);
    draw(&mut engine, &mut surface, PointerContext::default());
    assert_eq!(cached(&engine), Some(vec!["renamed".to_string()]));
}

#[test]
fn blue_palette_is_used_when_selected() {
    let mut engine = home();
    add_item(&mut engine, "a", ROOT_ID);
    let mut surface = RecordingSurface::new();
    let mut engine_layout = layout();
    engine_layout.set_palette(Palette::for_accent(treedo_core::AccentColor::Blue));
    engine_layout
        .draw_tree(
            engine.current_project_mut().unwrap(),
            &mut surface,
            Point::ZERO,
            &PointerContext::default(),
        )
        .unwrap();
    let blue_fill = Palette::blue().fill;
    assert!(surface.operations().iter().any(
        |op| matches!(op, DrawOp::RoundedRect { paint: Paint::Fill(color), .. } if *color == blue_fill)
    ));
}
