use battlemap_core::{shared, CoordinateTransform, ShapeError};
use battlemap_drawing::{
    colors, CommandHistory, Point, Shape, ShapeCollection, ShapeId, ShapeKind, ShapeVariant,
};

fn collection() -> ShapeCollection {
    ShapeCollection::new("background", shared(CommandHistory::new()))
}

fn ids(c: &ShapeCollection) -> Vec<ShapeId> {
    c.shapes().iter().map(Shape::id).collect()
}

fn widths(c: &ShapeCollection) -> Vec<f64> {
    c.shapes().iter().map(Shape::stroke_width).collect()
}

#[test]
fn test_insertion_order_and_undo_scenario() {
    let c = collection();
    let a = c.create_line(Point::new(0.0, 0.0), Point::new(10.0, 0.0), colors::BLACK, 5.0, false);
    let b = c.create_circle(Point::new(20.0, 20.0), 4.0, colors::RED, 3.0, false);
    let r = c.create_rectangle(
        Point::new(0.0, 0.0),
        Point::new(8.0, 8.0),
        colors::BLUE,
        8.0,
        false,
    );

    assert_eq!(ids(&c), vec![r, a, b]);
    assert_eq!(widths(&c), vec![8.0, 5.0, 3.0]);

    assert!(c.undo());
    assert_eq!(ids(&c), vec![a, b]);
    assert!(c.undo());
    assert_eq!(ids(&c), vec![a]);

    assert!(c.redo());
    assert!(c.redo());
    assert_eq!(ids(&c), vec![r, a, b]);
    assert!(!c.redo());
}

#[test]
fn test_delete_and_undo_restores_sorted_position() {
    let c = collection();
    let wide = c.create_circle(Point::new(0.0, 0.0), 1.0, colors::BLACK, 9.0, false);
    let mid = c.create_circle(Point::new(0.0, 0.0), 2.0, colors::BLACK, 5.0, true);
    let thin = c.create_circle(Point::new(0.0, 0.0), 3.0, colors::BLACK, 1.0, false);

    assert!(c.delete_shape(mid));
    assert_eq!(ids(&c), vec![wide, thin]);
    assert!(c.below_grid().is_empty());

    c.undo();
    assert_eq!(ids(&c), vec![wide, mid, thin]);
    assert_eq!(c.below_grid()[0].id(), mid);
    assert!(c.with_layer(|l| l.is_consistent()));
}

#[test]
fn test_delete_shapes_is_one_step() {
    let c = collection();
    let a = c.create_circle(Point::new(0.0, 0.0), 1.0, colors::BLACK, 2.0, false);
    let b = c.create_circle(Point::new(5.0, 0.0), 1.0, colors::BLACK, 2.0, false);
    let depth = c.history().borrow().undo_depth();

    assert_eq!(c.delete_shapes(&[a, b, ShapeId::new()]), 2);
    assert!(c.is_empty());
    assert_eq!(c.history().borrow().undo_depth(), depth + 1);

    c.undo();
    assert_eq!(c.len(), 2);
}

#[test]
fn test_shared_history_undoes_across_collections() {
    let history = shared(CommandHistory::new());
    let map = ShapeCollection::new("background", history.clone());
    let fog = ShapeCollection::new("background fog", history.clone());

    let wall = map.create_line(Point::new(0.0, 0.0), Point::new(1.0, 0.0), colors::BLACK, 1.0, false);
    let cloud = fog.create_circle(Point::new(3.0, 3.0), 2.0, colors::GRAY, 1.0, false);

    assert!(history.borrow_mut().undo());
    assert!(!fog.contains(cloud));
    assert!(map.contains(wall));

    assert!(map.undo());
    assert!(map.is_empty());
    assert!(fog.redo());
    assert!(map.contains(wall));
    assert!(!fog.contains(cloud));
}

#[test]
fn test_drawn_points_survive_undo_redo() {
    let c = collection();
    let path = c
        .create_shape(ShapeVariant::FreehandPath, colors::BLACK, 2.0, false)
        .unwrap();
    for x in 0..4 {
        c.add_point(path, Point::new(f64::from(x), 0.0)).unwrap();
    }

    c.undo();
    assert!(!c.contains(path));
    c.redo();

    let shape = c.shape(path).unwrap();
    match shape.kind() {
        ShapeKind::FreehandPath(p) => assert_eq!(p.points().len(), 4),
        other => panic!("unexpected kind {other:?}"),
    }
    assert_eq!(shape.bounds().right, 3.0);
}

#[test]
fn test_add_point_to_unknown_shape() {
    let c = collection();
    let err = c.add_point(ShapeId::new(), Point::ORIGIN).unwrap_err();
    assert!(matches!(err, ShapeError::NotFound { .. }));
}

#[test]
fn test_edit_text_replaces_in_one_step() {
    let c = collection();
    let label = c
        .create_text("Goblins", 1.0, Point::new(4.0, 4.0), colors::RED)
        .unwrap();
    let transform = CoordinateTransform::new(2.0, Point::ORIGIN);

    let edited = c.edit_text(label, "Hobgoblins", 6.0, &transform).unwrap();
    assert_ne!(edited, label);
    assert!(!c.contains(label));

    let shape = c.shape(edited).unwrap();
    assert_eq!(shape.color(), colors::RED);
    match shape.kind() {
        ShapeKind::Text(t) => {
            assert_eq!(t.text(), "Hobgoblins");
            assert_eq!(t.size(), 3.0);
            assert_eq!(t.location(), Point::new(4.0, 4.0));
        }
        other => panic!("unexpected kind {other:?}"),
    }

    c.undo();
    assert!(c.contains(label));
    assert!(!c.contains(edited));
}

#[test]
fn test_edit_text_rejects_other_variants() {
    let c = collection();
    let line = c.create_line(Point::new(0.0, 0.0), Point::new(1.0, 1.0), colors::BLACK, 1.0, false);
    let err = c
        .edit_text(line, "nope", 1.0, &CoordinateTransform::identity())
        .unwrap_err();
    assert!(err.to_string().contains("edit_text"));
    assert!(c.contains(line));
}

#[test]
fn test_find_shape_at_with_filter() {
    let c = collection();
    let line = c.create_line(Point::new(0.0, 0.0), Point::new(10.0, 0.0), colors::BLACK, 2.0, false);
    let circle = c.create_circle(Point::new(5.0, 5.0), 5.0, colors::BLACK, 2.0, false);

    // (5, 0) is on both the line and the top of the circle.
    let hit = c.find_shape_at(Point::new(5.0, 0.0), None);
    assert!(hit == Some(line) || hit == Some(circle));
    assert_eq!(
        c.find_shape_at(Point::new(5.0, 0.0), Some(ShapeVariant::Circle)),
        Some(circle)
    );
    assert_eq!(c.find_shape_at(Point::new(50.0, 50.0), None), None);
}

#[test]
fn test_bounding_rect_includes_pending_offset() {
    let c = collection();
    assert!(c.bounding_rect().is_empty());

    let r = c.create_rectangle(Point::new(0.0, 0.0), Point::new(2.0, 2.0), colors::BLACK, 1.0, false);
    c.set_draw_offset(r, Some(Point::new(10.0, 0.0))).unwrap();
    let bounds = c.bounding_rect();
    assert_eq!(bounds.left, 10.0);
    assert_eq!(bounds.right, 12.0);
}

#[test]
fn test_optimize_commits_offset() {
    let c = collection();
    let r = c.create_rectangle(Point::new(0.0, 0.0), Point::new(2.0, 2.0), colors::BLACK, 1.0, false);
    c.set_draw_offset(r, Some(Point::new(5.0, 5.0))).unwrap();

    assert_eq!(c.optimize(), 1);
    assert!(!c.contains(r));
    let moved = &c.shapes()[0];
    assert_eq!(moved.draw_offset(), None);
    assert_eq!(moved.bounds().left, 5.0);
    assert_eq!(moved.bounds().bottom, 7.0);

    c.undo();
    assert_eq!(c.shape(r).unwrap().draw_offset(), Some(Point::new(5.0, 5.0)));
}

#[test]
fn test_optimize_with_nothing_to_do_records_nothing() {
    let c = collection();
    c.create_circle(Point::new(0.0, 0.0), 1.0, colors::BLACK, 1.0, false);
    let depth = c.history().borrow().undo_depth();
    assert_eq!(c.optimize(), 0);
    assert_eq!(c.history().borrow().undo_depth(), depth);
}

#[test]
fn test_erase_marks_without_command() {
    let c = collection();
    let circle = c.create_circle(Point::new(0.0, 0.0), 5.0, colors::BLACK, 1.0, false);
    let depth = c.history().borrow().undo_depth();

    c.erase(Point::new(5.0, 0.0), 1.0);
    assert_eq!(c.history().borrow().undo_depth(), depth);
    assert!(!c.shape(circle).unwrap().is_valid());

    c.optimize();
    assert!(c.is_empty());
    c.undo();
    assert!(c.contains(circle));
}
