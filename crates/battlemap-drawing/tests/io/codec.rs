use battlemap_core::{CoordinateTransform, SerializationError, ShapeError};
use battlemap_drawing::{
    colors, HistoryGroup, Layer, MapDataReader, MapDataWriter, MapDocument, Point, Shape,
    ShapeKind, TextShape,
};

fn shape_text(shape: &Shape) -> String {
    let mut writer = MapDataWriter::new(Vec::new());
    shape.serialize(&mut writer).unwrap();
    String::from_utf8(writer.into_inner().unwrap()).unwrap()
}

#[test]
fn test_text_record_layout() {
    let shape = Shape::new(
        ShapeKind::Text(TextShape::new("Here be dragons".into(), 2.0, Point::new(1.0, 2.5))),
        colors::RED,
        0.0,
        false,
    );
    let text = shape_text(&shape);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "t");
    assert_eq!(lines[1], "4294901760");
    assert_eq!(lines[2], "0");
    // Bounding rectangle hint.
    assert_eq!(&lines[3..5], &["1", "2.5"]);
    assert_eq!(lines[7], "0");
    assert_eq!(&lines[8..], &["Here be dragons", "2", "1", "2.5"]);
}

#[test]
fn test_pending_offset_written_as_committed() {
    let mut shape = Shape::new(
        ShapeKind::Text(TextShape::new("Door".into(), 1.0, Point::new(0.0, 0.0))),
        colors::BLACK,
        0.0,
        false,
    );
    shape.set_draw_offset(Some(Point::new(3.0, 4.0)));
    let text = shape_text(&shape);
    assert!(text.ends_with("Door\n1\n3\n4\n"));
}

#[test]
fn test_blank_lines_ignored_between_fields() {
    let text = "t\n\n4278190080\n0\n\n0\n0\n1\n1\n0\nLabel\n\n1\n0\n0\n";
    let shape = Shape::deserialize(&mut MapDataReader::new(text.as_bytes())).unwrap();
    match shape.kind() {
        ShapeKind::Text(t) => assert_eq!(t.text(), "Label"),
        other => panic!("unexpected kind {other:?}"),
    }
    assert_eq!(shape.color(), colors::BLACK);
}

#[test]
fn test_unknown_tag_rejected() {
    let err = Shape::deserialize(&mut MapDataReader::new("q\n".as_bytes())).unwrap_err();
    assert!(matches!(err, SerializationError::UnknownShapeTag { ref tag } if tag == "q"));
}

#[test]
fn test_negative_color_rejected() {
    let text = "c\n-1\n1\n0\n0\n0\n0\n0\n0\n0\n1\n";
    let err = Shape::deserialize(&mut MapDataReader::new(text.as_bytes())).unwrap_err();
    assert!(matches!(err, SerializationError::PrimitiveParse { kind: "color", .. }));
}

#[test]
fn test_text_that_cannot_be_saved_is_rejected() {
    let doc = MapDocument::new();
    let notes = doc.layer(Layer::GmNotes);
    for text in ["Room 1\nTrap", "Room 1\r", "", "  "] {
        let err = notes
            .create_text(text, 1.0, Point::ORIGIN, colors::BLACK)
            .unwrap_err();
        assert!(matches!(
            err,
            ShapeError::UnrepresentableString { field: "text", .. }
        ));
    }
    assert!(notes.is_empty());
    assert!(!doc.can_undo(HistoryGroup::GmNotes));

    let label = notes
        .create_text("Room 1", 1.0, Point::ORIGIN, colors::BLACK)
        .unwrap();
    let err = notes
        .edit_text(label, "Room 1\nTrap", 1.0, &CoordinateTransform::identity())
        .unwrap_err();
    assert!(matches!(err, ShapeError::UnrepresentableString { .. }));
    assert!(notes.contains(label));
    assert_eq!(notes.history().borrow().undo_depth(), 1);

    let loaded = MapDocument::from_bytes(&doc.to_bytes().unwrap()).unwrap();
    assert_eq!(loaded.layer(Layer::GmNotes).len(), 1);
}

#[test]
fn test_freehand_missing_array_end() {
    let text = "f\n0\n1\n0\n0\n1\n1\n0\n[\n0\n0\n0\n1\n1\n0\n";
    let err = Shape::deserialize(&mut MapDataReader::new(text.as_bytes())).unwrap_err();
    assert!(matches!(err, SerializationError::StructuralSync { .. }));
}
