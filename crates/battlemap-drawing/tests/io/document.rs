use battlemap_core::SerializationError;
use battlemap_drawing::{
    colors, BackgroundImage, BoundingRect, GridKind, HistoryGroup, Layer, MapDocument, Point,
    DEFAULT_LAST_TAG,
};

fn header(version: i64) -> String {
    format!(
        "{version}\n{{\nhex\n5\n0\n0\n{}\n{}\n}}\n{{\n2\n10\n-10\n}}\n[\n]\n",
        colors::GRAY,
        colors::WHITE
    )
}

const EMPTY_LAYERS: &str = "[\n]\n[\n]\n[\n]\n[\n]\n[\n]\n";

#[test]
fn test_version_zero_document() {
    let text = header(0) + EMPTY_LAYERS;
    let doc = MapDocument::from_bytes(text.as_bytes()).unwrap();

    assert!(doc.background_images.is_empty());
    assert_eq!(doc.last_tag(), DEFAULT_LAST_TAG);
    assert_eq!(doc.grid.kind, GridKind::Hex);
    assert_eq!(doc.grid.spacing, 5.0);
    assert_eq!(doc.transform.zoom(), 2.0);
    assert_eq!(doc.transform.origin(), Point::new(10.0, -10.0));
    assert_eq!(doc.shape_count(), 0);
}

#[test]
fn test_version_one_document_has_images_but_no_tag() {
    let text = header(1) + EMPTY_LAYERS + "[\n{\nmaps/cave.png\n0\n0\n100\n50\n}\n]\n";
    let doc = MapDocument::from_bytes(text.as_bytes()).unwrap();

    assert_eq!(doc.background_images.len(), 1);
    assert_eq!(doc.background_images.images()[0].path, "maps/cave.png");
    assert_eq!(doc.last_tag(), DEFAULT_LAST_TAG);
}

#[test]
fn test_version_two_reads_last_tag() {
    let text = header(2) + EMPTY_LAYERS + "[\n]\nundead\n";
    let doc = MapDocument::from_bytes(text.as_bytes()).unwrap();
    assert_eq!(doc.last_tag(), "undead");
}

#[test]
fn test_missing_object_framing_is_structural_error() {
    let text = "2\nsquare\n1\n0\n0\n";
    let err = MapDocument::from_bytes(text.as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        SerializationError::StructuralSync { ref expected, ref found } if expected == "{" && found == "square"
    ));
}

#[test]
fn test_truncated_document_fails() {
    let text = header(2) + "[\n]\n[\n";
    assert!(MapDocument::from_bytes(text.as_bytes()).is_err());
}

#[test]
fn test_bad_float_is_primitive_error() {
    let text = "2\n{\nsquare\nwide\n";
    let err = MapDocument::from_bytes(text.as_bytes()).unwrap_err();
    assert!(matches!(err, SerializationError::PrimitiveParse { kind: "float", .. }));
}

#[test]
fn test_failed_read_leaves_document_intact() {
    let mut doc = MapDocument::new();
    doc.layer(Layer::Annotations)
        .create_text("Keep me", 1.0, Point::ORIGIN, colors::BLACK)
        .unwrap();
    doc.set_last_tag("elves");
    let before = doc.to_bytes().unwrap();

    let err = doc.read_from("2\n{\nsquare\n".as_bytes()).unwrap_err();
    assert!(matches!(err, SerializationError::UnexpectedEof));
    assert_eq!(doc.to_bytes().unwrap(), before);
    assert!(doc.can_undo(HistoryGroup::Annotations));
}

#[test]
fn test_load_discards_history() {
    let mut doc = MapDocument::new();
    doc.layer(Layer::Background)
        .create_circle(Point::ORIGIN, 1.0, colors::BLACK, 1.0, false);
    let bytes = doc.to_bytes().unwrap();

    doc.read_from(bytes.as_slice()).unwrap();
    assert_eq!(doc.layer(Layer::Background).len(), 1);
    assert!(!doc.can_undo(HistoryGroup::Background));
}

#[test]
fn test_undo_after_load_cannot_restore_deleted_shape() {
    let saved = MapDocument::new();
    saved
        .layer(Layer::Background)
        .create_line(Point::ORIGIN, Point::new(3.0, 0.0), colors::BLACK, 1.0, false);
    let bytes = saved.to_bytes().unwrap();

    let mut doc = MapDocument::new();
    let background = doc.layer(Layer::Background);
    let stale = background.create_circle(Point::ORIGIN, 1.0, colors::RED, 2.0, false);
    assert!(background.delete_shape(stale));

    doc.read_from(bytes.as_slice()).unwrap();
    assert!(!doc.undo(HistoryGroup::Background));
    assert!(!doc.layer(Layer::Background).contains(stale));
    assert_eq!(doc.layer(Layer::Background).len(), 1);
}

#[test]
fn test_history_groups_are_independent() {
    let doc = MapDocument::new();
    let fog = doc
        .layer(Layer::BackgroundFog)
        .create_rectangle(Point::ORIGIN, Point::new(5.0, 5.0), colors::GRAY, 1.0, false);
    let note = doc
        .layer(Layer::GmNotes)
        .create_text("Secret door", 1.0, Point::ORIGIN, colors::RED)
        .unwrap();

    assert!(doc.undo(HistoryGroup::Background));
    assert!(!doc.layer(Layer::BackgroundFog).contains(fog));
    assert!(doc.layer(Layer::GmNotes).contains(note));
    assert!(!doc.undo(HistoryGroup::Annotations));
    assert!(doc.redo(HistoryGroup::Background));
    assert!(doc.layer(Layer::BackgroundFog).contains(fog));
}

#[test]
fn test_optimize_all_and_reset() {
    let mut doc = MapDocument::with_history_limit(Some(10));
    let layer = doc.layer(Layer::GmNotesFog);
    let id = layer.create_circle(Point::ORIGIN, 3.0, colors::GRAY, 1.0, false);
    layer.erase(Point::new(3.0, 0.0), 0.5);
    doc.background_images
        .add(BackgroundImage::new("a.png", BoundingRect::new(0.0, 0.0, 1.0, 1.0)))
        .unwrap();

    assert_eq!(doc.optimize_all(), 1);
    assert!(!doc.layer(Layer::GmNotesFog).contains(id));

    doc.reset();
    assert_eq!(doc.shape_count(), 0);
    assert!(doc.background_images.is_empty());
    assert!(!doc.can_undo(HistoryGroup::GmNotes));
    assert_eq!(doc.history_limit(), Some(10));
}
