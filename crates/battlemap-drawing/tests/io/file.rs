use battlemap_drawing::{colors, HistoryGroup, Layer, MapDocument, Point};
use tempfile::TempDir;

fn sample_document() -> MapDocument {
    let mut doc = MapDocument::new();
    doc.layer(Layer::Background).create_line(
        Point::new(0.0, 0.0),
        Point::new(30.0, 0.0),
        colors::BLACK,
        3.0,
        true,
    );
    doc.layer(Layer::Annotations)
        .create_text("Camp", 1.5, Point::new(4.0, 4.0), colors::BLUE)
        .unwrap();
    doc.tokens()
        .place("bandit", Point::new(10.0, 10.0), 1.0)
        .unwrap();
    doc.set_last_tag("humanoids");
    doc
}

#[test]
fn test_save_and_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("camp.map");
    let doc = sample_document();

    doc.save_to_file(&path).unwrap();
    assert!(path.exists());
    assert!(!dir.path().join("camp.map.tmp").exists());

    let loaded = MapDocument::open(&path).unwrap();
    assert_eq!(loaded.to_bytes().unwrap(), doc.to_bytes().unwrap());
    assert_eq!(loaded.layer(Layer::Background).below_grid().len(), 1);
    assert_eq!(loaded.tokens().len(), 1);
    assert_eq!(loaded.last_tag(), "humanoids");
}

#[test]
fn test_save_replaces_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("map.txt");
    std::fs::write(&path, "old contents").unwrap();

    let doc = sample_document();
    doc.save_to_file(&path).unwrap();
    let saved = std::fs::read(&path).unwrap();
    assert_eq!(saved, doc.to_bytes().unwrap());
}

#[test]
fn test_failed_load_keeps_current_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.map");
    std::fs::write(&path, "2\n{\nsquare\n1\n0\n0\n").unwrap();

    let mut doc = sample_document();
    let before = doc.to_bytes().unwrap();
    let err = doc.load_from_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("broken.map"));
    assert_eq!(doc.to_bytes().unwrap(), before);
    assert!(doc.can_undo(HistoryGroup::Annotations));
}

#[test]
fn test_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let err = MapDocument::open(dir.path().join("nowhere.map")).unwrap_err();
    assert!(err.to_string().contains("nowhere.map"));
}

#[test]
fn test_save_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no_such_dir").join("x.map");
    let doc = sample_document();
    let before = doc.to_bytes().unwrap();
    assert!(doc.save_to_file(&path).is_err());
    assert_eq!(doc.to_bytes().unwrap(), before);
}
