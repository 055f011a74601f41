use battlemap_core::ShapeError;
use battlemap_drawing::{MapDocument, Point, TokenCollection};

#[test]
fn test_place_remove_undo() {
    let tokens = TokenCollection::default();
    let orc = tokens.place("orc", Point::new(10.0, 10.0), 1.0).unwrap();
    assert!(tokens.remove(orc));
    assert!(tokens.is_empty());

    assert!(tokens.undo());
    assert_eq!(tokens.get(orc).unwrap().token_id, "orc");
    assert!(tokens.redo());
    assert!(tokens.get(orc).is_none());
}

#[test]
fn test_bloodied_toggle() {
    let tokens = TokenCollection::default();
    let id = tokens.place("troll", Point::ORIGIN, 2.0).unwrap();
    assert_eq!(tokens.set_bloodied(id, false).unwrap(), id);

    let marked = tokens.set_bloodied(id, true).unwrap();
    assert!(tokens.get(marked).unwrap().bloodied);
    tokens.undo();
    assert!(!tokens.get(id).unwrap().bloodied);
}

#[test]
fn test_placements_survive_document_round_trip() {
    let doc = MapDocument::new();
    let id = doc.tokens().place("dragon", Point::new(1.5, -2.0), 3.0).unwrap();
    doc.tokens().set_bloodied(id, true).unwrap();

    let loaded = MapDocument::from_bytes(&doc.to_bytes().unwrap()).unwrap();
    let placements = loaded.tokens().placements();
    assert_eq!(placements.len(), 1);
    assert_eq!(placements[0].token_id, "dragon");
    assert_eq!(placements[0].location, Point::new(1.5, -2.0));
    assert_eq!(placements[0].size, 3.0);
    assert!(placements[0].bloodied);
    assert!(!loaded.tokens().history().borrow().can_undo());
}

#[test]
fn test_token_id_that_cannot_be_saved_is_rejected() {
    let doc = MapDocument::new();
    for token_id in ["", "   ", "orc\nchief", "orc\r"] {
        let err = doc.tokens().place(token_id, Point::ORIGIN, 1.0).unwrap_err();
        assert!(matches!(
            err,
            ShapeError::UnrepresentableString { field: "token id", .. }
        ));
    }
    assert!(doc.tokens().is_empty());
    assert!(!doc.tokens().history().borrow().can_undo());
    assert!(doc.to_bytes().is_ok());
}
