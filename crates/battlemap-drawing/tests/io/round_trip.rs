//! Serializing, reading back and serializing again must reproduce the first
//! output byte for byte.

use battlemap_drawing::{colors, Layer, MapDocument, Point};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Draw {
    Path { layer: usize, points: Vec<(i16, i16)>, width: u8, below: bool },
    Line { layer: usize, from: (i16, i16), to: (i16, i16), width: u8 },
    Rect { layer: usize, a: (i16, i16), b: (i16, i16), width: u8 },
    Circle { layer: usize, center: (i16, i16), radius: u8, width: u8 },
    Text { layer: usize, word: String, size: u8, at: (i16, i16) },
    Erase { layer: usize, at: (i16, i16), radius: u8 },
    Move { layer: usize, pick: usize, by: (i16, i16) },
}

fn pt((x, y): (i16, i16)) -> Point {
    Point::new(f64::from(x) / 4.0, f64::from(y) / 4.0)
}

fn draw_strategy() -> impl Strategy<Value = Draw> {
    let layer = 0usize..5;
    let coord = || (-200i16..200, -200i16..200);
    prop_oneof![
        (layer.clone(), prop::collection::vec(coord(), 0..8), 0u8..10, any::<bool>())
            .prop_map(|(layer, points, width, below)| Draw::Path { layer, points, width, below }),
        (layer.clone(), coord(), coord(), 0u8..10)
            .prop_map(|(layer, from, to, width)| Draw::Line { layer, from, to, width }),
        (layer.clone(), coord(), coord(), 0u8..10)
            .prop_map(|(layer, a, b, width)| Draw::Rect { layer, a, b, width }),
        (layer.clone(), coord(), 0u8..40, 0u8..10)
            .prop_map(|(layer, center, radius, width)| Draw::Circle { layer, center, radius, width }),
        (layer.clone(), "[a-z]{1,8}( [a-z]{1,8})?", 1u8..10, coord())
            .prop_map(|(layer, word, size, at)| Draw::Text { layer, word, size, at }),
        (layer.clone(), coord(), 0u8..40)
            .prop_map(|(layer, at, radius)| Draw::Erase { layer, at, radius }),
        (layer, any::<usize>(), coord())
            .prop_map(|(layer, pick, by)| Draw::Move { layer, pick, by }),
    ]
}

fn build(draws: &[Draw]) -> MapDocument {
    let doc = MapDocument::new();
    for draw in draws {
        match draw {
            Draw::Path { layer, points, width, below } => {
                let points: Vec<Point> = points.iter().copied().map(pt).collect();
                doc.layer(Layer::ALL[*layer])
                    .create_freehand(&points, colors::BLACK, f64::from(*width) / 2.0, *below);
            }
            Draw::Line { layer, from, to, width } => {
                doc.layer(Layer::ALL[*layer])
                    .create_line(pt(*from), pt(*to), colors::RED, f64::from(*width), false);
            }
            Draw::Rect { layer, a, b, width } => {
                doc.layer(Layer::ALL[*layer])
                    .create_rectangle(pt(*a), pt(*b), colors::BLUE, f64::from(*width), true);
            }
            Draw::Circle { layer, center, radius, width } => {
                doc.layer(Layer::ALL[*layer]).create_circle(
                    pt(*center),
                    f64::from(*radius) / 3.0,
                    colors::GREEN,
                    f64::from(*width),
                    false,
                );
            }
            Draw::Text { layer, word, size, at } => {
                doc.layer(Layer::ALL[*layer])
                    .create_text(word, f64::from(*size) * 0.7, pt(*at), colors::BLACK)
                    .unwrap();
            }
            Draw::Erase { layer, at, radius } => {
                doc.layer(Layer::ALL[*layer]).erase(pt(*at), f64::from(*radius) / 2.0);
            }
            Draw::Move { layer, pick, by } => {
                let collection = doc.layer(Layer::ALL[*layer]);
                let shapes = collection.shapes();
                if !shapes.is_empty() {
                    let id = shapes[pick % shapes.len()].id();
                    collection.set_draw_offset(id, Some(pt(*by))).unwrap();
                }
            }
        }
    }
    doc
}

proptest! {
    #[test]
    fn serialization_is_idempotent(draws in prop::collection::vec(draw_strategy(), 0..25)) {
        let doc = build(&draws);
        let first = doc.to_bytes().unwrap();
        let reloaded = MapDocument::from_bytes(&first).unwrap();
        let second = reloaded.to_bytes().unwrap();
        prop_assert_eq!(
            String::from_utf8_lossy(&first),
            String::from_utf8_lossy(&second)
        );
    }

    #[test]
    fn optimized_document_round_trips(draws in prop::collection::vec(draw_strategy(), 0..25)) {
        let doc = build(&draws);
        doc.optimize_all();
        let first = doc.to_bytes().unwrap();
        let second = MapDocument::from_bytes(&first).unwrap().to_bytes().unwrap();
        prop_assert_eq!(first, second);
    }
}
