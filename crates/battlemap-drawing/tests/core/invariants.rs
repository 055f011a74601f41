//! Property tests for the ordering and partition invariants of a shape
//! collection under arbitrary create/delete/undo/redo sequences.

use std::collections::HashSet;

use battlemap_core::shared;
use battlemap_drawing::{colors, CommandHistory, Point, Shape, ShapeCollection, ShapeId};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Create { width: u8, below: bool },
    Delete { pick: usize },
    Erase { x: i8 },
    Optimize,
    Undo,
    Redo,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..8, any::<bool>()).prop_map(|(width, below)| Op::Create { width, below }),
        2 => any::<usize>().prop_map(|pick| Op::Delete { pick }),
        1 => (-4i8..12).prop_map(|x| Op::Erase { x }),
        1 => Just(Op::Optimize),
        2 => Just(Op::Undo),
        2 => Just(Op::Redo),
    ]
}

fn apply(c: &ShapeCollection, op: &Op, counter: &mut u32) {
    match *op {
        Op::Create { width, below } => {
            *counter += 1;
            let y = f64::from(*counter);
            let points: Vec<Point> = (0..6).map(|x| Point::new(f64::from(x), y)).collect();
            c.create_freehand(&points, colors::BLACK, f64::from(width), below);
        }
        Op::Delete { pick } => {
            let shapes = c.shapes();
            if !shapes.is_empty() {
                c.delete_shape(shapes[pick % shapes.len()].id());
            }
        }
        Op::Erase { x } => c.erase(Point::new(f64::from(x), 1.0), 0.5),
        Op::Optimize => {
            c.optimize();
        }
        Op::Undo => {
            c.undo();
        }
        Op::Redo => {
            c.redo();
        }
    }
}

fn id_list(c: &ShapeCollection) -> Vec<ShapeId> {
    c.shapes().iter().map(Shape::id).collect()
}

proptest! {
    #[test]
    fn ordering_and_partition_hold(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let c = ShapeCollection::new("prop", shared(CommandHistory::new()));
        let mut counter = 0;
        for op in &ops {
            apply(&c, op, &mut counter);

            let shapes = c.shapes();
            prop_assert!(
                shapes.windows(2).all(|w| w[0].stroke_width() >= w[1].stroke_width()),
                "not sorted after {:?}", op
            );

            let all: HashSet<ShapeId> = shapes.iter().map(Shape::id).collect();
            let above: Vec<Shape> = c.above_grid();
            let below: Vec<Shape> = c.below_grid();
            prop_assert!(above.iter().all(|s| !s.draw_below_grid()));
            prop_assert!(below.iter().all(|s| s.draw_below_grid()));
            let union: HashSet<ShapeId> = above.iter().chain(below.iter()).map(Shape::id).collect();
            prop_assert_eq!(union, all);
            prop_assert_eq!(above.len() + below.len(), shapes.len());
            prop_assert!(above.windows(2).all(|w| w[0].stroke_width() >= w[1].stroke_width()));
            prop_assert!(below.windows(2).all(|w| w[0].stroke_width() >= w[1].stroke_width()));
        }
    }

    #[test]
    fn execute_undo_redo_restores_state(
        setup in prop::collection::vec(op_strategy(), 0..30),
        width in 0u8..8,
        below in any::<bool>(),
    ) {
        let history = shared(CommandHistory::new());
        let c = ShapeCollection::new("prop", history.clone());
        let mut counter = 0;
        for op in &setup {
            apply(&c, op, &mut counter);
        }

        apply(&c, &Op::Create { width, below }, &mut counter);
        let after_execute = id_list(&c);

        prop_assert!(history.borrow_mut().undo());
        prop_assert!(history.borrow_mut().redo());
        prop_assert_eq!(id_list(&c), after_execute);
    }

    #[test]
    fn undo_everything_empties_collection(widths in prop::collection::vec(0u8..8, 1..20)) {
        let c = ShapeCollection::new("prop", shared(CommandHistory::new()));
        for (i, width) in widths.iter().enumerate() {
            let y = i as f64;
            c.create_line(Point::new(0.0, y), Point::new(1.0, y), colors::BLACK, f64::from(*width), false);
        }
        while c.undo() {}
        prop_assert!(c.is_empty());
        while c.redo() {}
        prop_assert_eq!(c.len(), widths.len());
    }
}
