//! # Battlemap Drawing
//!
//! The editable, undoable drawing model behind a battle map, and the
//! line-oriented format it is saved in.
//!
//! ## Core Components
//!
//! - **Shapes**: freehand paths, straight lines, rectangles, circles and
//!   text, each with its own erase and split behaviour
//! - **Commands/History**: reversible create/delete edits and the undo/redo
//!   stacks, shared between layers that undo together
//! - **Collections**: a layer's shapes kept sorted by stroke width and split
//!   into above-grid and below-grid views
//! - **Tokens, grid, background images**: the rest of a map's content
//! - **Document**: the composition root and its versioned serializer
//!
//! ## Architecture
//!
//! ```text
//! MapDocument
//!   ├── background + background fog ──┐
//!   ├── gm notes + gm notes fog ───────┼── ShapeCollection ── Shape
//!   ├── annotations ───────────────────┘        │
//!   ├── tokens (TokenCollection)                └── CommandHistory (shared)
//!   ├── grid, transform, background images
//!   └── MapDataWriter / MapDataReader
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use battlemap_drawing::{colors, HistoryGroup, Layer, MapDocument, Point};
//!
//! let doc = MapDocument::new();
//! let wall = doc
//!     .layer(Layer::Background)
//!     .create_line(Point::new(0.0, 0.0), Point::new(10.0, 0.0), colors::BLACK, 2.0, false);
//! doc.undo(HistoryGroup::Background);
//! doc.save_to_file("dungeon.map")?;
//! ```

pub mod background;
pub mod collection;
pub mod commands;
pub mod document;
pub mod grid;
pub mod history;
pub mod model;
pub mod serialization;
pub mod tokens;

pub use battlemap_core::{BoundingRect, CoordinateTransform, Point};

pub use background::{BackgroundImage, BackgroundImages};
pub use collection::{LayerShapes, ShapeCollection, ShapeCommand};
pub use commands::{Command, EditCommand, EditTarget, Identified};
pub use document::{HistoryGroup, Layer, MapDocument, CURRENT_VERSION, DEFAULT_LAST_TAG};
pub use grid::{Grid, GridKind};
pub use history::CommandHistory;
pub use model::{
    colors, CircleShape, Color, FreehandPath, PathPoint, RectangleShape, Shape, ShapeGeometry,
    ShapeHandle, ShapeId, ShapeKind, ShapePayload, ShapeVariant, StraightLine, TextShape,
};
pub use serialization::{MapDataReader, MapDataWriter};
pub use tokens::{PlacementId, TokenCollection, TokenPlacement};
