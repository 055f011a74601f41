//! The map document: every layer, the grid, the view transform and token
//! placements, plus the versioned serializer that persists them together.
//!
//! Document stream layout:
//!
//! ```text
//! version            int
//! grid               { kind spacing offset.x offset.y color background }
//! transform          { zoom origin.x origin.y }
//! tokens             [ { token_id x y size bloodied } ... ]
//! background         [ shape records ]
//! background fog     [ shape records ]
//! gm notes           [ shape records ]
//! gm notes fog       [ shape records ]
//! annotations        [ shape records ]
//! background images  [ { path left top right bottom } ... ]   version >= 1
//! last tag           string                                    version >= 2
//! ```

use std::io::{BufRead, Write};

use battlemap_core::{
    shared, BoundingRect, CoordinateTransform, Point, SerializationError, Shared,
};

use crate::background::BackgroundImages;
use crate::collection::ShapeCollection;
use crate::grid::Grid;
use crate::history::CommandHistory;
use crate::serialization::{is_representable, MapDataReader, MapDataWriter};
use crate::tokens::TokenCollection;

mod file_io;

pub use file_io::write_atomically;

/// Version written by this build.
pub const CURRENT_VERSION: i64 = 2;

/// Last-tag value of documents that predate it or never set it.
pub const DEFAULT_LAST_TAG: &str = "none";

/// The shape layers of a document, in serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    BackgroundFog,
    GmNotes,
    GmNotesFog,
    Annotations,
}

impl Layer {
    pub const ALL: [Layer; 5] = [
        Layer::Background,
        Layer::BackgroundFog,
        Layer::GmNotes,
        Layer::GmNotesFog,
        Layer::Annotations,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Layer::Background => "background",
            Layer::BackgroundFog => "background fog",
            Layer::GmNotes => "gm notes",
            Layer::GmNotesFog => "gm notes fog",
            Layer::Annotations => "annotations",
        }
    }

    pub fn history_group(self) -> HistoryGroup {
        match self {
            Layer::Background | Layer::BackgroundFog => HistoryGroup::Background,
            Layer::GmNotes | Layer::GmNotesFog => HistoryGroup::GmNotes,
            Layer::Annotations => HistoryGroup::Annotations,
        }
    }
}

/// Layers that undo and redo together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryGroup {
    Background,
    GmNotes,
    Annotations,
    Tokens,
}

/// Composition root of one open map.
#[derive(Debug)]
pub struct MapDocument {
    pub grid: Grid,
    pub transform: CoordinateTransform,
    pub background_images: BackgroundImages,
    tokens: TokenCollection,
    background: ShapeCollection,
    background_fog: ShapeCollection,
    gm_notes: ShapeCollection,
    gm_notes_fog: ShapeCollection,
    annotations: ShapeCollection,
    last_tag: String,
    history_limit: Option<usize>,
}

impl Default for MapDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MapDocument {
    pub fn new() -> Self {
        Self::with_history_limit(None)
    }

    /// An empty document whose histories keep at most `limit` undo steps.
    pub fn with_history_limit(limit: Option<usize>) -> Self {
        let history = || shared(CommandHistory::with_max_depth(limit));
        let background_history = history();
        let gm_history = history();
        let annotation_history = history();

        Self {
            grid: Grid::default(),
            transform: CoordinateTransform::default(),
            background_images: BackgroundImages::new(),
            tokens: TokenCollection::new(history()),
            background: ShapeCollection::new(Layer::Background.name(), background_history.clone()),
            background_fog: ShapeCollection::new(Layer::BackgroundFog.name(), background_history),
            gm_notes: ShapeCollection::new(Layer::GmNotes.name(), gm_history.clone()),
            gm_notes_fog: ShapeCollection::new(Layer::GmNotesFog.name(), gm_history),
            annotations: ShapeCollection::new(Layer::Annotations.name(), annotation_history),
            last_tag: DEFAULT_LAST_TAG.to_string(),
            history_limit: limit,
        }
    }

    /// Discards all content and history.
    pub fn reset(&mut self) {
        *self = Self::with_history_limit(self.history_limit);
    }

    pub fn history_limit(&self) -> Option<usize> {
        self.history_limit
    }

    pub fn layer(&self, layer: Layer) -> &ShapeCollection {
        match layer {
            Layer::Background => &self.background,
            Layer::BackgroundFog => &self.background_fog,
            Layer::GmNotes => &self.gm_notes,
            Layer::GmNotesFog => &self.gm_notes_fog,
            Layer::Annotations => &self.annotations,
        }
    }

    pub fn layer_mut(&mut self, layer: Layer) -> &mut ShapeCollection {
        match layer {
            Layer::Background => &mut self.background,
            Layer::BackgroundFog => &mut self.background_fog,
            Layer::GmNotes => &mut self.gm_notes,
            Layer::GmNotesFog => &mut self.gm_notes_fog,
            Layer::Annotations => &mut self.annotations,
        }
    }

    pub fn tokens(&self) -> &TokenCollection {
        &self.tokens
    }

    pub fn history(&self, group: HistoryGroup) -> Shared<CommandHistory> {
        match group {
            HistoryGroup::Background => self.background.history(),
            HistoryGroup::GmNotes => self.gm_notes.history(),
            HistoryGroup::Annotations => self.annotations.history(),
            HistoryGroup::Tokens => self.tokens.history(),
        }
    }

    pub fn undo(&self, group: HistoryGroup) -> bool {
        self.history(group).borrow_mut().undo()
    }

    pub fn redo(&self, group: HistoryGroup) -> bool {
        self.history(group).borrow_mut().redo()
    }

    pub fn can_undo(&self, group: HistoryGroup) -> bool {
        self.history(group).borrow().can_undo()
    }

    pub fn can_redo(&self, group: HistoryGroup) -> bool {
        self.history(group).borrow().can_redo()
    }

    pub fn last_tag(&self) -> &str {
        &self.last_tag
    }

    /// Records the most recently used token tag. A tag that cannot be saved
    /// (blank or multi-line) resets it to [`DEFAULT_LAST_TAG`].
    pub fn set_last_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        self.last_tag = if !is_representable(tag) {
            DEFAULT_LAST_TAG.to_string()
        } else {
            tag.to_string()
        };
    }

    /// Runs the optimize pass on every layer. Returns the total number of
    /// shapes replaced or removed.
    pub fn optimize_all(&self) -> usize {
        Layer::ALL
            .iter()
            .map(|&layer| self.layer(layer).optimize())
            .sum()
    }

    pub fn shape_count(&self) -> usize {
        Layer::ALL.iter().map(|&layer| self.layer(layer).len()).sum()
    }

    /// Union of everything drawn: shapes, tokens and background images.
    pub fn bounding_rect(&self) -> BoundingRect {
        Layer::ALL
            .iter()
            .map(|&layer| self.layer(layer).bounding_rect())
            .fold(
                self.tokens
                    .bounding_rect(self.grid.spacing)
                    .union(&self.background_images.bounding_rect()),
                |acc, rect| acc.union(&rect),
            )
    }

    /// Writes the whole document at [`CURRENT_VERSION`].
    pub fn serialize<W: Write>(&self, out: &mut MapDataWriter<W>) -> Result<(), SerializationError> {
        out.write_int(CURRENT_VERSION)?;
        self.grid.serialize(out)?;
        write_transform(&self.transform, out)?;
        self.tokens.serialize(out)?;
        for layer in Layer::ALL {
            self.layer(layer).serialize(out)?;
        }
        self.background_images.serialize(out)?;
        out.write_string(&self.last_tag)?;
        out.flush()
    }

    /// Reads a complete document into a new value. Nothing is shared with
    /// any existing document, so a failure leaves callers' state untouched.
    pub fn deserialize<R: BufRead>(
        input: &mut MapDataReader<R>,
        history_limit: Option<usize>,
    ) -> Result<Self, SerializationError> {
        let version = input.read_int()?;
        if !(0..=CURRENT_VERSION).contains(&version) {
            tracing::warn!(version, supported = CURRENT_VERSION, "rejecting map document");
            return Err(SerializationError::UnsupportedVersion {
                found: version,
                supported: CURRENT_VERSION,
            });
        }

        let mut document = Self::with_history_limit(history_limit);
        document.grid = Grid::deserialize(input)?;
        document.transform = read_transform(input)?;
        document.tokens.deserialize(input)?;
        for layer in Layer::ALL {
            document.layer(layer).deserialize(input)?;
        }
        if version >= 1 {
            document.background_images = BackgroundImages::deserialize(input)?;
        }
        if version >= 2 {
            document.last_tag = input.read_string()?;
        }

        tracing::debug!(version, shapes = document.shape_count(), "map document parsed");
        Ok(document)
    }

    /// Replaces this document with one read from `input`. On failure this
    /// document is unchanged.
    pub fn read_from<R: BufRead>(&mut self, input: R) -> Result<(), SerializationError> {
        let mut reader = MapDataReader::new(input);
        *self = Self::deserialize(&mut reader, self.history_limit)?;
        Ok(())
    }

    /// Serializes into memory. The bytes are an immutable snapshot and can
    /// be handed to another thread for writing.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        let mut writer = MapDataWriter::new(Vec::new());
        self.serialize(&mut writer)?;
        writer.into_inner()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerializationError> {
        Self::deserialize(&mut MapDataReader::new(bytes), None)
    }
}

fn write_transform<W: Write>(
    transform: &CoordinateTransform,
    out: &mut MapDataWriter<W>,
) -> Result<(), SerializationError> {
    out.start_object()?;
    out.write_float(transform.zoom())?;
    out.write_float(transform.origin().x)?;
    out.write_float(transform.origin().y)?;
    out.end_object()
}

fn read_transform<R: BufRead>(
    input: &mut MapDataReader<R>,
) -> Result<CoordinateTransform, SerializationError> {
    input.expect_object_start()?;
    let zoom = input.read_float()?;
    let origin = Point::new(input.read_float()?, input.read_float()?);
    input.expect_object_end()?;
    Ok(CoordinateTransform::new(zoom, origin))
}
