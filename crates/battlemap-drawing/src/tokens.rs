//! Token placements on the map.
//!
//! Placements follow the same reversible-command pattern as shape layers
//! but keep their own history: moving a miniature never interleaves with
//! drawing undo.

use std::io::{BufRead, Write};

use battlemap_core::{shared, BoundingRect, Point, SerializationError, Shared, ShapeError};
use uuid::Uuid;

use crate::commands::{EditCommand, EditTarget, Identified};
use crate::history::CommandHistory;
use crate::serialization::{check_representable, MapDataReader, MapDataWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacementId(Uuid);

impl PlacementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlacementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlacementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One token on the map. `location` is the top-left corner in world units;
/// `size` is the footprint in grid cells.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPlacement {
    id: PlacementId,
    pub token_id: String,
    pub location: Point,
    pub size: f64,
    pub bloodied: bool,
}

impl TokenPlacement {
    pub fn new(token_id: impl Into<String>, location: Point, size: f64) -> Self {
        Self {
            id: PlacementId::new(),
            token_id: token_id.into(),
            location,
            size,
            bloodied: false,
        }
    }

    pub fn id(&self) -> PlacementId {
        self.id
    }

    /// Footprint on a grid with `cell_size` world units per cell.
    pub fn footprint(&self, cell_size: f64) -> BoundingRect {
        let extent = self.size * cell_size;
        BoundingRect::new(
            self.location.x,
            self.location.y,
            self.location.x + extent,
            self.location.y + extent,
        )
    }

    /// A copy with a fresh identity, for replace-style edits.
    fn reissued(&self) -> Self {
        Self {
            id: PlacementId::new(),
            ..self.clone()
        }
    }

    fn serialize<W: Write>(&self, out: &mut MapDataWriter<W>) -> Result<(), SerializationError> {
        out.start_object()?;
        out.write_string(&self.token_id)?;
        out.write_float(self.location.x)?;
        out.write_float(self.location.y)?;
        out.write_float(self.size)?;
        out.write_bool(self.bloodied)?;
        out.end_object()
    }

    fn deserialize<R: BufRead>(input: &mut MapDataReader<R>) -> Result<Self, SerializationError> {
        input.expect_object_start()?;
        let token_id = input.read_string()?;
        let location = Point::new(input.read_float()?, input.read_float()?);
        let size = input.read_float()?;
        let bloodied = input.read_bool()?;
        input.expect_object_end()?;

        let mut placement = TokenPlacement::new(token_id, location, size);
        placement.bloodied = bloodied;
        Ok(placement)
    }
}

impl Identified for TokenPlacement {
    type Id = PlacementId;

    fn id(&self) -> PlacementId {
        self.id
    }
}

/// Placements in the order they were put down; later ones draw on top.
#[derive(Debug, Clone, Default)]
pub struct TokenLayer {
    placements: Vec<TokenPlacement>,
}

impl TokenLayer {
    pub fn placements(&self) -> &[TokenPlacement] {
        &self.placements
    }
}

impl EditTarget for TokenLayer {
    type Item = TokenPlacement;

    fn remove_items(&mut self, ids: &[PlacementId]) -> Vec<TokenPlacement> {
        let (removed, kept) = std::mem::take(&mut self.placements)
            .into_iter()
            .partition(|p| ids.contains(&p.id));
        self.placements = kept;
        removed
    }

    fn insert_item(&mut self, item: TokenPlacement) {
        self.placements.push(item);
    }

    fn finish_edit(&mut self) {}
}

pub type TokenCommand = EditCommand<TokenLayer>;

/// The document's token placements with their own undo history.
#[derive(Debug)]
pub struct TokenCollection {
    layer: Shared<TokenLayer>,
    history: Shared<CommandHistory>,
}

impl Default for TokenCollection {
    fn default() -> Self {
        Self::new(shared(CommandHistory::new()))
    }
}

impl TokenCollection {
    pub fn new(history: Shared<CommandHistory>) -> Self {
        Self {
            layer: shared(TokenLayer::default()),
            history,
        }
    }

    pub fn history(&self) -> Shared<CommandHistory> {
        self.history.clone()
    }

    fn execute(&self, command: TokenCommand) {
        self.history.borrow_mut().execute(Box::new(command));
    }

    fn find(&self, id: PlacementId) -> Result<TokenPlacement, ShapeError> {
        self.get(id)
            .ok_or_else(|| ShapeError::NotFound { id: id.to_string() })
    }

    fn replace(&self, old: TokenPlacement, new: TokenPlacement, name: &str) -> PlacementId {
        let id = new.id;
        let mut command = EditCommand::new(self.layer.clone(), name);
        command.add_deleted(old);
        command.add_created(new);
        self.execute(command);
        id
    }

    /// Places a token. A blank or multi-line token id is rejected and
    /// nothing is recorded.
    pub fn place(&self, token_id: &str, location: Point, size: f64) -> Result<PlacementId, ShapeError> {
        check_representable("token id", token_id)?;
        let placement = TokenPlacement::new(token_id, location, size);
        let id = placement.id;
        let mut command = EditCommand::new(self.layer.clone(), "place token");
        command.add_created(placement);
        self.execute(command);
        Ok(id)
    }

    pub fn remove(&self, id: PlacementId) -> bool {
        let Some(placement) = self.get(id) else {
            return false;
        };
        let mut command = EditCommand::new(self.layer.clone(), "remove token");
        command.add_deleted(placement);
        self.execute(command);
        true
    }

    /// Moves a placement as a delete plus create. The moved placement has a
    /// new id, which is returned.
    pub fn move_token(&self, id: PlacementId, location: Point) -> Result<PlacementId, ShapeError> {
        let old = self.find(id)?;
        let mut moved = old.reissued();
        moved.location = location;
        Ok(self.replace(old, moved, "move token"))
    }

    pub fn set_bloodied(&self, id: PlacementId, bloodied: bool) -> Result<PlacementId, ShapeError> {
        let old = self.find(id)?;
        if old.bloodied == bloodied {
            return Ok(id);
        }
        let mut marked = old.reissued();
        marked.bloodied = bloodied;
        Ok(self.replace(old, marked, "mark token"))
    }

    /// The topmost placement whose footprint contains `point`.
    pub fn find_token_at(&self, point: Point, cell_size: f64) -> Option<PlacementId> {
        self.layer
            .borrow()
            .placements
            .iter()
            .rev()
            .find(|p| p.footprint(cell_size).contains(point))
            .map(|p| p.id)
    }

    pub fn get(&self, id: PlacementId) -> Option<TokenPlacement> {
        self.layer
            .borrow()
            .placements
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn placements(&self) -> Vec<TokenPlacement> {
        self.layer.borrow().placements.clone()
    }

    pub fn len(&self) -> usize {
        self.layer.borrow().placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layer.borrow().placements.is_empty()
    }

    pub fn bounding_rect(&self, cell_size: f64) -> BoundingRect {
        self.layer
            .borrow()
            .placements
            .iter()
            .fold(BoundingRect::empty(), |acc, p| acc.union(&p.footprint(cell_size)))
    }

    pub fn undo(&self) -> bool {
        self.history.borrow_mut().undo()
    }

    pub fn redo(&self) -> bool {
        self.history.borrow_mut().redo()
    }

    pub fn serialize<W: Write>(&self, out: &mut MapDataWriter<W>) -> Result<(), SerializationError> {
        out.start_array()?;
        for placement in &self.layer.borrow().placements {
            placement.serialize(out)?;
        }
        out.end_array()
    }

    /// Replaces every placement with the array read from `input`, leaving
    /// the collection untouched on failure. Only used on a fresh document.
    pub(crate) fn deserialize<R: BufRead>(&self, input: &mut MapDataReader<R>) -> Result<(), SerializationError> {
        let depth = input.expect_array_start()?;
        let mut loaded = Vec::new();
        while input.has_more_array_items(depth)? {
            loaded.push(TokenPlacement::deserialize(input)?);
        }
        input.expect_array_end()?;
        self.layer.borrow_mut().placements = loaded;
        Ok(())
    }
}
