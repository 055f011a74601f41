//! Sorted, partitioned shape layers.
//!
//! A [`ShapeCollection`] owns the shapes of one document layer. Shapes are
//! kept in non-increasing stroke-width order at all times, and two derived
//! views split them into those drawn above and those drawn below the grid.
//! Every structural edit goes through a [`ShapeCommand`] executed by the
//! collection's (possibly shared) [`CommandHistory`].

use std::io::{BufRead, Write};

use battlemap_core::{
    shared, BoundingRect, CoordinateTransform, Point, SerializationError, Shared, ShapeError,
};

use crate::commands::{EditCommand, EditTarget, Identified};
use crate::history::CommandHistory;
use crate::model::{
    CircleShape, Color, FreehandPath, RectangleShape, Shape, ShapeHandle, ShapeId, ShapeKind,
    ShapeVariant, StraightLine, TextShape,
};
use crate::serialization::{check_representable, MapDataReader, MapDataWriter};

/// Default extra reach, in world units, of hit tests.
pub const DEFAULT_HIT_TOLERANCE: f64 = 0.0;

/// A reversible edit of one shape layer.
pub type ShapeCommand = EditCommand<LayerShapes>;

impl Identified for Shape {
    type Id = ShapeId;

    fn id(&self) -> ShapeId {
        Shape::id(self)
    }
}

/// The ordered shapes of one layer plus the above/below-grid views.
///
/// The views hold indices into the full sequence and are rebuilt from it
/// after every edit, so they can never disagree with it.
#[derive(Debug, Clone, Default)]
pub struct LayerShapes {
    shapes: Vec<Shape>,
    above: Vec<usize>,
    below: Vec<usize>,
}

impl LayerShapes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts after every shape at least as wide, before the first
    /// narrower one. Equal widths keep insertion order.
    fn insert_sorted(&mut self, shape: Shape) -> usize {
        let width = shape.stroke_width();
        let index = self.shapes.partition_point(|s| s.stroke_width() >= width);
        self.shapes.insert(index, shape);
        index
    }

    fn rebuild_partitions(&mut self) {
        self.above.clear();
        self.below.clear();
        for (index, shape) in self.shapes.iter().enumerate() {
            if shape.draw_below_grid() {
                self.below.push(index);
            } else {
                self.above.push(index);
            }
        }
    }

    /// Every shape, widest first.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn above_grid(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.above.iter().map(|&i| &self.shapes[i])
    }

    pub fn below_grid(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.below.iter().map(|&i| &self.shapes[i])
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.get(id).is_some()
    }

    /// Union of every member's drawn bounds; empty when there are none.
    pub fn bounding_rect(&self) -> BoundingRect {
        self.shapes
            .iter()
            .fold(BoundingRect::empty(), |acc, s| acc.union(&s.drawn_bounds()))
    }

    /// True when the ordering and partition invariants hold.
    pub fn is_consistent(&self) -> bool {
        let sorted = self
            .shapes
            .windows(2)
            .all(|w| w[0].stroke_width() >= w[1].stroke_width());
        let partitioned = self.above.len() + self.below.len() == self.shapes.len()
            && self.above.iter().all(|&i| !self.shapes[i].draw_below_grid())
            && self.below.iter().all(|&i| self.shapes[i].draw_below_grid());
        let views_sorted = self.above.windows(2).all(|w| w[0] < w[1])
            && self.below.windows(2).all(|w| w[0] < w[1]);
        sorted && partitioned && views_sorted
    }

    fn clear(&mut self) {
        self.shapes.clear();
        self.rebuild_partitions();
    }
}

impl EditTarget for LayerShapes {
    type Item = Shape;

    fn remove_items(&mut self, ids: &[ShapeId]) -> Vec<Shape> {
        if ids.is_empty() {
            return Vec::new();
        }
        let (removed, kept) = std::mem::take(&mut self.shapes)
            .into_iter()
            .partition(|s| ids.contains(&s.id()));
        self.shapes = kept;
        removed
    }

    fn insert_item(&mut self, item: Shape) {
        self.insert_sorted(item);
    }

    fn finish_edit(&mut self) {
        self.rebuild_partitions();
    }
}

/// One editable shape layer bound to a command history.
#[derive(Debug)]
pub struct ShapeCollection {
    name: String,
    layer: Shared<LayerShapes>,
    history: Shared<CommandHistory>,
    hit_tolerance: f64,
}

impl ShapeCollection {
    pub fn new(name: impl Into<String>, history: Shared<CommandHistory>) -> Self {
        Self {
            name: name.into(),
            layer: shared(LayerShapes::new()),
            history,
            hit_tolerance: DEFAULT_HIT_TOLERANCE,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn history(&self) -> Shared<CommandHistory> {
        self.history.clone()
    }

    pub fn hit_tolerance(&self) -> f64 {
        self.hit_tolerance
    }

    pub fn set_hit_tolerance(&mut self, tolerance: f64) {
        self.hit_tolerance = tolerance.max(0.0);
    }

    fn command(&self, name: &str) -> ShapeCommand {
        EditCommand::new(self.layer.clone(), format!("{}: {}", self.name, name))
    }

    fn execute(&self, command: ShapeCommand) {
        self.history.borrow_mut().execute(Box::new(command));
    }

    fn submit(&self, shape: Shape) -> ShapeHandle {
        let id = shape.id();
        let mut command = self.command(&format!("create {}", shape.variant().name()));
        command.add_created(shape);
        self.execute(command);
        id
    }

    /// Creates an empty shape of `variant`, to be grown with
    /// [`add_point`](Self::add_point). Text has no points and must be made
    /// with [`create_text`](Self::create_text).
    pub fn create_shape(
        &self,
        variant: ShapeVariant,
        color: Color,
        stroke_width: f64,
        draw_below_grid: bool,
    ) -> Result<ShapeHandle, ShapeError> {
        if variant == ShapeVariant::Text {
            return Err(ShapeError::ContractViolation {
                operation: "create_shape",
                variant: variant.name(),
            });
        }
        let kind = ShapeKind::empty(variant);
        Ok(self.submit(Shape::new(kind, color, stroke_width, draw_below_grid)))
    }

    pub fn create_freehand(
        &self,
        points: &[Point],
        color: Color,
        stroke_width: f64,
        draw_below_grid: bool,
    ) -> ShapeHandle {
        let kind = ShapeKind::FreehandPath(FreehandPath::from_points(points));
        self.submit(Shape::new(kind, color, stroke_width, draw_below_grid))
    }

    pub fn create_line(
        &self,
        start: Point,
        end: Point,
        color: Color,
        stroke_width: f64,
        draw_below_grid: bool,
    ) -> ShapeHandle {
        let kind = ShapeKind::StraightLine(StraightLine::between(start, end));
        self.submit(Shape::new(kind, color, stroke_width, draw_below_grid))
    }

    pub fn create_rectangle(
        &self,
        a: Point,
        b: Point,
        color: Color,
        stroke_width: f64,
        draw_below_grid: bool,
    ) -> ShapeHandle {
        let kind = ShapeKind::Rectangle(RectangleShape::from_corners(a, b));
        self.submit(Shape::new(kind, color, stroke_width, draw_below_grid))
    }

    pub fn create_circle(
        &self,
        center: Point,
        radius: f64,
        color: Color,
        stroke_width: f64,
        draw_below_grid: bool,
    ) -> ShapeHandle {
        let kind = ShapeKind::Circle(CircleShape::with_radius(center, radius));
        self.submit(Shape::new(kind, color, stroke_width, draw_below_grid))
    }

    /// Creates a text label. `size` is in world units; text always draws
    /// above the grid. Blank or multi-line text is rejected and nothing is
    /// recorded.
    pub fn create_text(
        &self,
        text: &str,
        size: f64,
        location: Point,
        color: Color,
    ) -> Result<ShapeHandle, ShapeError> {
        check_representable("text", text)?;
        let kind = ShapeKind::Text(TextShape::new(text.to_string(), size, location));
        Ok(self.submit(Shape::new(kind, color, 0.0, false)))
    }

    /// Deletes a member shape as one undoable step. Returns false, recording
    /// nothing, if the shape is not a member.
    pub fn delete_shape(&self, id: ShapeId) -> bool {
        self.delete_shapes(&[id]) == 1
    }

    /// Deletes every listed member in one undoable step; non-members are
    /// skipped. Returns how many were deleted.
    pub fn delete_shapes(&self, ids: &[ShapeId]) -> usize {
        let mut command = self.command("delete");
        {
            let layer = self.layer.borrow();
            for shape in layer.shapes().iter().filter(|s| ids.contains(&s.id())) {
                command.add_deleted(shape.clone());
            }
        }
        let count = command.deleted().len();
        self.execute(command);
        count
    }

    /// Replaces a text shape with one carrying `text` at `screen_size`
    /// (converted to world units through `transform`), as one undoable step.
    /// The replacement keeps the location and color.
    pub fn edit_text(
        &self,
        id: ShapeId,
        text: &str,
        screen_size: f64,
        transform: &CoordinateTransform,
    ) -> Result<ShapeHandle, ShapeError> {
        check_representable("text", text)?;
        let old = self
            .shape(id)
            .ok_or_else(|| ShapeError::NotFound { id: id.to_string() })?;
        let location = match old.committed_copy().kind() {
            ShapeKind::Text(t) => t.location(),
            other => {
                return Err(ShapeError::ContractViolation {
                    operation: "edit_text",
                    variant: other.variant().name(),
                })
            }
        };

        let size = transform.screen_to_world_distance(screen_size);
        let kind = ShapeKind::Text(TextShape::new(text.to_string(), size, location));
        let replacement = Shape::new(kind, old.color(), old.stroke_width(), false);
        let new_id = replacement.id();

        let mut command = self.command("edit text");
        command.add_deleted(old);
        command.add_created(replacement);
        self.execute(command);
        Ok(new_id)
    }

    /// Marks everything within `radius` of `center` as erased on every
    /// member. Nothing is removed until [`optimize`](Self::optimize).
    pub fn erase(&self, center: Point, radius: f64) {
        let mut layer = self.layer.borrow_mut();
        for shape in layer.shapes.iter_mut() {
            shape.erase(center, radius);
        }
    }

    /// Drops invalid shapes, splits partly erased ones and commits pending
    /// offsets, all as a single undoable step. Returns the number of shapes
    /// replaced or removed.
    pub fn optimize(&self) -> usize {
        let mut command = self.command("optimize");
        let (mut removed, mut split, mut committed) = (0usize, 0usize, 0usize);
        {
            let layer = self.layer.borrow();
            for shape in layer.shapes() {
                if !shape.is_valid() {
                    command.add_deleted(shape.clone());
                    removed += 1;
                } else if shape.needs_optimization() {
                    command.add_deleted(shape.clone());
                    for piece in shape.remove_erased_points() {
                        command.add_created(piece);
                    }
                    split += 1;
                } else if shape.draw_offset().is_some() {
                    command.add_deleted(shape.clone());
                    command.add_created(shape.committed_copy());
                    committed += 1;
                }
            }
        }
        tracing::debug!(
            layer = %self.name,
            removed,
            split,
            committed,
            created = command.created().len(),
            "optimize pass"
        );
        self.execute(command);
        removed + split + committed
    }

    /// Some member whose geometry contains `point`, optionally restricted to
    /// one variant. Which one is unspecified when several match.
    pub fn find_shape_at(&self, point: Point, variant: Option<ShapeVariant>) -> Option<ShapeHandle> {
        let layer = self.layer.borrow();
        layer
            .shapes()
            .iter()
            .filter(|s| variant.map_or(true, |v| s.variant() == v))
            .find(|s| s.contains_point(point, self.hit_tolerance))
            .map(Shape::id)
    }

    pub fn bounding_rect(&self) -> BoundingRect {
        self.layer.borrow().bounding_rect()
    }

    /// Extends a shape that is being drawn. Does not create a command: the
    /// creating command already owns the shape.
    pub fn add_point(&self, id: ShapeId, point: Point) -> Result<(), ShapeError> {
        let mut layer = self.layer.borrow_mut();
        let shape = layer
            .get_mut(id)
            .ok_or_else(|| ShapeError::NotFound { id: id.to_string() })?;
        shape.add_point(point)
    }

    /// Sets or clears the uncommitted move of a shape being dragged.
    pub fn set_draw_offset(&self, id: ShapeId, offset: Option<Point>) -> Result<(), ShapeError> {
        let mut layer = self.layer.borrow_mut();
        let shape = layer
            .get_mut(id)
            .ok_or_else(|| ShapeError::NotFound { id: id.to_string() })?;
        shape.set_draw_offset(offset);
        Ok(())
    }

    /// A snapshot of one member.
    pub fn shape(&self, id: ShapeId) -> Option<Shape> {
        self.layer.borrow().get(id).cloned()
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.layer.borrow().contains(id)
    }

    pub fn len(&self) -> usize {
        self.layer.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.layer.borrow().is_empty()
    }

    /// Snapshot of every member, widest first.
    pub fn shapes(&self) -> Vec<Shape> {
        self.layer.borrow().shapes().to_vec()
    }

    pub fn above_grid(&self) -> Vec<Shape> {
        self.layer.borrow().above_grid().cloned().collect()
    }

    pub fn below_grid(&self) -> Vec<Shape> {
        self.layer.borrow().below_grid().cloned().collect()
    }

    /// Borrows the layer without cloning, e.g. for rendering.
    pub fn with_layer<R>(&self, f: impl FnOnce(&LayerShapes) -> R) -> R {
        f(&self.layer.borrow())
    }

    pub fn undo(&self) -> bool {
        self.history.borrow_mut().undo()
    }

    pub fn redo(&self) -> bool {
        self.history.borrow_mut().redo()
    }

    /// Empties the layer without recording a command. Only meaningful
    /// together with clearing the history, as on document reset.
    pub fn clear(&self) {
        self.layer.borrow_mut().clear();
    }

    /// Writes the layer as an array of shape records. Invalid shapes are
    /// skipped.
    pub fn serialize<W: Write>(&self, out: &mut MapDataWriter<W>) -> Result<(), SerializationError> {
        let layer = self.layer.borrow();
        out.start_array()?;
        for shape in layer.shapes().iter().filter(|s| s.is_valid()) {
            shape.serialize(out)?;
        }
        out.end_array()
    }

    /// Replaces the layer's contents with an array of shape records. The
    /// layer is left untouched if the block fails to parse. The bound
    /// history is not touched, so this is only used on a fresh document.
    pub(crate) fn deserialize<R: BufRead>(&self, input: &mut MapDataReader<R>) -> Result<(), SerializationError> {
        let depth = input.expect_array_start()?;
        let mut loaded = Vec::new();
        while input.has_more_array_items(depth)? {
            loaded.push(Shape::deserialize(input)?);
        }
        input.expect_array_end()?;

        let count = loaded.len();
        let mut layer = self.layer.borrow_mut();
        layer.shapes.clear();
        for shape in loaded {
            layer.insert_sorted(shape);
        }
        layer.rebuild_partitions();
        tracing::debug!(layer = %self.name, shapes = count, "layer loaded");
        Ok(())
    }
}
