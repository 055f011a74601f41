//! Shape model: the five drawable variants and the common shape record.
//!
//! Every variant implements [`ShapeGeometry`]; [`ShapeKind`] dispatches to
//! the variant by exhaustive matching. [`Shape`] carries the attributes all
//! variants share (color, stroke width, pending offset, draw layer) and keeps
//! the cached bounding rectangle in step with the geometry.

use std::io::{BufRead, Write};

use battlemap_core::{BoundingRect, Point, SerializationError, ShapeError};
use uuid::Uuid;

use crate::serialization::{MapDataReader, MapDataWriter};

mod circle;
mod freehand;
mod line;
mod rectangle;
mod text;

pub use circle::CircleShape;
pub use freehand::{FreehandPath, PathPoint};
pub use line::StraightLine;
pub use rectangle::RectangleShape;
pub use text::TextShape;

/// ARGB color packed into 32 bits.
pub type Color = u32;

pub mod colors {
    use super::Color;

    pub const BLACK: Color = 0xFF00_0000;
    pub const WHITE: Color = 0xFFFF_FFFF;
    pub const RED: Color = 0xFFFF_0000;
    pub const GREEN: Color = 0xFF00_FF00;
    pub const BLUE: Color = 0xFF00_00FF;
    pub const GRAY: Color = 0xFF80_8080;
}

/// Opaque, stable identity of a shape. Assigned at construction and never
/// reused; a split or moved copy gets a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(Uuid);

impl ShapeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle returned by the collection factories.
pub type ShapeHandle = ShapeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeVariant {
    FreehandPath,
    StraightLine,
    Rectangle,
    Circle,
    Text,
}

impl ShapeVariant {
    /// Short tag that introduces a shape record in the document format.
    pub fn tag(self) -> &'static str {
        match self {
            ShapeVariant::FreehandPath => "f",
            ShapeVariant::StraightLine => "l",
            ShapeVariant::Rectangle => "r",
            ShapeVariant::Circle => "c",
            ShapeVariant::Text => "t",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "f" => Some(ShapeVariant::FreehandPath),
            "l" => Some(ShapeVariant::StraightLine),
            "r" => Some(ShapeVariant::Rectangle),
            "c" => Some(ShapeVariant::Circle),
            "t" => Some(ShapeVariant::Text),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeVariant::FreehandPath => "freehand",
            ShapeVariant::StraightLine => "line",
            ShapeVariant::Rectangle => "rectangle",
            ShapeVariant::Circle => "circle",
            ShapeVariant::Text => "text",
        }
    }
}

/// Capabilities every shape variant provides.
pub trait ShapeGeometry: Sized {
    /// Bounds of the whole geometry, erased material included.
    fn bounds(&self) -> BoundingRect;

    fn contains_point(&self, p: Point, tolerance: f64) -> bool;

    /// Extends the geometry while the user is drawing it.
    fn add_point(&mut self, p: Point) -> Result<(), ShapeError>;

    /// Marks the material within `radius` of `center` as erased.
    fn erase(&mut self, center: Point, radius: f64);

    fn is_valid(&self) -> bool;

    /// True when some, but not all, of the geometry has been erased.
    fn needs_optimization(&self) -> bool;

    /// The disjoint surviving pieces once erased material is dropped.
    fn remove_erased_points(&self) -> Vec<Self>;

    fn translated(&self, delta: Point) -> Self;
}

/// The variant-specific part of a shape record, written after the shared
/// fields.
pub trait ShapePayload: Sized {
    fn write_payload<W: Write>(&self, out: &mut MapDataWriter<W>)
        -> Result<(), SerializationError>;

    fn read_payload<R: BufRead>(input: &mut MapDataReader<R>) -> Result<Self, SerializationError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    FreehandPath(FreehandPath),
    StraightLine(StraightLine),
    Rectangle(RectangleShape),
    Circle(CircleShape),
    Text(TextShape),
}

impl ShapeKind {
    pub fn variant(&self) -> ShapeVariant {
        match self {
            ShapeKind::FreehandPath(_) => ShapeVariant::FreehandPath,
            ShapeKind::StraightLine(_) => ShapeVariant::StraightLine,
            ShapeKind::Rectangle(_) => ShapeVariant::Rectangle,
            ShapeKind::Circle(_) => ShapeVariant::Circle,
            ShapeKind::Text(_) => ShapeVariant::Text,
        }
    }

    /// An empty shape of the given variant, ready for `add_point`.
    pub fn empty(variant: ShapeVariant) -> Self {
        match variant {
            ShapeVariant::FreehandPath => ShapeKind::FreehandPath(FreehandPath::new()),
            ShapeVariant::StraightLine => ShapeKind::StraightLine(StraightLine::new()),
            ShapeVariant::Rectangle => ShapeKind::Rectangle(RectangleShape::new()),
            ShapeVariant::Circle => ShapeKind::Circle(CircleShape::new()),
            ShapeVariant::Text => ShapeKind::Text(TextShape::new(String::new(), 0.0, Point::ORIGIN)),
        }
    }

    fn write_payload<W: Write>(&self, out: &mut MapDataWriter<W>) -> Result<(), SerializationError> {
        match self {
            ShapeKind::FreehandPath(s) => s.write_payload(out),
            ShapeKind::StraightLine(s) => s.write_payload(out),
            ShapeKind::Rectangle(s) => s.write_payload(out),
            ShapeKind::Circle(s) => s.write_payload(out),
            ShapeKind::Text(s) => s.write_payload(out),
        }
    }

    fn read_variant_payload<R: BufRead>(
        variant: ShapeVariant,
        input: &mut MapDataReader<R>,
    ) -> Result<Self, SerializationError> {
        Ok(match variant {
            ShapeVariant::FreehandPath => ShapeKind::FreehandPath(FreehandPath::read_payload(input)?),
            ShapeVariant::StraightLine => ShapeKind::StraightLine(StraightLine::read_payload(input)?),
            ShapeVariant::Rectangle => ShapeKind::Rectangle(RectangleShape::read_payload(input)?),
            ShapeVariant::Circle => ShapeKind::Circle(CircleShape::read_payload(input)?),
            ShapeVariant::Text => ShapeKind::Text(TextShape::read_payload(input)?),
        })
    }
}

impl ShapeGeometry for ShapeKind {
    fn bounds(&self) -> BoundingRect {
        match self {
            ShapeKind::FreehandPath(s) => s.bounds(),
            ShapeKind::StraightLine(s) => s.bounds(),
            ShapeKind::Rectangle(s) => s.bounds(),
            ShapeKind::Circle(s) => s.bounds(),
            ShapeKind::Text(s) => s.bounds(),
        }
    }

    fn contains_point(&self, p: Point, tolerance: f64) -> bool {
        match self {
            ShapeKind::FreehandPath(s) => s.contains_point(p, tolerance),
            ShapeKind::StraightLine(s) => s.contains_point(p, tolerance),
            ShapeKind::Rectangle(s) => s.contains_point(p, tolerance),
            ShapeKind::Circle(s) => s.contains_point(p, tolerance),
            ShapeKind::Text(s) => s.contains_point(p, tolerance),
        }
    }

    fn add_point(&mut self, p: Point) -> Result<(), ShapeError> {
        match self {
            ShapeKind::FreehandPath(s) => s.add_point(p),
            ShapeKind::StraightLine(s) => s.add_point(p),
            ShapeKind::Rectangle(s) => s.add_point(p),
            ShapeKind::Circle(s) => s.add_point(p),
            ShapeKind::Text(s) => s.add_point(p),
        }
    }

    fn erase(&mut self, center: Point, radius: f64) {
        match self {
            ShapeKind::FreehandPath(s) => s.erase(center, radius),
            ShapeKind::StraightLine(s) => s.erase(center, radius),
            ShapeKind::Rectangle(s) => s.erase(center, radius),
            ShapeKind::Circle(s) => s.erase(center, radius),
            ShapeKind::Text(s) => s.erase(center, radius),
        }
    }

    fn is_valid(&self) -> bool {
        match self {
            ShapeKind::FreehandPath(s) => s.is_valid(),
            ShapeKind::StraightLine(s) => s.is_valid(),
            ShapeKind::Rectangle(s) => s.is_valid(),
            ShapeKind::Circle(s) => s.is_valid(),
            ShapeKind::Text(s) => s.is_valid(),
        }
    }

    fn needs_optimization(&self) -> bool {
        match self {
            ShapeKind::FreehandPath(s) => s.needs_optimization(),
            ShapeKind::StraightLine(s) => s.needs_optimization(),
            ShapeKind::Rectangle(s) => s.needs_optimization(),
            ShapeKind::Circle(s) => s.needs_optimization(),
            ShapeKind::Text(s) => s.needs_optimization(),
        }
    }

    fn remove_erased_points(&self) -> Vec<Self> {
        match self {
            ShapeKind::FreehandPath(s) => pieces(s, ShapeKind::FreehandPath),
            ShapeKind::StraightLine(s) => pieces(s, ShapeKind::StraightLine),
            ShapeKind::Rectangle(s) => pieces(s, ShapeKind::Rectangle),
            ShapeKind::Circle(s) => pieces(s, ShapeKind::Circle),
            ShapeKind::Text(s) => pieces(s, ShapeKind::Text),
        }
    }

    fn translated(&self, delta: Point) -> Self {
        match self {
            ShapeKind::FreehandPath(s) => ShapeKind::FreehandPath(s.translated(delta)),
            ShapeKind::StraightLine(s) => ShapeKind::StraightLine(s.translated(delta)),
            ShapeKind::Rectangle(s) => ShapeKind::Rectangle(s.translated(delta)),
            ShapeKind::Circle(s) => ShapeKind::Circle(s.translated(delta)),
            ShapeKind::Text(s) => ShapeKind::Text(s.translated(delta)),
        }
    }
}

fn pieces<S: ShapeGeometry>(shape: &S, wrap: fn(S) -> ShapeKind) -> Vec<ShapeKind> {
    shape.remove_erased_points().into_iter().map(wrap).collect()
}

/// One drawable entity in a shape collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: ShapeId,
    color: Color,
    stroke_width: f64,
    draw_below_grid: bool,
    draw_offset: Option<Point>,
    bounds: BoundingRect,
    kind: ShapeKind,
}

impl Shape {
    /// Creates a shape with a fresh id. Text always draws above the grid,
    /// whatever `draw_below_grid` says.
    pub fn new(kind: ShapeKind, color: Color, stroke_width: f64, draw_below_grid: bool) -> Self {
        let draw_below_grid = draw_below_grid && kind.variant() != ShapeVariant::Text;
        let bounds = kind.bounds();
        Self {
            id: ShapeId::new(),
            color,
            stroke_width,
            draw_below_grid,
            draw_offset: None,
            bounds,
            kind,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    pub fn draw_below_grid(&self) -> bool {
        self.draw_below_grid
    }

    pub fn draw_offset(&self) -> Option<Point> {
        self.draw_offset
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn variant(&self) -> ShapeVariant {
        self.kind.variant()
    }

    /// Cached bounds of the geometry, not including any pending offset.
    pub fn bounds(&self) -> BoundingRect {
        self.bounds
    }

    /// Bounds where the shape is currently drawn, pending offset applied.
    pub fn drawn_bounds(&self) -> BoundingRect {
        match self.draw_offset {
            Some(delta) => self.bounds.translated(delta),
            None => self.bounds,
        }
    }

    /// Sets or clears the uncommitted move delta used while dragging.
    pub fn set_draw_offset(&mut self, offset: Option<Point>) {
        self.draw_offset = offset;
    }

    pub fn contains_point(&self, p: Point, tolerance: f64) -> bool {
        let local = self.to_local(p);
        self.kind
            .contains_point(local, tolerance + self.stroke_width / 2.0)
    }

    pub fn add_point(&mut self, p: Point) -> Result<(), ShapeError> {
        let local = self.to_local(p);
        self.kind.add_point(local)?;
        self.bounds = self.kind.bounds();
        Ok(())
    }

    pub fn erase(&mut self, center: Point, radius: f64) {
        let local = self.to_local(center);
        self.kind.erase(local, radius);
    }

    pub fn is_valid(&self) -> bool {
        self.kind.is_valid()
    }

    pub fn needs_optimization(&self) -> bool {
        self.kind.needs_optimization()
    }

    /// Replacement shapes with the erased material dropped and any pending
    /// offset baked in. Each piece has a fresh identity.
    pub fn remove_erased_points(&self) -> Vec<Shape> {
        let delta = self.draw_offset.unwrap_or(Point::ORIGIN);
        self.kind
            .remove_erased_points()
            .into_iter()
            .map(|piece| self.derive(piece.translated(delta)))
            .collect()
    }

    /// A copy translated by `delta`, with a fresh identity and no pending
    /// offset.
    pub fn moved_copy(&self, delta: Point) -> Shape {
        self.derive(self.kind.translated(delta))
    }

    /// A copy with the pending offset baked into its geometry.
    pub fn committed_copy(&self) -> Shape {
        self.moved_copy(self.draw_offset.unwrap_or(Point::ORIGIN))
    }

    fn derive(&self, kind: ShapeKind) -> Shape {
        Shape::new(kind, self.color, self.stroke_width, self.draw_below_grid)
    }

    fn to_local(&self, p: Point) -> Point {
        match self.draw_offset {
            Some(delta) => p - delta,
            None => p,
        }
    }

    /// Writes the shape record: tag, shared fields, then the variant
    /// payload. A pending offset is written as committed geometry.
    pub fn serialize<W: Write>(&self, out: &mut MapDataWriter<W>) -> Result<(), SerializationError> {
        let committed;
        let kind = match self.draw_offset {
            Some(delta) => {
                committed = self.kind.translated(delta);
                &committed
            }
            None => &self.kind,
        };
        let bounds = kind.bounds();

        out.write_string(self.variant().tag())?;
        out.write_int(i64::from(self.color))?;
        out.write_float(self.stroke_width)?;
        out.write_float(bounds.left)?;
        out.write_float(bounds.top)?;
        out.write_float(bounds.right)?;
        out.write_float(bounds.bottom)?;
        out.write_bool(self.draw_below_grid)?;
        kind.write_payload(out)
    }

    /// Reads one shape record written by [`Shape::serialize`].
    ///
    /// The stored bounding rectangle is only a hint for external readers;
    /// the cache is recomputed from the payload.
    pub fn deserialize<R: BufRead>(input: &mut MapDataReader<R>) -> Result<Shape, SerializationError> {
        let tag = input.read_string()?;
        let variant = ShapeVariant::from_tag(&tag)
            .ok_or(SerializationError::UnknownShapeTag { tag })?;

        let raw_color = input.read_int()?;
        let color = Color::try_from(raw_color).map_err(|_| SerializationError::PrimitiveParse {
            kind: "color",
            token: raw_color.to_string(),
        })?;
        let stroke_width = input.read_float()?;
        for _ in 0..4 {
            input.read_float()?;
        }
        let draw_below_grid = input.read_bool()?;
        let kind = ShapeKind::read_variant_payload(variant, input)?;

        Ok(Shape::new(kind, color, stroke_width, draw_below_grid))
    }
}

/// Distance from `p` to the segment `a`-`b`, with the clamped projection
/// parameter along the segment.
pub(crate) fn distance_to_segment(p: Point, a: Point, b: Point) -> (f64, f64) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let l2 = dx * dx + dy * dy;
    if l2 == 0.0 {
        return (p.distance_to(&a), 0.0);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / l2).clamp(0.0, 1.0);
    (p.distance_to(&a.lerp(&b, t)), t)
}
