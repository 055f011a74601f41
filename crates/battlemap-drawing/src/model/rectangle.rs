use std::io::{BufRead, Write};

use battlemap_core::{BoundingRect, Point, SerializationError, ShapeError};

use super::{ShapeGeometry, ShapePayload};
use crate::serialization::{MapDataReader, MapDataWriter};

/// Rectangle outline given by two opposite corners. The eraser removes the
/// whole rectangle once it touches the outline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RectangleShape {
    anchor: Point,
    corner: Point,
    anchored: bool,
    erased: bool,
}

impl RectangleShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_corners(anchor: Point, corner: Point) -> Self {
        Self {
            anchor,
            corner,
            anchored: true,
            erased: false,
        }
    }

    pub fn is_erased(&self) -> bool {
        self.erased
    }

    fn rect(&self) -> BoundingRect {
        BoundingRect::from_corners(self.anchor, self.corner)
    }
}

impl ShapeGeometry for RectangleShape {
    fn bounds(&self) -> BoundingRect {
        if !self.anchored {
            return BoundingRect::empty();
        }
        self.rect()
    }

    fn contains_point(&self, p: Point, tolerance: f64) -> bool {
        self.anchored && !self.erased && self.rect().outline_distance_to(p) <= tolerance
    }

    fn add_point(&mut self, p: Point) -> Result<(), ShapeError> {
        if !self.anchored {
            self.anchor = p;
            self.anchored = true;
        }
        self.corner = p;
        Ok(())
    }

    fn erase(&mut self, center: Point, radius: f64) {
        if self.anchored && self.rect().outline_distance_to(center) <= radius {
            self.erased = true;
        }
    }

    fn is_valid(&self) -> bool {
        self.anchored && !self.erased && self.anchor != self.corner
    }

    fn needs_optimization(&self) -> bool {
        false
    }

    fn remove_erased_points(&self) -> Vec<Self> {
        if self.erased {
            Vec::new()
        } else {
            vec![self.clone()]
        }
    }

    fn translated(&self, delta: Point) -> Self {
        RectangleShape {
            anchor: self.anchor.translated(delta),
            corner: self.corner.translated(delta),
            ..self.clone()
        }
    }
}

impl ShapePayload for RectangleShape {
    fn write_payload<W: Write>(
        &self,
        out: &mut MapDataWriter<W>,
    ) -> Result<(), SerializationError> {
        out.write_float(self.anchor.x)?;
        out.write_float(self.anchor.y)?;
        out.write_float(self.corner.x)?;
        out.write_float(self.corner.y)
    }

    fn read_payload<R: BufRead>(input: &mut MapDataReader<R>) -> Result<Self, SerializationError> {
        let anchor = Point::new(input.read_float()?, input.read_float()?);
        let corner = Point::new(input.read_float()?, input.read_float()?);
        Ok(RectangleShape::from_corners(anchor, corner))
    }
}
