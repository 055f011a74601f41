use std::io::{BufRead, Write};

use battlemap_core::{BoundingRect, Point, SerializationError, ShapeError};

use super::{ShapeGeometry, ShapePayload};
use crate::serialization::{MapDataReader, MapDataWriter};

/// Average glyph width as a fraction of the text size.
const GLYPH_ASPECT: f64 = 0.6;

/// A text label anchored at its top-left corner.
///
/// Text is a value object: editing replaces the shape, and erasing removes it
/// whole.
#[derive(Debug, Clone, PartialEq)]
pub struct TextShape {
    text: String,
    size: f64,
    location: Point,
    erased: bool,
}

impl TextShape {
    pub fn new(text: String, size: f64, location: Point) -> Self {
        Self {
            text,
            size,
            location,
            erased: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn is_erased(&self) -> bool {
        self.erased
    }
}

impl ShapeGeometry for TextShape {
    fn bounds(&self) -> BoundingRect {
        let longest = self
            .text
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let lines = self.text.lines().count().max(1);
        BoundingRect::new(
            self.location.x,
            self.location.y,
            self.location.x + longest as f64 * self.size * GLYPH_ASPECT,
            self.location.y + lines as f64 * self.size,
        )
    }

    fn contains_point(&self, p: Point, tolerance: f64) -> bool {
        !self.erased && self.bounds().expanded(tolerance).contains(p)
    }

    fn add_point(&mut self, _p: Point) -> Result<(), ShapeError> {
        Err(ShapeError::ContractViolation {
            operation: "add_point",
            variant: "text",
        })
    }

    fn erase(&mut self, center: Point, radius: f64) {
        if self.bounds().distance_to(center) <= radius {
            self.erased = true;
        }
    }

    fn is_valid(&self) -> bool {
        !self.erased && !self.text.trim().is_empty()
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
        TextShape {
            location: self.location.translated(delta),
            ..self.clone()
        }
    }
}

impl ShapePayload for TextShape {
    fn write_payload<W: Write>(
        &self,
        out: &mut MapDataWriter<W>,
    ) -> Result<(), SerializationError> {
        out.write_string(&self.text)?;
        out.write_float(self.size)?;
        out.write_float(self.location.x)?;
        out.write_float(self.location.y)
    }

    fn read_payload<R: BufRead>(input: &mut MapDataReader<R>) -> Result<Self, SerializationError> {
        let text = input.read_string()?;
        let size = input.read_float()?;
        let location = Point::new(input.read_float()?, input.read_float()?);
        Ok(TextShape::new(text, size, location))
    }
}
