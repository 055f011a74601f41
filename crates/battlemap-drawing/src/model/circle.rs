use std::io::{BufRead, Write};

use battlemap_core::{BoundingRect, Point, SerializationError, ShapeError};

use super::{ShapeGeometry, ShapePayload};
use crate::serialization::{MapDataReader, MapDataWriter};

/// Circle outline. The first point placed is the center; later points set
/// the radius.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CircleShape {
    center: Point,
    radius: f64,
    anchored: bool,
    erased: bool,
}

impl CircleShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_radius(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius,
            anchored: true,
            erased: false,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn is_erased(&self) -> bool {
        self.erased
    }

    fn outline_distance_to(&self, p: Point) -> f64 {
        (p.distance_to(&self.center) - self.radius).abs()
    }
}

impl ShapeGeometry for CircleShape {
    fn bounds(&self) -> BoundingRect {
        if !self.anchored {
            return BoundingRect::empty();
        }
        BoundingRect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        )
    }

    fn contains_point(&self, p: Point, tolerance: f64) -> bool {
        self.anchored && !self.erased && self.outline_distance_to(p) <= tolerance
    }

    fn add_point(&mut self, p: Point) -> Result<(), ShapeError> {
        if self.anchored {
            self.radius = self.center.distance_to(&p);
        } else {
            self.center = p;
            self.radius = 0.0;
            self.anchored = true;
        }
        Ok(())
    }

    fn erase(&mut self, center: Point, radius: f64) {
        if self.anchored && self.outline_distance_to(center) <= radius {
            self.erased = true;
        }
    }

    fn is_valid(&self) -> bool {
        self.anchored && !self.erased && self.radius > 0.0
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
        CircleShape {
            center: self.center.translated(delta),
            ..self.clone()
        }
    }
}

impl ShapePayload for CircleShape {
    fn write_payload<W: Write>(
        &self,
        out: &mut MapDataWriter<W>,
    ) -> Result<(), SerializationError> {
        out.write_float(self.center.x)?;
        out.write_float(self.center.y)?;
        out.write_float(self.radius)
    }

    fn read_payload<R: BufRead>(input: &mut MapDataReader<R>) -> Result<Self, SerializationError> {
        let center = Point::new(input.read_float()?, input.read_float()?);
        let radius = input.read_float()?;
        Ok(CircleShape::with_radius(center, radius))
    }
}
