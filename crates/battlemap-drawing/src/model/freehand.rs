use std::io::{BufRead, Write};

use battlemap_core::{BoundingRect, Point, SerializationError, ShapeError};

use super::{distance_to_segment, ShapeGeometry, ShapePayload};
use crate::serialization::{MapDataReader, MapDataWriter};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub point: Point,
    pub erased: bool,
}

impl PathPoint {
    pub fn new(point: Point) -> Self {
        Self {
            point,
            erased: false,
        }
    }
}

/// A freehand stroke: an ordered run of points, each of which can be erased
/// independently.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FreehandPath {
    points: Vec<PathPoint>,
}

impl FreehandPath {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: &[Point]) -> Self {
        Self {
            points: points.iter().copied().map(PathPoint::new).collect(),
        }
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn surviving_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().filter(|p| !p.erased).map(|p| p.point)
    }

    fn surviving_count(&self) -> usize {
        self.points.iter().filter(|p| !p.erased).count()
    }
}

impl ShapeGeometry for FreehandPath {
    fn bounds(&self) -> BoundingRect {
        BoundingRect::from_points(self.points.iter().map(|p| &p.point))
    }

    fn contains_point(&self, p: Point, tolerance: f64) -> bool {
        let mut previous: Option<&PathPoint> = None;
        for current in &self.points {
            if !current.erased {
                if current.point.distance_to(&p) <= tolerance {
                    return true;
                }
                if let Some(prev) = previous.filter(|prev| !prev.erased) {
                    let (dist, _) = distance_to_segment(p, prev.point, current.point);
                    if dist <= tolerance {
                        return true;
                    }
                }
            }
            previous = Some(current);
        }
        false
    }

    fn add_point(&mut self, p: Point) -> Result<(), ShapeError> {
        self.points.push(PathPoint::new(p));
        Ok(())
    }

    fn erase(&mut self, center: Point, radius: f64) {
        for p in self.points.iter_mut() {
            if p.point.distance_to(&center) <= radius {
                p.erased = true;
            }
        }
    }

    fn is_valid(&self) -> bool {
        self.surviving_count() >= 2
    }

    fn needs_optimization(&self) -> bool {
        let erased = self.points.iter().filter(|p| p.erased).count();
        erased > 0 && erased < self.points.len()
    }

    fn remove_erased_points(&self) -> Vec<Self> {
        self.points
            .split(|p| p.erased)
            .filter(|run| run.len() >= 2)
            .map(|run| FreehandPath {
                points: run.to_vec(),
            })
            .collect()
    }

    fn translated(&self, delta: Point) -> Self {
        FreehandPath {
            points: self
                .points
                .iter()
                .map(|p| PathPoint {
                    point: p.point.translated(delta),
                    erased: p.erased,
                })
                .collect(),
        }
    }
}

impl ShapePayload for FreehandPath {
    fn write_payload<W: Write>(
        &self,
        out: &mut MapDataWriter<W>,
    ) -> Result<(), SerializationError> {
        out.start_array()?;
        for p in &self.points {
            out.write_float(p.point.x)?;
            out.write_float(p.point.y)?;
            out.write_bool(p.erased)?;
        }
        out.end_array()
    }

    fn read_payload<R: BufRead>(input: &mut MapDataReader<R>) -> Result<Self, SerializationError> {
        let mut points = Vec::new();
        let depth = input.expect_array_start()?;
        while input.has_more_array_items(depth)? {
            let x = input.read_float()?;
            let y = input.read_float()?;
            let erased = input.read_bool()?;
            points.push(PathPoint {
                point: Point::new(x, y),
                erased,
            });
        }
        input.expect_array_end()?;
        Ok(FreehandPath { points })
    }
}
