use std::io::{BufRead, Write};

use battlemap_core::{BoundingRect, Point, SerializationError, ShapeError};

use super::{distance_to_segment, ShapeGeometry, ShapePayload};
use crate::serialization::{MapDataReader, MapDataWriter};

/// Parameter spans shorter than this are treated as empty.
const SPAN_EPSILON: f64 = 1e-9;

/// A straight segment. Erasure is tracked as sorted, disjoint spans of the
/// segment parameter `t` in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StraightLine {
    start: Point,
    end: Point,
    anchored: bool,
    erased_spans: Vec<(f64, f64)>,
}

impl StraightLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn between(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            anchored: true,
            erased_spans: Vec::new(),
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn erased_spans(&self) -> &[(f64, f64)] {
        &self.erased_spans
    }

    fn add_erased_span(&mut self, t0: f64, t1: f64) {
        self.erased_spans.push((t0, t1));
        self.erased_spans.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut merged: Vec<(f64, f64)> = Vec::with_capacity(self.erased_spans.len());
        for &(s, e) in &self.erased_spans {
            match merged.last_mut() {
                Some(last) if s <= last.1 + SPAN_EPSILON => last.1 = last.1.max(e),
                _ => merged.push((s, e)),
            }
        }
        self.erased_spans = merged;
    }

    /// Complement of the erased spans within `[0, 1]`.
    fn surviving_spans(&self) -> Vec<(f64, f64)> {
        let mut spans = Vec::new();
        let mut cursor = 0.0;
        for &(s, e) in &self.erased_spans {
            if s - cursor > SPAN_EPSILON {
                spans.push((cursor, s));
            }
            cursor = cursor.max(e);
        }
        if 1.0 - cursor > SPAN_EPSILON {
            spans.push((cursor, 1.0));
        }
        spans
    }

    fn is_erased_at(&self, t: f64) -> bool {
        self.erased_spans.iter().any(|&(s, e)| t >= s && t <= e)
    }
}

impl ShapeGeometry for StraightLine {
    fn bounds(&self) -> BoundingRect {
        if !self.anchored {
            return BoundingRect::empty();
        }
        BoundingRect::from_corners(self.start, self.end)
    }

    fn contains_point(&self, p: Point, tolerance: f64) -> bool {
        if !self.anchored {
            return false;
        }
        let (dist, t) = distance_to_segment(p, self.start, self.end);
        dist <= tolerance && !self.is_erased_at(t)
    }

    fn add_point(&mut self, p: Point) -> Result<(), ShapeError> {
        if self.anchored {
            self.end = p;
        } else {
            self.start = p;
            self.end = p;
            self.anchored = true;
        }
        Ok(())
    }

    fn erase(&mut self, center: Point, radius: f64) {
        if !self.anchored {
            return;
        }
        let d = self.end - self.start;
        let f = self.start - center;
        let a = d.x * d.x + d.y * d.y;
        if a == 0.0 {
            if self.start.distance_to(&center) <= radius {
                self.add_erased_span(0.0, 1.0);
            }
            return;
        }
        let b = 2.0 * (f.x * d.x + f.y * d.y);
        let c = f.x * f.x + f.y * f.y - radius * radius;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return;
        }
        let root = discriminant.sqrt();
        let t0 = ((-b - root) / (2.0 * a)).max(0.0);
        let t1 = ((-b + root) / (2.0 * a)).min(1.0);
        // A tangent touch erases nothing.
        if t1 - t0 > SPAN_EPSILON {
            self.add_erased_span(t0, t1);
        }
    }

    fn is_valid(&self) -> bool {
        self.anchored && self.length() > 0.0 && !self.surviving_spans().is_empty()
    }

    fn needs_optimization(&self) -> bool {
        !self.erased_spans.is_empty() && !self.surviving_spans().is_empty()
    }

    fn remove_erased_points(&self) -> Vec<Self> {
        self.surviving_spans()
            .into_iter()
            .map(|(s, e)| {
                StraightLine::between(self.start.lerp(&self.end, s), self.start.lerp(&self.end, e))
            })
            .collect()
    }

    fn translated(&self, delta: Point) -> Self {
        StraightLine {
            start: self.start.translated(delta),
            end: self.end.translated(delta),
            anchored: self.anchored,
            erased_spans: self.erased_spans.clone(),
        }
    }
}

impl ShapePayload for StraightLine {
    fn write_payload<W: Write>(
        &self,
        out: &mut MapDataWriter<W>,
    ) -> Result<(), SerializationError> {
        out.write_float(self.start.x)?;
        out.write_float(self.start.y)?;
        out.write_float(self.end.x)?;
        out.write_float(self.end.y)?;
        out.start_array()?;
        for &(s, e) in &self.erased_spans {
            out.write_float(s)?;
            out.write_float(e)?;
        }
        out.end_array()
    }

    fn read_payload<R: BufRead>(input: &mut MapDataReader<R>) -> Result<Self, SerializationError> {
        let start = Point::new(input.read_float()?, input.read_float()?);
        let end = Point::new(input.read_float()?, input.read_float()?);
        let mut line = StraightLine::between(start, end);
        let depth = input.expect_array_start()?;
        while input.has_more_array_items(depth)? {
            let s = input.read_float()?;
            let e = input.read_float()?;
            line.erased_spans.push((s, e));
        }
        input.expect_array_end()?;
        Ok(line)
    }
}
