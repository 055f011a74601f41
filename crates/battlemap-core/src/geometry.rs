//! Geometry value types: points, bounding rectangles and the world/screen
//! coordinate transform.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A point (or displacement) in world or screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the point shifted by `delta`.
    pub fn translated(&self, delta: Point) -> Point {
        Point::new(self.x + delta.x, self.y + delta.y)
    }

    /// Linear interpolation between `self` (t = 0) and `other` (t = 1).
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned bounding rectangle.
///
/// The empty rectangle has `left > right`; unions with it are the identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BoundingRect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn empty() -> Self {
        Self {
            left: f64::INFINITY,
            top: f64::INFINITY,
            right: f64::NEG_INFINITY,
            bottom: f64::NEG_INFINITY,
        }
    }

    /// Smallest rectangle containing both corners, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Self {
        let mut rect = Self::empty();
        for p in points {
            rect.include_point(*p);
        }
        rect
    }

    pub fn is_empty(&self) -> bool {
        self.left > self.right || self.top > self.bottom
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.right - self.left
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.bottom - self.top
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    pub fn include_point(&mut self, p: Point) {
        self.left = self.left.min(p.x);
        self.top = self.top.min(p.y);
        self.right = self.right.max(p.x);
        self.bottom = self.bottom.max(p.y);
    }

    pub fn union(&self, other: &BoundingRect) -> BoundingRect {
        BoundingRect::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Grows the rectangle by `amount` on every side. Empty stays empty.
    pub fn expanded(&self, amount: f64) -> BoundingRect {
        if self.is_empty() {
            return *self;
        }
        BoundingRect::new(
            self.left - amount,
            self.top - amount,
            self.right + amount,
            self.bottom + amount,
        )
    }

    pub fn translated(&self, delta: Point) -> BoundingRect {
        BoundingRect::new(
            self.left + delta.x,
            self.top + delta.y,
            self.right + delta.x,
            self.bottom + delta.y,
        )
    }

    /// Distance from `p` to the closest point of the filled rectangle.
    pub fn distance_to(&self, p: Point) -> f64 {
        if self.is_empty() {
            return f64::INFINITY;
        }
        let dx = (self.left - p.x).max(0.0).max(p.x - self.right);
        let dy = (self.top - p.y).max(0.0).max(p.y - self.bottom);
        (dx * dx + dy * dy).sqrt()
    }

    /// Distance from `p` to the closest point on the rectangle's outline.
    pub fn outline_distance_to(&self, p: Point) -> f64 {
        if self.is_empty() {
            return f64::INFINITY;
        }
        if self.contains(p) {
            let to_left = p.x - self.left;
            let to_right = self.right - p.x;
            let to_top = p.y - self.top;
            let to_bottom = self.bottom - p.y;
            to_left.min(to_right).min(to_top).min(to_bottom)
        } else {
            self.distance_to(p)
        }
    }
}

impl Default for BoundingRect {
    fn default() -> Self {
        Self::empty()
    }
}

/// Converts between world coordinates and screen coordinates.
///
/// `screen = world * zoom + origin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateTransform {
    zoom: f64,
    origin: Point,
}

impl CoordinateTransform {
    pub const MIN_ZOOM: f64 = 1e-4;

    pub fn new(zoom: f64, origin: Point) -> Self {
        Self {
            zoom: zoom.max(Self::MIN_ZOOM),
            origin,
        }
    }

    pub fn identity() -> Self {
        Self::new(1.0, Point::ORIGIN)
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn world_to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.zoom + self.origin.x, p.y * self.zoom + self.origin.y)
    }

    pub fn screen_to_world(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.origin.x) / self.zoom,
            (p.y - self.origin.y) / self.zoom,
        )
    }

    pub fn world_to_screen_distance(&self, d: f64) -> f64 {
        d * self.zoom
    }

    pub fn screen_to_world_distance(&self, d: f64) -> f64 {
        d / self.zoom
    }

    /// Shifts the view by a screen-space delta.
    pub fn pan(&mut self, delta: Point) {
        self.origin = self.origin + delta;
    }

    /// Multiplies the zoom by `factor`, keeping the world point under
    /// `screen_focus` fixed on screen.
    pub fn zoom_about(&mut self, factor: f64, screen_focus: Point) {
        let world_focus = self.screen_to_world(screen_focus);
        self.zoom = (self.zoom * factor).max(Self::MIN_ZOOM);
        let moved = self.world_to_screen(world_focus);
        self.origin = self.origin + (screen_focus - moved);
    }
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self::identity()
    }
}
