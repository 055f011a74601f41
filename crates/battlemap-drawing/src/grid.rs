//! Map grid configuration and snapping.

use std::io::{BufRead, Write};

use battlemap_core::{Point, SerializationError};

use crate::model::{colors, Color};
use crate::serialization::{MapDataReader, MapDataWriter};

/// Vertical distance between hex rows, per unit of spacing.
const HEX_ROW_FACTOR: f64 = 0.866_025_403_784_438_6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKind {
    Square,
    Hex,
}

impl GridKind {
    fn tag(self) -> &'static str {
        match self {
            GridKind::Square => "square",
            GridKind::Hex => "hex",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "square" => Some(GridKind::Square),
            "hex" => Some(GridKind::Hex),
            _ => None,
        }
    }
}

/// Grid drawn over the background layer.
///
/// `spacing` is the world-space distance between neighbouring cell
/// centers; `offset` shifts the whole lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub kind: GridKind,
    pub spacing: f64,
    pub offset: Point,
    pub color: Color,
    pub background_color: Color,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            kind: GridKind::Square,
            spacing: 1.0,
            offset: Point::ORIGIN,
            color: colors::GRAY,
            background_color: colors::WHITE,
        }
    }
}

impl Grid {
    pub fn square(spacing: f64) -> Self {
        Self {
            spacing,
            ..Self::default()
        }
    }

    pub fn hex(spacing: f64) -> Self {
        Self {
            kind: GridKind::Hex,
            spacing,
            ..Self::default()
        }
    }

    /// Nearest lattice point to `p` on a grid subdivided to `fraction` of a
    /// cell (1.0 snaps to whole cells, 0.5 to half cells). A non-positive
    /// fraction or spacing disables snapping.
    pub fn nearest_snap_point(&self, p: Point, fraction: f64) -> Point {
        let step = self.spacing * fraction;
        if !(step > 0.0) || !step.is_finite() {
            return p;
        }
        let local = p - self.offset;
        let snapped = match self.kind {
            GridKind::Square => Point::new(
                (local.x / step).round() * step,
                (local.y / step).round() * step,
            ),
            GridKind::Hex => nearest_hex_center(local, step),
        };
        snapped + self.offset
    }

    pub fn serialize<W: Write>(&self, out: &mut MapDataWriter<W>) -> Result<(), SerializationError> {
        out.start_object()?;
        out.write_string(self.kind.tag())?;
        out.write_float(self.spacing)?;
        out.write_float(self.offset.x)?;
        out.write_float(self.offset.y)?;
        out.write_int(i64::from(self.color))?;
        out.write_int(i64::from(self.background_color))?;
        out.end_object()
    }

    pub fn deserialize<R: BufRead>(input: &mut MapDataReader<R>) -> Result<Self, SerializationError> {
        input.expect_object_start()?;
        let tag = input.read_string()?;
        let kind = GridKind::from_tag(&tag).ok_or(SerializationError::PrimitiveParse {
            kind: "grid kind",
            token: tag,
        })?;
        let spacing = input.read_float()?;
        let offset = Point::new(input.read_float()?, input.read_float()?);
        let color = read_color(input)?;
        let background_color = read_color(input)?;
        input.expect_object_end()?;
        Ok(Self {
            kind,
            spacing,
            offset,
            color,
            background_color,
        })
    }
}

fn read_color<R: BufRead>(input: &mut MapDataReader<R>) -> Result<Color, SerializationError> {
    let raw = input.read_int()?;
    Color::try_from(raw).map_err(|_| SerializationError::PrimitiveParse {
        kind: "color",
        token: raw.to_string(),
    })
}

/// Rows run horizontally, `step * HEX_ROW_FACTOR` apart; odd rows are
/// shifted half a step.
fn nearest_hex_center(p: Point, step: f64) -> Point {
    let row_height = step * HEX_ROW_FACTOR;
    let approx_row = (p.y / row_height).round() as i64;

    (approx_row - 1..=approx_row + 1)
        .map(|row| {
            let shift = if row.rem_euclid(2) == 1 { step / 2.0 } else { 0.0 };
            let x = ((p.x - shift) / step).round() * step + shift;
            Point::new(x, row as f64 * row_height)
        })
        .min_by(|a, b| a.distance_to(&p).total_cmp(&b.distance_to(&p)))
        .unwrap_or(p)
}
