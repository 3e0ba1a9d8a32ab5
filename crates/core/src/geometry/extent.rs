//! Axis-aligned bounding extents

use crate::error::{Error, Result};
use crate::geometry::{Point, PointSet, Polygon};
use geo::{BoundingRect, Coord, LineString, Rect};
use serde::{Deserialize, Serialize};

/// Axis-aligned box `(xmin, ymin, xmax, ymax)`.
///
/// Always finite with `xmin <= xmax` and `ymin <= ymax`. Serialized as a
/// four-element array in that order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingExtent {
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
}

impl BoundingExtent {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Result<Self> {
        if !(xmin.is_finite() && ymin.is_finite() && xmax.is_finite() && ymax.is_finite()) {
            return Err(Error::InvalidGeometry(format!(
                "extent ({}, {}, {}, {}) is not finite",
                xmin, ymin, xmax, ymax
            )));
        }
        if xmin > xmax || ymin > ymax {
            return Err(Error::InvalidGeometry(format!(
                "extent ({}, {}, {}, {}) has min greater than max",
                xmin, ymin, xmax, ymax
            )));
        }
        Ok(Self { xmin, ymin, xmax, ymax })
    }

    /// Smallest extent covering every coordinate
    pub fn from_coords<I>(coords: I) -> Result<Self>
    where
        I: IntoIterator<Item = Coord<f64>>,
    {
        let line: LineString<f64> = coords.into_iter().collect();
        let rect = line
            .bounding_rect()
            .ok_or(Error::EmptyInput { what: "coordinates" })?;
        Self::from_rect(rect)
    }

    pub fn from_rect(rect: Rect<f64>) -> Result<Self> {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }

    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    pub fn ymin(&self) -> f64 {
        self.ymin
    }

    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    pub fn ymax(&self) -> f64 {
        self.ymax
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.xmin + self.xmax) / 2.0, (self.ymin + self.ymax) / 2.0)
    }

    /// Inclusive containment (edges count as inside)
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }

    pub fn intersects(&self, other: &BoundingExtent) -> bool {
        self.xmin <= other.xmax
            && self.xmax >= other.xmin
            && self.ymin <= other.ymax
            && self.ymax >= other.ymin
    }

    /// Grow (or shrink, for a negative margin) every side by `margin`
    pub fn expand_by(&self, margin: f64) -> Result<Self> {
        Self::new(
            self.xmin - margin,
            self.ymin - margin,
            self.xmax + margin,
            self.ymax + margin,
        )
    }

    /// Corners in counter-clockwise order starting at (xmin, ymin)
    pub fn corners(&self) -> [Coord<f64>; 4] {
        [
            Coord { x: self.xmin, y: self.ymin },
            Coord { x: self.xmax, y: self.ymin },
            Coord { x: self.xmax, y: self.ymax },
            Coord { x: self.xmin, y: self.ymax },
        ]
    }

    /// Rectangle polygon covering the extent.
    ///
    /// Fails with [`Error::InvalidGeometry`] when the extent has zero area.
    pub fn to_polygon(&self) -> Result<Polygon> {
        let mut ring: Vec<Coord<f64>> = self.corners().to_vec();
        ring.push(ring[0]);
        Polygon::new(LineString::new(ring), vec![])
    }
}

impl TryFrom<[f64; 4]> for BoundingExtent {
    type Error = Error;

    fn try_from(v: [f64; 4]) -> Result<Self> {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingExtent> for [f64; 4] {
    fn from(e: BoundingExtent) -> Self {
        [e.xmin, e.ymin, e.xmax, e.ymax]
    }
}

/// Bounding extent of a point set.
///
/// Fails with [`Error::EmptyInput`] when the set is empty.
pub fn bounding_extent(points: &PointSet) -> Result<BoundingExtent> {
    if points.is_empty() {
        return Err(Error::EmptyInput { what: "point set" });
    }
    BoundingExtent::from_coords(points.iter().map(Point::coord))
}
