//! Validated polygons: area and point containment
//!
//! Rings are validated once at construction, so measurements on a
//! [`Polygon`] never fail.

use crate::error::{Error, Result};
use crate::geometry::{BoundingExtent, Point};
use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::line_intersection::line_intersection;
use geo::{Area, BoundingRect, Coord, Euclidean, Length, Line, LineString};

/// Where a location lies relative to a polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    Inside,
    OnBoundary,
    Outside,
}

/// A simple polygon with optional holes.
///
/// Every ring is closed, has at least 3 distinct vertices, non-zero area,
/// finite coordinates and no properly crossing edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    inner: geo::Polygon<f64>,
    extent: BoundingExtent,
}

impl Polygon {
    /// Build a polygon from an exterior ring and hole rings.
    ///
    /// Rings must be explicitly closed (first vertex repeated last).
    pub fn new(exterior: LineString<f64>, holes: Vec<LineString<f64>>) -> Result<Self> {
        validate_ring(&exterior.0, "exterior ring")?;
        for (i, hole) in holes.iter().enumerate() {
            validate_ring(&hole.0, &format!("hole ring {}", i))?;
        }
        let inner = geo::Polygon::new(exterior, holes);
        let rect = inner
            .bounding_rect()
            .ok_or(Error::EmptyInput { what: "exterior ring" })?;
        let extent = BoundingExtent::from_rect(rect)?;
        Ok(Self { inner, extent })
    }

    /// Build a polygon with no holes from `(x, y)` vertices
    pub fn from_vertices(vertices: &[(f64, f64)]) -> Result<Self> {
        Self::new(LineString::from(vertices.to_vec()), vec![])
    }

    pub fn exterior(&self) -> &[Coord<f64>] {
        &self.inner.exterior().0
    }

    pub fn holes(&self) -> impl Iterator<Item = &[Coord<f64>]> {
        self.inner.interiors().iter().map(|ring| ring.0.as_slice())
    }

    pub fn as_geo(&self) -> &geo::Polygon<f64> {
        &self.inner
    }

    pub fn bounding_extent(&self) -> BoundingExtent {
        self.extent
    }

    /// Planar area: exterior minus holes
    pub fn area(&self) -> f64 {
        self.inner.unsigned_area()
    }

    /// Total length of exterior and hole rings
    pub fn perimeter(&self) -> f64 {
        let holes: f64 = self.inner.interiors().iter().map(|r| Euclidean.length(r)).sum();
        Euclidean.length(self.inner.exterior()) + holes
    }

    /// Classify (x, y) as inside, on the boundary, or outside.
    ///
    /// Points on a hole's edge are on the boundary; points inside a hole are
    /// outside.
    pub fn locate(&self, x: f64, y: f64) -> Containment {
        if !self.extent.contains(x, y) {
            return Containment::Outside;
        }
        match self.inner.coordinate_position(&Coord { x, y }) {
            CoordPos::Inside => Containment::Inside,
            CoordPos::OnBoundary => Containment::OnBoundary,
            CoordPos::Outside => Containment::Outside,
        }
    }

    /// Boundary-inclusive containment
    pub fn contains_xy(&self, x: f64, y: f64) -> bool {
        self.locate(x, y) != Containment::Outside
    }
}

/// Planar area of a polygon (exterior minus holes)
pub fn area(polygon: &Polygon) -> f64 {
    polygon.area()
}

/// Whether `point` lies inside `polygon` or on its boundary
pub fn contains(polygon: &Polygon, point: &Point) -> bool {
    polygon.contains_xy(point.x(), point.y())
}

/// Signed shoelace area of a closed ring.
///
/// Positive for counter-clockwise rings. Reversing the ring flips the sign;
/// starting the ring at another vertex leaves it unchanged.
pub fn signed_ring_area(ring: &[Coord<f64>]) -> Result<f64> {
    check_closed(ring, "ring")?;
    Ok(ring_area(ring))
}

// geo only measures rings through a polygon; a bare LineString has no area
fn ring_area(ring: &[Coord<f64>]) -> f64 {
    geo::Polygon::new(LineString::new(ring.to_vec()), vec![]).signed_area()
}

fn check_closed(ring: &[Coord<f64>], label: &str) -> Result<()> {
    if ring.len() < 4 {
        return Err(Error::InvalidGeometry(format!(
            "{} has {} vertices, at least 3 required",
            label,
            ring.len().saturating_sub(1)
        )));
    }
    if ring.first() != ring.last() {
        return Err(Error::InvalidGeometry(format!("{} is not closed", label)));
    }
    Ok(())
}

fn validate_ring(ring: &[Coord<f64>], label: &str) -> Result<()> {
    check_closed(ring, label)?;

    if ring.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(Error::InvalidGeometry(format!("{} has non-finite coordinates", label)));
    }

    let mut distinct = ring[..ring.len() - 1].to_vec();
    distinct.dedup();
    if distinct.len() < 3 {
        return Err(Error::InvalidGeometry(format!(
            "{} has fewer than 3 distinct vertices",
            label
        )));
    }

    if ring_area(ring) == 0.0 {
        return Err(Error::InvalidGeometry(format!("{} has zero area", label)));
    }

    if let Some((i, j)) = first_crossing(ring) {
        return Err(Error::InvalidGeometry(format!(
            "{} is self-intersecting (edges {} and {})",
            label, i, j
        )));
    }

    Ok(())
}

/// First pair of non-adjacent edges that properly cross each other
fn first_crossing(ring: &[Coord<f64>]) -> Option<(usize, usize)> {
    let n = ring.len() - 1;
    for i in 0..n {
        for j in (i + 2)..n {
            // The first and last edges share the closing vertex
            if i == 0 && j == n - 1 {
                continue;
            }
            let a = Line::new(ring[i], ring[i + 1]);
            let b = Line::new(ring[j], ring[j + 1]);
            if line_intersection(a, b).is_some_and(|hit| hit.is_proper()) {
                return Some((i, j));
            }
        }
    }
    None
}
