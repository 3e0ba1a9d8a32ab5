//! Attributed points and point sets

use crate::crs::CRS;
use crate::error::{Error, Result};
use geo::Coord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl AttributeValue {
    /// Numeric view of the value. Only finite `Int` and `Float` qualify.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Int(v) => Some(*v as f64),
            AttributeValue::Float(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        AttributeValue::Int(v as i64)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::String(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::String(v)
    }
}

/// A location with an open set of attributes.
///
/// Coordinates are interpreted in the CRS of the [`PointSet`] that owns the
/// point. Points are immutable once built; attributes are attached with
/// [`Point::with_attribute`].
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
    attributes: HashMap<String, AttributeValue>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            attributes: HashMap::new(),
        }
    }

    /// Attach an attribute, consuming the point
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn coord(&self) -> Coord<f64> {
        Coord { x: self.x, y: self.y }
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Numeric value of an attribute, `None` when missing or non-numeric
    pub fn numeric(&self, key: &str) -> Option<f64> {
        self.attributes.get(key).and_then(AttributeValue::as_f64)
    }

    pub fn attributes(&self) -> &HashMap<String, AttributeValue> {
        &self.attributes
    }

    /// Squared planar distance to (x, y)
    #[inline]
    pub fn dist_sq(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy
    }
}

/// Ordered collection of points sharing one CRS.
///
/// Point indices (position in the set) are stable and are what distance
/// matrices, rankings and Voronoi cells refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    points: Vec<Point>,
    crs: CRS,
}

impl PointSet {
    /// Build a point set, rejecting non-finite coordinates
    pub fn new(points: Vec<Point>, crs: CRS) -> Result<Self> {
        for (i, p) in points.iter().enumerate() {
            check_finite(i, p)?;
        }
        Ok(Self { points, crs })
    }

    pub fn empty(crs: CRS) -> Self {
        Self {
            points: Vec::new(),
            crs,
        }
    }

    pub fn push(&mut self, point: Point) -> Result<()> {
        check_finite(self.points.len(), &point)?;
        self.points.push(point);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    pub fn crs(&self) -> &CRS {
        &self.crs
    }

    /// Coordinates in point order
    pub fn coords(&self) -> Vec<Coord<f64>> {
        self.points.iter().map(Point::coord).collect()
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

fn check_finite(index: usize, p: &Point) -> Result<()> {
    if p.x.is_finite() && p.y.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidGeometry(format!(
            "point {} has non-finite coordinates ({}, {})",
            index, p.x, p.y
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_attributes() {
        let p = Point::new(530_000.0, 180_000.0)
            .with_attribute("nbikes", 12)
            .with_attribute("name", "Waterloo");

        assert_eq!(p.numeric("nbikes"), Some(12.0));
        assert_eq!(p.numeric("name"), None);
        assert_eq!(p.numeric("missing"), None);
        assert_eq!(p.attribute("name").and_then(|v| v.as_str()), Some("Waterloo"));
    }

    #[test]
    fn test_nan_float_is_not_numeric() {
        let p = Point::new(0.0, 0.0).with_attribute("v", f64::NAN);
        assert_eq!(p.numeric("v"), None);
    }

    #[test]
    fn test_point_set_rejects_non_finite() {
        let result = PointSet::new(
            vec![Point::new(0.0, 0.0), Point::new(f64::INFINITY, 1.0)],
            CRS::british_national_grid(),
        );
        assert!(matches!(result, Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn test_point_set_order_is_stable() {
        let mut set = PointSet::empty(CRS::british_national_grid());
        set.push(Point::new(3.0, 4.0)).unwrap();
        set.push(Point::new(1.0, 2.0)).unwrap();

        let xs: Vec<f64> = set.iter().map(|p| p.x()).collect();
        assert_eq!(xs, vec![3.0, 1.0]);
        assert_eq!(set.get(1).unwrap().dist_sq(1.0, 2.0), 0.0);
    }
}
