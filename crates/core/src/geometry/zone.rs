//! Keyed polygons used as aggregation containers

use crate::crs::CRS;
use crate::geometry::{AttributeValue, Polygon};
use std::collections::HashMap;

/// A named polygon with attributes, e.g. an administrative area
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    key: String,
    polygon: Polygon,
    attributes: HashMap<String, AttributeValue>,
}

impl Zone {
    pub fn new(key: impl Into<String>, polygon: Polygon) -> Self {
        Self {
            key: key.into(),
            polygon,
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }
}

/// Ordered set of zones sharing one CRS.
///
/// Zones may overlap or leave gaps; no adjacency is modelled. Zone order
/// decides the boundary tie-break during aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct ZonePartition {
    zones: Vec<Zone>,
    crs: CRS,
}

impl ZonePartition {
    pub fn new(zones: Vec<Zone>, crs: CRS) -> Self {
        Self { zones, crs }
    }

    pub fn push(&mut self, zone: Zone) {
        self.zones.push(zone);
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Zone> {
        self.zones.get(index)
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Zone> {
        self.zones.iter()
    }

    pub fn crs(&self) -> &CRS {
        &self.crs
    }
}
