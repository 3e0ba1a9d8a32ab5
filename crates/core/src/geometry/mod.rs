//! Vector geometry primitives
//!
//! - [`Point`] / [`PointSet`]: attributed locations in a shared CRS
//! - [`Polygon`]: validated rings with area and containment
//! - [`Zone`] / [`ZonePartition`]: keyed polygons for aggregation
//! - [`BoundingExtent`]: axis-aligned box

mod extent;
mod point;
mod polygon;
mod zone;

pub use extent::{bounding_extent, BoundingExtent};
pub use point::{AttributeValue, Point, PointSet};
pub use polygon::{area, contains, signed_ring_area, Containment, Polygon};
pub use zone::{Zone, ZonePartition};
