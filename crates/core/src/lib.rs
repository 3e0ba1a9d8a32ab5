//! # GeoPattern Core
//!
//! Core types and traits for the GeoPattern point-pattern library.
//!
//! This crate provides:
//! - `PointSet`, `Polygon`, `ZonePartition`, `BoundingExtent`: vector primitives
//! - `Grid` and `Raster<T>`: regular grids and raster layers
//! - `CRS`: Coordinate Reference System, required on every dataset
//! - `Algorithm` trait for a consistent API
//! - `Error`: the error type shared by all GeoPattern crates

pub mod crs;
pub mod error;
pub mod geometry;
pub mod raster;

pub use crs::{CrsKind, CRS};
pub use error::{Error, Result};
pub use geometry::{
    AttributeValue, BoundingExtent, Containment, Point, PointSet, Polygon, Zone, ZonePartition,
};
pub use raster::{Grid, Neighborhood, Raster, RasterElement, RasterLayer};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::{CrsKind, CRS};
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{
        area, bounding_extent, contains, AttributeValue, BoundingExtent, Containment, Point,
        PointSet, Polygon, Zone, ZonePartition,
    };
    pub use crate::raster::{Grid, Neighborhood, Raster, RasterElement, RasterLayer};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in GeoPattern.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
