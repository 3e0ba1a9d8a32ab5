//! # GeoPattern Algorithms
//!
//! Point-pattern statistics and spatial interpolation for GeoPattern.
//!
//! ## Available Algorithm Categories
//!
//! - **statistics**: Zonal aggregation, reducers, focal smoothing
//! - **gridding**: Point-to-raster binning, threshold masks
//! - **pattern**: Distance matrices, nearest-neighbour distances, G function
//! - **tessellation**: Voronoi diagrams clipped to an extent
//! - **interpolation**: IDW, nearest sample
//!
//! Row-wise work runs on rayon with the default `parallel` feature.

pub mod gridding;
pub mod interpolation;
pub mod kdtree;
pub mod pattern;
pub mod statistics;
pub mod tessellation;

mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::gridding::{rasterize, threshold, threshold_with, Comparison, ThresholdParams};
    pub use crate::interpolation::{
        idw_interpolate, nearest_interpolate, IdwInterpolation, IdwParams, NearestParams,
        SamplePoint, SampleSet,
    };
    pub use crate::kdtree::{KdTree, Neighbor};
    pub use crate::pattern::{
        csr_g_function, distance_matrix, empirical_g_function, isolation_ranking,
        nearest_neighbor_distances, nearest_neighbor_distances_indexed, point_intensity,
        DistanceMatrix, GFunction, Metric,
    };
    pub use crate::statistics::{
        aggregate, focal_smooth, zone_density, FocalParams, FocalSmooth, PadMode, Reducer,
        ZonalResult,
    };
    pub use crate::tessellation::{voronoi, Voronoi, VoronoiCell, VoronoiDiagram};
    pub use geopattern_core::prelude::*;
}
