//! Point-pattern statistics
//!
//! - **distance**: metrics and pairwise distance matrices
//! - **nearest**: nearest-neighbour distances and isolation ranking
//! - **gfunction**: empirical G function and its CSR expectation

mod distance;
mod gfunction;
mod nearest;

pub use distance::{distance_matrix, haversine, DistanceMatrix, Metric, EARTH_RADIUS_M};
pub use gfunction::{
    clark_evans_ratio, csr_g_function, empirical_g_function, point_intensity, GFunction,
};
pub use nearest::{
    isolation_ranking, nearest_neighbor_distances, nearest_neighbor_distances_indexed,
    nearest_neighbors,
};
