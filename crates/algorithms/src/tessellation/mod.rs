//! Tessellation of point sets
//!
//! - **voronoi**: nearest-generator cells clipped to an extent
//! - **clip**: Sutherland-Hodgman half-plane clipping used to build cells

pub mod clip;
mod voronoi;

pub use clip::{clip_convex, HalfPlane};
pub use voronoi::{voronoi, Voronoi, VoronoiCell, VoronoiDiagram};
