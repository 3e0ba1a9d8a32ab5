//! Raster data structures

mod element;
mod grid;
mod layer;
mod neighborhood;

pub use element::RasterElement;
pub use grid::Grid;
pub use layer::{Raster, RasterLayer, RasterStatistics};
pub use neighborhood::Neighborhood;
