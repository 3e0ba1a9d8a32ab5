//! Raster binning of point data
//!
//! - **rasterize**: bin points into grid cells and reduce an attribute
//! - **threshold**: binary masks from a continuous layer

mod rasterize;
mod threshold;

pub use rasterize::rasterize;
pub use threshold::{threshold, threshold_with, Comparison, ThresholdParams, MASK_NODATA};
