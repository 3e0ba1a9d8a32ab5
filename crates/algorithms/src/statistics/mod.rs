//! Statistical aggregation and smoothing
//!
//! - **reducer**: how a group of values collapses to one
//! - **zonal**: point-in-polygon aggregation per zone
//! - **focal**: moving window smoothing and gap filling

pub mod focal;
pub mod reducer;
pub mod zonal;

pub use focal::{focal_smooth, FocalParams, FocalSmooth, PadMode};
pub use reducer::Reducer;
pub use zonal::{aggregate, zone_density, ZonalResult};
