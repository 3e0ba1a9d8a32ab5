//! Nearest-sample interpolation
//!
//! Each cell takes the value of the sample closest to its centre: the
//! raster counterpart of a Voronoi diagram.

use serde::{Deserialize, Serialize};
use crate::maybe_rayon::*;
use geopattern_core::raster::{Grid, RasterLayer};
use geopattern_core::{Error, PointSet, Result};

use super::SampleSet;

/// Parameters for nearest-sample interpolation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NearestParams {
    /// Cells farther than this from every sample are no data.
    /// `None` means no limit.
    pub max_radius: Option<f64>,
}

/// Interpolate a numeric point attribute by nearest sample.
///
/// Equidistant samples resolve to the lowest input index.
pub fn nearest_interpolate(
    points: &PointSet,
    attribute: &str,
    grid: &Grid,
    params: NearestParams,
) -> Result<RasterLayer> {
    grid.crs().ensure_compatible(points.crs())?;
    let samples = SampleSet::from_points(points, attribute)?;
    nearest_samples(&samples, grid, &params)
}

/// Nearest-sample interpolation from an already extracted [`SampleSet`]
pub fn nearest_samples(samples: &SampleSet, grid: &Grid, params: &NearestParams) -> Result<RasterLayer> {
    if let Some(r) = params.max_radius {
        if !(r.is_finite() && r > 0.0) {
            return Err(Error::invalid_parameter("max_radius", r, "must be finite and > 0"));
        }
    }
    grid.crs().ensure_compatible(samples.crs())?;

    let limit_sq = params.max_radius.map_or(f64::INFINITY, |r| r * r);
    let (rows, cols) = grid.shape();
    let index = samples.index();
    let values = samples.samples();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                let (cx, cy) = grid.cell_center(row, col);
                if let Some(n) = index.nearest(cx, cy) {
                    if n.distance_sq <= limit_sq {
                        *out = values[n.index].value;
                    }
                }
            }
            row_data
        })
        .collect();

    let mut output = RasterLayer::from_vec(grid.clone(), data)?;
    output.set_nodata(Some(f64::NAN));
    Ok(output)
}
