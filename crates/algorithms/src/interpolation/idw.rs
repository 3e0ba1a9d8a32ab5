//! Inverse Distance Weighting (IDW) interpolation
//!
//! Estimates values at unknown locations as a weighted average of nearby
//! sample points, where weights are inversely proportional to distance
//! raised to a power parameter.
//!
//! Reference:
//! Shepard, D. (1968). A two-dimensional interpolation function for
//! irregularly-spaced data. ACM National Conference.

use serde::{Deserialize, Serialize};
use crate::kdtree::Neighbor;
use crate::maybe_rayon::*;
use geopattern_core::raster::{Grid, RasterLayer};
use geopattern_core::{Algorithm, Error, PointSet, Result};
use tracing::debug;

use super::{SamplePoint, SampleSet};

/// Parameters for IDW interpolation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdwParams {
    /// Power parameter (default: 2.0); finite and > 0.
    /// Higher values give more weight to nearby samples.
    pub power: f64,
    /// Maximum search radius. Samples beyond this distance are ignored.
    /// `None` means every sample is used (global IDW).
    pub max_radius: Option<f64>,
    /// Maximum number of nearest samples to use.
    /// `None` means every sample within the radius.
    pub max_points: Option<usize>,
    /// A cell centre within this distance of a sample takes the sample's
    /// value directly. Zero snaps exact coincidences only.
    pub snap_distance: f64,
}

impl Default for IdwParams {
    fn default() -> Self {
        Self {
            power: 2.0,
            max_radius: None,
            max_points: None,
            snap_distance: 0.0,
        }
    }
}

impl IdwParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.power.is_finite() && self.power > 0.0) {
            return Err(Error::invalid_parameter("power", self.power, "must be finite and > 0"));
        }
        if let Some(r) = self.max_radius {
            if !(r.is_finite() && r > 0.0) {
                return Err(Error::invalid_parameter("max_radius", r, "must be finite and > 0"));
            }
        }
        if self.max_points == Some(0) {
            return Err(Error::invalid_parameter("max_points", 0, "must be at least 1"));
        }
        if !(self.snap_distance.is_finite() && self.snap_distance >= 0.0) {
            return Err(Error::invalid_parameter(
                "snap_distance",
                self.snap_distance,
                "must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// IDW as an [`Algorithm`] over a named attribute
#[derive(Debug, Clone)]
pub struct IdwInterpolation {
    attribute: String,
}

impl IdwInterpolation {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
        }
    }
}

impl Algorithm for IdwInterpolation {
    type Input = (PointSet, Grid);
    type Output = RasterLayer;
    type Params = IdwParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "IDW"
    }

    fn description(&self) -> &'static str {
        "Inverse distance weighted interpolation of a point attribute onto a grid"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (points, grid) = input;
        idw_interpolate(&points, &self.attribute, &grid, params)
    }
}

/// Interpolate a numeric point attribute onto the cell centres of `grid`.
///
/// # Algorithm
///
/// For each cell centre (x, y):
///
/// ```text
/// z(x,y) = Σ(wi * zi) / Σ(wi)
/// where wi = 1 / d(x,y, xi,yi)^p
/// ```
///
/// A centre within `snap_distance` of a sample takes that sample's value
/// (the first such sample in input order), so a centre on a sample always
/// reproduces it. Cells with no sample in range are no data (NaN).
///
/// # Errors
/// - [`Error::InvalidParameter`] for invalid `params`
/// - [`Error::IncompatibleExtent`] if grid and point CRS differ
/// - [`Error::EmptyInput`] if no point has a numeric `attribute`
pub fn idw_interpolate(
    points: &PointSet,
    attribute: &str,
    grid: &Grid,
    params: IdwParams,
) -> Result<RasterLayer> {
    params.validate()?;
    grid.crs().ensure_compatible(points.crs())?;
    let samples = SampleSet::from_points(points, attribute)?;
    idw_samples(&samples, grid, &params)
}

/// IDW from an already extracted [`SampleSet`]
pub fn idw_samples(samples: &SampleSet, grid: &Grid, params: &IdwParams) -> Result<RasterLayer> {
    params.validate()?;
    grid.crs().ensure_compatible(samples.crs())?;

    let (rows, cols) = grid.shape();
    debug!(
        samples = samples.len(),
        rows,
        cols,
        power = params.power,
        max_radius = ?params.max_radius,
        max_points = ?params.max_points,
        "idw interpolation"
    );

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                let (cx, cy) = grid.cell_center(row, col);
                if let Some(v) = estimate(samples, cx, cy, params) {
                    *out = v;
                }
            }
            row_data
        })
        .collect();

    let mut output = RasterLayer::from_vec(grid.clone(), data)?;
    output.set_nodata(Some(f64::NAN));
    Ok(output)
}

fn estimate(samples: &SampleSet, cx: f64, cy: f64, params: &IdwParams) -> Option<f64> {
    let values = samples.samples();
    let index = samples.index();

    if let Some(first) = index
        .within_radius(cx, cy, params.snap_distance)
        .iter()
        .min_by_key(|n| n.index)
    {
        return Some(values[first.index].value);
    }

    let half_power = 0.5 * params.power;
    match (params.max_points, params.max_radius) {
        (Some(k), radius) => {
            let limit_sq = radius.map_or(f64::INFINITY, |r| r * r);
            let near = index.k_nearest(cx, cy, k);
            weighted_mean(values, near.into_iter().filter(|n| n.distance_sq <= limit_sq), half_power)
        }
        (None, Some(r)) => weighted_mean(values, index.within_radius(cx, cy, r), half_power),
        (None, None) => {
            let all = values.iter().enumerate().map(|(i, s)| Neighbor {
                index: i,
                distance_sq: s.dist_sq(cx, cy),
            });
            weighted_mean(values, all, half_power)
        }
    }
}

/// Σ wᵢzᵢ / Σ wᵢ; `None` without neighbours.
///
/// Weights are taken relative to the nearest neighbour,
/// wᵢ = (d_min² / dᵢ²)^(p/2), so the nearest sample weighs 1 and large
/// powers cannot overflow or underflow the sum. Zero distances never reach
/// here: they are snapped first.
fn weighted_mean<I>(values: &[SamplePoint], neighbours: I, half_power: f64) -> Option<f64>
where
    I: IntoIterator<Item = Neighbor>,
    I::IntoIter: Clone,
{
    let neighbours = neighbours.into_iter();
    let nearest_sq = neighbours
        .clone()
        .map(|n| n.distance_sq)
        .fold(f64::INFINITY, f64::min);
    if !nearest_sq.is_finite() {
        return None;
    }

    let mut sum_w = 0.0;
    let mut sum_wz = 0.0;
    for n in neighbours {
        let w = (nearest_sq / n.distance_sq).powf(half_power);
        sum_w += w;
        sum_wz += w * values[n.index].value;
    }
    Some(sum_wz / sum_w)
}
