//! Spatial interpolation onto raster grids
//!
//! Interpolate a numeric point attribute onto the cell centres of a grid:
//! - IDW: Inverse Distance Weighting, global or local
//! - Nearest: value of the closest sample (raster Voronoi)

mod idw;
mod nearest;

pub use idw::{idw_interpolate, idw_samples, IdwInterpolation, IdwParams};
pub use nearest::{nearest_interpolate, nearest_samples, NearestParams};

use crate::kdtree::KdTree;
use geopattern_core::{Error, PointSet, Result, CRS};
use tracing::debug;

/// A sample location with a numeric value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

impl SamplePoint {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }

    /// Squared Euclidean distance to (x, y)
    #[inline]
    pub fn dist_sq(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy
    }
}

/// Samples of one attribute, in point-set order, indexed for neighbour search
#[derive(Debug, Clone)]
pub struct SampleSet {
    samples: Vec<SamplePoint>,
    crs: CRS,
    index: KdTree,
}

impl SampleSet {
    /// Samples from `points` carrying a numeric `attribute`.
    ///
    /// Points with a missing or non-numeric value are left out.
    ///
    /// # Errors
    /// [`Error::EmptyInput`] if no point has a numeric value.
    pub fn from_points(points: &PointSet, attribute: &str) -> Result<Self> {
        let samples: Vec<SamplePoint> = points
            .iter()
            .filter_map(|p| p.numeric(attribute).map(|v| SamplePoint::new(p.x(), p.y(), v)))
            .collect();

        let skipped = points.len() - samples.len();
        if skipped > 0 {
            debug!(attribute, skipped, "points without a numeric value left out of samples");
        }

        Self::new(samples, points.crs().clone())
    }

    /// Build from explicit samples.
    ///
    /// # Errors
    /// - [`Error::EmptyInput`] for no samples
    /// - [`Error::InvalidParameter`] for a non-finite coordinate or value
    pub fn new(samples: Vec<SamplePoint>, crs: CRS) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::EmptyInput { what: "numeric samples" });
        }
        if let Some(s) = samples
            .iter()
            .find(|s| !(s.x.is_finite() && s.y.is_finite() && s.value.is_finite()))
        {
            return Err(Error::invalid_parameter(
                "samples",
                format!("({}, {}) = {}", s.x, s.y, s.value),
                "sample coordinates and values must be finite",
            ));
        }

        let index = KdTree::build(samples.iter().map(|s| (s.x, s.y)));
        Ok(Self { samples, crs, index })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[SamplePoint] {
        &self.samples
    }

    pub fn crs(&self) -> &CRS {
        &self.crs
    }

    pub(crate) fn index(&self) -> &KdTree {
        &self.index
    }
}
