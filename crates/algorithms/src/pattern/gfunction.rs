//! Nearest-neighbour distribution function (G function)
//!
//! The empirical G function is the cumulative distribution of
//! nearest-neighbour distances. Compared against its expectation under
//! complete spatial randomness (CSR) it separates clustered patterns
//! (G rises faster than CSR) from dispersed ones (G rises slower).

use std::f64::consts::PI;
use std::iter::FusedIterator;

use geopattern_core::{BoundingExtent, Error, PointSet, Result};

/// Empirical G function, yielded lazily as `(distance, proportion)`.
///
/// One item per distinct nearest-neighbour distance, in ascending order;
/// `proportion` is the share of points whose nearest-neighbour distance is
/// at most `distance`. Proportions never decrease and the last one is 1.0.
///
/// Cloning the iterator restarts from its current position, so a fresh
/// clone of the value returned by [`empirical_g_function`] replays the
/// whole curve.
#[derive(Debug, Clone)]
pub struct GFunction {
    sorted: Vec<f64>,
    pos: usize,
}

impl GFunction {
    /// Number of points behind the curve
    pub fn point_count(&self) -> usize {
        self.sorted.len()
    }

    /// G(d) at an arbitrary distance
    pub fn evaluate(&self, d: f64) -> f64 {
        let n = self.sorted.len();
        if n == 0 {
            return 0.0;
        }
        let at_most = self.sorted.partition_point(|&x| x <= d);
        at_most as f64 / n as f64
    }

    /// Largest absolute gap between this curve and the CSR curve for
    /// `intensity`, taken over the curve's distances.
    pub fn max_csr_deviation(&self, intensity: f64) -> f64 {
        self.clone()
            .map(|(d, g)| (g - csr_g_function(intensity, d)).abs())
            .fold(0.0, f64::max)
    }
}

impl Iterator for GFunction {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let d = *self.sorted.get(self.pos)?;
        let mut end = self.pos + 1;
        while end < self.sorted.len() && self.sorted[end] == d {
            end += 1;
        }
        self.pos = end;
        Some((d, end as f64 / self.sorted.len() as f64))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sorted.len() - self.pos;
        (usize::from(remaining > 0), Some(remaining))
    }
}

impl FusedIterator for GFunction {}

/// Build the empirical G function of a set of nearest-neighbour distances.
///
/// # Errors
/// - [`Error::EmptyInput`] for an empty list
/// - [`Error::InvalidParameter`] for a negative or non-finite distance
pub fn empirical_g_function(distances: &[f64]) -> Result<GFunction> {
    if distances.is_empty() {
        return Err(Error::EmptyInput {
            what: "nearest-neighbour distances",
        });
    }
    if let Some(&bad) = distances.iter().find(|d| !d.is_finite() || **d < 0.0) {
        return Err(Error::invalid_parameter(
            "distances",
            bad,
            "nearest-neighbour distances must be finite and non-negative",
        ));
    }

    let mut sorted = distances.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(GFunction { sorted, pos: 0 })
}

/// Theoretical G under CSR: `1 - exp(-λπd²)` for intensity `λ`
pub fn csr_g_function(intensity: f64, d: f64) -> f64 {
    1.0 - (-intensity * PI * d * d).exp()
}

/// Points per unit area of `extent`.
///
/// Fails with [`Error::InvalidGeometry`] for an extent of zero area.
pub fn point_intensity(points: &PointSet, extent: &BoundingExtent) -> Result<f64> {
    let area = extent.area();
    if area <= 0.0 {
        return Err(Error::InvalidGeometry(format!(
            "intensity needs an extent with positive area, got {}",
            area
        )));
    }
    Ok(points.len() as f64 / area)
}

/// Clark-Evans aggregation index `R`.
///
/// Observed mean nearest-neighbour distance over its CSR expectation
/// `1 / (2√λ)`. `R < 1` suggests clustering, `R > 1` dispersion.
pub fn clark_evans_ratio(distances: &[f64], intensity: f64) -> Result<f64> {
    if distances.is_empty() {
        return Err(Error::EmptyInput {
            what: "nearest-neighbour distances",
        });
    }
    if !(intensity.is_finite() && intensity > 0.0) {
        return Err(Error::invalid_parameter(
            "intensity",
            intensity,
            "must be finite and > 0",
        ));
    }
    let observed = distances.iter().sum::<f64>() / distances.len() as f64;
    let expected = 0.5 / intensity.sqrt();
    Ok(observed / expected)
}
