//! Binary classification of raster layers
//!
//! Turns a continuous layer into a 0/1 mask, e.g. "density > 12" for a
//! cluster map.

use serde::{Deserialize, Serialize};
use crate::maybe_rayon::*;
use geopattern_core::raster::{Raster, RasterLayer};
use geopattern_core::{Error, Result};

/// No-data marker of binary layers
pub const MASK_NODATA: u8 = u8::MAX;

/// Comparison applied between a cell value and the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    #[default]
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Equal,
}

impl Comparison {
    fn test(&self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Greater => value > threshold,
            Comparison::GreaterEqual => value >= threshold,
            Comparison::Less => value < threshold,
            Comparison::LessEqual => value <= threshold,
            Comparison::Equal => value == threshold,
        }
    }
}

/// Parameters for thresholding
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdParams {
    pub value: f64,
    pub comparison: Comparison,
}

/// Mask of cells strictly greater than `value`.
///
/// Cells are 1 where the test holds and 0 where it does not; no-data
/// cells stay no data ([`MASK_NODATA`]).
pub fn threshold(layer: &RasterLayer, value: f64) -> Result<Raster<u8>> {
    threshold_with(
        layer,
        ThresholdParams {
            value,
            comparison: Comparison::Greater,
        },
    )
}

/// Mask of cells passing `params.comparison` against `params.value`
pub fn threshold_with(layer: &RasterLayer, params: ThresholdParams) -> Result<Raster<u8>> {
    if params.value.is_nan() {
        return Err(Error::invalid_parameter("value", params.value, "threshold must not be NaN"));
    }

    let (rows, cols) = layer.shape();
    let data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![MASK_NODATA; cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                let v = unsafe { layer.get_unchecked(row, col) };
                if layer.is_nodata(v) {
                    continue;
                }
                *out = u8::from(params.comparison.test(v, params.value));
            }
            row_data
        })
        .collect();

    let mut mask = Raster::from_vec(layer.grid().clone(), data)?;
    mask.set_nodata(Some(MASK_NODATA));
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geopattern_core::{BoundingExtent, Grid, CRS};

    fn layer(values: Vec<f64>) -> RasterLayer {
        let extent = BoundingExtent::new(0.0, 0.0, 2.0, 2.0).unwrap();
        let grid = Grid::new(extent, 2, 2, CRS::british_national_grid()).unwrap();
        let mut r = RasterLayer::from_vec(grid, values).unwrap();
        r.set_nodata(Some(-9999.0));
        r
    }

    #[test]
    fn test_threshold_greater() {
        let mask = threshold(&layer(vec![10.0, 12.0, 13.0, f64::NAN]), 12.0).unwrap();
        assert_eq!(mask.get(0, 0).unwrap(), 0);
        assert_eq!(mask.get(0, 1).unwrap(), 0);
        assert_eq!(mask.get(1, 0).unwrap(), 1);
        assert_eq!(mask.get(1, 1).unwrap(), MASK_NODATA);
        assert!(mask.is_nodata_at(1, 1).unwrap());
    }

    #[test]
    fn test_threshold_respects_sentinel_nodata() {
        let mask = threshold(&layer(vec![-9999.0, 1.0, 2.0, 3.0]), -10_000.0).unwrap();
        assert_eq!(mask.get(0, 0).unwrap(), MASK_NODATA);
        assert_eq!(mask.get(0, 1).unwrap(), 1);
    }

    #[test]
    fn test_threshold_comparisons() {
        let l = layer(vec![1.0, 2.0, 3.0, 4.0]);
        let le = threshold_with(&l, ThresholdParams { value: 2.0, comparison: Comparison::LessEqual }).unwrap();
        assert_eq!(le.data().iter().copied().collect::<Vec<_>>(), vec![1, 1, 0, 0]);

        let eq = threshold_with(&l, ThresholdParams { value: 3.0, comparison: Comparison::Equal }).unwrap();
        assert_eq!(eq.data().iter().copied().collect::<Vec<_>>(), vec![0, 0, 1, 0]);
    }

    #[test]
    fn test_nan_threshold_rejected() {
        assert!(threshold(&layer(vec![1.0; 4]), f64::NAN).is_err());
    }
}
