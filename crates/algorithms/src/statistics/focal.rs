//! Focal (moving window) smoothing
//!
//! Every output cell is computed from the window around it in the *input*
//! layer, so the result does not depend on the order cells are visited.
//! Typical use: fill gaps in a sparse point-count raster, or smooth a
//! density surface.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use crate::maybe_rayon::*;
use crate::statistics::Reducer;
use geopattern_core::raster::{Neighborhood, RasterLayer};
use geopattern_core::{Algorithm, Error, Result};
use tracing::debug;

/// How window cells outside the raster are treated
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadMode {
    /// Excluded from the reducer
    #[default]
    NoData,
    /// Contribute a fixed value
    Constant(f64),
    /// Repeat the nearest edge cell
    Nearest,
}

/// Parameters for focal smoothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocalParams {
    /// Window side length in cells; odd, >= 1
    pub window_size: usize,
    /// Reducer applied over valid window cells
    pub reducer: Reducer,
    /// Only replace cells that are no-data in the input
    pub fill_only_missing: bool,
    /// Out-of-extent window cells
    pub pad: PadMode,
    /// Use a circular window inscribed in the square
    pub circular: bool,
}

impl Default for FocalParams {
    fn default() -> Self {
        Self {
            window_size: 3,
            reducer: Reducer::Mean,
            fill_only_missing: false,
            pad: PadMode::NoData,
            circular: false,
        }
    }
}

/// Focal smoothing algorithm
#[derive(Debug, Clone, Default)]
pub struct FocalSmooth;

impl Algorithm for FocalSmooth {
    type Input = RasterLayer;
    type Output = RasterLayer;
    type Params = FocalParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "FocalSmooth"
    }

    fn description(&self) -> &'static str {
        "Moving-window reduction over a read-only snapshot of the input layer"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        focal_smooth(&input, params)
    }
}

/// Smooth (or gap-fill) a raster layer with a moving window.
///
/// For each cell, the `window_size × window_size` neighborhood of the input
/// is gathered, no-data cells are dropped, and the reducer is applied. A
/// window with no valid cells yields no data (NaN).
///
/// With `fill_only_missing`, cells that hold a value in the input are copied
/// unchanged and only no-data cells are filled.
///
/// # Errors
/// [`Error::InvalidParameter`] for an even or zero window size or an
/// out-of-range percentile.
pub fn focal_smooth(layer: &RasterLayer, params: FocalParams) -> Result<RasterLayer> {
    let neighborhood = Neighborhood::from_window_size(params.window_size, params.circular)?;
    params.reducer.validate()?;

    let (rows, cols) = layer.shape();
    let offsets = neighborhood.offsets();
    debug!(rows, cols, window = params.window_size, reducer = ?params.reducer, "focal smoothing");

    let output_data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            let mut values: Vec<f64> = Vec::with_capacity(offsets.len());

            for (col, out) in row_data.iter_mut().enumerate() {
                let center = unsafe { layer.get_unchecked(row, col) };
                if params.fill_only_missing && !layer.is_nodata(center) {
                    *out = center;
                    continue;
                }

                values.clear();
                for &(dr, dc) in &offsets {
                    if let Some(v) = window_value(layer, row, col, dr, dc, params.pad) {
                        values.push(v);
                    }
                }

                if values.is_empty() {
                    continue;
                }
                if let Some(v) = params.reducer.reduce(&mut values) {
                    *out = v;
                }
            }

            row_data
        })
        .collect();

    let data = Array2::from_shape_vec((rows, cols), output_data)
        .map_err(|_| Error::InvalidDimensions { rows, cols })?;
    let mut output = RasterLayer::from_array(layer.grid().clone(), data)?;
    output.set_nodata(Some(f64::NAN));

    Ok(output)
}

/// Valid value of the window cell at offset (dr, dc), honouring the pad mode
fn window_value(
    layer: &RasterLayer,
    row: usize,
    col: usize,
    dr: isize,
    dc: isize,
    pad: PadMode,
) -> Option<f64> {
    let (rows, cols) = layer.shape();
    let nr = row as isize + dr;
    let nc = col as isize + dc;
    let inside = nr >= 0 && nc >= 0 && (nr as usize) < rows && (nc as usize) < cols;

    let v = if inside {
        unsafe { layer.get_unchecked(nr as usize, nc as usize) }
    } else {
        match pad {
            PadMode::NoData => return None,
            PadMode::Constant(c) => c,
            PadMode::Nearest => {
                let r = nr.clamp(0, rows as isize - 1) as usize;
                let c = nc.clamp(0, cols as isize - 1) as usize;
                unsafe { layer.get_unchecked(r, c) }
            }
        }
    };

    if layer.is_nodata(v) { None } else { Some(v) }
}
