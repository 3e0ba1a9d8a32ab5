//! Reducers: how a group of values collapses to one
//!
//! Shared by zonal aggregation, raster binning and focal smoothing.

use serde::{Deserialize, Serialize};
use geopattern_core::{Error, Result};

/// Available reducers
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reducer {
    /// Number of items (points or valid cells)
    Count,
    /// Sum of values
    Sum,
    /// Arithmetic mean
    #[default]
    Mean,
    /// Minimum value
    Min,
    /// Maximum value
    Max,
    /// Median value
    Median,
    /// Standard deviation (population)
    StdDev,
    /// Percentile (0-100), nearest-rank
    Percentile(f64),
}

impl Reducer {
    /// Reject out-of-range parameters
    pub fn validate(&self) -> Result<()> {
        if let Reducer::Percentile(p) = self {
            if !(0.0..=100.0).contains(p) {
                return Err(Error::invalid_parameter(
                    "percentile",
                    p,
                    "must be between 0 and 100",
                ));
            }
        }
        Ok(())
    }

    /// Whether the reducer counts items rather than reading their values
    pub fn is_count(&self) -> bool {
        matches!(self, Reducer::Count)
    }

    /// Result for an empty group: 0 for `Count` and `Sum`, no data otherwise
    pub fn empty_value(&self) -> Option<f64> {
        match self {
            Reducer::Count | Reducer::Sum => Some(0.0),
            _ => None,
        }
    }

    /// Reduce `values`, which may be reordered in place.
    ///
    /// Empty input yields [`Reducer::empty_value`].
    pub fn reduce(&self, values: &mut [f64]) -> Option<f64> {
        if values.is_empty() {
            return self.empty_value();
        }
        let n = values.len() as f64;

        let v = match self {
            Reducer::Count => n,
            Reducer::Sum => values.iter().sum::<f64>(),
            Reducer::Mean => values.iter().sum::<f64>() / n,
            Reducer::Min => values.iter().cloned().fold(f64::INFINITY, f64::min),
            Reducer::Max => values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            Reducer::Median => {
                values.sort_by(f64::total_cmp);
                let mid = values.len() / 2;
                if values.len() % 2 == 0 {
                    (values[mid - 1] + values[mid]) / 2.0
                } else {
                    values[mid]
                }
            }
            Reducer::StdDev => {
                let mean = values.iter().sum::<f64>() / n;
                let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
                var.sqrt()
            }
            Reducer::Percentile(p) => {
                values.sort_by(f64::total_cmp);
                let idx = (p / 100.0 * (values.len() - 1) as f64).round() as usize;
                values[idx.min(values.len() - 1)]
            }
        };
        Some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_basic_reducers() {
        let data = [4.0, 1.0, 3.0, 2.0];
        let run = |r: Reducer| r.reduce(&mut data.clone()).unwrap();

        assert_eq!(run(Reducer::Count), 4.0);
        assert_eq!(run(Reducer::Sum), 10.0);
        assert_eq!(run(Reducer::Mean), 2.5);
        assert_eq!(run(Reducer::Min), 1.0);
        assert_eq!(run(Reducer::Max), 4.0);
        assert_eq!(run(Reducer::Median), 2.5);
        assert_relative_eq!(run(Reducer::StdDev), 1.25_f64.sqrt());
        assert_eq!(run(Reducer::Percentile(100.0)), 4.0);
        assert_eq!(run(Reducer::Percentile(0.0)), 1.0);
    }

    #[test]
    fn test_empty_values() {
        assert_eq!(Reducer::Count.reduce(&mut []), Some(0.0));
        assert_eq!(Reducer::Sum.reduce(&mut []), Some(0.0));
        assert_eq!(Reducer::Mean.reduce(&mut []), None);
        assert_eq!(Reducer::Median.reduce(&mut []), None);
    }

    #[test]
    fn test_percentile_validation() {
        assert!(Reducer::Percentile(50.0).validate().is_ok());
        assert!(Reducer::Percentile(120.0).validate().is_err());
        assert!(Reducer::Mean.validate().is_ok());
    }

    #[test]
    fn test_reducer_from_config() {
        let r: Reducer = serde_json::from_str(r#""count""#).unwrap();
        assert_eq!(r, Reducer::Count);
        let p: Reducer = serde_json::from_str(r#"{"percentile": 90.0}"#).unwrap();
        assert_eq!(p, Reducer::Percentile(90.0));
    }
}
