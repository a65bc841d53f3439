use serde::{Serialize, Deserialize};
use statrs::statistics::Statistics;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StdErrorBins {
    pub indices: Vec<usize>,
    pub means: Vec<f64>,
    pub standard_errors: Vec<f64>,
    pub div: usize,
}

impl StdErrorBins {
    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }
}

pub fn calculate_percentage(value: f64, total: f64) -> f64 {
    (value / total) * 100.0
}

/// Standard error of the mean: sample standard deviation over sqrt(n).
///
/// A single sample has no sample deviation, so the result is NaN.
pub fn standard_error(sample: &[f64]) -> f64 {
    let n = sample.len() as f64;
    sample.std_dev() / n.sqrt()
}

/// Splits `data` into `data.len() / div` contiguous bins of exactly `div`
/// values and summarizes each one. A trailing partial bin is dropped.
pub fn get_std_error(data: &[f64], div: usize) -> Result<StdErrorBins> {
    if div == 0 {
        return Err(Error::InvalidInput("Bin width must be greater than zero".to_string()));
    }

    let (means, standard_errors): (Vec<f64>, Vec<f64>) = data
        .chunks_exact(div)
        .map(|sample| (sample.mean(), standard_error(sample)))
        .unzip();

    Ok(StdErrorBins {
        indices: (0..means.len()).collect(),
        means,
        standard_errors,
        div,
    })
}
