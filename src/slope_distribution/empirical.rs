use std::fs;

use camino::Utf8Path;
use rand::{
    distr::{weighted::WeightedIndex, Distribution},
    Rng,
};

use super::SlopeDistribution;
use crate::cubescan_errors::CubeScanError;

/// Slope pairs drawn from a weighted list of samples.
///
/// File format: one sample per line, `x_slope y_slope weight`, whitespace or comma
/// separated. Empty lines and lines starting with `#` are ignored.
///
/// ```text
/// # x_slope  y_slope  weight
/// 0.12      -0.03     4
/// 0.10       0.01     1.5
/// ```
///
/// Weights must be finite and non-negative, with a strictly positive total.
#[derive(Debug, Clone)]
pub struct EmpiricalSlopes {
    slopes: Vec<(f64, f64)>,
    index: WeightedIndex<f64>,
}

impl EmpiricalSlopes {
    /// Build the distribution from `(x_slope, y_slope, weight)` triples.
    pub fn from_samples(samples: &[(f64, f64, f64)]) -> Result<Self, CubeScanError> {
        if samples.is_empty() {
            return Err(CubeScanError::InvalidSlopeDistribution(
                "no slope sample given".into(),
            ));
        }
        if let Some((x, y, _)) = samples
            .iter()
            .find(|(x, y, _)| !(x.is_finite() && y.is_finite()))
        {
            return Err(CubeScanError::InvalidSlopeDistribution(format!(
                "non-finite slope sample ({x}, {y})"
            )));
        }

        let index = WeightedIndex::new(samples.iter().map(|&(_, _, w)| w))?;
        let slopes = samples.iter().map(|&(x, y, _)| (x, y)).collect();
        Ok(EmpiricalSlopes { slopes, index })
    }

    /// Read the distribution from a weighted sample file.
    ///
    /// Return
    /// ----------
    /// * The distribution, or
    ///   [`CubeScanError::UnreadableFile`] if the file cannot be read,
    ///   [`CubeScanError::InvalidMetadataLine`] on a malformed line,
    ///   [`CubeScanError::InvalidSlopeDistribution`] on empty or invalid weights.
    pub fn from_file(path: &Utf8Path) -> Result<Self, CubeScanError> {
        let content = fs::read_to_string(path).map_err(|source| CubeScanError::UnreadableFile {
            path: path.to_string(),
            source,
        })?;

        let mut samples = Vec::new();
        for (i, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let malformed = || CubeScanError::InvalidMetadataLine {
                path: path.to_string(),
                line: i + 1,
                content: line.to_string(),
            };

            let values = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
                .map(|t| t.parse::<f64>().map_err(|_| malformed()))
                .collect::<Result<Vec<f64>, _>>()?;

            match values.as_slice() {
                [x, y, w] => samples.push((*x, *y, *w)),
                _ => return Err(malformed()),
            }
        }

        Self::from_samples(&samples)
    }

    /// Number of slope pairs in the distribution.
    pub fn len(&self) -> usize {
        self.slopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slopes.is_empty()
    }
}

impl SlopeDistribution for EmpiricalSlopes {
    #[inline]
    fn sample_slopes<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, f64) {
        self.slopes[self.index.sample(rng)]
    }
}
