use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::HistError;

/// Bin edges of one histogram axis
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Binning {
    edges: Vec<f64>,
}

impl Binning {
    pub fn new(edges: Vec<f64>) -> Result<Self, HistError> {
        if edges.len() < 2 {
            return Err(HistError::TooFewEdges(edges.len()));
        }
        // `!(a < b)` also rejects NaN
        if let Some(n) = edges.windows(2).position(|w| !(w[0] < w[1])) {
            return Err(HistError::UnorderedEdges(n + 1));
        }
        Ok(Self { edges })
    }

    /// `nbins` equal bins between `min` and `max`
    pub fn uniform(nbins: usize, min: f64, max: f64) -> Result<Self, HistError> {
        let width = (max - min) / nbins as f64;
        Self::new(Vec::from_iter(
            (0..=nbins).map(|n| min + n as f64 * width),
        ))
    }

    pub fn nbins(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn min(&self) -> f64 {
        self.edges[0]
    }

    pub fn max(&self) -> f64 {
        self.edges[self.nbins()]
    }

    /// Bin containing `x`, with bins closed on the left
    ///
    /// Underflow, overflow, and NaN give `None`.
    pub fn find_bin(&self, x: f64) -> Option<usize> {
        if !(x >= self.min() && x < self.max()) {
            return None;
        }
        let n = self.edges.partition_point(|&edge| edge <= x);
        Some(n - 1)
    }

    pub fn low_edge(&self, bin: usize) -> f64 {
        self.edges[bin]
    }
}

impl<'de> Deserialize<'de> for Binning {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let edges = Vec::<f64>::deserialize(deserializer)?;
        Self::new(edges).map_err(serde::de::Error::custom)
    }
}

/// Two-dimensional histogram with in-range bins only
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Hist2D {
    #[serde(rename = "x_edges")]
    x: Binning,
    #[serde(rename = "y_edges")]
    y: Binning,
    /// One row of y bins per x bin
    counts: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct RawHist2D {
    x_edges: Binning,
    y_edges: Binning,
    counts: Vec<Vec<f64>>,
}

impl<'de> Deserialize<'de> for Hist2D {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let RawHist2D {
            x_edges,
            y_edges,
            counts,
        } = RawHist2D::deserialize(deserializer)?;
        Self::with_counts(x_edges, y_edges, counts)
            .map_err(serde::de::Error::custom)
    }
}

impl Hist2D {
    /// Empty histogram
    pub fn new(x: Binning, y: Binning) -> Self {
        let counts = vec![vec![0.; y.nbins()]; x.nbins()];
        Self { x, y, counts }
    }

    pub fn with_counts(
        x: Binning,
        y: Binning,
        counts: Vec<Vec<f64>>,
    ) -> Result<Self, HistError> {
        let expected = (x.nbins(), y.nbins());
        let ny = counts.first().map(|row| row.len()).unwrap_or_default();
        let found = (counts.len(), ny);
        if found != expected || counts.iter().any(|row| row.len() != ny) {
            return Err(HistError::ShapeMismatch { expected, found });
        }
        for (i, row) in counts.iter().enumerate() {
            if let Some(j) = row.iter().position(|c| !c.is_finite()) {
                return Err(HistError::NonFiniteContent(i, j));
            }
        }
        Ok(Self { x, y, counts })
    }

    pub fn x_axis(&self) -> &Binning {
        &self.x
    }

    /// Add `weight` at (x, y); returns whether the point was in range
    pub fn fill(&mut self, x: f64, y: f64, weight: f64) -> bool {
        match (self.x.find_bin(x), self.y.find_bin(y)) {
            (Some(i), Some(j)) => {
                self.counts[i][j] += weight;
                true
            }
            _ => false,
        }
    }

    /// Content of the bin containing (x, y)
    pub fn content_at(&self, x: f64, y: f64) -> Option<f64> {
        let i = self.x.find_bin(x)?;
        let j = self.y.find_bin(y)?;
        Some(self.counts[i][j])
    }

    /// Summed content of the y bins for x bin `bin`
    pub fn row_integral(&self, bin: usize) -> f64 {
        self.counts[bin].iter().sum()
    }

    /// Draw a y value from the distribution in x bin `bin`
    ///
    /// A bin is chosen with probability proportional to its content and
    /// the value is uniform within the bin. Negative contents count as
    /// empty. Returns `None` if the row has no positive content.
    pub fn sample_y<R: Rng + ?Sized>(&self, bin: usize, rng: &mut R) -> Option<f64> {
        let weights = self.counts[bin].iter().map(|c| c.max(0.));
        let dist = WeightedIndex::new(weights).ok()?;
        let j = dist.sample(rng);
        Some(rng.gen_range(self.y.low_edge(j)..self.y.low_edge(j + 1)))
    }
}
