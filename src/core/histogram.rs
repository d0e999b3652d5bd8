// core/histogram.rs
// Equal-width histogram binning with optional range clipping.

use serde::{Deserialize, Serialize};

use crate::error::{FigureError, Result};

/// What happens to samples outside the open interval `(lo, hi)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClipPolicy {
    #[default]
    Discard,
    Clamp,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub lo: f64,
    pub hi: f64,
    #[serde(default)]
    pub policy: ClipPolicy,
}

impl Clip {
    pub fn discard(lo: f64, hi: f64) -> Self {
        Self {
            lo,
            hi,
            policy: ClipPolicy::Discard,
        }
    }

    pub fn apply(&self, values: &[f64]) -> Vec<f64> {
        match self.policy {
            ClipPolicy::Discard => values
                .iter()
                .copied()
                .filter(|&v| v > self.lo && v < self.hi)
                .collect(),
            ClipPolicy::Clamp => values.iter().map(|v| v.clamp(self.lo, self.hi)).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    /// `bins + 1` ascending edges; the last bin is closed on the right.
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn range(&self) -> (f64, f64) {
        (self.edges[0], self.edges[self.edges.len() - 1])
    }

    /// `(left, right, count)` for each bin.
    pub fn bars(&self) -> impl Iterator<Item = (f64, f64, u64)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| (w[0], w[1], c))
    }

    /// Rescale the value axis, e.g. eV to meV.
    pub fn scaled(mut self, factor: f64) -> Self {
        for e in &mut self.edges {
            *e *= factor;
        }
        if factor < 0.0 {
            self.edges.reverse();
            self.counts.reverse();
        }
        self
    }
}

fn sturges_bins(n: usize) -> usize {
    (n as f64).log2().ceil() as usize + 1
}

/// Bin `values` after optional clipping. `bins == None` picks a bin count from
/// the data (Sturges) and therefore needs at least one retained value.
pub fn histogram(values: &[f64], bins: Option<usize>, clip: Option<Clip>) -> Result<Histogram> {
    if let Some(v) = values.iter().find(|v| !v.is_finite()) {
        return Err(FigureError::validation(format!(
            "histogram input contains non-finite value {v}"
        )));
    }
    if let Some(c) = clip {
        if !(c.lo < c.hi) {
            return Err(FigureError::validation(format!(
                "clip range is empty: ({}, {})",
                c.lo, c.hi
            )));
        }
    }
    let retained = match clip {
        Some(c) => c.apply(values),
        None => values.to_vec(),
    };

    let bins = match bins {
        Some(0) => return Err(FigureError::validation("histogram needs at least one bin")),
        Some(b) => b,
        None if retained.is_empty() => {
            return Err(FigureError::validation(
                "cannot choose a bin count for an empty sample",
            ));
        }
        None => sturges_bins(retained.len()),
    };

    let (mut lo, mut hi) = if retained.is_empty() {
        (0.0, 1.0)
    } else {
        retained
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    };
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins)
        .map(|i| if i == bins { hi } else { lo + i as f64 * width })
        .collect();

    let mut counts = vec![0u64; bins];
    for &v in &retained {
        let idx = (((v - lo) / (hi - lo)) * bins as f64).floor() as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    Ok(Histogram { edges, counts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn counts_sum_to_sample_size() {
        let values: Vec<f64> = (0..101).map(|i| i as f64 * 0.018).collect();
        let h = histogram(&values, Some(50), None).unwrap();
        assert_eq!(h.n_bins(), 50);
        assert_eq!(h.edges.len(), 51);
        assert_eq!(h.total(), 101);
        assert_relative_eq!(h.range().0, 0.0);
        assert_relative_eq!(h.range().1, 1.8, epsilon = 1e-12);
    }

    #[test]
    fn maximum_lands_in_last_bin() {
        let h = histogram(&[0.0, 1.0, 2.0], Some(2), None).unwrap();
        assert_eq!(h.counts, vec![1, 2]);
    }

    #[test]
    fn discard_clip_is_open_interval() {
        let values = [-0.7, -0.5, -0.1, 0.0, 0.3, 0.5, 2.0];
        let h = histogram(&values, Some(4), Some(Clip::discard(-0.5, 0.5))).unwrap();
        assert_eq!(h.total(), 3);
    }

    #[test]
    fn clamp_clip_retains_everything() {
        let values = [-0.7, -0.1, 0.3, 2.0];
        let clip = Clip {
            lo: -0.5,
            hi: 0.5,
            policy: ClipPolicy::Clamp,
        };
        let h = histogram(&values, Some(4), Some(clip)).unwrap();
        assert_eq!(h.total(), 4);
        assert_relative_eq!(h.range().0, -0.5);
        assert_relative_eq!(h.range().1, 0.5);
    }

    #[test]
    fn constant_sample_widens_range() {
        let h = histogram(&[2.0, 2.0], Some(10), None).unwrap();
        assert_relative_eq!(h.range().0, 1.5);
        assert_relative_eq!(h.range().1, 2.5);
        assert_eq!(h.total(), 2);
    }

    #[test]
    fn empty_sample_needs_explicit_bins() {
        assert!(matches!(
            histogram(&[], None, None),
            Err(FigureError::Validation(_))
        ));
        let h = histogram(&[], Some(5), None).unwrap();
        assert_eq!(h.total(), 0);
        assert_eq!(h.range(), (0.0, 1.0));
    }

    #[test]
    fn auto_bins_follow_sturges() {
        let values: Vec<f64> = (0..16).map(|i| i as f64).collect();
        let h = histogram(&values, None, None).unwrap();
        assert_eq!(h.n_bins(), 5);
    }

    #[test]
    fn zero_bins_rejected() {
        assert!(histogram(&[1.0], Some(0), None).is_err());
    }

    #[test]
    fn scaled_rescales_edges_only() {
        let h = histogram(&[-0.4, 0.4], Some(2), None).unwrap().scaled(1000.0);
        assert_relative_eq!(h.range().0, -400.0);
        assert_relative_eq!(h.range().1, 400.0);
        assert_eq!(h.counts, vec![1, 1]);
    }
}
