// core/relations.rs
// Point-group relation matrix accumulated from space-group pairs.

use crate::core::point_group::{N_POINT_GROUPS, PointGroup, point_group};
use crate::error::Result;

/// `counts[i][j]`: pairs whose first structure is in point group `i + 1` and
/// whose second is in point group `j + 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointGroupRelations {
    counts: [[u64; N_POINT_GROUPS]; N_POINT_GROUPS],
}

impl Default for PointGroupRelations {
    fn default() -> Self {
        Self {
            counts: [[0; N_POINT_GROUPS]; N_POINT_GROUPS],
        }
    }
}

impl PointGroupRelations {
    /// Single pass over the pairs. Fails on the first out-of-range space group.
    pub fn accumulate<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        Self::accumulate_with(pairs, point_group)
    }

    /// Same as [`accumulate`](Self::accumulate) with a caller-supplied lookup.
    pub fn accumulate_with<I, F>(pairs: I, mut lookup: F) -> Result<Self>
    where
        I: IntoIterator<Item = (u32, u32)>,
        F: FnMut(u32) -> Result<PointGroup>,
    {
        let mut out = Self::default();
        for (sg1, sg2) in pairs {
            let pg1 = lookup(sg1)?;
            let pg2 = lookup(sg2)?;
            out.counts[pg1.index()][pg2.index()] += 1;
        }
        Ok(out)
    }

    pub fn get(&self, i: usize, j: usize) -> u64 {
        self.counts[i][j]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }

    /// `(i, j, count)` for every non-empty cell, row-major.
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, usize, u64)> + '_ {
        self.counts.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, c)| **c > 0)
                .map(move |(j, &c)| (i, j, c))
        })
    }

    pub fn rows(&self) -> &[[u64; N_POINT_GROUPS]; N_POINT_GROUPS] {
        &self.counts
    }
}
