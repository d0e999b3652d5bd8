// core/joint.rs
// Joint and marginal threshold counts over paired distortion/energy samples.

use crate::error::{FigureError, Result};

/// A strict upper bound on a value or on its magnitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Condition {
    Below(f64),
    AbsBelow(f64),
}

impl Condition {
    #[inline]
    pub fn holds(self, v: f64) -> bool {
        match self {
            Condition::Below(b) => v < b,
            Condition::AbsBelow(b) => v.abs() < b,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JointCounts {
    pub total: usize,
    /// Rows satisfying both conditions.
    pub joint: usize,
    /// Rows satisfying the first condition, regardless of the second.
    pub first: usize,
    /// Rows satisfying the second condition, regardless of the first.
    pub second: usize,
}

impl JointCounts {
    fn frac(&self, n: usize) -> f64 {
        n as f64 / self.total as f64
    }

    pub fn joint_frac(&self) -> f64 {
        self.frac(self.joint)
    }

    pub fn first_frac(&self) -> f64 {
        self.frac(self.first)
    }

    pub fn second_frac(&self) -> f64 {
        self.frac(self.second)
    }
}

pub fn count_conditions(
    a: &[f64],
    b: &[f64],
    cond_a: Condition,
    cond_b: Condition,
) -> Result<JointCounts> {
    if a.len() != b.len() {
        return Err(FigureError::validation(format!(
            "joint count inputs differ in length: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    if a.is_empty() {
        return Err(FigureError::validation(
            "joint count needs at least one row to form fractions",
        ));
    }
    let mut counts = JointCounts {
        total: a.len(),
        joint: 0,
        first: 0,
        second: 0,
    };
    for (&x, &y) in a.iter().zip(b) {
        let ok_a = cond_a.holds(x);
        let ok_b = cond_b.holds(y);
        counts.first += ok_a as usize;
        counts.second += ok_b as usize;
        counts.joint += (ok_a && ok_b) as usize;
    }
    Ok(counts)
}

/// Distortion below `d_tol` (first) and |energy| below `e_tol` (second).
pub fn count_joint(dist: &[f64], de: &[f64], d_tol: f64, e_tol: f64) -> Result<JointCounts> {
    count_conditions(dist, de, Condition::Below(d_tol), Condition::AbsBelow(e_tol))
}
