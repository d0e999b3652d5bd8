// core/partition.rs
// Split paired samples by a strict threshold on the first coordinate.

use crate::error::{FigureError, Result};

/// Row indices on either side of the threshold, in input order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Partition {
    pub highlighted: Vec<usize>,
    pub rest: Vec<usize>,
}

impl Partition {
    pub fn points<'a>(
        &'a self,
        xs: &'a [f64],
        ys: &'a [f64],
    ) -> (
        impl Iterator<Item = (f64, f64)> + 'a,
        impl Iterator<Item = (f64, f64)> + 'a,
    ) {
        (
            self.highlighted.iter().map(move |&i| (xs[i], ys[i])),
            self.rest.iter().map(move |&i| (xs[i], ys[i])),
        )
    }
}

/// `xs[i] < threshold` goes to `highlighted`; everything else to `rest`.
pub fn partition_below(xs: &[f64], ys: &[f64], threshold: f64) -> Result<Partition> {
    if xs.len() != ys.len() {
        return Err(FigureError::validation(format!(
            "partition inputs differ in length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    let mut out = Partition::default();
    for (i, &x) in xs.iter().enumerate() {
        if x < threshold {
            out.highlighted.push(i);
        } else {
            out.rest.push(i);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_zero_row_is_highlighted() {
        let xs = [0.0005, 1.0];
        let ys = [0.001, 1.2];
        let p = partition_below(&xs, &ys, 0.001).unwrap();
        assert_eq!(p.highlighted, vec![0]);
        assert_eq!(p.rest, vec![1]);

        let (hi, rest) = p.points(&xs, &ys);
        assert_eq!(hi.collect::<Vec<_>>(), vec![(0.0005, 0.001)]);
        assert_eq!(rest.collect::<Vec<_>>(), vec![(1.0, 1.2)]);
    }

    #[test]
    fn threshold_is_strict() {
        let p = partition_below(&[0.001], &[0.0], 0.001).unwrap();
        assert!(p.highlighted.is_empty());
        assert_eq!(p.rest, vec![0]);
    }

    #[test]
    fn length_mismatch_fails() {
        assert!(matches!(
            partition_below(&[0.0, 1.0], &[0.0], 0.5),
            Err(FigureError::Validation(_))
        ));
    }
}
