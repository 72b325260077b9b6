//! The Bayesian Information Criterion score.

use crate::dataset::Dataset;
use crate::score::{family_counts, ScoringFunction};
use crate::util::Result;

use ndarray::{Axis, Dimension, IxDyn};

/// The BIC (or Schwarz) score: the maximized log-likelihood of the family, penalized by the
/// number of free parameters scaled with the sample size. The penalty grows with `ln(N)` so
/// denser structures need ever stronger support from the data as more rows are observed.
pub struct BicScore<'a> {
    data: &'a Dataset,
}

impl<'a> BicScore<'a> {
    pub fn new(data: &'a Dataset) -> BicScore<'a> {
        BicScore { data }
    }
}

impl ScoringFunction for BicScore<'_> {
    fn local_score(&self, child: &str, parents: &[&str]) -> Result<f64> {
        let counts = family_counts(self.data, child, parents)?;

        let child_card = self.data.cardinality(child)?;
        let num_parent_configs: usize = counts.shape()[..parents.len()].iter().product();

        // n_ij: rows per parent configuration
        let config_totals = counts.sum_axis(Axis(parents.len()));

        let mut log_likelihood = 0.0;
        for (idx, &count) in counts.indexed_iter() {
            if count > 0.0 {
                let total = config_totals[IxDyn(&idx.slice()[..parents.len()])];
                log_likelihood += count * (count / total).ln();
            }
        }

        let num_params = ((child_card - 1) * num_parent_configs) as f64;
        let penalty = 0.5 * (self.data.num_rows() as f64).ln() * num_params;

        Ok(log_likelihood - penalty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> Dataset {
        Dataset::from_columns(vec![
            ("A", vec!["0", "0", "1", "1"]),
            ("B", vec!["0", "1", "1", "1"]),
        ])
        .unwrap()
    }

    #[test]
    fn no_parents() {
        let data = data();
        let score = BicScore::new(&data);

        // counts (1, 3), n = 4; one free parameter
        let expected = 0.25f64.ln() + 3.0 * 0.75f64.ln() - 0.5 * 4f64.ln();
        let actual = score.local_score("B", &[]).unwrap();
        assert!((actual - expected).abs() < 1e-12);
        assert!((actual - (-2.9424877590351786)).abs() < 1e-10);
    }

    #[test]
    fn one_parent() {
        let data = data();
        let score = BicScore::new(&data);

        // counts per A: (1, 1) and (0, 2); two free parameters
        let expected = 2.0 * 0.5f64.ln() - 4f64.ln();
        let actual = score.local_score("B", &["A"]).unwrap();
        assert!((actual - expected).abs() < 1e-12);
    }

    #[test]
    fn penalty_disfavors_spurious_edges() {
        // A and B are independent; the penalized family score should prefer no parents
        let data = Dataset::from_columns(vec![
            ("A", vec!["0", "0", "1", "1", "0", "1", "1", "0"]),
            ("B", vec!["0", "1", "0", "1", "0", "1", "0", "1"]),
        ])
        .unwrap();
        let score = BicScore::new(&data);

        let without = score.local_score("B", &[]).unwrap();
        let with = score.local_score("B", &["A"]).unwrap();
        assert!(without > with);
    }
}
