//! The Bayesian Dirichlet equivalent uniform (BDeu) score.

use crate::dataset::Dataset;
use crate::score::{family_counts, ScoringFunction};
use crate::stats::log_gamma;
use crate::util::Result;

use ndarray::{Axis, Dimension, IxDyn};

/// The BDeu score: the log marginal likelihood of the family under a Dirichlet prior whose
/// pseudo-counts spread an *equivalent sample size* uniformly across all parent/child
/// configurations. Every configuration receives the prior count `ess / (q * r)` where `q` is
/// the number of parent configurations and `r` the child cardinality.
pub struct BdeuScore<'a> {
    data: &'a Dataset,
    equivalent_sample_size: f64,
}

impl<'a> BdeuScore<'a> {
    pub fn new(data: &'a Dataset, equivalent_sample_size: f64) -> BdeuScore<'a> {
        BdeuScore {
            data,
            equivalent_sample_size,
        }
    }
}

impl ScoringFunction for BdeuScore<'_> {
    fn local_score(&self, child: &str, parents: &[&str]) -> Result<f64> {
        let counts = family_counts(self.data, child, parents)?;

        let child_card = self.data.cardinality(child)?;
        let num_parent_configs: usize = counts.shape()[..parents.len()].iter().product();

        let alpha_config = self.equivalent_sample_size / num_parent_configs as f64;
        let alpha_cell = alpha_config / child_card as f64;

        let config_totals = counts.sum_axis(Axis(parents.len()));

        let mut score = 0.0;
        for (idx, &total) in config_totals.indexed_iter() {
            score += log_gamma(alpha_config) - log_gamma(alpha_config + total);

            let mut cell = idx.slice().to_vec();
            cell.push(0);
            for k in 0..child_card {
                cell[parents.len()] = k;
                let count = counts[IxDyn(&cell)];
                score += log_gamma(alpha_cell + count) - log_gamma(alpha_cell);
            }
        }

        Ok(score)
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
        let score = BdeuScore::new(&data, 10.0);

        // counts (1, 3); alpha_j = 10, alpha_jk = 5. The gamma ratios collapse to
        // 9! * 5 * (5 * 6 * 7) / 13!
        let expected = (362_880.0f64 * 5.0 * 210.0 / 6_227_020_800.0).ln();
        let actual = score.local_score("B", &[]).unwrap();
        assert!((actual - expected).abs() < 1e-9);
    }

    #[test]
    fn one_parent() {
        let data = data();
        let score = BdeuScore::new(&data, 10.0);

        // per parent configuration: alpha_j = 5, alpha_jk = 2.5; counts (1, 1) and (0, 2).
        // Gamma(5)/Gamma(7) = 1/30 per configuration.
        let expected =
            ((2.5f64 * 2.5 / 30.0).ln()) + ((2.5f64 * 3.5 / 30.0).ln());
        let actual = score.local_score("B", &["A"]).unwrap();
        assert!((actual - expected).abs() < 1e-9);
    }

    #[test]
    fn data_support_raises_score() {
        // strongly coupled columns: conditioning on the parent should raise the score
        let data = Dataset::from_columns(vec![
            ("A", vec!["0", "0", "0", "0", "1", "1", "1", "1"]),
            ("B", vec!["0", "0", "0", "0", "1", "1", "1", "1"]),
        ])
        .unwrap();
        let score = BdeuScore::new(&data, 10.0);

        let without = score.local_score("B", &[]).unwrap();
        let with = score.local_score("B", &["A"]).unwrap();
        assert!(with > without);
    }
}
