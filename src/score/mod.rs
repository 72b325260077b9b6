//! Structure scoring functions.
//!
//! A `ScoringFunction` measures the goodness-of-fit of a candidate network structure against a
//! fixed training dataset; higher is better. All implemented scores are *decomposable*: the
//! score of a structure is the sum of per-family local scores, which is what makes the greedy
//! structure search cheap - a single-edge move only changes the local scores of the affected
//! children.

use crate::dataset::Dataset;
use crate::factor::Table;
use crate::structure::Structure;
use crate::util::{PearlError, Result};

use indexmap::IndexMap;
use ndarray::IxDyn;

mod bdeu;
mod bds;
mod bic;

pub use self::bdeu::BdeuScore;
pub use self::bds::BdsScore;
pub use self::bic::BicScore;

/// The default equivalent sample size for the Bayesian Dirichlet scores.
pub const DEFAULT_EQUIVALENT_SAMPLE_SIZE: f64 = 10.0;

/// The ability to score a candidate network structure against a training dataset.
pub trait ScoringFunction {
    /// The local score of the family `child | parents`.
    fn local_score(&self, child: &str, parents: &[&str]) -> Result<f64>;

    /// The score of a complete structure: the sum of its family scores.
    fn score(&self, structure: &Structure) -> Result<f64> {
        let mut total = 0.0;
        for child in structure.nodes() {
            let parents = structure.parents_of(child)?;
            total += self.local_score(child, &parents)?;
        }
        Ok(total)
    }
}

/// The standard scoring methods, registered by name in a fixed insertion order.
pub fn standard_scores(data: &Dataset) -> IndexMap<String, Box<dyn ScoringFunction + '_>> {
    let mut methods: IndexMap<String, Box<dyn ScoringFunction + '_>> = IndexMap::new();
    methods.insert(String::from("Bic"), Box::new(BicScore::new(data)));
    methods.insert(
        String::from("BDeu"),
        Box::new(BdeuScore::new(data, DEFAULT_EQUIVALENT_SAMPLE_SIZE)),
    );
    methods.insert(
        String::from("BDs"),
        Box::new(BdsScore::new(data, DEFAULT_EQUIVALENT_SAMPLE_SIZE)),
    );
    methods
}

/// Count table for the family `child | parents`.
///
/// The table has one axis per parent (in the given order) followed by the child axis; each
/// cell holds the number of rows with that configuration.
pub(crate) fn family_counts(data: &Dataset, child: &str, parents: &[&str]) -> Result<Table> {
    if data.num_rows() == 0 {
        return Err(PearlError::NotEnoughData);
    }

    let mut shape: Vec<usize> = Vec::with_capacity(parents.len() + 1);
    let mut codes: Vec<&[usize]> = Vec::with_capacity(parents.len() + 1);
    for name in parents.iter().copied().chain(std::iter::once(child)) {
        let column = data.column(name)?;
        shape.push(column.cardinality());
        codes.push(column.codes());
    }

    let mut counts = Table::zeros(IxDyn(&shape));
    let mut idx = vec![0usize; codes.len()];
    for row in 0..data.num_rows() {
        for (slot, col) in idx.iter_mut().zip(codes.iter()) {
            *slot = col[row];
        }
        counts[IxDyn(&idx)] += 1.0;
    }

    Ok(counts)
}
