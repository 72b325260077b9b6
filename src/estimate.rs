//! Parameter estimation for directed models.
//!
//! Given a learned `Structure` and the training `Dataset`, `fit` estimates each variable's
//! CPD by maximum likelihood: the conditional frequencies of the child's values within each
//! parent configuration (Koller & Friedman §17.2). Parent configurations never observed in
//! the data get a uniform distribution over the child's states.

use crate::dataset::Dataset;
use crate::factor::Factor;
use crate::model::{DirectedModel, DirectedModelBuilder};
use crate::score::family_counts;
use crate::structure::Structure;
use crate::util::Result;
use crate::variable::Variable;

use ndarray::{Axis, Dimension, IxDyn};

use std::collections::{HashMap, HashSet};

/// Fit the CPDs of `structure` to `data` by maximum likelihood.
///
/// Variables are added to the model in a topological order of the structure, so the returned
/// model's variable order always lists parents before children.
pub fn fit(structure: &Structure, data: &Dataset) -> Result<DirectedModel> {
    let order = structure.topological_order()?;

    // one fresh Variable per node, sized by the column's cardinality
    let mut vars: HashMap<&str, Variable> = HashMap::new();
    for &name in &order {
        vars.insert(name, Variable::discrete(data.cardinality(name)?));
    }

    let mut builder = DirectedModelBuilder::new();
    for &name in &order {
        let var = vars[name];
        let parents = structure.parents_of(name)?;

        let counts = family_counts(data, name, &parents)?;
        let table = conditional_frequencies(counts, parents.len(), var.cardinality());

        let parent_vars: Vec<Variable> = parents.iter().map(|&p| vars[p]).collect();
        let cpd = Factor::cpd(var, parent_vars.clone(), table)?;

        builder = builder.with_variable(
            &var,
            name,
            data.column(name)?.levels().to_vec(),
            &parent_vars.into_iter().collect::<HashSet<Variable>>(),
            cpd,
        );
    }

    builder.build()
}

/// Normalize a family count table into conditional frequencies of the child (the last axis)
/// given each parent configuration.
fn conditional_frequencies(
    counts: crate::factor::Table,
    num_parents: usize,
    child_card: usize,
) -> crate::factor::Table {
    let config_totals = counts.sum_axis(Axis(num_parents));

    let mut table = counts;
    for (idx, value) in table.indexed_iter_mut() {
        let total = config_totals[IxDyn(&idx.slice()[..num_parents])];
        *value = if total > 0.0 {
            *value / total
        } else {
            1.0 / child_card as f64
        };
    }
    table
}
