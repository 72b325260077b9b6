//! Exact inference by variable elimination.
//!
//! `VariableEliminationEngine` answers conditional queries against a `DirectedModel` via the
//! sum-product variable elimination algorithm (Koller & Friedman 9.3.1): evidence is folded
//! into the factors by reduction up front, then every non-query variable is summed out one at
//! a time, and the product of the surviving factors is normalized into the posterior.

use crate::factor::Factor;
use crate::model::DirectedModel;
use crate::util::Result;
use crate::variable::{Assignment, Variable};

use std::collections::{HashMap, HashSet};

pub struct VariableEliminationEngine {
    /// The model's CPDs, reduced over the evidence
    factors: Vec<Factor>,
}

impl VariableEliminationEngine {
    /// Construct an engine for the given model and (possibly empty) evidence.
    pub fn for_directed(model: &DirectedModel, evidence: &Assignment) -> VariableEliminationEngine {
        let factors = model
            .variables()
            .iter()
            .filter_map(|v| model.cpd(v))
            .map(|cpd| cpd.reduce(evidence))
            .collect();

        VariableEliminationEngine { factors }
    }

    /// The posterior joint distribution of the query variables, given the engine's evidence.
    ///
    /// # Errors
    /// * `PearlError::DivideByZero` if the evidence has zero probability under the model
    pub fn infer(&self, query: &HashSet<Variable>) -> Result<Factor> {
        let mut factors = self.factors.clone();

        for var in self.elimination_order(query) {
            let (involving, rest): (Vec<Factor>, Vec<Factor>) = factors
                .into_iter()
                .partition(|f| f.scope().contains(&var));

            let product = involving
                .iter()
                .try_fold(Factor::Identity, |acc, f| acc.product(f))?;

            factors = rest;
            factors.push(product.marginalize(var));
        }

        let joint = factors
            .iter()
            .try_fold(Factor::Identity, |acc, f| acc.product(f))?;

        joint.normalize()
    }

    /// An elimination order over the non-query variables, by max-cardinality search on the
    /// interaction graph of the reduced factors (Koller & Friedman 9.4.3). Ties keep the
    /// lowest variable id so the order is deterministic.
    fn elimination_order(&self, query: &HashSet<Variable>) -> Vec<Variable> {
        // interaction graph: variables are adjacent when they share a factor
        let mut neighbors: HashMap<Variable, HashSet<Variable>> = HashMap::new();
        for factor in &self.factors {
            let scope = factor.scope();
            for &v in &scope {
                let entry = neighbors.entry(v).or_default();
                entry.extend(scope.iter().filter(|&&u| u != v));
            }
        }

        let mut numbered: HashSet<Variable> = HashSet::new();
        let mut order: Vec<Variable> = Vec::new();

        while numbered.len() < neighbors.len() {
            let next = neighbors
                .keys()
                .filter(|&v| !numbered.contains(v))
                .map(|&v| {
                    let weight = neighbors[&v].iter().filter(|n| numbered.contains(n)).count();
                    (v, weight)
                })
                .max_by(|(a, wa), (b, wb)| wa.cmp(wb).then(b.id().cmp(&a.id())));

            match next {
                Some((v, _)) => {
                    numbered.insert(v);
                    order.push(v);
                }
                None => break,
            }
        }

        // eliminate in reverse max-cardinality order, skipping the query variables
        order
            .into_iter()
            .rev()
            .filter(|v| !query.contains(v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DirectedModelBuilder;

    use ndarray::array;

    fn labels() -> Vec<String> {
        vec![String::from("0"), String::from("1")]
    }

    /// A collider network A -> C <- B with hand-checkable posteriors.
    fn collider() -> (Variable, Variable, Variable, DirectedModel) {
        let a = Variable::binary();
        let b = Variable::binary();
        let c = Variable::binary();

        let p_a = Factor::cpd(a, vec![], array![0.7, 0.3].into_dyn()).unwrap();
        let p_b = Factor::cpd(b, vec![], array![0.4, 0.6].into_dyn()).unwrap();
        let p_c = Factor::cpd(
            c,
            vec![a, b],
            array![[[0.9, 0.1], [0.5, 0.5]], [[0.6, 0.4], [0.1, 0.9]]].into_dyn(),
        )
        .unwrap();

        let model = DirectedModelBuilder::new()
            .with_variable(&a, "A", labels(), &HashSet::new(), p_a)
            .with_variable(&b, "B", labels(), &HashSet::new(), p_b)
            .with_variable(&c, "C", labels(), &HashSet::from([a, b]), p_c)
            .build()
            .unwrap();

        (a, b, c, model)
    }

    #[test]
    fn prior_marginal() {
        let (_, _, c, model) = collider();

        let engine = VariableEliminationEngine::for_directed(&model, &Assignment::new());
        let posterior = engine.infer(&HashSet::from([c])).unwrap();

        // P(C = 1) = 0.7*0.4*0.1 + 0.7*0.6*0.5 + 0.3*0.4*0.4 + 0.3*0.6*0.9 = 0.448
        let mut assignment = Assignment::new();
        assignment.set(&c, 1);
        assert!((posterior.value(&assignment).unwrap() - 0.448).abs() < 1e-12);
        assert_eq!(vec![c], posterior.scope());
    }

    #[test]
    fn posterior_given_evidence() {
        let (a, _, c, model) = collider();

        let mut evidence = Assignment::new();
        evidence.set(&c, 1);

        let engine = VariableEliminationEngine::for_directed(&model, &evidence);
        let posterior = engine.infer(&HashSet::from([a])).unwrap();

        // P(A = 1 | C = 1) = 0.21 / (0.21 + 0.238) = 0.46875
        let mut assignment = Assignment::new();
        assignment.set(&a, 1);
        assert!((posterior.value(&assignment).unwrap() - 0.46875).abs() < 1e-12);
    }

    #[test]
    fn joint_query() {
        let (a, b, c, model) = collider();

        let mut evidence = Assignment::new();
        evidence.set(&c, 1);

        let engine = VariableEliminationEngine::for_directed(&model, &evidence);
        let posterior = engine.infer(&HashSet::from([a, b])).unwrap();

        // P(A = 1, B = 1 | C = 1) = 0.162 / 0.448
        let mut assignment = Assignment::new();
        assignment.set(&a, 1);
        assignment.set(&b, 1);
        let expected = 0.162 / 0.448;
        assert!((posterior.value(&assignment).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn posterior_is_normalized() {
        let (a, _, c, model) = collider();

        let mut evidence = Assignment::new();
        evidence.set(&c, 0);

        let engine = VariableEliminationEngine::for_directed(&model, &evidence);
        let posterior = engine.infer(&HashSet::from([a])).unwrap();

        let mut total = 0.0;
        for value in 0..a.cardinality() {
            let mut assignment = Assignment::new();
            assignment.set(&a, value);
            total += posterior.value(&assignment).unwrap();
        }
        assert!((total - 1.0).abs() < 1e-12);
    }
}
