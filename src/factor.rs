//! Definition of the factor module
//!
//! A `Factor` represents a relationship between some set of `Variable`s. Factors are
//! represented as table-CPDs as described in Koller & Friedman.

use crate::util::{PearlError, Result};
use crate::variable::{all_assignments, Assignment, Variable};

use ndarray::prelude as nd;
use ndarray::{Axis, Dimension};

/// Alias f64 ndarray::ArrayD as Table
pub type Table = nd::ArrayD<f64>;

#[derive(Clone, Debug)]
pub enum Factor {
    /// The empty, identity `Factor` with no scope. This type exists for dealing with arithmetic
    /// operations of `Factor`s
    Identity,

    /// A `Factor` over some scope of variables.
    TableFactor {
        /// The scope of the `Factor`
        scope: Vec<Variable>,

        /// The values of the `Factor` table.
        table: Table,

        /// `true`, if the `Factor` is a conditional probability distribution
        cpd: bool,
    },
}

impl Factor {
    /// Get the identity factor
    pub fn identity() -> Self {
        Factor::Identity
    }

    /// Create a new `Factor` over the given scope.
    ///
    /// # Errors
    /// * `PearlError::InvalidScope` if the scope is empty or does not match the table dimensions
    pub fn new(scope: Vec<Variable>, table: Table) -> Result<Self> {
        Factor::build(scope, table, false)
    }

    /// Create a Conditional Probability Distribution `Factor` for `var` given `parents`.
    ///
    /// The scope of the resulting `Factor` is ```parents U { var }``` with `var` as the last
    /// dimension of the table. Each row of the table (i.e. each assignment to the parents) must
    /// be a distribution over `var`.
    pub fn cpd(var: Variable, parents: Vec<Variable>, table: Table) -> Result<Self> {
        let mut scope = parents;
        scope.push(var);

        let f = Factor::build(scope, table, true)?;

        if let Factor::TableFactor { ref table, .. } = f {
            let last = table.ndim() - 1;
            let normalized = table
                .sum_axis(Axis(last))
                .iter()
                .all(|&z| (z - 1.0).abs() < 1e-6);
            if !normalized {
                return Err(PearlError::NotACpd);
            }
        }

        Ok(f)
    }

    fn build(scope: Vec<Variable>, table: Table, cpd: bool) -> Result<Self> {
        if scope.is_empty() || scope.len() != table.ndim() {
            return Err(PearlError::InvalidScope);
        }

        for (v, t) in scope.iter().map(|v| v.cardinality()).zip(table.shape().iter()) {
            if v != *t {
                return Err(PearlError::InvalidScope);
            }
        }

        // factors may not have negative values
        if table.iter().any(|&v| v < 0.0) {
            return Err(PearlError::General(String::from(
                "factor tables may not contain negative values",
            )));
        }

        Ok(Factor::TableFactor { scope, table, cpd })
    }

    /// Check if the `Factor` is the identity `Factor`
    pub fn is_identity(&self) -> bool {
        matches!(self, Factor::Identity)
    }

    /// Check if the `Factor` is a Conditional Probability Distribution.
    ///
    /// # Note
    /// A conditional probability distribution is a specialization of a `Factor`. All CPDs are
    /// `Factor`s, but not all `Factor`s are CPDs. The identity `Factor` is considered a CPD.
    pub fn is_cpd(&self) -> bool {
        match self {
            Factor::Identity => true,
            Factor::TableFactor { cpd, .. } => *cpd,
        }
    }

    /// Retrieve the scope of the `Factor`.
    ///
    /// # Note
    /// This method returns a clone of the `Factor`'s scope. `Variable`s are lightweight and
    /// therefore this is an acceptable overhead
    pub fn scope(&self) -> Vec<Variable> {
        match self {
            Factor::Identity => vec![],
            Factor::TableFactor { scope, .. } => scope.clone(),
        }
    }

    /// Borrow the value table of the `Factor`, if it has one.
    pub fn table(&self) -> Option<&Table> {
        match self {
            Factor::Identity => None,
            Factor::TableFactor { table, .. } => Some(table),
        }
    }

    /// Retrieve the value for a complete assignment over the scope of this `Factor`.
    ///
    /// The assignment's scope may be a superset of the `Factor`'s scope.
    ///
    /// # Errors
    /// * `PearlError::General` if the `Factor` is the identity
    /// * `PearlError::IncompleteAssignment` if the assignment does not cover the scope
    pub fn value(&self, assignment: &Assignment) -> Result<f64> {
        match self {
            Factor::Identity => Err(PearlError::General(String::from(
                "the identity factor has no value",
            ))),
            Factor::TableFactor { scope, table, .. } => {
                let idxs: Vec<Option<&usize>> = scope.iter().map(|v| assignment.get(v)).collect();
                if idxs.iter().any(|v| v.is_none()) {
                    return Err(PearlError::IncompleteAssignment);
                }

                let idxs: Vec<usize> = idxs.iter().map(|v| *(v.unwrap())).collect();
                Ok(table[nd::IxDyn(&idxs)])
            }
        }
    }

    /// Product of this `Factor` and another `Factor`.
    ///
    /// Defined in Koller & Friedman Section 4.2.1. Disjoint scopes yield the outer product,
    /// which keeps the sum-product eliminations well defined on disconnected structures.
    ///
    /// # Returns
    /// A new `Factor` of scope union(self.scope(), other.scope())
    pub fn product(&self, other: &Self) -> Result<Self> {
        // Factor::Identity is the multiplicative identity
        if let Factor::Identity = self {
            return Ok(other.clone());
        } else if let Factor::Identity = other {
            return Ok(self.clone());
        }

        // We are computing a new factor Psi(X, Y, Z) = phi1(X, Y) * phi2(Y, Z).
        // See Koller & Friedman Definition 4.2
        let mut new_scope = self.scope();
        for v in other.scope() {
            if !new_scope.contains(&v) {
                new_scope.push(v);
            }
        }

        let new_shape: Vec<usize> = new_scope.iter().map(|v| v.cardinality()).collect();
        let mut tbl = nd::Array::ones(new_shape).into_dyn();

        for assn in all_assignments(&new_scope) {
            // For each assignment, multiply the values in each and store the result in the
            // new table.
            //
            // Unwrapping here is safe because a failed lookup should be impossible if
            // invariants are maintained
            let phi1_val = self.value(&assn).unwrap();
            let phi2_val = other.value(&assn).unwrap();

            let idx: Vec<usize> = new_scope.iter().map(|v| *assn.get(v).unwrap()).collect();
            tbl[nd::IxDyn(&idx)] = phi1_val * phi2_val;
        }

        Factor::new(new_scope, tbl)
    }

    /// Reduce the `Factor` over the given partial assignment.
    ///
    /// Defined in Koller & Friedman 4.2.3
    ///
    /// # Returns
    /// A new `Factor` whose scope holds the variables of `self` that are not assigned. Reducing
    /// over a complete assignment yields the identity `Factor`.
    pub fn reduce(&self, assignment: &Assignment) -> Self {
        match self {
            Factor::Identity => Factor::Identity,
            Factor::TableFactor { scope, table, .. } => {
                let mut new_scope: Vec<Variable> = Vec::new();
                let mut removals: Vec<(usize, usize)> = Vec::new();

                for (i, v) in scope.iter().enumerate() {
                    if let Some(&val) = assignment.get(v) {
                        removals.push((i, val));
                    } else {
                        new_scope.push(*v);
                    }
                }

                if new_scope.is_empty() {
                    // complete assignment
                    Factor::Identity
                } else if new_scope.len() == scope.len() {
                    // empty assignment (relative to scope)
                    self.clone()
                } else {
                    // drop the assigned axes; highest axis first so indices stay valid
                    let mut view = table.view();
                    for &(axis, val) in removals.iter().rev() {
                        view = view.index_axis_move(Axis(axis), val);
                    }

                    // TODO - what to do if we are reducing a CPD? Renormalize? For now,
                    // returning a non-cpd factor
                    Factor::new(new_scope, view.to_owned())
                        .expect("reduce encountered unexpected error")
                }
            }
        }
    }

    /// Marginalize the `Factor` over the given `Variable`.
    ///
    /// Defined in Koller & Friedman 9.3.1. Marginalizing the last `Variable` out of a scope
    /// yields the identity `Factor` - the remaining constant carries no information once the
    /// result is normalized.
    pub fn marginalize(&self, other: Variable) -> Self {
        match self {
            // the identity factor marginalized over anything is the identity
            Factor::Identity => Factor::Identity,

            Factor::TableFactor { scope, table, .. } => {
                if let Some(idx) = scope.iter().position(|&v| v == other) {
                    let new_scope: Vec<Variable> =
                        scope.iter().cloned().filter(|&v| v != other).collect();
                    if new_scope.is_empty() {
                        return Factor::Identity;
                    }

                    let new_table = table.sum_axis(Axis(idx));
                    Factor::new(new_scope, new_table)
                        .expect("marginalize encountered error that should never occur")
                } else {
                    // variable not in the scope of this factor, so the factor is already
                    // marginalized over the variable
                    self.clone()
                }
            }
        }
    }

    /// Normalize the `Factor` so that its values sum to one.
    ///
    /// # Errors
    /// * `PearlError::DivideByZero` if all values of the `Factor` are zero
    pub fn normalize(&self) -> Result<Self> {
        match self {
            Factor::Identity => Ok(Factor::Identity),
            Factor::TableFactor { scope, table, .. } => {
                let z = table.sum();
                if z == 0.0 {
                    return Err(PearlError::DivideByZero);
                }

                Ok(Factor::TableFactor {
                    scope: scope.clone(),
                    table: table / z,
                    cpd: true,
                })
            }
        }
    }

    /// The complete assignment to the `Factor`'s scope with the highest value.
    ///
    /// Ties keep the first assignment in row-major table order.
    ///
    /// # Errors
    /// * `PearlError::General` if the `Factor` is the identity
    pub fn argmax(&self) -> Result<Assignment> {
        match self {
            Factor::Identity => Err(PearlError::General(String::from(
                "the identity factor has no argmax",
            ))),
            Factor::TableFactor { scope, table, .. } => {
                let mut best: Option<(Vec<usize>, f64)> = None;
                for (idx, &val) in table.indexed_iter() {
                    let better = match best {
                        Some((_, b)) => val > b,
                        None => true,
                    };
                    if better {
                        best = Some((idx.slice().to_vec(), val));
                    }
                }

                // a TableFactor is never empty, so best is always Some
                let (idx, _) = best.unwrap();
                let mut assn = Assignment::new();
                for (v, val) in scope.iter().zip(idx) {
                    assn.set(v, val);
                }

                Ok(assn)
            }
        }
    }
}
