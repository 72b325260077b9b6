//! Definition of the variable module
//!
//! A `Variable` represents a discrete random variable in a Probabilistic Graphical Model.
//! `Variable`s are lightweight, copyable handles: two calls to a constructor always yield
//! distinct variables, even with the same cardinality.

use itertools::Itertools;

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A discrete random variable taking values in `0..cardinality`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    id: usize,
    cardinality: usize,
}

impl Variable {
    /// Construct a new binary `Variable`
    pub fn binary() -> Variable {
        Variable::discrete(2)
    }

    /// Construct a new `Variable` with the given number of values
    pub fn discrete(cardinality: usize) -> Variable {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        Variable { id, cardinality }
    }

    /// The unique identifier of this `Variable`
    pub fn id(&self) -> usize {
        self.id
    }

    /// The number of values this `Variable` can take
    pub fn cardinality(&self) -> usize {
        self.cardinality
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "X{}", self.id)
    }
}

/// An `Assignment` maps `Variable`s to one of their values.
///
/// An assignment is *complete* with respect to a scope if every `Variable` in the scope has a
/// value; otherwise it is partial (e.g. evidence for an inference query).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Assignment {
    values: HashMap<Variable, usize>,
}

impl Assignment {
    pub fn new() -> Assignment {
        Assignment {
            values: HashMap::new(),
        }
    }

    /// Assign a value to a `Variable`.
    ///
    /// # Panics
    /// if `value` is out of range for the `Variable` - assignments are always constructed from
    /// validated values, so this is a programming error.
    pub fn set(&mut self, var: &Variable, value: usize) {
        if value >= var.cardinality() {
            panic!(
                "invalid value ({}) for variable with cardinality ({})",
                value,
                var.cardinality()
            );
        }

        self.values.insert(*var, value);
    }

    /// Get the value assigned to a `Variable`, if any
    pub fn get(&self, var: &Variable) -> Option<&usize> {
        self.values.get(var)
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.values.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &usize)> {
        self.values.iter()
    }
}

/// Enumerate every complete `Assignment` over the given scope.
///
/// Assignments are yielded in row-major order: the last `Variable` in the scope varies fastest.
pub fn all_assignments(scope: &[Variable]) -> impl Iterator<Item = Assignment> {
    let scope: Vec<Variable> = scope.to_vec();
    let ranges: Vec<std::ops::Range<usize>> = scope.iter().map(|v| 0..v.cardinality()).collect();

    ranges
        .into_iter()
        .multi_cartesian_product()
        .map(move |values| {
            let mut assignment = Assignment::new();
            for (var, value) in scope.iter().zip(values) {
                assignment.set(var, value);
            }
            assignment
        })
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn distinct_ids() {
        let a = Variable::binary();
        let b = Variable::binary();

        assert_ne!(a, b);
        assert_eq!(a.cardinality(), b.cardinality());
        assert_eq!(a, a.clone());
    }

    #[test]
    fn cardinality() {
        let v = Variable::discrete(5);
        assert_eq!(5, v.cardinality());
    }

    #[test]
    fn assignment() {
        let a = Variable::binary();
        let b = Variable::discrete(3);

        let mut assn = Assignment::new();
        assert!(assn.is_empty());
        assert_eq!(None, assn.get(&a));

        assn.set(&a, 1);
        assn.set(&b, 2);
        assert_eq!(2, assn.len());
        assert_eq!(Some(&1), assn.get(&a));
        assert_eq!(Some(&2), assn.get(&b));
        assert!(assn.contains(&b));

        // re-assignment overwrites
        assn.set(&b, 0);
        assert_eq!(Some(&0), assn.get(&b));
        assert_eq!(2, assn.len());
    }

    #[test]
    #[should_panic]
    fn assignment_out_of_range() {
        let a = Variable::discrete(3);
        let mut assn = Assignment::new();
        assn.set(&a, 3);
    }

    #[test]
    fn all_assignments_order() {
        let a = Variable::discrete(3);
        let b = Variable::binary();

        let assignments: Vec<Assignment> = all_assignments(&[a, b]).collect();
        assert_eq!(6, assignments.len());

        // row-major: b varies fastest
        let expected = [(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)];
        for (assn, (x, y)) in assignments.iter().zip(expected.iter()) {
            assert_eq!(Some(x), assn.get(&a));
            assert_eq!(Some(y), assn.get(&b));
        }
    }
}
