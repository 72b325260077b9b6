//! Directed graphical models.
//!
//! A `DirectedModel` (a Bayesian network) pairs every `Variable` with a conditional
//! probability distribution over its parents. The joint distribution factors by the chain
//! rule into the product of the per-variable CPDs (Koller & Friedman §3.2.1).
//!
//! Models are immutable once built; use `DirectedModelBuilder` to construct one, adding
//! variables in an order where parents precede their children.

use crate::factor::Factor;
use crate::util::{PearlError, Result};
use crate::variable::{Assignment, Variable};

use bidir_map::BidirMap;
use indexmap::IndexMap;

use std::collections::{HashMap, HashSet};

pub struct DirectedModel {
    /// The variables and their CPDs, in insertion (topological) order
    graph: IndexMap<Variable, Factor>,

    /// Human-readable variable names
    names: BidirMap<Variable, String>,

    /// The observation labels each variable's states were coded from, in code order
    levels: HashMap<Variable, Vec<String>>,
}

impl DirectedModel {
    pub fn num_variables(&self) -> usize {
        self.graph.len()
    }

    /// The variables of the model, parents before children.
    pub fn variables(&self) -> Vec<Variable> {
        self.graph.keys().copied().collect()
    }

    /// The variable names, in the same order as `variables`.
    pub fn names(&self) -> Vec<&str> {
        self.graph
            .keys()
            .filter_map(|v| self.names.get_by_first(v))
            .map(String::as_str)
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup_variable(name).is_some()
    }

    /// The `Variable` with the given name, if any.
    pub fn lookup_variable(&self, name: &str) -> Option<&Variable> {
        self.names.get_by_second(&String::from(name))
    }

    /// The name of the given `Variable`, if it belongs to the model.
    pub fn lookup_name(&self, var: &Variable) -> Option<&str> {
        self.names.get_by_first(var).map(String::as_str)
    }

    /// The CPD of the given `Variable`, if it belongs to the model.
    pub fn cpd(&self, var: &Variable) -> Option<&Factor> {
        self.graph.get(var)
    }

    /// The observation labels of the variable's states, in state order.
    pub fn levels(&self, var: &Variable) -> Option<&[String]> {
        self.levels.get(var).map(Vec::as_slice)
    }

    /// The state of `var` coded by the observation label `value`.
    ///
    /// # Errors
    /// * `PearlError::UnknownVariable` if `var` is not in the model
    /// * `PearlError::UnknownState` if the label was never observed during fitting
    pub fn level_index(&self, var: &Variable, value: &str) -> Result<usize> {
        let levels = self.levels(var).ok_or_else(|| {
            PearlError::UnknownVariable(format!("{}", var))
        })?;

        levels.iter().position(|l| l == value).ok_or_else(|| {
            PearlError::UnknownState {
                column: self
                    .lookup_name(var)
                    .map(String::from)
                    .unwrap_or_else(|| format!("{}", var)),
                value: String::from(value),
            }
        })
    }

    /// The parents of a variable, in the CPD's scope order.
    pub fn parents(&self, var: &Variable) -> Vec<Variable> {
        match self.graph.get(var) {
            Some(cpd) => {
                let mut scope = cpd.scope();
                scope.retain(|v| v != var);
                scope
            }
            None => vec![],
        }
    }

    /// The children of a variable: every variable whose CPD conditions on it.
    pub fn children(&self, var: &Variable) -> Vec<Variable> {
        self.graph
            .keys()
            .filter(|&v| self.parents(v).contains(var))
            .copied()
            .collect()
    }

    /// The Markov blanket of a variable: its parents, children and co-parents. Conditioned
    /// on its blanket, a variable is independent of the rest of the network (Koller &
    /// Friedman §4.5).
    pub fn markov_blanket(&self, var: &Variable) -> Vec<Variable> {
        let mut blanket = HashSet::new();
        blanket.extend(self.parents(var));

        for child in self.children(var) {
            blanket.insert(child);
            blanket.extend(self.parents(&child));
        }
        blanket.remove(var);

        // report in model order
        self.graph
            .keys()
            .filter(|v| blanket.contains(v))
            .copied()
            .collect()
    }

    /// The joint probability of a complete `Assignment`, by the chain rule.
    ///
    /// # Errors
    /// * `PearlError::IncompleteAssignment` if any variable is unassigned
    pub fn probability(&self, assignment: &Assignment) -> Result<f64> {
        self.graph
            .values()
            .try_fold(1.0, |p, cpd| Ok(p * cpd.value(assignment)?))
    }
}

/// Constructs a `DirectedModel`, validating each added family.
///
/// The builder carries any error forward so a chain of `with_variable` calls can be checked
/// once at `build`.
pub struct DirectedModelBuilder {
    model: DirectedModel,
    err: Option<PearlError>,
}

impl DirectedModelBuilder {
    pub fn new() -> DirectedModelBuilder {
        DirectedModelBuilder {
            model: DirectedModel {
                graph: IndexMap::new(),
                names: BidirMap::new(),
                levels: HashMap::new(),
            },
            err: None,
        }
    }

    /// Add a variable with its name, observation labels, parents and CPD.
    ///
    /// Parents must already be in the model, so variables are added parents-first; the CPD's
    /// scope must be exactly the parents followed by the variable itself.
    pub fn with_variable(
        mut self,
        var: &Variable,
        name: &str,
        levels: Vec<String>,
        parents: &HashSet<Variable>,
        cpd: Factor,
    ) -> DirectedModelBuilder {
        if self.err.is_some() {
            return self;
        }

        if let Err(e) = self.add_variable(var, name, levels, parents, cpd) {
            self.err = Some(e);
        }
        self
    }

    /// Finalize the model.
    ///
    /// # Errors
    /// The first error encountered while adding variables, if any.
    pub fn build(self) -> Result<DirectedModel> {
        match self.err {
            Some(e) => Err(e),
            None => Ok(self.model),
        }
    }

    fn add_variable(
        &mut self,
        var: &Variable,
        name: &str,
        levels: Vec<String>,
        parents: &HashSet<Variable>,
        cpd: Factor,
    ) -> Result<()> {
        if self.model.graph.contains_key(var) || self.model.names.get_by_second(&String::from(name)).is_some() {
            return Err(PearlError::DuplicateVariable);
        }

        if parents.iter().any(|p| !self.model.graph.contains_key(p)) {
            return Err(PearlError::MissingParent);
        }

        if !cpd.is_cpd() {
            return Err(PearlError::NotACpd);
        }

        let scope = cpd.scope();
        let scoped: HashSet<Variable> = scope.iter().copied().collect();
        let mut family: HashSet<Variable> = parents.clone();
        family.insert(*var);
        if scoped != family || scope.last() != Some(var) {
            return Err(PearlError::InvalidScope);
        }

        if levels.len() != var.cardinality() {
            return Err(PearlError::General(format!(
                "variable {} has {} states but {} labels were supplied",
                name,
                var.cardinality(),
                levels.len()
            )));
        }

        self.model.graph.insert(*var, cpd);
        self.model.names.insert(*var, String::from(name));
        self.model.levels.insert(*var, levels);
        Ok(())
    }
}

impl Default for DirectedModelBuilder {
    fn default() -> Self {
        DirectedModelBuilder::new()
    }
}
