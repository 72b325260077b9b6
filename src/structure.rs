//! Directed acyclic network structures.
//!
//! A `Structure` is the graph skeleton of a Bayesian network: a set of nodes named after
//! dataset columns and a set of directed parent -> child edges. Every mutating operation
//! preserves acyclicity, so a `Structure` is a DAG by construction.

use crate::util::{PearlError, Result};

use indexmap::IndexSet;

use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Structure {
    /// Node names in insertion order
    nodes: IndexSet<String>,

    /// Parent sets, indexed by node position
    parents: Vec<BTreeSet<usize>>,
}

impl Structure {
    /// Construct an edgeless `Structure` over the given node names.
    pub fn new<I, S>(nodes: I) -> Result<Structure>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = IndexSet::new();
        for node in nodes {
            if !set.insert(node.into()) {
                return Err(PearlError::DuplicateVariable);
            }
        }

        let parents = vec![BTreeSet::new(); set.len()];
        Ok(Structure { nodes: set, parents })
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.parents.iter().map(BTreeSet::len).sum()
    }

    /// Node names, in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains(name)
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.nodes
            .get_index_of(name)
            .ok_or_else(|| PearlError::UnknownVariable(String::from(name)))
    }

    /// The parents of a node, ordered by node position.
    pub fn parents_of(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.index_of(name)?;
        Ok(self.parents[idx]
            .iter()
            .map(|&p| self.nodes[p].as_str())
            .collect())
    }

    /// All (parent, child) edges, ordered by child then parent position.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        let mut edges = Vec::new();
        for (child, parents) in self.parents.iter().enumerate() {
            for &parent in parents {
                edges.push((self.nodes[parent].as_str(), self.nodes[child].as_str()));
            }
        }
        edges
    }

    pub fn has_edge(&self, parent: &str, child: &str) -> bool {
        match (self.index_of(parent), self.index_of(child)) {
            (Ok(p), Ok(c)) => self.parents[c].contains(&p),
            _ => false,
        }
    }

    /// Add the edge `parent -> child`.
    ///
    /// # Errors
    /// * `PearlError::UnknownVariable` if either endpoint is not a node
    /// * `PearlError::CyclicStructure` if the edge would create a cycle (including self-loops)
    /// * `PearlError::General` if the edge is already present
    pub fn add_edge(&mut self, parent: &str, child: &str) -> Result<()> {
        let p = self.index_of(parent)?;
        let c = self.index_of(child)?;

        if self.parents[c].contains(&p) {
            return Err(PearlError::General(format!(
                "edge {} -> {} is already present",
                parent, child
            )));
        }

        // adding p -> c closes a cycle iff c already reaches p
        if p == c || self.has_path(c, p) {
            return Err(PearlError::CyclicStructure(
                String::from(parent),
                String::from(child),
            ));
        }

        self.parents[c].insert(p);
        Ok(())
    }

    /// Remove the edge `parent -> child`.
    pub fn remove_edge(&mut self, parent: &str, child: &str) -> Result<()> {
        let p = self.index_of(parent)?;
        let c = self.index_of(child)?;

        if !self.parents[c].remove(&p) {
            return Err(PearlError::General(format!(
                "edge {} -> {} is not present",
                parent, child
            )));
        }

        Ok(())
    }

    /// Reverse the edge `parent -> child` to `child -> parent`.
    ///
    /// # Errors
    /// * `PearlError::CyclicStructure` if the reversed edge would create a cycle; the
    ///   structure is left unchanged
    pub fn reverse_edge(&mut self, parent: &str, child: &str) -> Result<()> {
        let p = self.index_of(parent)?;
        let c = self.index_of(child)?;

        if !self.parents[c].remove(&p) {
            return Err(PearlError::General(format!(
                "edge {} -> {} is not present",
                parent, child
            )));
        }

        // with p -> c removed, c -> p closes a cycle iff p still reaches c
        if self.has_path(p, c) {
            self.parents[c].insert(p);
            return Err(PearlError::CyclicStructure(
                String::from(child),
                String::from(parent),
            ));
        }

        self.parents[p].insert(c);
        Ok(())
    }

    /// Depth-first reachability along directed edges.
    fn has_path(&self, from: usize, to: usize) -> bool {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![from];

        while let Some(node) = stack.pop() {
            if node == to {
                return true;
            }
            if visited[node] {
                continue;
            }
            visited[node] = true;

            // children of `node`
            for (child, parents) in self.parents.iter().enumerate() {
                if parents.contains(&node) && !visited[child] {
                    stack.push(child);
                }
            }
        }

        false
    }

    /// Check the DAG invariant via Kahn's algorithm.
    pub fn is_acyclic(&self) -> bool {
        self.topological_order().is_ok()
    }

    /// A topological order of the nodes (parents before children).
    ///
    /// # Errors
    /// * `PearlError::CyclicStructure` if the structure contains a cycle. This is unreachable
    ///   for structures built through the mutating operations, but the invariant is checked
    ///   rather than assumed.
    pub fn topological_order(&self) -> Result<Vec<&str>> {
        let mut in_degree: Vec<usize> = self.parents.iter().map(BTreeSet::len).collect();
        let mut ready: Vec<usize> = (0..self.nodes.len())
            .filter(|&n| in_degree[n] == 0)
            .collect();
        // take the lowest-index ready node first so the order is deterministic
        ready.sort_unstable_by(|a, b| b.cmp(a));

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(node) = ready.pop() {
            order.push(self.nodes[node].as_str());

            let mut unlocked = Vec::new();
            for (child, parents) in self.parents.iter().enumerate() {
                if parents.contains(&node) {
                    in_degree[child] -= 1;
                    if in_degree[child] == 0 {
                        unlocked.push(child);
                    }
                }
            }

            unlocked.sort_unstable_by(|a, b| b.cmp(a));
            ready.extend(unlocked);
            ready.sort_unstable_by(|a, b| b.cmp(a));
        }

        if order.len() != self.nodes.len() {
            return Err(PearlError::CyclicStructure(
                String::from("<cycle>"),
                String::from("<cycle>"),
            ));
        }

        Ok(order)
    }
}
