//! Greedy local search over network structures.
//!
//! `HillClimbSearch` starts from the edgeless structure and repeatedly applies the single-edge
//! move (addition, removal or reversal) that most improves the score, stopping when no move
//! improves it or the iteration budget is exhausted. Because the scores are decomposable, the
//! improvement of a move is computed from the local scores of the affected children only.

use crate::dataset::Dataset;
use crate::score::ScoringFunction;
use crate::structure::Structure;
use crate::util::Result;

use std::collections::HashMap;

pub struct HillClimbSearch<'a> {
    data: &'a Dataset,
}

impl<'a> HillClimbSearch<'a> {
    pub fn new(data: &'a Dataset) -> HillClimbSearch<'a> {
        HillClimbSearch { data }
    }

    /// Search for a high-scoring structure over the dataset's columns.
    ///
    /// Runs at most `max_iter` improvement steps. Candidate moves are evaluated in a fixed
    /// order (additions by parent then child position, then removals, then reversals) and
    /// ties are broken in favor of the first candidate found, so the search is deterministic.
    ///
    /// # Returns
    /// The structure at the local optimum (or at the iteration cap), always acyclic.
    pub fn estimate(
        &self,
        score: &dyn ScoringFunction,
        max_iter: usize,
    ) -> Result<Structure> {
        let mut structure = Structure::new(self.data.names())?;

        // local score of every family in the current structure
        let mut locals: HashMap<String, f64> = HashMap::new();
        for name in self.data.names() {
            locals.insert(String::from(name), score.local_score(name, &[])?);
        }

        let names: Vec<String> = self.data.names().map(String::from).collect();

        for iteration in 0..max_iter {
            let mut best: Option<(Structure, Vec<String>)> = None;
            let mut best_delta = 0.0;

            // additions
            for parent in &names {
                for child in &names {
                    if parent == child
                        || structure.has_edge(parent, child)
                        || structure.has_edge(child, parent)
                    {
                        continue;
                    }

                    let mut trial = structure.clone();
                    if trial.add_edge(parent, child).is_err() {
                        continue;
                    }

                    let delta = self.delta(score, &trial, &locals, &[child.as_str()])?;
                    if delta > best_delta {
                        best_delta = delta;
                        best = Some((trial, vec![child.clone()]));
                    }
                }
            }

            let edges: Vec<(String, String)> = structure
                .edges()
                .into_iter()
                .map(|(p, c)| (String::from(p), String::from(c)))
                .collect();

            // removals
            for (parent, child) in &edges {
                let mut trial = structure.clone();
                trial.remove_edge(parent, child)?;

                let delta = self.delta(score, &trial, &locals, &[child.as_str()])?;
                if delta > best_delta {
                    best_delta = delta;
                    best = Some((trial, vec![child.clone()]));
                }
            }

            // reversals
            for (parent, child) in &edges {
                let mut trial = structure.clone();
                if trial.reverse_edge(parent, child).is_err() {
                    continue;
                }

                let delta =
                    self.delta(score, &trial, &locals, &[parent.as_str(), child.as_str()])?;
                if delta > best_delta {
                    best_delta = delta;
                    best = Some((trial, vec![parent.clone(), child.clone()]));
                }
            }

            match best {
                Some((next, changed)) => {
                    for child in &changed {
                        let parents = next.parents_of(child)?;
                        locals.insert(child.clone(), score.local_score(child, &parents)?);
                    }
                    tracing::debug!(iteration, delta = best_delta, "applied best move");
                    structure = next;
                }
                None => break,
            }
        }

        Ok(structure)
    }

    /// The score improvement of a candidate structure over the current one, given the
    /// children whose parent sets changed.
    fn delta(
        &self,
        score: &dyn ScoringFunction,
        trial: &Structure,
        locals: &HashMap<String, f64>,
        changed: &[&str],
    ) -> Result<f64> {
        let mut delta = 0.0;
        for &child in changed {
            let parents = trial.parents_of(child)?;
            delta += score.local_score(child, &parents)? - locals[child];
        }
        Ok(delta)
    }
}
