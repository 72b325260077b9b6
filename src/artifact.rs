//! Model persistence.
//!
//! A `ModelArtifact` is the serializable form of a fitted `DirectedModel`: one entry per
//! variable, in the model's topological order, holding the variable's name, its observation
//! labels, its parent names and its flattened CPD table. The artifact is written as JSON so
//! a saved model can be inspected with ordinary tools.

use crate::factor::Factor;
use crate::model::{DirectedModel, DirectedModelBuilder};
use crate::util::{PearlError, Result};
use crate::variable::Variable;

use ndarray::IxDyn;
use serde::{Deserialize, Serialize};

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeArtifact {
    pub name: String,

    /// Observation labels, in state order
    pub levels: Vec<String>,

    /// Parent names, in the CPD's scope order
    pub parents: Vec<String>,

    /// The shape of the CPD table: one axis per parent, then the variable itself
    pub shape: Vec<usize>,

    /// The CPD table in row-major order
    pub table: Vec<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Node entries in topological order, parents before children
    pub nodes: Vec<NodeArtifact>,
}

impl ModelArtifact {
    pub fn from_model(model: &DirectedModel) -> Result<ModelArtifact> {
        let mut nodes = Vec::with_capacity(model.num_variables());

        for var in model.variables() {
            let name = model
                .lookup_name(&var)
                .ok_or_else(|| PearlError::UnknownVariable(format!("{}", var)))?;
            let levels = model
                .levels(&var)
                .ok_or_else(|| PearlError::UnknownVariable(String::from(name)))?;

            let parents = model
                .parents(&var)
                .iter()
                .filter_map(|p| model.lookup_name(p))
                .map(String::from)
                .collect();

            let cpd = model
                .cpd(&var)
                .ok_or_else(|| PearlError::UnknownVariable(String::from(name)))?;
            let table = cpd.table().ok_or(PearlError::NotACpd)?;

            nodes.push(NodeArtifact {
                name: String::from(name),
                levels: levels.to_vec(),
                parents,
                shape: table.shape().to_vec(),
                table: table.iter().copied().collect(),
            });
        }

        Ok(ModelArtifact { nodes })
    }

    /// Rebuild a `DirectedModel` from the artifact.
    ///
    /// # Errors
    /// * `PearlError::MissingParent` if a node's parent has no earlier entry
    /// * `PearlError::InvalidScope` if a table does not match its declared shape
    pub fn into_model(self) -> Result<DirectedModel> {
        let mut vars: HashMap<String, Variable> = HashMap::new();
        let mut builder = DirectedModelBuilder::new();

        for node in self.nodes {
            let var = Variable::discrete(node.levels.len());

            let mut parent_vars = Vec::with_capacity(node.parents.len());
            for parent in &node.parents {
                let parent_var = vars.get(parent).ok_or(PearlError::MissingParent)?;
                parent_vars.push(*parent_var);
            }

            let table = crate::factor::Table::from_shape_vec(IxDyn(&node.shape), node.table)
                .map_err(|_| PearlError::InvalidScope)?;
            let cpd = Factor::cpd(var, parent_vars.clone(), table)?;

            builder = builder.with_variable(
                &var,
                &node.name,
                node.levels,
                &parent_vars.into_iter().collect::<HashSet<Variable>>(),
                cpd,
            );
            vars.insert(node.name, var);
        }

        builder.build()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<ModelArtifact> {
        let file = File::open(path.as_ref())?;
        let artifact = serde_json::from_reader(BufReader::new(file))?;
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::estimate::fit;
    use crate::structure::Structure;
    use crate::variable::Assignment;

    fn model() -> DirectedModel {
        let data = Dataset::from_columns(vec![
            ("A", vec!["0", "0", "1", "1"]),
            ("forecast", vec!["dn", "up", "up", "up"]),
        ])
        .unwrap();

        let mut structure = Structure::new(vec!["A", "forecast"]).unwrap();
        structure.add_edge("A", "forecast").unwrap();

        fit(&structure, &data).unwrap()
    }

    fn joint(model: &DirectedModel, a_value: usize, f_value: usize) -> f64 {
        let a = *model.lookup_variable("A").unwrap();
        let f = *model.lookup_variable("forecast").unwrap();

        let mut assignment = Assignment::new();
        assignment.set(&a, a_value);
        assignment.set(&f, f_value);
        model.probability(&assignment).unwrap()
    }

    #[test]
    fn round_trip_preserves_the_distribution() {
        let original = model();
        let artifact = ModelArtifact::from_model(&original).unwrap();
        let restored = artifact.into_model().unwrap();

        assert_eq!(original.names(), restored.names());
        for a in 0..2 {
            for f in 0..2 {
                let lhs = joint(&original, a, f);
                let rhs = joint(&restored, a, f);
                assert!((lhs - rhs).abs() < 1e-12);
            }
        }

        let f = *restored.lookup_variable("forecast").unwrap();
        assert_eq!(
            Some(&["dn".to_string(), "up".to_string()][..]),
            restored.levels(&f)
        );
        assert_eq!(1, restored.parents(&f).len());
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let original = model();
        ModelArtifact::from_model(&original).unwrap().save(&path).unwrap();

        let restored = ModelArtifact::load(&path).unwrap().into_model().unwrap();
        assert_eq!(original.names(), restored.names());
        assert!((joint(&original, 0, 1) - joint(&restored, 0, 1)).abs() < 1e-12);
    }

    #[test]
    fn missing_parent_entry_is_rejected() {
        let artifact = ModelArtifact {
            nodes: vec![NodeArtifact {
                name: String::from("B"),
                levels: vec![String::from("0"), String::from("1")],
                parents: vec![String::from("A")],
                shape: vec![2, 2],
                table: vec![0.5, 0.5, 0.5, 0.5],
            }],
        };

        assert!(matches!(
            artifact.into_model(),
            Err(PearlError::MissingParent)
        ));
    }
}
