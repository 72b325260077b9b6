//! Forecasting against a fitted model.
//!
//! Each row of a query table is treated as evidence, and the most probable state of the
//! target column is read off the exact posterior computed by variable elimination. Query
//! columns the model does not know are ignored, and the target column itself is never used
//! as evidence even when the query table carries one.

use crate::dataset::Dataset;
use crate::inference::VariableEliminationEngine;
use crate::model::DirectedModel;
use crate::util::{PearlError, Result};
use crate::variable::Assignment;

use std::collections::HashSet;

/// The column the model is asked to forecast.
pub const TARGET: &str = "forecast";

/// Predict the target column for every row of `query`, or `None` if prediction fails.
///
/// Failures (a model without the target node, or evidence values never seen in training) are
/// logged rather than propagated, so a caller can treat an unusable model as "no forecast".
pub fn predict(model: &DirectedModel, query: &Dataset) -> Option<Vec<String>> {
    match try_predict(model, query) {
        Ok(values) => Some(values),
        Err(e) => {
            tracing::error!(error = %e, "prediction failed");
            None
        }
    }
}

/// Predict the most probable state of the target column for every row of `query`.
///
/// # Errors
/// * `PearlError::UnknownVariable` if the model has no target node
/// * `PearlError::UnknownState` if a query value was never observed during fitting
pub fn try_predict(model: &DirectedModel, query: &Dataset) -> Result<Vec<String>> {
    let target = *model
        .lookup_variable(TARGET)
        .ok_or_else(|| PearlError::UnknownVariable(String::from(TARGET)))?;

    // evidence columns: shared between the query table and the model, minus the target
    let evidence_columns: Vec<&str> = query
        .names()
        .filter(|&name| name != TARGET && model.contains(name))
        .collect();

    let mut predictions = Vec::with_capacity(query.num_rows());
    for row in 0..query.num_rows() {
        let mut evidence = Assignment::new();
        for &name in &evidence_columns {
            let var = model
                .lookup_variable(name)
                .ok_or_else(|| PearlError::UnknownVariable(String::from(name)))?;
            let label = query.column(name)?.label(row);
            evidence.set(var, model.level_index(var, label)?);
        }

        let engine = VariableEliminationEngine::for_directed(model, &evidence);
        let posterior = engine.infer(&HashSet::from([target]))?;

        let best = posterior.argmax()?;
        let state = best
            .get(&target)
            .copied()
            .ok_or(PearlError::IncompleteAssignment)?;

        let levels = model
            .levels(&target)
            .ok_or_else(|| PearlError::UnknownVariable(String::from(TARGET)))?;
        predictions.push(levels[state].clone());
    }

    Ok(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::fit;
    use crate::structure::Structure;

    /// A -> forecast, with forecast deterministically equal to A.
    fn model() -> DirectedModel {
        let data = Dataset::from_columns(vec![
            ("A", vec!["0", "0", "0", "0", "1", "1", "1", "1"]),
            ("forecast", vec!["dn", "dn", "dn", "dn", "up", "up", "up", "up"]),
        ])
        .unwrap();

        let mut structure = Structure::new(vec!["A", "forecast"]).unwrap();
        structure.add_edge("A", "forecast").unwrap();

        fit(&structure, &data).unwrap()
    }

    #[test]
    fn most_probable_target_per_row() {
        let model = model();

        let query = Dataset::from_columns(vec![("A", vec!["1", "0", "1"])]).unwrap();
        let predicted = try_predict(&model, &query).unwrap();
        assert_eq!(vec!["up", "dn", "up"], predicted);
    }

    #[test]
    fn target_column_in_query_is_ignored() {
        let model = model();

        // the forecast column disagrees with every correct answer; using it as evidence
        // would flip the predictions
        let query = Dataset::from_columns(vec![
            ("A", vec!["1", "0", "1"]),
            ("forecast", vec!["dn", "up", "dn"]),
        ])
        .unwrap();

        let predicted = try_predict(&model, &query).unwrap();
        assert_eq!(vec!["up", "dn", "up"], predicted);
    }

    #[test]
    fn unknown_query_columns_are_ignored() {
        let model = model();

        let query = Dataset::from_columns(vec![
            ("A", vec!["0", "1"]),
            ("Volume", vec!["low", "high"]),
        ])
        .unwrap();

        let predicted = try_predict(&model, &query).unwrap();
        assert_eq!(vec!["dn", "up"], predicted);
    }

    #[test]
    fn unseen_evidence_value_fails() {
        let model = model();

        let query = Dataset::from_columns(vec![("A", vec!["2"])]).unwrap();
        assert!(matches!(
            try_predict(&model, &query),
            Err(PearlError::UnknownState { .. })
        ));
        assert!(predict(&model, &query).is_none());
    }

    #[test]
    fn model_without_target_fails() {
        let data = Dataset::from_columns(vec![
            ("A", vec!["0", "1"]),
            ("B", vec!["0", "1"]),
        ])
        .unwrap();
        let structure = Structure::new(vec!["A", "B"]).unwrap();
        let model = fit(&structure, &data).unwrap();

        let query = Dataset::from_columns(vec![("A", vec!["0"])]).unwrap();
        assert!(predict(&model, &query).is_none());
    }
}
