//! The end-to-end forecasting pipeline.
//!
//! Loads the discretized training table, selects the best structure across the scoring
//! method / iteration budget grid, fits the CPDs, persists the model and its structure
//! rendering, and finally measures the forecast error on a held-out validation table.

use crate::artifact::ModelArtifact;
use crate::dataset::Dataset;
use crate::estimate::fit;
use crate::evaluate::shifted_error;
use crate::predict::{predict, TARGET};
use crate::render::save_dot;
use crate::score::standard_scores;
use crate::selection::select_best;
use crate::util::Result;

use std::fs;
use std::path::{Path, PathBuf};

/// The validation column holding the observed outcomes the forecasts are scored against.
pub const ACTUAL_COLUMN: &str = "Close";

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// The discretized training table
    pub train_data: PathBuf,

    /// The held-out validation table
    pub val_data: PathBuf,

    /// Where to write the fitted model
    pub model_out: PathBuf,

    /// Where to write the DOT rendering of the learned structure
    pub plot_out: PathBuf,

    /// The hill-climbing iteration budgets to sweep
    pub budgets: Vec<usize>,
}

/// Run the full pipeline.
///
/// # Returns
/// The validation error fraction, or `None` if the fitted model could not produce forecasts.
pub fn run(config: &PipelineConfig) -> Result<Option<f64>> {
    let train = Dataset::from_csv_path(&config.train_data)?;
    tracing::info!(
        rows = train.num_rows(),
        columns = train.num_columns(),
        path = %config.train_data.display(),
        "loaded training data"
    );

    let methods = standard_scores(&train);
    let best = select_best(&train, &methods, &config.budgets)?;

    let mut nodes: Vec<&str> = best.structure.nodes().collect();
    nodes.sort_unstable();
    tracing::info!(
        method = best.method.as_str(),
        max_iter = best.max_iter,
        score = best.score,
        "selected best structure"
    );
    tracing::info!(?nodes, edges = ?best.structure.edges(), "best structure");

    let model = fit(&best.structure, &train)?;

    ensure_parent_dir(&config.model_out)?;
    ensure_parent_dir(&config.plot_out)?;
    ModelArtifact::from_model(&model)?.save(&config.model_out)?;
    save_dot(&best.structure, &config.plot_out)?;
    tracing::info!(
        model = %config.model_out.display(),
        plot = %config.plot_out.display(),
        "saved fitted model"
    );

    if let Some(target) = model.lookup_variable(TARGET) {
        let blanket: Vec<&str> = model
            .markov_blanket(target)
            .iter()
            .filter_map(|v| model.lookup_name(v))
            .collect();
        tracing::info!(target = TARGET, ?blanket, "markov blanket of the target");
    }

    let validation = Dataset::from_csv_path(&config.val_data)?;
    let actual = validation.column(ACTUAL_COLUMN)?.labels();

    match predict(&model, &validation) {
        Some(predicted) => {
            let error = shifted_error(&predicted, &actual)?;
            tracing::info!(error_pct = error * 100.0, "validation error");
            Ok(Some(error))
        }
        None => {
            tracing::warn!("model produced no forecasts, skipping error evaluation");
            Ok(None)
        }
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
