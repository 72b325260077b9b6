use pearl::pipeline::{run, PipelineConfig};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;
use std::process::ExitCode;

/// Learn a Bayesian network forecaster from a discretized market table and score it against
/// held-out validation data.
#[derive(Debug, Parser)]
#[command(name = "pearl", version, about)]
struct Args {
    /// The discretized training table (CSV, first column is the time index)
    #[arg(long, default_value = "data/train_data.csv")]
    train_data: PathBuf,

    /// The held-out validation table
    #[arg(long, default_value = "data/validation_data.csv")]
    val_data: PathBuf,

    /// Where to write the fitted model
    #[arg(long, default_value = "models/bayesian_model.json")]
    model_out: PathBuf,

    /// Where to write the DOT rendering of the learned structure
    #[arg(long, default_value = "plots/bayesian/structure.dot")]
    plot_out: PathBuf,

    /// Hill-climbing iteration budgets to sweep
    #[arg(long, value_delimiter = ',', default_values_t = [5, 10])]
    max_iters: Vec<usize>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = PipelineConfig {
        train_data: args.train_data,
        val_data: args.val_data,
        model_out: args.model_out,
        plot_out: args.plot_out,
        budgets: args.max_iters,
    };

    match run(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "pipeline failed");
            ExitCode::FAILURE
        }
    }
}
