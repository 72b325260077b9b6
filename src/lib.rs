//! `pearl` - discrete Bayesian network structure learning and forecasting.
//!
//! The crate learns the structure of a Bayesian network from a discretized time-series
//! table by score-based hill climbing, selects the best structure across a grid of scoring
//! methods and iteration budgets, fits the network's conditional distributions by maximum
//! likelihood, and forecasts a designated target column by exact inference.
//!
//! The factor and model machinery follows the presentation in Koller & Friedman,
//! *Probabilistic Graphical Models* (2009).

pub mod artifact;
pub mod dataset;
pub mod estimate;
pub mod evaluate;
pub mod factor;
pub mod inference;
pub mod model;
pub mod pipeline;
pub mod predict;
pub mod render;
pub mod score;
pub mod search;
pub mod selection;
mod stats;
pub mod structure;
pub mod util;
pub mod variable;

pub use crate::util::{PearlError, Result};

pub use crate::dataset::Dataset;
pub use crate::factor::Factor;
pub use crate::model::{DirectedModel, DirectedModelBuilder};
pub use crate::selection::BestResult;
pub use crate::structure::Structure;
pub use crate::variable::{Assignment, Variable};
