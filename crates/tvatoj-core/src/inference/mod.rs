//! Posterior inference for the hierarchical TVA-TOJ model.
//!
//! Fitting is a seam: the power estimator talks to a [`FitEngine`], which
//! consumes a declared [`HierarchicalModel`](crate::model::HierarchicalModel)
//! and returns a [`PosteriorSummary`] for a requested set of quantities.
//! The built-in engine ([`McmcEngine`]) runs adaptive componentwise
//! random-walk Metropolis chains; alternative engines can be plugged in
//! without touching the control loop.

mod sampler;
mod summary;

pub use sampler::{McmcEngine, SamplerSettings};
pub use summary::{PosteriorSummary, VariableSummary};

use crate::model::HierarchicalModel;

/// A fitting capability: draw from the posterior of a declared model and
/// summarize the named quantities.
///
/// A fit is a single blocking call. Engines may parallelize internally
/// (e.g. across chains); that parallelism is invisible to callers.
pub trait FitEngine {
    /// Fit `model` and summarize the quantities named in `vars`.
    ///
    /// `vars` must use exact summary names (indexed where applicable, e.g.
    /// `wp_mu[0]`); base-name expansion is the caller's concern.
    fn fit(
        &self,
        model: &HierarchicalModel,
        vars: &[String],
    ) -> Result<PosteriorSummary, InferenceError>;
}

/// Errors raised by a fitting engine. Fatal for the surrounding run.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// No finite starting point could be found for a chain.
    NonFiniteStart,
    /// The likelihood became non-finite during sampling.
    NonFiniteLikelihood { sweep: usize },
    /// A requested summary variable is not part of the model's vocabulary.
    UnknownVariable { name: String },
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferenceError::NonFiniteStart => {
                write!(f, "no finite log posterior at any candidate starting point")
            }
            InferenceError::NonFiniteLikelihood { sweep } => {
                write!(f, "log likelihood became non-finite at sweep {}", sweep)
            }
            InferenceError::UnknownVariable { name } => {
                write!(f, "unknown posterior variable '{}'", name)
            }
        }
    }
}

impl std::error::Error for InferenceError {}
