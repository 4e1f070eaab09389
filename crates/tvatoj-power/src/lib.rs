//! Statistical power estimation for TVA-TOJ experiment designs.
//!
//! Given a hypothetical design (participants, SOAs, repetitions, population
//! truth) this crate repeatedly simulates the experiment, fits the
//! hierarchical TVA-TOJ model to each synthetic dataset, checks a
//! caller-supplied success predicate against the posterior summary, and
//! tracks the fraction of successful simulated experiments together with a
//! 95% credible interval on that fraction.
//!
//! The statistical machinery (simulator, model, MCMC engine, HDI utilities)
//! lives in `tvatoj-core`; this crate owns the sequential control loop,
//! its configuration, and result persistence.
//!
//! ```ignore
//! use tvatoj_core::design::{Design, Population, PopulationModel};
//! use tvatoj_core::model::ModelFlags;
//! use tvatoj_power::{estimate_power, PowerConfig};
//!
//! let design = Design::new(
//!     25,
//!     vec![-60.0, -20.0, 0.0, 20.0, 60.0],
//!     vec![32, 48, 48, 48, 32],
//!     PopulationModel::SingleCondition {
//!         c: Population::new(0.10, 0.02),
//!         wp: Population::new(0.55, 0.05),
//!     },
//! );
//! let config = PowerConfig::new(200, "power.csv")
//!     .with_flags(ModelFlags::SHARED_WP)
//!     .with_goal_vars(["wp_mu"]);
//! let estimate = estimate_power(&design, &config, |summary| {
//!     summary.hdi_low("wp_mu[0]").is_some_and(|v| v > 0.5)
//! })?;
//! ```

pub mod config;
pub mod estimator;
pub mod output;

pub use config::{ConfigError, PowerConfig};
pub use estimator::{estimate_power, fit_once, Phase, RunError, RunningEstimate};
pub use output::ResultWriter;
