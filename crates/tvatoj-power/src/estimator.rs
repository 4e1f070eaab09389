//! The sequential power estimator.
//!
//! Drives repeated simulate→fit→evaluate→persist cycles over a fixed
//! design. Iterations are strictly sequential: the model handle and the
//! output file are shared mutable state, and iteration i+1 only starts
//! after iteration i's row is on disk. The model is declared once on the
//! first iteration; every later iteration rebinds only the observed counts
//! (participant count and topology are constant across a run by
//! precondition).
//!
//! Errors during simulate/fit/evaluate abort the whole run — no retry, no
//! per-iteration recovery. Rows persisted before the failure remain on disk
//! as a partial result.

use std::path::Path;

use indicatif::ProgressBar;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use tvatoj_core::constants::DEFAULT_SEED;
use tvatoj_core::dataset::DatasetError;
use tvatoj_core::design::{Design, DesignError};
use tvatoj_core::hdi::success_rate_hdi;
use tvatoj_core::inference::{
    FitEngine, InferenceError, McmcEngine, PosteriorSummary, SamplerSettings,
};
use tvatoj_core::model::{summary_vocabulary, HierarchicalModel, ModelError, ModelFlags};
use tvatoj_core::simulate::simulate;

use crate::config::{resolve_vars, ConfigError, PowerConfig};
use crate::output::{write_summary, ResultWriter};

/// Control-loop state, reported on the trace level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Before the first iteration.
    Idle,
    /// Simulating a synthetic dataset.
    Simulating,
    /// Drawing and summarizing the posterior.
    Fitting,
    /// Applying the success predicate and updating running statistics.
    Evaluating,
    /// Appending the result row.
    Persisting,
    /// After the final iteration's row is on disk.
    Done,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Simulating => "simulating",
            Phase::Fitting => "fitting",
            Phase::Evaluating => "evaluating",
            Phase::Persisting => "persisting",
            Phase::Done => "done",
        };
        write!(f, "{}", name)
    }
}

struct PhaseTracker {
    current: Phase,
}

impl PhaseTracker {
    fn new() -> Self {
        Self {
            current: Phase::Idle,
        }
    }

    fn enter(&mut self, next: Phase) {
        tracing::trace!("phase {} -> {}", self.current, next);
        self.current = next;
    }
}

/// Running statistics of a power-estimation run. Never rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunningEstimate {
    /// Completed iterations.
    pub iterations: usize,
    /// Iterations whose success predicate held.
    pub successes: usize,
    /// Current success rate.
    pub rate: f64,
    /// Lower bound of the 95% HDI on the success rate, under a
    /// Beta(1 + successes, 1 + failures) posterior.
    pub hdi_low: f64,
    /// Upper bound of the same interval.
    pub hdi_high: f64,
}

impl RunningEstimate {
    /// A fresh estimate with no iterations recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one iteration's outcome and refresh rate and interval.
    pub(crate) fn record(&mut self, success: bool) {
        self.iterations += 1;
        if success {
            self.successes += 1;
        }
        self.rate = self.successes as f64 / self.iterations as f64;
        let (low, high) = success_rate_hdi(self.successes, self.iterations - self.successes);
        self.hdi_low = low;
        self.hdi_high = high;
    }
}

/// Errors that can abort a power-estimation run.
#[derive(Debug)]
pub enum RunError {
    /// Invalid run configuration (fatal, pre-run).
    Config(ConfigError),
    /// Invalid experiment design (fatal, pre-run).
    Design(DesignError),
    /// Simulated data failed validation.
    Dataset(DatasetError),
    /// Model declaration or rebinding failed.
    Model(ModelError),
    /// The inference engine failed; already-persisted rows remain on disk.
    Inference(InferenceError),
    /// Result persistence failed.
    Io(std::io::Error),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Config(e) => write!(f, "configuration error: {}", e),
            RunError::Design(e) => write!(f, "design error: {}", e),
            RunError::Dataset(e) => write!(f, "dataset error: {}", e),
            RunError::Model(e) => write!(f, "model error: {}", e),
            RunError::Inference(e) => write!(f, "inference error: {}", e),
            RunError::Io(e) => write!(f, "output error: {}", e),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Config(e) => Some(e),
            RunError::Design(e) => Some(e),
            RunError::Dataset(e) => Some(e),
            RunError::Model(e) => Some(e),
            RunError::Inference(e) => Some(e),
            RunError::Io(e) => Some(e),
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        RunError::Config(e)
    }
}

impl From<DesignError> for RunError {
    fn from(e: DesignError) -> Self {
        RunError::Design(e)
    }
}

impl From<DatasetError> for RunError {
    fn from(e: DatasetError) -> Self {
        RunError::Dataset(e)
    }
}

impl From<ModelError> for RunError {
    fn from(e: ModelError) -> Self {
        RunError::Model(e)
    }
}

impl From<InferenceError> for RunError {
    fn from(e: InferenceError) -> Self {
        RunError::Inference(e)
    }
}

impl From<std::io::Error> for RunError {
    fn from(e: std::io::Error) -> Self {
        RunError::Io(e)
    }
}

/// Estimate the power of a design by repeated simulated experiments.
///
/// Per iteration: simulate a dataset, fit the hierarchical model, apply
/// `success_predicate` to the posterior summary, update the running
/// success rate and its 95% credible interval, and append a result row to
/// the configured CSV.
///
/// All configuration errors (invalid design, empty variable lists, unknown
/// variable names, flags contradicting the design's condition count) are
/// raised here before any simulation work begins.
pub fn estimate_power<F>(
    design: &Design,
    config: &PowerConfig,
    success_predicate: F,
) -> Result<RunningEstimate, RunError>
where
    F: Fn(&PosteriorSummary) -> bool,
{
    config.validate()?;
    design.validate()?;

    let flags = config.flags.normalized();
    let vocabulary = summary_vocabulary(design.condition_count(), flags)?;
    let goal_vars = resolve_vars(&config.goal_vars, &vocabulary)?;
    let log_vars = resolve_vars(&config.log_vars, &vocabulary)?;

    // the engine summarizes the union; the predicate sees it all, the
    // writer picks out the log subset
    let mut fit_vars = goal_vars;
    for var in &log_vars {
        if !fit_vars.contains(var) {
            fit_vars.push(var.clone());
        }
    }

    tracing::info!(
        iterations = config.iterations,
        participants = design.participants,
        population = %design.population,
        outfile = %config.outfile.display(),
        "starting power estimation"
    );

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed.unwrap_or(DEFAULT_SEED));
    let progress = if config.show_progress {
        ProgressBar::new(config.iterations as u64)
    } else {
        ProgressBar::hidden()
    };

    let writer = ResultWriter::new(&config.outfile, &log_vars);
    let mut phase = PhaseTracker::new();
    let mut model: Option<HierarchicalModel> = None;
    let mut estimate = RunningEstimate::new();

    for iteration in 1..=config.iterations {
        phase.enter(Phase::Simulating);
        let dataset = simulate(design, &mut rng)?;

        phase.enter(Phase::Fitting);
        match model {
            Some(ref mut m) => m.rebind_observed(&dataset)?,
            None => model = Some(HierarchicalModel::new(&dataset, flags)?),
        }
        let bound = model.as_ref().expect("model exists after first iteration");
        let engine = McmcEngine::new(config.sampler.with_seed(rng.random()));
        let summary = engine.fit(bound, &fit_vars)?;

        phase.enter(Phase::Evaluating);
        let success = success_predicate(&summary);
        estimate.record(success);
        tracing::info!(
            "iteration {}/{}: success rate {:.2} [95% HDI: {:.2} to {:.2}]",
            iteration,
            config.iterations,
            estimate.rate,
            estimate.hdi_low,
            estimate.hdi_high
        );

        phase.enter(Phase::Persisting);
        writer.append(&estimate, success, &summary)?;
        progress.inc(1);
    }

    phase.enter(Phase::Done);
    progress.finish();
    Ok(estimate)
}

/// Simulate one dataset under a design, fit it once, and write the full
/// posterior summary to `outfile` (one row per variable).
///
/// A sanity-check companion to [`estimate_power`]: useful for inspecting
/// what the model recovers from a single synthetic experiment before
/// committing to a full power run.
pub fn fit_once(
    design: &Design,
    flags: ModelFlags,
    sampler: SamplerSettings,
    outfile: impl AsRef<Path>,
) -> Result<PosteriorSummary, RunError> {
    design.validate()?;
    let flags = flags.normalized();

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(sampler.seed);
    let dataset = simulate(design, &mut rng)?;
    let model = HierarchicalModel::new(&dataset, flags)?;
    let vars = model.summary_names();
    let summary = McmcEngine::new(sampler).fit(&model, &vars)?;

    write_summary(outfile.as_ref(), &summary)?;
    tracing::info!(
        "model fitted; summary written to {}",
        outfile.as_ref().display()
    );
    Ok(summary)
}
