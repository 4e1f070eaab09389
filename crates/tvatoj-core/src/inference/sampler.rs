//! Built-in MCMC engine: adaptive componentwise random-walk Metropolis.
//!
//! Each chain sweeps the flattened parameter vector, proposing a normal step
//! per parameter and accepting by the Metropolis rule on the log-posterior
//! difference. Per-participant error terms only touch that participant's
//! rows, so their conditionals are evaluated against a cached per-participant
//! likelihood; population-level parameters trigger a full recomputation.
//!
//! Proposal scales adapt during the tuning phase (Robbins–Monro toward the
//! target acceptance rate) and are frozen for the draw phase. Chains run in
//! parallel via rayon and are deterministic given the settings seed.

use rand::prelude::*;
use rand_distr::StandardNormal;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::summary::{PosteriorSummary, VariableSummary};
use super::{FitEngine, InferenceError};
use crate::constants::{CRED_MASS, DEFAULT_SEED};
use crate::hdi::hdi_of_samples;
use crate::model::HierarchicalModel;

/// How many jittered starting points to try before giving up on a chain.
const MAX_START_ATTEMPTS: usize = 20;

/// Bounds keeping adapted proposal scales sane.
const SCALE_MIN: f64 = 1e-6;
const SCALE_MAX: f64 = 10.0;

/// MCMC sampler settings.
///
/// Defaults: 2000 retained draws after 1000 tuning sweeps, 4 chains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplerSettings {
    /// Retained draws per chain (after tuning).
    pub draws: usize,
    /// Tuning sweeps per chain; discarded, used only for scale adaptation.
    pub tune: usize,
    /// Number of independent chains.
    pub chains: usize,
    /// Acceptance rate the scale adaptation steers toward. 0.44 is the
    /// componentwise random-walk optimum.
    pub target_accept: f64,
    /// Base RNG seed; chain `c` uses `seed + c`.
    pub seed: u64,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            draws: 2000,
            tune: 1000,
            chains: 4,
            target_accept: 0.44,
            seed: DEFAULT_SEED,
        }
    }
}

impl SamplerSettings {
    /// Create settings with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of retained draws per chain.
    pub fn with_draws(mut self, draws: usize) -> Self {
        self.draws = draws;
        self
    }

    /// Set the number of tuning sweeps per chain.
    pub fn with_tune(mut self, tune: usize) -> Self {
        self.tune = tune;
        self
    }

    /// Set the number of chains.
    pub fn with_chains(mut self, chains: usize) -> Self {
        self.chains = chains;
        self
    }

    /// Set the base RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// The built-in Metropolis engine.
#[derive(Debug, Clone, Default)]
pub struct McmcEngine {
    settings: SamplerSettings,
}

impl McmcEngine {
    /// Create an engine with the given settings.
    pub fn new(settings: SamplerSettings) -> Self {
        Self { settings }
    }

    /// The engine's settings.
    pub fn settings(&self) -> &SamplerSettings {
        &self.settings
    }
}

impl FitEngine for McmcEngine {
    fn fit(
        &self,
        model: &HierarchicalModel,
        vars: &[String],
    ) -> Result<PosteriorSummary, InferenceError> {
        let names = model.summary_names();
        let mut columns = Vec::with_capacity(vars.len());
        for var in vars {
            match names.iter().position(|n| n == var) {
                Some(i) => columns.push(i),
                None => {
                    return Err(InferenceError::UnknownVariable { name: var.clone() });
                }
            }
        }

        let chains = self.settings.chains.max(1);
        tracing::debug!(
            chains,
            draws = self.settings.draws,
            tune = self.settings.tune,
            "drawing posterior sample"
        );

        let chain_results: Vec<Result<Vec<Vec<f64>>, InferenceError>> = (0..chains)
            .into_par_iter()
            .map(|c| {
                run_chain(
                    model,
                    &self.settings,
                    self.settings.seed.wrapping_add(c as u64),
                )
            })
            .collect();

        let mut pooled: Vec<Vec<f64>> = vec![Vec::new(); names.len()];
        for result in chain_results {
            let chain_columns = result?;
            for (q, column) in chain_columns.into_iter().enumerate() {
                pooled[q].extend(column);
            }
        }

        let mut summary = PosteriorSummary::new();
        for (var, &col) in vars.iter().zip(&columns) {
            let draws = &pooled[col];
            let (hdi_low, hdi_high) = hdi_of_samples(draws, CRED_MASS);
            summary.push(
                var.clone(),
                VariableSummary {
                    mean: mean(draws),
                    sd: standard_deviation(draws),
                    hdi_low,
                    hdi_high,
                },
            );
        }
        Ok(summary)
    }
}

/// Run one chain; returns retained draws of the model's summarizable
/// quantities, one column per quantity.
fn run_chain(
    model: &HierarchicalModel,
    settings: &SamplerSettings,
    seed: u64,
) -> Result<Vec<Vec<f64>>, InferenceError> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let dim = model.parameter_len();
    let participants = model.participants();

    let mut position = find_start(model, &mut rng)?;
    let mut prior_terms: Vec<f64> = (0..dim)
        .map(|i| model.log_prior_term(i, position[i]))
        .collect();
    let mut ll_parts: Vec<f64> = (0..participants)
        .map(|p| model.log_likelihood_participant(&position, p))
        .collect();
    let mut ll_total: f64 = ll_parts.iter().sum();
    if !ll_total.is_finite() {
        return Err(InferenceError::NonFiniteStart);
    }

    let mut scales: Vec<f64> = (0..dim).map(|i| model.proposal_scale(i)).collect();
    let mut scratch = vec![0.0; participants];
    let quantity_count = model.summary_names().len();
    let mut columns = vec![Vec::with_capacity(settings.draws); quantity_count];
    let mut draw_buffer = Vec::with_capacity(quantity_count);

    let total_sweeps = settings.tune + settings.draws;
    for sweep in 0..total_sweeps {
        for i in 0..dim {
            let step: f64 = rng.sample(StandardNormal);
            let old = position[i];
            let proposed = old + scales[i] * step;

            let new_prior = model.log_prior_term(i, proposed);
            let log_accept = if new_prior == f64::NEG_INFINITY {
                f64::NEG_INFINITY
            } else {
                position[i] = proposed;
                match model.participant_of(i) {
                    Some(p) => {
                        let new_ll = model.log_likelihood_participant(&position, p);
                        let delta = (new_prior - prior_terms[i]) + (new_ll - ll_parts[p]);
                        if accept(delta, &mut rng) {
                            prior_terms[i] = new_prior;
                            ll_total += new_ll - ll_parts[p];
                            ll_parts[p] = new_ll;
                        } else {
                            position[i] = old;
                        }
                        delta
                    }
                    None => {
                        // population-level parameter: every row is affected
                        for (p, slot) in scratch.iter_mut().enumerate() {
                            *slot = model.log_likelihood_participant(&position, p);
                        }
                        let new_total: f64 = scratch.iter().sum();
                        let delta = (new_prior - prior_terms[i]) + (new_total - ll_total);
                        if accept(delta, &mut rng) {
                            prior_terms[i] = new_prior;
                            ll_parts.copy_from_slice(&scratch);
                            ll_total = new_total;
                        } else {
                            position[i] = old;
                        }
                        delta
                    }
                }
            };

            if sweep < settings.tune {
                let alpha = if log_accept.is_nan() {
                    0.0
                } else {
                    log_accept.min(0.0).exp()
                };
                let eta = ((sweep + 1) as f64).powf(-0.6);
                scales[i] =
                    (scales[i] * (eta * (alpha - settings.target_accept)).exp())
                        .clamp(SCALE_MIN, SCALE_MAX);
            }
        }

        if ll_total.is_nan() {
            return Err(InferenceError::NonFiniteLikelihood { sweep });
        }

        if sweep >= settings.tune {
            model.derived_into(&position, &mut draw_buffer);
            for (q, &value) in draw_buffer.iter().enumerate() {
                columns[q].push(value);
            }
        }
    }

    Ok(columns)
}

/// Metropolis accept decision; NaN deltas always reject.
fn accept<R: Rng>(log_accept: f64, rng: &mut R) -> bool {
    if log_accept.is_nan() {
        return false;
    }
    log_accept >= 0.0 || rng.random::<f64>().ln() < log_accept
}

/// Jitter the model's starting position until the posterior is finite.
fn find_start(
    model: &HierarchicalModel,
    rng: &mut Xoshiro256PlusPlus,
) -> Result<Vec<f64>, InferenceError> {
    let base = model.initial_position();
    for _ in 0..MAX_START_ATTEMPTS {
        let mut candidate = base.clone();
        for (i, value) in candidate.iter_mut().enumerate() {
            let z: f64 = rng.sample(StandardNormal);
            *value += model.proposal_scale(i) * z;
        }
        if model.log_posterior(&candidate).is_finite() {
            return Ok(candidate);
        }
    }
    if model.log_posterior(&base).is_finite() {
        return Ok(base);
    }
    Err(InferenceError::NonFiniteStart)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn standard_deviation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}
