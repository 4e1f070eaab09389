//! Hierarchical non-centered TVA-TOJ model declaration.
//!
//! The model ties every observed cell count to population-level parameters
//! through per-participant deviations:
//!
//! - per C-group: rate mean ~ Normal(0.080, 0.050), between-subject spread
//!   ~ HalfCauchy(0.1); symmetric construction for wp-groups with
//!   Normal(0.5, 0.2) and HalfCauchy(0.2);
//! - per (participant, group): a standard-normal error term, scaled by the
//!   group spread and added to the group mean (non-centered
//!   reparameterization), clipped to [0, 1];
//! - per row: success probability θ from the psychometric function with the
//!   resolved (C, wp), and a Binomial(repetitions, θ) likelihood at the
//!   observed probe-first count.
//!
//! The non-centered form keeps the group mean and the per-participant offset
//! decoupled in the sampler's geometry; the centered form is known to
//! produce divergent, poorly mixing chains on this model family.
//!
//! Group assignment is controlled by [`ModelFlags`]: each observation's
//! condition id maps either to itself (independent groups) or collapses to
//! group 0 (shared parameter), independently for the C- and wp-groupings.
//!
//! A model handle is bound to its dataset's shape. Between power-estimation
//! iterations only the observed counts are rebound
//! ([`HierarchicalModel::rebind_observed`]); participant count and topology
//! must stay constant across a run.

use serde::{Deserialize, Serialize};
use statrs::function::gamma::ln_gamma;

use crate::constants::{LOG_2PI, THETA_FLOOR};
use crate::dataset::TojDataset;
use crate::psychometric::probe_first_probability_from_rates;

/// Fixed prior hyperparameters of the hierarchical model.
pub mod priors {
    /// Mean of the normal prior on each C-group rate mean, in 1/ms.
    pub const C_MU_MEAN: f64 = 0.080;
    /// Spread of the normal prior on each C-group rate mean.
    pub const C_MU_SD: f64 = 0.050;
    /// Scale of the half-Cauchy prior on each C-group between-subject spread.
    pub const C_SD_SCALE: f64 = 0.1;
    /// Mean of the normal prior on each wp-group mean.
    pub const WP_MU_MEAN: f64 = 0.5;
    /// Spread of the normal prior on each wp-group mean.
    pub const WP_MU_SD: f64 = 0.2;
    /// Scale of the half-Cauchy prior on each wp-group between-subject spread.
    pub const WP_SD_SCALE: f64 = 0.2;
}

/// Topology flags for the model builder.
///
/// `shared_wp` implies `shared_c` and single-condition treatment; the
/// implication is applied by [`ModelFlags::normalized`] before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelFlags {
    /// Collapse all conditions onto a single C-group.
    pub shared_c: bool,
    /// Collapse all conditions onto a single wp-group (single-condition
    /// models only).
    pub shared_wp: bool,
}

impl ModelFlags {
    /// Independent C and wp per condition.
    pub const INDEPENDENT: ModelFlags = ModelFlags {
        shared_c: false,
        shared_wp: false,
    };

    /// Single C shared across conditions, independent wp.
    pub const SHARED_C: ModelFlags = ModelFlags {
        shared_c: true,
        shared_wp: false,
    };

    /// Single C and single wp (single-condition model).
    pub const SHARED_WP: ModelFlags = ModelFlags {
        shared_c: true,
        shared_wp: true,
    };

    /// Apply the `shared_wp ⇒ shared_c` implication.
    pub fn normalized(self) -> Self {
        Self {
            shared_c: self.shared_c || self.shared_wp,
            shared_wp: self.shared_wp,
        }
    }
}

/// Errors raised by the model builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// `shared_wp` requests single-condition treatment, but the dataset
    /// carries more than one condition id.
    SharedWpOnMultiCondition { conditions: usize },
    /// A rebind was attempted with a dataset of different shape.
    ShapeMismatch {
        /// (participants, conditions, rows) the model was built with.
        expected: (usize, usize, usize),
        /// (participants, conditions, rows) of the offered dataset.
        found: (usize, usize, usize),
    },
    /// A rebind dataset row differs from the bound structure in anything
    /// but its observed count.
    RowMismatch { index: usize },
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::SharedWpOnMultiCondition { conditions } => write!(
                f,
                "shared_wp implies a single-condition model, but the dataset has {} conditions",
                conditions
            ),
            ModelError::ShapeMismatch { expected, found } => write!(
                f,
                "dataset shape {:?} does not match the model's bound shape {:?} \
                 (participants, conditions, rows)",
                found, expected
            ),
            ModelError::RowMismatch { index } => write!(
                f,
                "dataset row {} differs from the bound row structure; only observed \
                 counts may change between iterations",
                index
            ),
        }
    }
}

impl std::error::Error for ModelError {}

/// The posterior-summary vocabulary for a given topology.
///
/// Computable without data, so variable selections can be validated before
/// any simulation work. Order matches the draws produced during fitting.
pub fn summary_vocabulary(conditions: usize, flags: ModelFlags) -> Result<Vec<String>, ModelError> {
    let flags = flags.normalized();
    if flags.shared_wp && conditions > 1 {
        return Err(ModelError::SharedWpOnMultiCondition { conditions });
    }
    let c_groups = if flags.shared_c { 1 } else { conditions };
    let wp_groups = if flags.shared_wp { 1 } else { conditions };

    let mut names = Vec::new();
    for g in 0..c_groups {
        names.push(format!("C_mu[{}]", g));
    }
    for g in 0..c_groups {
        names.push(format!("C_sd[{}]", g));
    }
    for h in 0..wp_groups {
        names.push(format!("wp_mu[{}]", h));
    }
    for h in 0..wp_groups {
        names.push(format!("wp_sd[{}]", h));
    }
    for k in 0..conditions {
        names.push(format!("vp_mean[{}]", k));
    }
    for k in 0..conditions {
        names.push(format!("vr_mean[{}]", k));
    }
    if conditions == 2 {
        names.push("va_diff_mean".to_string());
        names.push("vp_diff_mean".to_string());
        names.push("vr_diff_mean".to_string());
        names.push("wpa_mean".to_string());
        names.push("wp_diff_mean".to_string());
    } else {
        names.push("wp_mean".to_string());
    }
    Ok(names)
}

/// Identity of a single free parameter in the flattened position vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParamKind {
    CMu(usize),
    CSd(usize),
    WpMu(usize),
    WpSd(usize),
    CErr { participant: usize, group: usize },
    WpErr { participant: usize, group: usize },
}

/// Index layout of the flattened position vector:
/// `[C_mu | C_sd | wp_mu | wp_sd | C_err | wp_err]`.
#[derive(Debug, Clone, Copy)]
struct ParameterLayout {
    participants: usize,
    c_groups: usize,
    wp_groups: usize,
}

impl ParameterLayout {
    fn len(&self) -> usize {
        2 * self.c_groups
            + 2 * self.wp_groups
            + self.participants * (self.c_groups + self.wp_groups)
    }

    fn c_mu(&self, g: usize) -> usize {
        g
    }

    fn c_sd(&self, g: usize) -> usize {
        self.c_groups + g
    }

    fn wp_mu(&self, h: usize) -> usize {
        2 * self.c_groups + h
    }

    fn wp_sd(&self, h: usize) -> usize {
        2 * self.c_groups + self.wp_groups + h
    }

    fn c_err(&self, p: usize, g: usize) -> usize {
        2 * self.c_groups + 2 * self.wp_groups + p * self.c_groups + g
    }

    fn wp_err(&self, p: usize, h: usize) -> usize {
        2 * self.c_groups
            + 2 * self.wp_groups
            + self.participants * self.c_groups
            + p * self.wp_groups
            + h
    }

    fn kind(&self, idx: usize) -> ParamKind {
        let hyper = 2 * self.c_groups + 2 * self.wp_groups;
        if idx < self.c_groups {
            ParamKind::CMu(idx)
        } else if idx < 2 * self.c_groups {
            ParamKind::CSd(idx - self.c_groups)
        } else if idx < 2 * self.c_groups + self.wp_groups {
            ParamKind::WpMu(idx - 2 * self.c_groups)
        } else if idx < hyper {
            ParamKind::WpSd(idx - 2 * self.c_groups - self.wp_groups)
        } else if idx < hyper + self.participants * self.c_groups {
            let offset = idx - hyper;
            ParamKind::CErr {
                participant: offset / self.c_groups,
                group: offset % self.c_groups,
            }
        } else {
            let offset = idx - hyper - self.participants * self.c_groups;
            ParamKind::WpErr {
                participant: offset / self.wp_groups,
                group: offset % self.wp_groups,
            }
        }
    }
}

/// One bound observation row.
#[derive(Debug, Clone)]
struct Row {
    participant: usize,
    condition: usize,
    c_group: usize,
    wp_group: usize,
    soa: f64,
    repetitions: u32,
    observed: u32,
    /// ln C(repetitions, observed); constant per binding.
    ln_choose: f64,
}

/// A declared hierarchical model bound to a dataset's shape.
#[derive(Debug, Clone)]
pub struct HierarchicalModel {
    participants: usize,
    conditions: usize,
    c_groups: usize,
    wp_groups: usize,
    flags: ModelFlags,
    layout: ParameterLayout,
    rows: Vec<Row>,
    rows_by_participant: Vec<Vec<usize>>,
}

impl HierarchicalModel {
    /// Declare the model for a dataset under the given topology flags.
    pub fn new(dataset: &TojDataset, flags: ModelFlags) -> Result<Self, ModelError> {
        let flags = flags.normalized();
        if flags.shared_wp && dataset.conditions() > 1 {
            return Err(ModelError::SharedWpOnMultiCondition {
                conditions: dataset.conditions(),
            });
        }

        let participants = dataset.participants();
        let conditions = dataset.conditions();
        let c_groups = if flags.shared_c { 1 } else { conditions };
        let wp_groups = if flags.shared_wp { 1 } else { conditions };

        let mut rows = Vec::with_capacity(dataset.len());
        let mut rows_by_participant = vec![Vec::new(); participants];
        for cell in dataset.cells() {
            rows_by_participant[cell.participant].push(rows.len());
            rows.push(Row {
                participant: cell.participant,
                condition: cell.condition,
                c_group: if flags.shared_c { 0 } else { cell.condition },
                wp_group: if flags.shared_wp { 0 } else { cell.condition },
                soa: cell.soa,
                repetitions: cell.repetitions,
                observed: cell.probe_first,
                ln_choose: ln_binomial_coefficient(cell.repetitions, cell.probe_first),
            });
        }

        Ok(Self {
            participants,
            conditions,
            c_groups,
            wp_groups,
            flags,
            layout: ParameterLayout {
                participants,
                c_groups,
                wp_groups,
            },
            rows,
            rows_by_participant,
        })
    }

    /// Rebind only the observed counts to a fresh dataset of identical shape.
    ///
    /// Everything except the probe-first counts must match the bound
    /// structure; participant count and topology are constant across a run.
    pub fn rebind_observed(&mut self, dataset: &TojDataset) -> Result<(), ModelError> {
        let expected = (self.participants, self.conditions, self.rows.len());
        let found = (dataset.participants(), dataset.conditions(), dataset.len());
        if expected != found {
            return Err(ModelError::ShapeMismatch { expected, found });
        }
        for (index, (row, cell)) in self.rows.iter().zip(dataset.cells()).enumerate() {
            if row.participant != cell.participant
                || row.condition != cell.condition
                || row.soa != cell.soa
                || row.repetitions != cell.repetitions
            {
                return Err(ModelError::RowMismatch { index });
            }
        }
        for (row, cell) in self.rows.iter_mut().zip(dataset.cells()) {
            row.observed = cell.probe_first;
            row.ln_choose = ln_binomial_coefficient(cell.repetitions, cell.probe_first);
        }
        Ok(())
    }

    /// Number of participants the model is bound to.
    pub fn participants(&self) -> usize {
        self.participants
    }

    /// Number of condition ids in the bound dataset.
    pub fn conditions(&self) -> usize {
        self.conditions
    }

    /// Number of distinct C-groups (1 if C is shared).
    pub fn c_group_count(&self) -> usize {
        self.c_groups
    }

    /// Number of distinct wp-groups (1 if wp is shared).
    pub fn wp_group_count(&self) -> usize {
        self.wp_groups
    }

    /// The normalized topology flags.
    pub fn flags(&self) -> ModelFlags {
        self.flags
    }

    /// Number of free parameters in the flattened position vector.
    pub fn parameter_len(&self) -> usize {
        self.layout.len()
    }

    /// Names of all summarizable quantities, in draw order.
    pub fn summary_names(&self) -> Vec<String> {
        summary_vocabulary(self.conditions, self.flags)
            .expect("flags were validated at construction")
    }

    /// The participant a parameter's likelihood contribution is confined
    /// to, or `None` for population-level parameters.
    pub(crate) fn participant_of(&self, idx: usize) -> Option<usize> {
        match self.layout.kind(idx) {
            ParamKind::CErr { participant, .. } | ParamKind::WpErr { participant, .. } => {
                Some(participant)
            }
            _ => None,
        }
    }

    /// Starting position: prior means for the group parameters, moderate
    /// spreads, zeroed error terms.
    pub(crate) fn initial_position(&self) -> Vec<f64> {
        let mut position = vec![0.0; self.layout.len()];
        for g in 0..self.c_groups {
            position[self.layout.c_mu(g)] = priors::C_MU_MEAN;
            position[self.layout.c_sd(g)] = 0.05;
        }
        for h in 0..self.wp_groups {
            position[self.layout.wp_mu(h)] = priors::WP_MU_MEAN;
            position[self.layout.wp_sd(h)] = 0.1;
        }
        position
    }

    /// Initial random-walk proposal scale for a parameter.
    pub(crate) fn proposal_scale(&self, idx: usize) -> f64 {
        match self.layout.kind(idx) {
            ParamKind::CMu(_) => 0.005,
            ParamKind::CSd(_) => 0.01,
            ParamKind::WpMu(_) | ParamKind::WpSd(_) => 0.02,
            ParamKind::CErr { .. } | ParamKind::WpErr { .. } => 0.1,
        }
    }

    /// Log prior density of a single parameter.
    pub(crate) fn log_prior_term(&self, idx: usize, x: f64) -> f64 {
        match self.layout.kind(idx) {
            ParamKind::CMu(_) => normal_lpdf(x, priors::C_MU_MEAN, priors::C_MU_SD),
            ParamKind::CSd(_) => half_cauchy_lpdf(x, priors::C_SD_SCALE),
            ParamKind::WpMu(_) => normal_lpdf(x, priors::WP_MU_MEAN, priors::WP_MU_SD),
            ParamKind::WpSd(_) => half_cauchy_lpdf(x, priors::WP_SD_SCALE),
            ParamKind::CErr { .. } | ParamKind::WpErr { .. } => normal_lpdf(x, 0.0, 1.0),
        }
    }

    /// Resolved per-participant rate for a C-group, clipped to [0, 1].
    fn resolved_c(&self, position: &[f64], p: usize, g: usize) -> f64 {
        let mu = position[self.layout.c_mu(g)];
        let sd = position[self.layout.c_sd(g)];
        let e = position[self.layout.c_err(p, g)];
        (mu + e * sd).clamp(0.0, 1.0)
    }

    /// Resolved per-participant weight for a wp-group, clipped to [0, 1].
    fn resolved_wp(&self, position: &[f64], p: usize, h: usize) -> f64 {
        let mu = position[self.layout.wp_mu(h)];
        let sd = position[self.layout.wp_sd(h)];
        let e = position[self.layout.wp_err(p, h)];
        (mu + e * sd).clamp(0.0, 1.0)
    }

    /// Log likelihood of one participant's rows.
    ///
    /// Returns `-inf` when a resolved rate pair degenerates to zero (the
    /// psychometric ratio is undefined there), which rejects the proposal.
    pub(crate) fn log_likelihood_participant(&self, position: &[f64], p: usize) -> f64 {
        let mut total = 0.0;
        for &ri in &self.rows_by_participant[p] {
            let row = &self.rows[ri];
            let c = self.resolved_c(position, p, row.c_group);
            let w = self.resolved_wp(position, p, row.wp_group);
            let vp = c * w;
            let vr = c * (1.0 - w);
            if vp + vr <= 0.0 {
                return f64::NEG_INFINITY;
            }
            let theta = probe_first_probability_from_rates(row.soa, vp, vr)
                .clamp(THETA_FLOOR, 1.0 - THETA_FLOOR);
            total += row.ln_choose
                + f64::from(row.observed) * theta.ln()
                + f64::from(row.repetitions - row.observed) * (1.0 - theta).ln();
        }
        total
    }

    /// Full log likelihood over all participants.
    pub(crate) fn log_likelihood(&self, position: &[f64]) -> f64 {
        (0..self.participants)
            .map(|p| self.log_likelihood_participant(position, p))
            .sum()
    }

    /// Full unnormalized log posterior at a position.
    pub fn log_posterior(&self, position: &[f64]) -> f64 {
        let mut total = 0.0;
        for idx in 0..self.layout.len() {
            total += self.log_prior_term(idx, position[idx]);
            if total == f64::NEG_INFINITY {
                return total;
            }
        }
        total + self.log_likelihood(position)
    }

    fn condition_c_group(&self, condition: usize) -> usize {
        if self.flags.shared_c {
            0
        } else {
            condition
        }
    }

    fn condition_wp_group(&self, condition: usize) -> usize {
        if self.flags.shared_wp {
            0
        } else {
            condition
        }
    }

    /// Evaluate the summarizable quantities at a position, in the order of
    /// [`HierarchicalModel::summary_names`].
    pub(crate) fn derived_into(&self, position: &[f64], out: &mut Vec<f64>) {
        out.clear();
        for g in 0..self.c_groups {
            out.push(position[self.layout.c_mu(g)]);
        }
        for g in 0..self.c_groups {
            out.push(position[self.layout.c_sd(g)]);
        }
        for h in 0..self.wp_groups {
            out.push(position[self.layout.wp_mu(h)]);
        }
        for h in 0..self.wp_groups {
            out.push(position[self.layout.wp_sd(h)]);
        }

        let n = self.participants as f64;
        let mut vp_mean = vec![0.0; self.conditions];
        let mut vr_mean = vec![0.0; self.conditions];
        let mut wp_cond_mean = vec![0.0; self.conditions];
        for p in 0..self.participants {
            for k in 0..self.conditions {
                let c = self.resolved_c(position, p, self.condition_c_group(k));
                let w = self.resolved_wp(position, p, self.condition_wp_group(k));
                vp_mean[k] += c * w;
                vr_mean[k] += c * (1.0 - w);
                wp_cond_mean[k] += w;
            }
        }
        for k in 0..self.conditions {
            vp_mean[k] /= n;
            vr_mean[k] /= n;
            wp_cond_mean[k] /= n;
        }

        out.extend_from_slice(&vp_mean);
        out.extend_from_slice(&vr_mean);
        if self.conditions == 2 {
            // probe-vs-reference advantage in the attention condition,
            // then between-condition differences
            out.push(vp_mean[1] - vr_mean[1]);
            out.push(vp_mean[1] - vp_mean[0]);
            out.push(vr_mean[1] - vr_mean[0]);
            out.push(wp_cond_mean[1]);
            out.push(wp_cond_mean[1] - wp_cond_mean[0]);
        } else {
            out.push(wp_cond_mean[0]);
        }
    }
}

fn ln_binomial_coefficient(n: u32, k: u32) -> f64 {
    ln_gamma(f64::from(n) + 1.0) - ln_gamma(f64::from(k) + 1.0) - ln_gamma(f64::from(n - k) + 1.0)
}

fn normal_lpdf(x: f64, mean: f64, sd: f64) -> f64 {
    let z = (x - mean) / sd;
    -0.5 * LOG_2PI - sd.ln() - 0.5 * z * z
}

/// Half-Cauchy log density with support [0, ∞).
fn half_cauchy_lpdf(x: f64, scale: f64) -> f64 {
    if x < 0.0 {
        return f64::NEG_INFINITY;
    }
    let ratio = x / scale;
    std::f64::consts::LN_2
        - std::f64::consts::PI.ln()
        - scale.ln()
        - (1.0 + ratio * ratio).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{Design, Population, PopulationModel};
    use crate::simulate::simulate;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn two_condition_dataset() -> TojDataset {
        let design = Design::new(
            4,
            vec![-30.0, 0.0, 30.0],
            vec![10, 10, 10],
            PopulationModel::BetweenSubjects {
                c_neutral: Population::new(0.07, 0.02),
                c_attention: Population::new(0.07, 0.02),
                wp_neutral: Population::new(0.5, 0.005),
                wp_attention: Population::new(0.55, 0.02),
            },
        );
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        simulate(&design, &mut rng).unwrap()
    }

    fn single_condition_dataset() -> TojDataset {
        let design = Design::new(
            5,
            vec![-20.0, 0.0, 20.0],
            vec![10, 10, 10],
            PopulationModel::SingleCondition {
                c: Population::new(0.1, 0.0),
                wp: Population::new(0.5, 0.0),
            },
        );
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        simulate(&design, &mut rng).unwrap()
    }

    #[test]
    fn test_group_counts_follow_flags() {
        let dataset = two_condition_dataset();

        let independent = HierarchicalModel::new(&dataset, ModelFlags::INDEPENDENT).unwrap();
        assert_eq!(independent.c_group_count(), 2);
        assert_eq!(independent.wp_group_count(), 2);

        let shared_c = HierarchicalModel::new(&dataset, ModelFlags::SHARED_C).unwrap();
        assert_eq!(shared_c.c_group_count(), 1);
        assert_eq!(shared_c.wp_group_count(), 2);
    }

    #[test]
    fn test_shared_wp_rejects_two_condition_dataset() {
        let dataset = two_condition_dataset();
        let result = HierarchicalModel::new(&dataset, ModelFlags::SHARED_WP);
        assert_eq!(
            result.unwrap_err(),
            ModelError::SharedWpOnMultiCondition { conditions: 2 }
        );
    }

    #[test]
    fn test_shared_wp_implies_shared_c() {
        let flags = ModelFlags {
            shared_c: false,
            shared_wp: true,
        }
        .normalized();
        assert!(flags.shared_c);

        let dataset = single_condition_dataset();
        let model = HierarchicalModel::new(&dataset, ModelFlags::SHARED_WP).unwrap();
        assert_eq!(model.c_group_count(), 1);
        assert_eq!(model.wp_group_count(), 1);
    }

    #[test]
    fn test_log_posterior_finite_at_start() {
        for (dataset, flags) in [
            (two_condition_dataset(), ModelFlags::INDEPENDENT),
            (two_condition_dataset(), ModelFlags::SHARED_C),
            (single_condition_dataset(), ModelFlags::SHARED_WP),
        ] {
            let model = HierarchicalModel::new(&dataset, flags).unwrap();
            let lp = model.log_posterior(&model.initial_position());
            assert!(lp.is_finite(), "log posterior {} at start", lp);
        }
    }

    #[test]
    fn test_negative_spread_rejected_by_prior() {
        let dataset = single_condition_dataset();
        let model = HierarchicalModel::new(&dataset, ModelFlags::SHARED_WP).unwrap();
        let mut position = model.initial_position();
        // C_sd lives at index c_groups + 0
        position[model.c_group_count()] = -0.01;
        assert_eq!(model.log_posterior(&position), f64::NEG_INFINITY);
    }

    #[test]
    fn test_rebind_accepts_same_shape() {
        let mut model =
            HierarchicalModel::new(&two_condition_dataset(), ModelFlags::INDEPENDENT).unwrap();
        let fresh = two_condition_dataset();
        assert!(model.rebind_observed(&fresh).is_ok());
    }

    #[test]
    fn test_rebind_rejects_shape_mismatch() {
        let mut model =
            HierarchicalModel::new(&two_condition_dataset(), ModelFlags::INDEPENDENT).unwrap();
        let other = single_condition_dataset();
        assert!(matches!(
            model.rebind_observed(&other),
            Err(ModelError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_derived_matches_vocabulary() {
        for (dataset, flags) in [
            (two_condition_dataset(), ModelFlags::INDEPENDENT),
            (two_condition_dataset(), ModelFlags::SHARED_C),
            (single_condition_dataset(), ModelFlags::SHARED_WP),
        ] {
            let model = HierarchicalModel::new(&dataset, flags).unwrap();
            let names = model.summary_names();
            let mut values = Vec::new();
            model.derived_into(&model.initial_position(), &mut values);
            assert_eq!(
                names.len(),
                values.len(),
                "vocabulary and derived draws must align for {:?}",
                flags
            );
        }
    }

    #[test]
    fn test_vocabulary_names() {
        let names = summary_vocabulary(2, ModelFlags::SHARED_C).unwrap();
        assert!(names.contains(&"C_mu[0]".to_string()));
        assert!(!names.contains(&"C_mu[1]".to_string()));
        assert!(names.contains(&"wp_mu[1]".to_string()));
        assert!(names.contains(&"va_diff_mean".to_string()));
        assert!(!names.contains(&"wp_mean".to_string()));

        let names = summary_vocabulary(1, ModelFlags::SHARED_WP).unwrap();
        assert!(names.contains(&"wp_mean".to_string()));
        assert!(!names.contains(&"wpa_mean".to_string()));
    }
}
