//! Generative simulation of TOJ experiments.
//!
//! Simulation proceeds in two stages. First, each participant's latent
//! parameters are drawn from the population distributions declared by the
//! design's [`PopulationModel`], truncating negative draws to zero. Second,
//! every trial is simulated as a continuous-time race between the probe and
//! reference channels: each channel's VSTM arrival offset is an exponential
//! variate drawn by inverse-CDF sampling, the probe's arrival is shifted by
//! the SOA, and the trial counts as "probe first" iff the probe arrives
//! strictly earlier.
//!
//! A degenerate rate of zero makes the corresponding arrival time infinite,
//! so a participant whose `C` draw was truncated to zero never reports the
//! probe first. This mirrors the limit behavior of the race and is a
//! documented approximation, not an error.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::dataset::{Cell, TojDataset};
use crate::design::{Design, DesignError, PopulationModel};

/// Per-participant latent parameters, indexed `[participant][condition]`.
///
/// For single-condition designs the inner vectors have length 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantParams {
    /// Overall processing rate per participant and condition, in 1/ms.
    pub c: Vec<Vec<f64>>,
    /// Probe attentional weight per participant and condition.
    pub wp: Vec<Vec<f64>>,
}

/// Draw one value from N(mean, sd), truncated below at zero.
///
/// `sd = 0` is a valid degenerate distribution and returns `mean.max(0)`.
fn draw_clipped<R: Rng>(rng: &mut R, mean: f64, sd: f64) -> f64 {
    let normal = Normal::new(mean, sd).expect("population sd must be finite and non-negative");
    normal.sample(rng).max(0.0)
}

/// Draw every participant's latent parameters for a design.
///
/// Exposed separately from [`simulate`] so population-level properties
/// (e.g. identical participants under zero between-subject spread) can be
/// checked directly.
pub fn draw_participants<R: Rng>(design: &Design, rng: &mut R) -> ParticipantParams {
    let n = design.participants;
    let mut c = Vec::with_capacity(n);
    let mut wp = Vec::with_capacity(n);

    for _ in 0..n {
        match &design.population {
            PopulationModel::BetweenSubjects {
                c_neutral,
                c_attention,
                wp_neutral,
                wp_attention,
            } => {
                c.push(vec![
                    draw_clipped(rng, c_neutral.mean, c_neutral.sd),
                    draw_clipped(rng, c_attention.mean, c_attention.sd),
                ]);
                wp.push(vec![
                    draw_clipped(rng, wp_neutral.mean, wp_neutral.sd),
                    draw_clipped(rng, wp_attention.mean, wp_attention.sd),
                ]);
            }
            PopulationModel::WithinSubjects {
                c: c_pop,
                c_sd_within,
                wp_neutral,
                wp_attention,
            } => {
                // Correlated per-condition Cs around a participant baseline.
                let baseline = draw_clipped(rng, c_pop.mean, c_pop.sd);
                c.push(vec![
                    draw_clipped(rng, baseline, *c_sd_within),
                    draw_clipped(rng, baseline, *c_sd_within),
                ]);
                wp.push(vec![
                    draw_clipped(rng, wp_neutral.mean, wp_neutral.sd),
                    draw_clipped(rng, wp_attention.mean, wp_attention.sd),
                ]);
            }
            PopulationModel::SharedC {
                c: c_pop,
                wp_neutral,
                wp_attention,
            } => {
                let shared = draw_clipped(rng, c_pop.mean, c_pop.sd);
                c.push(vec![shared, shared]);
                wp.push(vec![
                    draw_clipped(rng, wp_neutral.mean, wp_neutral.sd),
                    draw_clipped(rng, wp_attention.mean, wp_attention.sd),
                ]);
            }
            PopulationModel::SingleCondition { c: c_pop, wp: wp_pop } => {
                c.push(vec![draw_clipped(rng, c_pop.mean, c_pop.sd)]);
                wp.push(vec![draw_clipped(rng, wp_pop.mean, wp_pop.sd)]);
            }
        }
    }

    ParticipantParams { c, wp }
}

/// Simulate all repetitions of one (participant, condition, SOA) cell.
///
/// Returns the number of trials where the probe arrived first. The race per
/// trial: reference arrival = `−ln(1−U)/vr`, probe arrival =
/// `SOA − ln(1−U')/vp`.
pub fn simulate_cell<R: Rng>(soa: f64, repetitions: u32, c: f64, wp: f64, rng: &mut R) -> u32 {
    let vp = c * wp;
    let vr = c * (1.0 - wp);
    let mut probe_first = 0;
    for _ in 0..repetitions {
        let u_ref: f64 = rng.random();
        let u_probe: f64 = rng.random();
        let t_ref = -(1.0 - u_ref).ln() / vr;
        let t_probe = soa - (1.0 - u_probe).ln() / vp;
        if t_probe < t_ref {
            probe_first += 1;
        }
    }
    probe_first
}

/// Simulate a full TOJ dataset under a design.
///
/// Rows are emitted participant by participant, SOA by SOA (design order),
/// condition 0 before condition 1 — deterministic for a fixed RNG stream.
pub fn simulate<R: Rng>(design: &Design, rng: &mut R) -> Result<TojDataset, DesignError> {
    design.validate()?;

    let params = draw_participants(design, rng);
    let conditions = design.condition_count();
    let mut cells = Vec::with_capacity(design.cell_count());

    for p in 0..design.participants {
        for (i, &soa) in design.soas.iter().enumerate() {
            for condition in 0..conditions {
                let repetitions = design.repetitions[i];
                let probe_first = simulate_cell(
                    soa,
                    repetitions,
                    params.c[p][condition],
                    params.wp[p][condition],
                    rng,
                );
                cells.push(Cell {
                    participant: p,
                    condition,
                    soa,
                    repetitions,
                    probe_first,
                });
            }
        }
    }

    let dataset = TojDataset::new(cells, design.participants, conditions)
        .expect("simulated cells are within range by construction");
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::Population;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn rng() -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(42)
    }

    fn two_condition_design() -> Design {
        Design::new(
            7,
            vec![-40.0, 0.0, 40.0],
            vec![12, 16, 12],
            PopulationModel::SharedC {
                c: Population::new(0.07, 0.02),
                wp_neutral: Population::new(0.5, 0.005),
                wp_attention: Population::new(0.55, 0.02),
            },
        )
    }

    #[test]
    fn test_row_count_and_order() {
        let design = two_condition_design();
        let dataset = simulate(&design, &mut rng()).unwrap();

        assert_eq!(dataset.len(), 7 * 3 * 2);

        // participant ascending, then SOA design order, then condition 0,1
        let cells = dataset.cells();
        assert_eq!(cells[0].participant, 0);
        assert_eq!(cells[0].soa, -40.0);
        assert_eq!(cells[0].condition, 0);
        assert_eq!(cells[1].condition, 1);
        assert_eq!(cells[2].soa, 0.0);
        assert_eq!(cells[6].participant, 1);
    }

    #[test]
    fn test_counts_within_repetitions() {
        let design = two_condition_design();
        let dataset = simulate(&design, &mut rng()).unwrap();
        for cell in dataset.cells() {
            assert!(cell.probe_first <= cell.repetitions);
        }
    }

    #[test]
    fn test_zero_spread_gives_identical_participants() {
        let design = Design::new(
            6,
            vec![-20.0, 20.0],
            vec![10, 10],
            PopulationModel::SingleCondition {
                c: Population::new(0.1, 0.0),
                wp: Population::new(0.5, 0.0),
            },
        );
        let params = draw_participants(&design, &mut rng());
        for p in 1..6 {
            assert_eq!(params.c[p], params.c[0]);
            assert_eq!(params.wp[p], params.wp[0]);
        }
    }

    #[test]
    fn test_shared_c_reuses_participant_rate() {
        let design = two_condition_design();
        let params = draw_participants(&design, &mut rng());
        for p in 0..7 {
            assert_eq!(params.c[p][0], params.c[p][1]);
        }
    }

    #[test]
    fn test_negative_draws_truncated() {
        // A strongly negative mean forces truncation at zero.
        let design = Design::new(
            20,
            vec![0.0],
            vec![5],
            PopulationModel::SingleCondition {
                c: Population::new(-1.0, 0.1),
                wp: Population::new(0.5, 0.0),
            },
        );
        let params = draw_participants(&design, &mut rng());
        for p in 0..20 {
            assert_eq!(params.c[p][0], 0.0);
        }
    }

    #[test]
    fn test_extreme_soa_saturates_counts() {
        // At a strongly negative SOA the probe almost always wins.
        let mut r = rng();
        let count = simulate_cell(-500.0, 100, 0.1, 0.5, &mut r);
        assert!(count > 90, "expected near-saturated count, got {}", count);

        let count = simulate_cell(500.0, 100, 0.1, 0.5, &mut r);
        assert!(count < 10, "expected near-zero count, got {}", count);
    }

    #[test]
    fn test_invalid_design_is_fatal() {
        let mut design = two_condition_design();
        design.repetitions.pop();
        assert!(simulate(&design, &mut rng()).is_err());
    }
}
