//! Highest-density-interval utilities.
//!
//! [`hdi_of_icdf`] finds the shortest interval containing a target
//! probability mass for any continuous distribution exposing an inverse CDF
//! (anything implementing `statrs::distribution::ContinuousCDF`). The
//! interval width `icdf(mass + t) − icdf(t)` is minimized over the low-tail
//! probability `t` with a derivative-free 1-D Nelder–Mead search seeded at
//! the symmetric-tails guess.
//!
//! [`hdi_of_samples`] is the sample-based counterpart used for posterior
//! draws: the narrowest window over the sorted draws containing the target
//! fraction.

use statrs::distribution::{Beta, ContinuousCDF};

use crate::constants::CRED_MASS;

const MAX_ITERATIONS: usize = 200;
const X_TOL: f64 = 1e-10;
const F_TOL: f64 = 1e-8;

/// Shortest interval of `cred_mass` probability for a continuous
/// distribution, via its inverse CDF.
///
/// Tolerates minimizers that stop at a boundary (e.g. near-degenerate
/// posteriors whose HDI starts at the support edge): the best estimate
/// found is returned rather than an error.
pub fn hdi_of_icdf<D: ContinuousCDF<f64, f64>>(dist: &D, cred_mass: f64) -> (f64, f64) {
    debug_assert!(
        (0.0..1.0).contains(&cred_mass) && cred_mass > 0.0,
        "credible mass must lie in (0, 1), got {}",
        cred_mass
    );
    let tail = 1.0 - cred_mass;
    let width = |t: f64| -> f64 {
        if !(0.0..=tail).contains(&t) {
            return f64::INFINITY;
        }
        dist.inverse_cdf(cred_mass + t) - dist.inverse_cdf(t)
    };

    // symmetric-tails guess, stepped the way scipy's fmin builds its simplex
    let guess = tail / 2.0;
    let low_tail = minimize_scalar(width, guess, guess * 0.05 + 1e-6).clamp(0.0, tail);
    (
        dist.inverse_cdf(low_tail),
        dist.inverse_cdf(cred_mass + low_tail),
    )
}

/// 95% HDI of the success-rate posterior Beta(1 + successes, 1 + failures).
pub fn success_rate_hdi(successes: usize, failures: usize) -> (f64, f64) {
    let beta = Beta::new(1.0 + successes as f64, 1.0 + failures as f64)
        .expect("shape parameters are at least 1");
    hdi_of_icdf(&beta, CRED_MASS)
}

/// Narrowest window over sorted samples containing `cred_mass` of them.
///
/// Returns `(NaN, NaN)` for an empty slice.
pub fn hdi_of_samples(samples: &[f64], cred_mass: f64) -> (f64, f64) {
    if samples.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    let m = ((cred_mass * n as f64).ceil() as usize).clamp(1, n);

    let mut best = (sorted[0], sorted[m - 1]);
    let mut best_width = best.1 - best.0;
    for i in 1..=(n - m) {
        let w = sorted[i + m - 1] - sorted[i];
        if w < best_width {
            best_width = w;
            best = (sorted[i], sorted[i + m - 1]);
        }
    }
    best
}

/// Derivative-free 1-D minimizer (Nelder–Mead with a two-point simplex).
///
/// Runs for at most [`MAX_ITERATIONS`] and returns the best point seen;
/// non-convergence is not an error.
fn minimize_scalar<F: Fn(f64) -> f64>(f: F, x0: f64, step: f64) -> f64 {
    let mut best = x0;
    let mut f_best = f(best);
    let mut worst = x0 + step;
    let mut f_worst = f(worst);
    if f_worst < f_best {
        std::mem::swap(&mut best, &mut worst);
        std::mem::swap(&mut f_best, &mut f_worst);
    }

    for _ in 0..MAX_ITERATIONS {
        if (best - worst).abs() < X_TOL || (f_worst - f_best).abs() < F_TOL {
            break;
        }

        let reflected = best + (best - worst);
        let f_reflected = f(reflected);
        if f_reflected < f_best {
            let expanded = best + 2.0 * (best - worst);
            let f_expanded = f(expanded);
            if f_expanded < f_reflected {
                worst = expanded;
                f_worst = f_expanded;
            } else {
                worst = reflected;
                f_worst = f_reflected;
            }
        } else if f_reflected < f_worst {
            worst = reflected;
            f_worst = f_reflected;
        } else {
            worst = best + 0.5 * (worst - best);
            f_worst = f(worst);
        }

        if f_worst < f_best {
            std::mem::swap(&mut best, &mut worst);
            std::mem::swap(&mut f_best, &mut f_worst);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use statrs::distribution::Normal;

    #[test]
    fn test_standard_normal_hdi() {
        let normal = Normal::new(0.0, 1.0).unwrap();
        let (low, high) = hdi_of_icdf(&normal, 0.95);
        assert!((low + 1.96).abs() < 0.01, "low = {}", low);
        assert!((high - 1.96).abs() < 0.01, "high = {}", high);
    }

    #[test]
    fn test_hdi_minimal_among_candidates() {
        let normal = Normal::new(0.0, 1.0).unwrap();
        let (low, high) = hdi_of_icdf(&normal, 0.95);
        let width = high - low;
        assert!(width >= 0.0);

        // any off-center same-mass interval must be at least as wide
        for t in [0.001, 0.01, 0.04] {
            let candidate = normal.inverse_cdf(0.95 + t) - normal.inverse_cdf(t);
            assert!(
                candidate >= width - 1e-6,
                "off-center interval at t={} narrower than HDI: {} < {}",
                t,
                candidate,
                width
            );
        }
    }

    #[test]
    fn test_skewed_beta_hdi_hugs_boundary() {
        // Beta(1, 11): monotonically decreasing density, HDI starts at 0.
        let (low, high) = success_rate_hdi(0, 10);
        assert!(low >= 0.0 && low < 0.01, "low = {}", low);
        assert!(high > low && high < 0.5, "high = {}", high);
    }

    #[test]
    fn test_success_rate_hdi_brackets_rate() {
        let (low, high) = success_rate_hdi(7, 3);
        let rate = 7.0 / 10.0;
        assert!(low <= rate + 1e-9 && rate <= high + 1e-9);
        assert!(low <= high);
    }

    #[test]
    fn test_sample_hdi_known_window() {
        let samples: Vec<f64> = (0..100).map(f64::from).collect();
        let (low, high) = hdi_of_samples(&samples, 0.9);
        // 90 of 100 uniform-spaced points span a width of 89
        assert!((high - low - 89.0).abs() < 1e-9);
    }

    #[test]
    fn test_sample_hdi_concentrated_mode() {
        // heavy cluster at 0, thin tail to the right
        let mut samples = vec![0.0; 95];
        samples.extend((1..=5).map(|i| 100.0 * f64::from(i)));
        let (low, high) = hdi_of_samples(&samples, 0.95);
        assert_eq!(low, 0.0);
        assert_eq!(high, 0.0);
    }

    #[test]
    fn test_sample_hdi_empty() {
        let (low, high) = hdi_of_samples(&[], 0.95);
        assert!(low.is_nan() && high.is_nan());
    }
}
