//! The TVA-TOJ psychometric function.
//!
//! Maps a stimulus-onset-asynchrony (SOA, in ms) and the latent TVA
//! parameters to the probability that the probe stimulus is judged to have
//! appeared first. See Tünnermann, Petersen, & Scharlau (2015) for the
//! derivation from the race between the probe and reference channels.
//!
//! With overall rate `C` (1/ms) and probe attentional weight `wp` in [0, 1],
//! the channel rates are `vp = C·wp` and `vr = C·(1−wp)`. For SOA ≤ 0 the
//! probe leads (or ties) and
//!
//! ```text
//! p = (1 − e^(−vp·|SOA|)) + e^(−vp·|SOA|) · vp/(vp+vr)
//! ```
//!
//! while for SOA > 0 the reference leads and
//!
//! ```text
//! p = e^(−vr·|SOA|) · vp/(vp+vr)
//! ```
//!
//! Both branches evaluate to `vp/(vp+vr)` at SOA = 0, so the function is
//! continuous at the boundary.

/// Probability of a "probe first" judgment from rate parameters.
///
/// `vp` and `vr` are the probe and reference channel rates in 1/ms.
///
/// Pure function. Callers must guarantee `vp + vr > 0`; the ratio
/// `vp/(vp+vr)` is undefined for a fully degenerate rate pair (checked with
/// a `debug_assert!`, see DESIGN.md for the rationale).
pub fn probe_first_probability_from_rates(soa: f64, vp: f64, vr: f64) -> f64 {
    debug_assert!(
        vp + vr > 0.0,
        "psychometric function requires vp + vr > 0 (got vp={}, vr={})",
        vp,
        vr
    );
    let ratio = vp / (vp + vr);
    if soa <= 0.0 {
        let survive = (-vp * soa.abs()).exp();
        (1.0 - survive) + survive * ratio
    } else {
        (-vr * soa.abs()).exp() * ratio
    }
}

/// Probability of a "probe first" judgment from `C` and `wp`.
///
/// Derives `vp = C·wp`, `vr = C·(1−wp)` and delegates to
/// [`probe_first_probability_from_rates`].
pub fn probe_first_probability(soa: f64, c: f64, wp: f64) -> f64 {
    probe_first_probability_from_rates(soa, c * wp, c * (1.0 - wp))
}

/// Elementwise variant over a slice of SOAs.
///
/// Returns one probability per input SOA, in input order.
pub fn probe_first_probabilities(soas: &[f64], c: f64, wp: f64) -> Vec<f64> {
    soas.iter()
        .map(|&soa| probe_first_probability(soa, c, wp))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_at_zero_soa_is_rate_ratio() {
        let c = 0.08;
        let wp = 0.6;
        let vp = c * wp;
        let vr = c * (1.0 - wp);

        let p = probe_first_probability(0.0, c, wp);
        assert!(
            (p - vp / (vp + vr)).abs() < 1e-12,
            "at SOA=0 probability should equal vp/(vp+vr), got {}",
            p
        );
    }

    #[test]
    fn test_branches_agree_at_zero() {
        // The SOA<=0 branch is used at the boundary; the SOA>0 formula must
        // give the same value in the limit.
        let vp = 0.05;
        let vr = 0.03;
        let left = probe_first_probability_from_rates(0.0, vp, vr);
        let right = (-vr * 0.0_f64).exp() * vp / (vp + vr);
        assert!((left - right).abs() < 1e-12);
    }

    #[test]
    fn test_probabilities_in_unit_interval() {
        let soas = [-200.0, -50.0, -1.0, 0.0, 1.0, 50.0, 200.0];
        for &c in &[0.01, 0.08, 0.5] {
            for &wp in &[0.05, 0.5, 0.95] {
                for p in probe_first_probabilities(&soas, c, wp) {
                    assert!((0.0..=1.0).contains(&p), "p={} out of [0,1]", p);
                }
            }
        }
    }

    #[test]
    fn test_negative_soa_favors_probe() {
        // The probe appears first at negative SOAs, so the probability must
        // increase as the SOA becomes more negative.
        let c = 0.08;
        let wp = 0.5;
        let p_far = probe_first_probability(-100.0, c, wp);
        let p_near = probe_first_probability(-10.0, c, wp);
        let p_pos = probe_first_probability(100.0, c, wp);
        assert!(p_far > p_near);
        assert!(p_near > p_pos);
    }

    #[test]
    fn test_rates_variant_matches_derived_rates() {
        let c = 0.1;
        let wp = 0.7;
        for &soa in &[-30.0, 0.0, 30.0] {
            let a = probe_first_probability(soa, c, wp);
            let b = probe_first_probability_from_rates(soa, c * wp, c * (1.0 - wp));
            assert_eq!(a, b);
        }
    }
}
