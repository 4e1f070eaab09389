//! Power estimation for a two-condition experiment with a shared C.
//!
//! The attentional weight may differ between conditions (wp > 0.5 under
//! attention), but the overall processing rate C is assumed identical in
//! both, so the model collapses the C-groups.

use tvatoj_core::design::{Design, Population, PopulationModel};
use tvatoj_core::model::ModelFlags;
use tvatoj_power::{estimate_power, PowerConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let design = Design::new(
        25,
        vec![
            -100.0, -80.0, -60.0, -40.0, -20.0, 0.0, 20.0, 40.0, 60.0, 80.0, 100.0,
        ],
        vec![24, 24, 32, 32, 48, 48, 48, 32, 32, 24, 24],
        PopulationModel::SharedC {
            c: Population::new(0.070, 0.020),
            wp_neutral: Population::new(0.50, 0.005),
            wp_attention: Population::new(0.55, 0.02),
        },
    );

    let config = PowerConfig::new(200, "single_C.csv")
        .with_flags(ModelFlags::SHARED_C)
        .with_goal_vars(["va_diff_mean", "vp_diff_mean", "vr_diff_mean"])
        .with_log_vars(["C_mu", "wp_mu", "C_sd", "wp_sd"]);

    let estimate = estimate_power(&design, &config, |summary| {
        summary.hdi_low("va_diff_mean").is_some_and(|v| v > 0.004)
            && (summary.hdi_low("vp_diff_mean").is_some_and(|v| v > 0.0)
                || summary.hdi_high("vr_diff_mean").is_some_and(|v| v < 0.0))
    })?;

    println!(
        "estimated power: {:.2} [95% HDI: {:.2} to {:.2}] over {} simulated experiments",
        estimate.rate, estimate.hdi_low, estimate.hdi_high, estimate.iterations
    );
    Ok(())
}
