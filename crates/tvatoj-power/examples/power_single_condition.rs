//! Power estimation for a single-condition attention experiment.
//!
//! One condition, one C and one wp per participant. The research question
//! is whether the probe's attentional weight exceeds the neutral 0.5, i.e.
//! whether an attention effect on the probe weight would be detected.

use tvatoj_core::design::{Design, Population, PopulationModel};
use tvatoj_core::model::ModelFlags;
use tvatoj_power::{estimate_power, PowerConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let design = Design::new(
        35,
        vec![
            -100.0, -80.0, -60.0, -40.0, -20.0, 0.0, 20.0, 40.0, 60.0, 80.0, 100.0,
        ],
        vec![24, 24, 32, 32, 48, 48, 48, 32, 32, 24, 24],
        PopulationModel::SingleCondition {
            c: Population::new(0.100, 0.020),
            wp: Population::new(0.55, 0.05),
        },
    );

    let config = PowerConfig::new(200, "single_condition.csv")
        .with_flags(ModelFlags::SHARED_WP)
        .with_goal_vars(["C_mu", "wp_mu"]);

    // Note the [0] index: the model exposes group-indexed hyperparameters
    // even with a single condition.
    let estimate = estimate_power(&design, &config, |summary| {
        summary.hdi_low("wp_mu[0]").is_some_and(|v| v > 0.5)
    })?;

    println!(
        "estimated power: {:.2} [95% HDI: {:.2} to {:.2}] over {} simulated experiments",
        estimate.rate, estimate.hdi_low, estimate.hdi_high, estimate.iterations
    );
    Ok(())
}
