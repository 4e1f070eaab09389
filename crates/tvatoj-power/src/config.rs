//! Configuration for a power-estimation run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tvatoj_core::inference::SamplerSettings;
use tvatoj_core::model::ModelFlags;

/// Configuration of a power-estimation run.
///
/// `goal_vars` selects the posterior quantities visible to the success
/// predicate; `log_vars` selects the quantities persisted per iteration.
/// Both accept bare base names (`"wp_mu"` expands to every indexed entry)
/// or exact indexed names (`"wp_mu[0]"`). Both must be non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerConfig {
    /// Number of simulated experiments to run.
    pub iterations: usize,
    /// Posterior quantities summarized for the success predicate.
    pub goal_vars: Vec<String>,
    /// Posterior quantities persisted per iteration regardless of the goal
    /// list. Default: `["C_mu", "wp_mu"]`.
    pub log_vars: Vec<String>,
    /// Output CSV path. Created with a header on the first row, appended to
    /// afterwards, never truncated.
    pub outfile: PathBuf,
    /// Model topology flags.
    pub flags: ModelFlags,
    /// MCMC engine settings.
    pub sampler: SamplerSettings,
    /// Whether to render a progress bar over the iteration count. The bar
    /// is owned by the run; nothing process-global is touched.
    pub show_progress: bool,
    /// Master seed for the run; `None` uses the crate default seed.
    pub seed: Option<u64>,
}

impl PowerConfig {
    /// Create a configuration with defaults for everything but the
    /// iteration count and output path.
    pub fn new(iterations: usize, outfile: impl Into<PathBuf>) -> Self {
        Self {
            iterations,
            goal_vars: Vec::new(),
            log_vars: vec!["C_mu".to_string(), "wp_mu".to_string()],
            outfile: outfile.into(),
            flags: ModelFlags::INDEPENDENT,
            sampler: SamplerSettings::default(),
            show_progress: true,
            seed: None,
        }
    }

    /// Set the goal variables.
    pub fn with_goal_vars<I, S>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.goal_vars = vars.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the logged variables.
    pub fn with_log_vars<I, S>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.log_vars = vars.into_iter().map(Into::into).collect();
        self
    }

    /// Set the model topology flags.
    pub fn with_flags(mut self, flags: ModelFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the MCMC engine settings.
    pub fn with_sampler(mut self, sampler: SamplerSettings) -> Self {
        self.sampler = sampler;
        self
    }

    /// Set the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Disable the progress bar.
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Validate the configuration.
    ///
    /// Violations are caller misuse: fatal, raised before any simulation
    /// work begins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::NoIterations);
        }
        if self.goal_vars.is_empty() {
            return Err(ConfigError::EmptyGoalVariables);
        }
        if self.log_vars.is_empty() {
            return Err(ConfigError::EmptyLogVariables);
        }
        Ok(())
    }
}

/// Errors in a power-run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The iteration count is zero.
    NoIterations,
    /// No goal variables were requested.
    EmptyGoalVariables,
    /// No log variables were requested.
    EmptyLogVariables,
    /// A requested variable is not part of the model's summary vocabulary.
    UnknownVariable { name: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NoIterations => write!(f, "iterations must be at least 1"),
            ConfigError::EmptyGoalVariables => {
                write!(f, "goal_vars must name at least one posterior variable")
            }
            ConfigError::EmptyLogVariables => {
                write!(f, "log_vars must name at least one variable to persist")
            }
            ConfigError::UnknownVariable { name } => write!(
                f,
                "variable '{}' is not produced by the configured model topology",
                name
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Expand requested variable names against a model vocabulary.
///
/// Exact names pass through; a bare base name selects every indexed entry
/// (`"wp_mu"` → `"wp_mu[0]"`, `"wp_mu[1]"`). Duplicates are dropped while
/// preserving first-seen order.
pub(crate) fn resolve_vars(
    requested: &[String],
    vocabulary: &[String],
) -> Result<Vec<String>, ConfigError> {
    let mut resolved: Vec<String> = Vec::new();
    for name in requested {
        if vocabulary.iter().any(|v| v == name) {
            if !resolved.contains(name) {
                resolved.push(name.clone());
            }
            continue;
        }
        let mut matched = false;
        for entry in vocabulary {
            if base_name(entry) == name {
                if !resolved.contains(entry) {
                    resolved.push(entry.clone());
                }
                matched = true;
            }
        }
        if !matched {
            return Err(ConfigError::UnknownVariable { name: name.clone() });
        }
    }
    Ok(resolved)
}

fn base_name(name: &str) -> &str {
    name.split('[').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> Vec<String> {
        ["C_mu[0]", "C_mu[1]", "wp_mu[0]", "va_diff_mean"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_resolve_base_name_expands() {
        let resolved = resolve_vars(&["C_mu".to_string()], &vocabulary()).unwrap();
        assert_eq!(resolved, vec!["C_mu[0]", "C_mu[1]"]);
    }

    #[test]
    fn test_resolve_exact_and_dedup() {
        let requested = vec!["va_diff_mean".to_string(), "va_diff_mean".to_string()];
        let resolved = resolve_vars(&requested, &vocabulary()).unwrap();
        assert_eq!(resolved, vec!["va_diff_mean"]);
    }

    #[test]
    fn test_resolve_unknown_is_error() {
        let result = resolve_vars(&["theta".to_string()], &vocabulary());
        assert_eq!(
            result.unwrap_err(),
            ConfigError::UnknownVariable {
                name: "theta".to_string()
            }
        );
    }

    #[test]
    fn test_validate_rejects_empty_lists() {
        let config = PowerConfig::new(10, "out.csv");
        assert_eq!(config.validate(), Err(ConfigError::EmptyGoalVariables));

        let config = PowerConfig::new(10, "out.csv")
            .with_goal_vars(["wp_mu"])
            .with_log_vars(Vec::<String>::new());
        assert_eq!(config.validate(), Err(ConfigError::EmptyLogVariables));

        let config = PowerConfig::new(0, "out.csv").with_goal_vars(["wp_mu"]);
        assert_eq!(config.validate(), Err(ConfigError::NoIterations));
    }

    #[test]
    fn test_default_log_vars() {
        let config = PowerConfig::new(10, "out.csv").with_goal_vars(["wp_mu"]);
        assert_eq!(config.log_vars, vec!["C_mu", "wp_mu"]);
        assert!(config.validate().is_ok());
    }
}
