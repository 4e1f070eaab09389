//! Posterior summary statistics.

use serde::{Deserialize, Serialize};

/// Summary statistics of one posterior quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariableSummary {
    /// Posterior mean.
    pub mean: f64,
    /// Posterior standard deviation.
    pub sd: f64,
    /// Lower bound of the 95% HDI.
    pub hdi_low: f64,
    /// Upper bound of the 95% HDI.
    pub hdi_high: f64,
}

/// Read-only mapping from quantity name to its summary, in insertion order.
///
/// This is the shape consumed by success predicates: look up a variable and
/// one of its interval bounds, e.g. `summary.hdi_low("va_diff_mean")`.
/// Accessors return `None` for quantities that were not requested, so
/// predicates can stay total over whatever subset they were given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PosteriorSummary {
    entries: Vec<(String, VariableSummary)>,
}

impl PosteriorSummary {
    /// Create an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a variable's summary.
    pub fn push(&mut self, name: impl Into<String>, summary: VariableSummary) {
        self.entries.push((name.into(), summary));
    }

    /// Look up a variable by exact name.
    pub fn get(&self, name: &str) -> Option<&VariableSummary> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    /// Posterior mean of a variable.
    pub fn mean(&self, name: &str) -> Option<f64> {
        self.get(name).map(|s| s.mean)
    }

    /// Lower 95% HDI bound of a variable (the "hdi_2.5%" column).
    pub fn hdi_low(&self, name: &str) -> Option<f64> {
        self.get(name).map(|s| s.hdi_low)
    }

    /// Upper 95% HDI bound of a variable (the "hdi_97.5%" column).
    pub fn hdi_high(&self, name: &str) -> Option<f64> {
        self.get(name).map(|s| s.hdi_high)
    }

    /// Iterate over (name, summary) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariableSummary)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Number of summarized variables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the summary is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Display for PosteriorSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:<16} {:>10} {:>10} {:>10} {:>10}",
            "variable", "mean", "sd", "hdi_2.5%", "hdi_97.5%"
        )?;
        for (name, s) in self.iter() {
            writeln!(
                f,
                "{:<16} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
                name, s.mean, s.sd, s.hdi_low, s.hdi_high
            )?;
        }
        Ok(())
    }
}
