//! Result persistence.
//!
//! The per-iteration result table is append-only: the file is created with
//! its header when the first row lands and reopened in append mode for
//! every later row, so a crash mid-run leaves all completed iterations
//! durably on disk and loses at most the in-flight row.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tvatoj_core::inference::PosteriorSummary;

use crate::estimator::RunningEstimate;

/// Appends one row per power-estimation iteration to a CSV file.
///
/// Columns: iteration index, success flag, running success rate, running
/// interval bounds, then mean and HDI bounds per logged variable.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    path: PathBuf,
    log_vars: Vec<String>,
}

impl ResultWriter {
    /// Create a writer for `path` logging the given (already resolved)
    /// variable names. Nothing is written until the first append.
    pub fn new(path: impl Into<PathBuf>, log_vars: &[String]) -> Self {
        Self {
            path: path.into(),
            log_vars: log_vars.to_vec(),
        }
    }

    /// The output path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn header(&self) -> String {
        let mut header =
            String::from("iteration,success,power_est,power_hdi_2.5%,power_hdi_97.5%");
        for var in &self.log_vars {
            header.push_str(&format!(",{0}_mean,{0}_hdi_2.5%,{0}_hdi_97.5%", var));
        }
        header
    }

    /// Append one iteration's row, creating the file with its header first
    /// if it does not exist yet.
    ///
    /// A logged variable missing from the summary yields empty fields
    /// rather than an error; the loop must run to completion even for
    /// incomplete summaries.
    pub fn append(
        &self,
        estimate: &RunningEstimate,
        success: bool,
        summary: &PosteriorSummary,
    ) -> io::Result<()> {
        let write_header = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if write_header {
            writeln!(file, "{}", self.header())?;
        }

        let mut row = format!(
            "{},{},{:.6},{:.6},{:.6}",
            estimate.iterations,
            u8::from(success),
            estimate.rate,
            estimate.hdi_low,
            estimate.hdi_high
        );
        for var in &self.log_vars {
            match summary.get(var) {
                Some(s) => {
                    row.push_str(&format!(",{:.6},{:.6},{:.6}", s.mean, s.hdi_low, s.hdi_high));
                }
                None => row.push_str(",,,"),
            }
        }
        writeln!(file, "{}", row)?;
        file.flush()
    }
}

/// Write a full posterior summary to a CSV file, one row per variable.
///
/// Used by one-shot fits; the file is created (or truncated) in place.
pub fn write_summary(path: &Path, summary: &PosteriorSummary) -> io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "variable,mean,sd,hdi_2.5%,hdi_97.5%")?;
    for (name, s) in summary.iter() {
        writeln!(
            file,
            "{},{:.6},{:.6},{:.6},{:.6}",
            name, s.mean, s.sd, s.hdi_low, s.hdi_high
        )?;
    }
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tvatoj_core::inference::VariableSummary;

    fn estimate(iterations: usize, successes: usize) -> RunningEstimate {
        let mut e = RunningEstimate::new();
        for i in 0..iterations {
            e.record(i < successes);
        }
        e
    }

    fn summary_with(name: &str) -> PosteriorSummary {
        let mut s = PosteriorSummary::new();
        s.push(
            name,
            VariableSummary {
                mean: 0.1,
                sd: 0.01,
                hdi_low: 0.08,
                hdi_high: 0.12,
            },
        );
        s
    }

    #[test]
    fn test_header_written_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let writer = ResultWriter::new(&path, &["C_mu[0]".to_string()]);

        writer
            .append(&estimate(1, 1), true, &summary_with("C_mu[0]"))
            .unwrap();
        writer
            .append(&estimate(2, 1), false, &summary_with("C_mu[0]"))
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "iteration,success,power_est,power_hdi_2.5%,power_hdi_97.5%,\
             C_mu[0]_mean,C_mu[0]_hdi_2.5%,C_mu[0]_hdi_97.5%"
        );
        assert!(lines[1].starts_with("1,1,1.000000,"));
        assert!(lines[2].starts_with("2,0,0.500000,"));
    }

    #[test]
    fn test_missing_variable_leaves_empty_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let writer = ResultWriter::new(&path, &["wp_mu[0]".to_string()]);

        writer
            .append(&estimate(1, 0), false, &PosteriorSummary::new())
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert!(row.ends_with(",,,"), "row should end with empty fields: {}", row);
    }

    #[test]
    fn test_write_summary_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fit.csv");
        write_summary(&path, &summary_with("wp_mean")).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "variable,mean,sd,hdi_2.5%,hdi_97.5%");
        assert!(lines[1].starts_with("wp_mean,0.100000,"));
    }
}
