//! Experiment designs and population-level simulation truth.
//!
//! A [`Design`] describes a hypothetical TOJ experiment: how many
//! participants take part, which SOAs are presented, how often each SOA is
//! repeated, and the population distributions the participants' latent TVA
//! parameters are drawn from.
//!
//! The population truth is a closed set of variants ([`PopulationModel`]),
//! selected explicitly by the caller. Each variant carries only the fields
//! its topology needs, so an invalid combination of hyperparameters cannot
//! be expressed.

use serde::{Deserialize, Serialize};

/// Population distribution of one latent parameter: group mean and
/// between-subject standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Population {
    /// Population mean.
    pub mean: f64,
    /// Between-subject standard deviation. Zero yields identical
    /// participants (degenerate but valid, useful for checks).
    pub sd: f64,
}

impl Population {
    /// Create a new population description.
    pub fn new(mean: f64, sd: f64) -> Self {
        Self { mean, sd }
    }
}

/// Which latent parameters exist and how they are shared across conditions.
///
/// Condition ids are fixed: 0 = neutral (or the only condition), 1 =
/// attention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PopulationModel {
    /// Two conditions with fully independent `C` and `wp` per condition
    /// (classic between-subjects comparison).
    BetweenSubjects {
        c_neutral: Population,
        c_attention: Population,
        wp_neutral: Population,
        wp_attention: Population,
    },
    /// Two conditions sharing a per-participant baseline `C` that is
    /// perturbed independently per condition by a within-subject standard
    /// deviation; `wp` is independent per condition.
    WithinSubjects {
        c: Population,
        /// Within-subject standard deviation of the per-condition `C`
        /// around the participant's baseline.
        c_sd_within: f64,
        wp_neutral: Population,
        wp_attention: Population,
    },
    /// Two conditions reusing a single per-participant `C`; `wp` is
    /// independent per condition.
    SharedC {
        c: Population,
        wp_neutral: Population,
        wp_attention: Population,
    },
    /// A single condition with one `C` and one `wp` per participant.
    SingleCondition { c: Population, wp: Population },
}

impl PopulationModel {
    /// Number of conditions this population model simulates.
    pub fn condition_count(&self) -> usize {
        match self {
            PopulationModel::SingleCondition { .. } => 1,
            _ => 2,
        }
    }

    /// Short name for log output.
    pub fn name(&self) -> &'static str {
        match self {
            PopulationModel::BetweenSubjects { .. } => "between-subjects",
            PopulationModel::WithinSubjects { .. } => "within-subjects",
            PopulationModel::SharedC { .. } => "shared-C",
            PopulationModel::SingleCondition { .. } => "single-condition",
        }
    }
}

impl std::fmt::Display for PopulationModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A hypothetical experiment design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Design {
    /// Number of simulated participants.
    pub participants: usize,
    /// Intended SOAs in ms, in presentation-design order.
    pub soas: Vec<f64>,
    /// Repetitions per SOA; must parallel `soas`.
    pub repetitions: Vec<u32>,
    /// Population truth to simulate under.
    pub population: PopulationModel,
}

impl Design {
    /// Create a new design.
    pub fn new(
        participants: usize,
        soas: Vec<f64>,
        repetitions: Vec<u32>,
        population: PopulationModel,
    ) -> Self {
        Self {
            participants,
            soas,
            repetitions,
            population,
        }
    }

    /// Number of conditions in this design.
    pub fn condition_count(&self) -> usize {
        self.population.condition_count()
    }

    /// Total number of dataset cells one simulation produces.
    pub fn cell_count(&self) -> usize {
        self.participants * self.soas.len() * self.condition_count()
    }

    /// Validate the design for simulation.
    ///
    /// Violations are caller misuse and fatal for the run.
    pub fn validate(&self) -> Result<(), DesignError> {
        if self.participants == 0 {
            return Err(DesignError::NoParticipants);
        }
        if self.soas.is_empty() {
            return Err(DesignError::NoSoas);
        }
        if self.soas.len() != self.repetitions.len() {
            return Err(DesignError::LengthMismatch {
                soas: self.soas.len(),
                repetitions: self.repetitions.len(),
            });
        }
        if let Some(index) = self.repetitions.iter().position(|&r| r == 0) {
            return Err(DesignError::ZeroRepetitions { index });
        }
        Ok(())
    }
}

/// Errors in an experiment design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesignError {
    /// The design has no participants.
    NoParticipants,
    /// The design has no SOAs.
    NoSoas,
    /// SOA and repetition sequences differ in length.
    LengthMismatch { soas: usize, repetitions: usize },
    /// A repetition count is zero.
    ZeroRepetitions { index: usize },
}

impl std::fmt::Display for DesignError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DesignError::NoParticipants => write!(f, "design has no participants"),
            DesignError::NoSoas => write!(f, "design has no SOAs"),
            DesignError::LengthMismatch { soas, repetitions } => write!(
                f,
                "SOA and repetition sequences must have equal length ({} SOAs vs {} repetition counts)",
                soas, repetitions
            ),
            DesignError::ZeroRepetitions { index } => {
                write!(f, "repetition count at SOA index {} is zero", index)
            }
        }
    }
}

impl std::error::Error for DesignError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_condition_design() -> Design {
        Design::new(
            5,
            vec![-20.0, 0.0, 20.0],
            vec![10, 10, 10],
            PopulationModel::SingleCondition {
                c: Population::new(0.1, 0.02),
                wp: Population::new(0.5, 0.05),
            },
        )
    }

    #[test]
    fn test_valid_design() {
        let design = single_condition_design();
        assert!(design.validate().is_ok());
        assert_eq!(design.condition_count(), 1);
        assert_eq!(design.cell_count(), 15);
    }

    #[test]
    fn test_length_mismatch() {
        let mut design = single_condition_design();
        design.repetitions.pop();
        assert_eq!(
            design.validate(),
            Err(DesignError::LengthMismatch {
                soas: 3,
                repetitions: 2
            })
        );
    }

    #[test]
    fn test_zero_participants_and_repetitions() {
        let mut design = single_condition_design();
        design.participants = 0;
        assert_eq!(design.validate(), Err(DesignError::NoParticipants));

        let mut design = single_condition_design();
        design.repetitions[1] = 0;
        assert_eq!(
            design.validate(),
            Err(DesignError::ZeroRepetitions { index: 1 })
        );
    }

    #[test]
    fn test_condition_counts() {
        let two = PopulationModel::SharedC {
            c: Population::new(0.07, 0.02),
            wp_neutral: Population::new(0.5, 0.005),
            wp_attention: Population::new(0.55, 0.02),
        };
        assert_eq!(two.condition_count(), 2);

        let one = PopulationModel::SingleCondition {
            c: Population::new(0.1, 0.02),
            wp: Population::new(0.55, 0.05),
        };
        assert_eq!(one.condition_count(), 1);
    }
}
