//! Statistical core for TVA-TOJ power estimation.
//!
//! This crate provides the building blocks for estimating the statistical
//! power of temporal-order-judgment (TOJ) experiments analyzed with the
//! hierarchical TVA-TOJ model:
//!
//! - the TVA-TOJ psychometric function ([`psychometric`]),
//! - typed experiment designs and population truth ([`design`]),
//! - a generative race-process simulator ([`simulate`]),
//! - the hierarchical non-centered model declaration ([`model`]),
//! - an MCMC fitting seam with a built-in engine ([`inference`]),
//! - highest-density-interval utilities ([`hdi`]).
//!
//! Orchestration of repeated simulate→fit→evaluate cycles lives in the
//! `tvatoj-power` crate, which drives this one.
//!
//! ```ignore
//! use tvatoj_core::{
//!     design::{Design, Population, PopulationModel},
//!     inference::{FitEngine, McmcEngine, SamplerSettings},
//!     model::{HierarchicalModel, ModelFlags},
//!     simulate::simulate,
//! };
//! ```

pub mod constants;
pub mod dataset;
pub mod design;
pub mod hdi;
pub mod inference;
pub mod model;
pub mod psychometric;
pub mod simulate;

// Re-export commonly used items at crate root
pub use dataset::{Cell, DatasetError, TojDataset};
pub use design::{Design, DesignError, Population, PopulationModel};
pub use inference::{
    FitEngine, InferenceError, McmcEngine, PosteriorSummary, SamplerSettings, VariableSummary,
};
pub use model::{HierarchicalModel, ModelError, ModelFlags};
