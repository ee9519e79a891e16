//! Experiment layer: which configurations, cases and worker counts to compare.
//!
//! It owns:
//! - RunIdentity (one log file per configuration/worker count/case)
//! - Experiment spec (JSON description + validated in-memory form)

pub mod config;
pub mod run;

pub use config::{
    Configuration, ConfigurationSpec, Experiment, ExperimentSpec, MissingLogPolicy, SequenceScope,
};
pub use run::RunIdentity;
