//! Communication and runtime metrics from solver run logs.
//!
//! `runlog` scans single log files, `model` folds them into per-worker-count
//! averages for each configuration of an `experiment`, and `render` turns the
//! averages into charts and summaries.

pub mod error;
pub mod experiment;
pub mod model;
pub mod render;
pub mod runlog;

pub type Result<T> = anyhow::Result<T>;
