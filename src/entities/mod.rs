//! Tracking entities
//!
//! In-memory objects of the experiment-tracking framework. These are what
//! the store interface hands back to callers; the [`crate::models`] records
//! convert into them.
//!
//! ## Entity Overview
//!
//! ```text
//! Experiment ──< ExperimentTag
//!
//! Run ── RunInfo
//!     └─ RunData ──< Metric (latest value per key)
//!                ├──< Param
//!                └──< RunTag
//! ```
//!
//! Timestamps on entities are epoch milliseconds.

mod experiment;
mod lifecycle;
mod metric;
mod run;

pub use experiment::{Experiment, ExperimentBuilder, ExperimentTag};
pub use lifecycle::{LifecycleStage, RunStatus};
pub use metric::Metric;
pub use run::{Param, Run, RunData, RunInfo, RunInfoBuilder, RunTag};
