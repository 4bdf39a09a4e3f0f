// src/workflow/mod.rs

//! Workflow state tracking.
//!
//! - [`tracker`] holds the mutable [`Workflow`] record.
//! - [`step`] holds per-step records and the transition rules outcome.

pub mod step;
pub mod tracker;

pub use step::{Step, StepTransition};
pub use tracker::Workflow;
