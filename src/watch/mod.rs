// src/watch/mod.rs

//! Orchestrator change subscription.
//!
//! This module is responsible for:
//! - Building the orchestrator API client from kubeconfig or in-cluster
//!   credentials.
//! - Opening label-filtered watch streams through a pluggable source.
//! - Re-opening closed streams from the last observed resource version.
//!
//! It does **not** interpret the watched objects; it only turns server-side
//! watch streams into one logical sequence of objects.

pub mod client;
pub mod source;
pub mod subscription;

pub use client::build_client;
pub use source::{EventStream, KubeWatchSource, WatchRequest, WatchSource};
pub use subscription::{ANY_VERSION, Subscription};
