// src/report/mod.rs

//! Status reporting layer.
//!
//! - [`event`] defines the JSON body accepted by the status API.
//! - [`api`] provides the `StatusApi` trait and the production
//!   `HttpStatusApi`, which tests replace with a recording fake.
//! - [`reporter`] translates canonical statuses into event sequences.

pub mod api;
pub mod event;
pub mod reporter;

pub use api::{HttpStatusApi, StatusApi};
pub use event::{EventAction, WorkflowEvent};
pub use reporter::Reporter;
