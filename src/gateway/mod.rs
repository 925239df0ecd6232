//! Submission of the assembled graph to the external parse/execute service.
//!
//! The gateway is deliberately thin: serialize the current node/edge
//! collections, issue the call, decode the structured report. Everything
//! stateful about results (folding outputs into node fields, guarding
//! against out-of-order completions) lives in [`OutputApplier`], so it can
//! be exercised without a network in sight.

#[allow(clippy::module_inception)]
mod gateway;
mod applier;
mod report;

pub use applier::{ApplyOutcome, OutputApplier, SubmissionTicket};
pub use gateway::{GatewayError, PipelineGateway};
pub use report::PipelineReport;
