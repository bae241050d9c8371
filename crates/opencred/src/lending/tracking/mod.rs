//! Post-submission status tracking: submit, poll until the loan settles, and turn the
//! server timeline into display steps.

mod policy;
mod poller;
mod steps;
mod summary;
mod tracker;

pub use policy::{
    FailurePolicy, PollPolicy, DEFAULT_PLACEHOLDER_MARKERS, MIN_POLL_INTERVAL, PLACEHOLDER_EXPLANATION,
};
pub use poller::{PollError, PollHandle, StatusPoller};
pub use steps::{derive_steps, step_icon, DisplayStep, StepState};
pub use summary::{ResultSummary, Tone};
pub use tracker::{StatusTracker, TickOutcome, TrackerPhase};
