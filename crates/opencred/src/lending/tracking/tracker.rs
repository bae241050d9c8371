use std::time::Duration;

use tracing::{info, warn};

use super::policy::{PollPolicy, PLACEHOLDER_EXPLANATION};
use super::steps::{derive_steps, DisplayStep};
use super::summary::ResultSummary;
use crate::lending::backend::BackendError;
use crate::lending::domain::{
    LoanApplication, LoanId, LoanStatus, StatusSnapshot, SubmissionReceipt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerPhase {
    /// Nothing submitted yet, or the last submission failed.
    Idle,
    Submitting,
    Polling,
    /// Terminal status with a real explanation; the snapshot is final.
    Settled,
    /// Bounded failure policy exhausted; the last snapshot is kept.
    Abandoned,
}

/// What the caller should do after feeding a tick result to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue { next_delay: Duration },
    Settled,
    GaveUp,
    /// The tracker is not polling; the result was discarded.
    Inactive,
}

/// Client-side state of one loan's post-submission flow.
///
/// Pure state: the async [`StatusPoller`](super::StatusPoller) feeds it backend results.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusTracker {
    policy: PollPolicy,
    phase: TrackerPhase,
    loan_id: Option<LoanId>,
    snapshot: Option<StatusSnapshot>,
    consecutive_failures: u32,
    last_error: Option<String>,
}

impl StatusTracker {
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            phase: TrackerPhase::Idle,
            loan_id: None,
            snapshot: None,
            consecutive_failures: 0,
            last_error: None,
        }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    pub fn phase(&self) -> TrackerPhase {
        self.phase
    }

    pub fn loan_id(&self) -> Option<&LoanId> {
        self.loan_id.as_ref()
    }

    pub fn snapshot(&self) -> Option<&StatusSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, TrackerPhase::Submitting | TrackerPhase::Polling)
    }

    pub fn is_polling(&self) -> bool {
        self.phase == TrackerPhase::Polling
    }

    pub fn begin_submission(&mut self) {
        self.phase = TrackerPhase::Submitting;
        self.loan_id = None;
        self.snapshot = None;
        self.consecutive_failures = 0;
        self.last_error = None;
    }

    /// Store the identifier and seed a `processing` snapshot until the first poll lands.
    pub fn submission_succeeded(
        &mut self,
        receipt: SubmissionReceipt,
        application: LoanApplication,
    ) -> &LoanId {
        info!(loan_id = %receipt.loan_id, "application submitted");
        self.snapshot = Some(StatusSnapshot {
            status: LoanStatus::Processing,
            timeline: receipt.timeline,
            explanation: PLACEHOLDER_EXPLANATION.to_string(),
            data: Some(application),
        });
        self.phase = TrackerPhase::Polling;
        self.loan_id.insert(receipt.loan_id)
    }

    pub fn submission_failed(&mut self, error: &BackendError) {
        warn!(%error, "application submission failed");
        self.phase = TrackerPhase::Idle;
        self.loan_id = None;
        self.snapshot = None;
        self.last_error = Some(error.to_string());
    }

    /// Start polling a loan submitted elsewhere; no snapshot until the first tick.
    pub fn resume(&mut self, loan_id: LoanId) {
        self.phase = TrackerPhase::Polling;
        self.loan_id = Some(loan_id);
        self.snapshot = None;
        self.consecutive_failures = 0;
        self.last_error = None;
    }

    /// Replace the snapshot wholesale and decide whether polling stops.
    pub fn record_snapshot(&mut self, snapshot: StatusSnapshot) -> TickOutcome {
        if !self.is_polling() {
            return TickOutcome::Inactive;
        }

        self.consecutive_failures = 0;
        let settled = self.policy.is_settled(&snapshot);
        self.snapshot = Some(snapshot);

        if settled {
            self.phase = TrackerPhase::Settled;
            if let (Some(loan_id), Some(snapshot)) = (&self.loan_id, &self.snapshot) {
                info!(%loan_id, status = %snapshot.status, "loan status settled");
            }
            TickOutcome::Settled
        } else {
            TickOutcome::Continue {
                next_delay: self.policy.next_delay(0),
            }
        }
    }

    /// Count a failed fetch; the snapshot is left untouched.
    pub fn record_failure(&mut self, error: &BackendError) -> TickOutcome {
        if !self.is_polling() {
            return TickOutcome::Inactive;
        }

        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_error = Some(error.to_string());

        if self.policy.gives_up_after(self.consecutive_failures) {
            warn!(
                failures = self.consecutive_failures,
                %error,
                "status polling abandoned"
            );
            self.phase = TrackerPhase::Abandoned;
            return TickOutcome::GaveUp;
        }

        warn!(
            failures = self.consecutive_failures,
            %error,
            "status check failed; retrying on next tick"
        );
        TickOutcome::Continue {
            next_delay: self.policy.next_delay(self.consecutive_failures),
        }
    }

    pub fn display_steps(&self) -> Vec<DisplayStep> {
        match &self.snapshot {
            Some(snapshot) => derive_steps(&snapshot.timeline, self.is_loading()),
            None => Vec::new(),
        }
    }

    pub fn summary(&self) -> Option<ResultSummary> {
        self.snapshot.as_ref().map(ResultSummary::from_snapshot)
    }
}
