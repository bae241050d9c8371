use std::time::Duration;

use crate::lending::domain::{LoanStatus, StatusSnapshot};

/// Explanation seeded locally right after a successful submission.
pub const PLACEHOLDER_EXPLANATION: &str = "Our AI agents are analyzing your file...";

/// Shortest wait between ticks; zero intervals are raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Substrings marking an explanation the backend has not finalised yet.
pub const DEFAULT_PLACEHOLDER_MARKERS: [&str; 2] = ["analyzing", "Processing"];

/// How the poller paces itself and decides when a loan has settled.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub terminal_statuses: Vec<LoanStatus>,
    pub placeholder_markers: Vec<String>,
    pub failures: FailurePolicy,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            terminal_statuses: vec![
                LoanStatus::PreApproved,
                LoanStatus::Rejected,
                LoanStatus::ManualReview,
                LoanStatus::Approved,
            ],
            placeholder_markers: DEFAULT_PLACEHOLDER_MARKERS
                .iter()
                .map(|marker| marker.to_string())
                .collect(),
            failures: FailurePolicy::Tolerate,
        }
    }
}

/// Reaction to failed status fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Skip the tick and try again on the next interval, forever.
    Tolerate,
    /// Double the wait after each consecutive failure (capped at `max_interval`) and
    /// stop once `max_consecutive_failures` is reached.
    Bounded {
        max_consecutive_failures: u32,
        max_interval: Duration,
    },
}

impl PollPolicy {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_failures(mut self, failures: FailurePolicy) -> Self {
        self.failures = failures;
        self
    }

    pub fn is_terminal(&self, status: &LoanStatus) -> bool {
        self.terminal_statuses.contains(status)
    }

    /// An explanation is real when it is non-empty and carries none of the markers.
    pub fn has_real_explanation(&self, explanation: &str) -> bool {
        !explanation.is_empty()
            && !self
                .placeholder_markers
                .iter()
                .any(|marker| explanation.contains(marker.as_str()))
    }

    pub fn is_settled(&self, snapshot: &StatusSnapshot) -> bool {
        self.is_terminal(&snapshot.status) && self.has_real_explanation(&snapshot.explanation)
    }

    /// Whether `consecutive_failures` exhausts the failure budget.
    pub fn gives_up_after(&self, consecutive_failures: u32) -> bool {
        match self.failures {
            FailurePolicy::Tolerate => false,
            FailurePolicy::Bounded {
                max_consecutive_failures,
                ..
            } => consecutive_failures >= max_consecutive_failures.max(1),
        }
    }

    /// Interval between healthy ticks, never below [`MIN_POLL_INTERVAL`].
    pub fn tick_interval(&self) -> Duration {
        self.interval.max(MIN_POLL_INTERVAL)
    }

    /// Wait before the next tick given the current run of failures.
    pub fn next_delay(&self, consecutive_failures: u32) -> Duration {
        let delay = match self.failures {
            FailurePolicy::Tolerate => self.interval,
            FailurePolicy::Bounded { max_interval, .. } => {
                let factor = 1u32
                    .checked_shl(consecutive_failures)
                    .unwrap_or(u32::MAX);
                self.interval.saturating_mul(factor).min(max_interval)
            }
        };
        delay.max(MIN_POLL_INTERVAL)
    }
}
