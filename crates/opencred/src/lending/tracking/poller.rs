use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use super::policy::PollPolicy;
use super::tracker::{StatusTracker, TickOutcome, TrackerPhase};
use crate::lending::backend::{BackendError, LoanBackend};
use crate::lending::domain::{LoanApplication, LoanId, StatusSnapshot};

/// Error ending a polling run without a settled snapshot.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("no loan is being tracked")]
    NotTracking,
    #[error("status polling abandoned after {failures} consecutive failures: {last_error}")]
    GaveUp { failures: u32, last_error: String },
    #[error("status polling was cancelled")]
    Cancelled,
}

/// Drives a [`StatusTracker`] against a [`LoanBackend`].
pub struct StatusPoller<B> {
    backend: Arc<B>,
    tracker: StatusTracker,
}

impl<B> StatusPoller<B>
where
    B: LoanBackend + 'static,
{
    pub fn new(backend: Arc<B>, policy: PollPolicy) -> Self {
        Self {
            backend,
            tracker: StatusTracker::new(policy),
        }
    }

    pub fn tracker(&self) -> &StatusTracker {
        &self.tracker
    }

    /// Submit an application. On failure the tracker drops back to idle and the error
    /// is returned for the caller to surface; nothing is retried.
    pub async fn submit(&mut self, application: LoanApplication) -> Result<LoanId, BackendError> {
        self.tracker.begin_submission();
        match self.backend.submit_application(&application).await {
            Ok(receipt) => Ok(self
                .tracker
                .submission_succeeded(receipt, application)
                .clone()),
            Err(error) => {
                self.tracker.submission_failed(&error);
                Err(error)
            }
        }
    }

    /// Track a loan that was submitted earlier.
    pub fn resume(&mut self, loan_id: LoanId) {
        self.tracker.resume(loan_id);
    }

    /// Fetch once and feed the result to the tracker.
    pub async fn tick(&mut self) -> TickOutcome {
        let Some(loan_id) = self.tracker.loan_id().cloned() else {
            return TickOutcome::Inactive;
        };
        if !self.tracker.is_polling() {
            return TickOutcome::Inactive;
        }

        match self.backend.fetch_status(&loan_id).await {
            Ok(snapshot) => {
                debug!(%loan_id, status = %snapshot.status, "status tick");
                self.tracker.record_snapshot(snapshot)
            }
            Err(error) => self.tracker.record_failure(&error),
        }
    }

    /// Poll on the policy interval until the loan settles or the failure budget runs out.
    pub async fn run_until_settled(&mut self) -> Result<StatusSnapshot, PollError> {
        self.drive(|_| {}).await
    }

    /// Move polling onto the runtime. Every tracker change is published on the handle.
    pub fn spawn(self) -> PollHandle {
        let (sender, receiver) = watch::channel(self.tracker.clone());
        let mut poller = self;
        let task = tokio::spawn(async move {
            poller
                .drive(move |tracker| {
                    sender.send_replace(tracker.clone());
                })
                .await
        });

        PollHandle {
            updates: receiver,
            task,
        }
    }

    async fn drive<F>(&mut self, mut publish: F) -> Result<StatusSnapshot, PollError>
    where
        F: FnMut(&StatusTracker) + Send,
    {
        if !self.tracker.is_polling() {
            return self.finish();
        }

        let mut period = self.tracker.policy().tick_interval();
        let mut deadline = Instant::now() + period;

        loop {
            sleep_until(deadline).await;
            let outcome = self.tick().await;
            publish(&self.tracker);

            match outcome {
                TickOutcome::Continue { next_delay } => {
                    period = next_delay;
                    deadline += period;
                    let now = Instant::now();
                    // Ticks missed while a fetch was in flight are skipped, not replayed.
                    while deadline <= now {
                        deadline += period;
                    }
                }
                TickOutcome::Settled | TickOutcome::GaveUp | TickOutcome::Inactive => {
                    return self.finish();
                }
            }
        }
    }

    fn finish(&self) -> Result<StatusSnapshot, PollError> {
        match self.tracker.phase() {
            TrackerPhase::Settled => self
                .tracker
                .snapshot()
                .cloned()
                .ok_or(PollError::NotTracking),
            TrackerPhase::Abandoned => Err(PollError::GaveUp {
                failures: self.tracker.consecutive_failures(),
                last_error: self.tracker.last_error().unwrap_or_default().to_string(),
            }),
            TrackerPhase::Idle | TrackerPhase::Submitting | TrackerPhase::Polling => {
                Err(PollError::NotTracking)
            }
        }
    }
}

/// Handle to a spawned poller. Dropping it stops polling; a response still in flight
/// is discarded along with the task.
pub struct PollHandle {
    updates: watch::Receiver<StatusTracker>,
    task: JoinHandle<Result<StatusSnapshot, PollError>>,
}

impl PollHandle {
    /// Latest published tracker state.
    pub fn current(&self) -> StatusTracker {
        self.updates.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusTracker> {
        self.updates.clone()
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Wait for the poller to stop.
    pub async fn finished(&mut self) -> Result<StatusSnapshot, PollError> {
        match (&mut self.task).await {
            Ok(result) => result,
            Err(_) => Err(PollError::Cancelled),
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
