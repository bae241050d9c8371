use opencred::error::AppError;
use opencred::lending::tracking::{derive_steps, ResultSummary, StatusPoller, StatusTracker};
use opencred::lending::{HttpLoanBackend, LoanBackend, LoanId, LoanStatus, TimelineEvent};

use crate::cli::{Context, LoanArgs};
use crate::render;

pub(crate) async fn status(context: &Context, args: LoanArgs) -> Result<(), AppError> {
    let loan_id = LoanId(args.loan_id);
    let snapshot = context.backend.fetch_status(&loan_id).await?;
    let settled = context.config.polling.policy().is_settled(&snapshot);

    println!("Loan {loan_id}");
    for step in derive_steps(&snapshot.timeline, !settled) {
        render::print_step(&step);
    }
    render::print_summary(&ResultSummary::from_snapshot(&snapshot));
    if !settled {
        println!("\nStill in progress. Follow it with `opencred track {loan_id}`.");
    }
    Ok(())
}

pub(crate) async fn track(context: &Context, args: LoanArgs) -> Result<(), AppError> {
    let mut poller = StatusPoller::new(context.backend.clone(), context.config.polling.policy());
    poller.resume(LoanId(args.loan_id));
    follow(poller).await
}

/// Run the poller in the background and print the timeline as it grows.
pub(crate) async fn follow(poller: StatusPoller<HttpLoanBackend>) -> Result<(), AppError> {
    let mut progress = Progress::default();
    let mut handle = poller.spawn();
    let mut updates = handle.subscribe();

    progress.show(&handle.current());
    while updates.changed().await.is_ok() {
        let tracker = updates.borrow_and_update().clone();
        progress.show(&tracker);
    }

    let snapshot = handle.finished().await?;
    progress.print_steps(&snapshot.timeline);
    render::print_summary(&ResultSummary::from_snapshot(&snapshot));
    Ok(())
}

/// What has been printed so far; steps are printed once they complete.
#[derive(Default)]
struct Progress {
    steps_shown: usize,
    status: Option<LoanStatus>,
}

impl Progress {
    fn show(&mut self, tracker: &StatusTracker) {
        let Some(snapshot) = tracker.snapshot() else {
            return;
        };

        if self.status.as_ref() != Some(&snapshot.status) {
            println!("Status: {}", snapshot.status);
            self.status = Some(snapshot.status.clone());
        }

        let completed = snapshot.timeline.len().saturating_sub(1);
        self.print_steps(&snapshot.timeline[..completed]);
    }

    fn print_steps(&mut self, timeline: &[TimelineEvent]) {
        if timeline.len() <= self.steps_shown {
            return;
        }
        for step in &derive_steps(timeline, false)[self.steps_shown..] {
            render::print_step(step);
        }
        self.steps_shown = timeline.len();
    }
}
