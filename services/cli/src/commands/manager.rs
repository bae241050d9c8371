use std::fs::File;

use opencred::error::AppError;
use opencred::lending::review::{write_queue_csv, ReviewDesk};
use opencred::lending::LoanId;

use crate::cli::{Context, ManagerCommand};
use crate::render;

pub(crate) async fn run(context: &Context, command: ManagerCommand) -> Result<(), AppError> {
    let mut desk = ReviewDesk::new(context.backend.clone());
    desk.refresh().await?;

    match command {
        ManagerCommand::Pending(args) => {
            if desk.pending().is_empty() {
                println!("No pending approvals");
            } else {
                println!("Pending approvals ({})", desk.pending().len());
                for loan in desk.pending() {
                    render::print_pending(loan);
                }
            }
            if let Some(path) = args.csv {
                write_queue_csv(File::create(&path)?, desk.pending())?;
                println!("Queue written to {}", path.display());
            }
        }
        ManagerCommand::Approve(args) => {
            let receipt = desk
                .approve(&LoanId(args.loan_id), args.comments.as_deref())
                .await?;
            println!("{} (status: {})", receipt.message, receipt.loan_status);
        }
        ManagerCommand::Reject(args) => {
            let receipt = desk.reject(&LoanId(args.loan_id), &args.reason).await?;
            println!("{} (status: {})", receipt.message, receipt.loan_status);
        }
    }
    Ok(())
}
