use chrono::Local;
use opencred::error::AppError;
use opencred::lending::sanction::render_letter;
use opencred::lending::tracking::ResultSummary;
use opencred::lending::{LoanBackend, LoanId};

use crate::cli::{Context, LetterArgs};

pub(crate) async fn run(context: &Context, args: LetterArgs) -> Result<(), AppError> {
    let loan_id = LoanId(args.loan_id);
    let snapshot = context.backend.fetch_status(&loan_id).await?;

    if !ResultSummary::from_snapshot(&snapshot).sanction_letter_issued {
        println!("No sanction letter for loan {loan_id}: status is {}", snapshot.status);
        return Ok(());
    }
    let Some(application) = snapshot.data.as_ref() else {
        println!("Loan {loan_id} has no application details on record");
        return Ok(());
    };

    let approved_on = args.date.unwrap_or_else(|| Local::now().date_naive());
    print!("{}", render_letter(application, &loan_id, approved_on));
    Ok(())
}
