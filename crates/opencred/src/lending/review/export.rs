use std::io::Write;

use serde::Serialize;

use crate::lending::domain::PendingLoan;

/// Flat CSV row for one pending loan.
#[derive(Debug, Serialize)]
pub struct QueueRow<'a> {
    pub loan_id: &'a str,
    pub name: &'a str,
    pub pan: &'a str,
    pub amount: f64,
    pub income: f64,
    pub purpose: &'a str,
    pub submitted_at: &'a str,
    pub ai_suggestion: &'a str,
    pub ai_confidence: Option<u8>,
}

impl<'a> From<&'a PendingLoan> for QueueRow<'a> {
    fn from(loan: &'a PendingLoan) -> Self {
        Self {
            loan_id: loan.loan_id.as_str(),
            name: &loan.data.name,
            pan: &loan.data.pan,
            amount: loan.data.amount,
            income: loan.data.income,
            purpose: &loan.data.purpose,
            submitted_at: &loan.submitted_at,
            ai_suggestion: &loan.ai_suggestion,
            ai_confidence: loan.ai_confidence,
        }
    }
}

/// Write the queue with a header row, even when it is empty.
pub fn write_queue_csv<W: Write>(writer: W, pending: &[PendingLoan]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record([
        "loan_id",
        "name",
        "pan",
        "amount",
        "income",
        "purpose",
        "submitted_at",
        "ai_suggestion",
        "ai_confidence",
    ])?;
    for loan in pending {
        csv_writer.serialize(QueueRow::from(loan))?;
    }
    csv_writer.flush()?;
    Ok(())
}
