use serde::Serialize;

use crate::lending::domain::{LoanStatus, StatusSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Success,
    Danger,
    Info,
    Pending,
    Warning,
}

/// Headline shown next to the explanation once a snapshot is available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub status: LoanStatus,
    pub title: &'static str,
    pub icon: &'static str,
    pub tone: Tone,
    pub explanation: String,
    pub sanction_letter_issued: bool,
}

impl ResultSummary {
    pub fn from_snapshot(snapshot: &StatusSnapshot) -> Self {
        let (title, icon, tone) = match snapshot.status {
            LoanStatus::PreApproved => ("Loan Pre-Approved", "🎉", Tone::Success),
            LoanStatus::Approved => ("Loan Approved", "🎉", Tone::Success),
            LoanStatus::Rejected => ("Application Rejected", "❌", Tone::Danger),
            LoanStatus::Processing | LoanStatus::Submitted => {
                ("Processing Application", "⏳", Tone::Info)
            }
            LoanStatus::PendingManagerApproval => ("Awaiting Manager Approval", "🕒", Tone::Pending),
            LoanStatus::ManualReview | LoanStatus::Other(_) => {
                ("Manual Review Required", "⚠️", Tone::Warning)
            }
        };

        Self {
            status: snapshot.status.clone(),
            title,
            icon,
            tone,
            explanation: snapshot.explanation.clone(),
            sanction_letter_issued: tone == Tone::Success,
        }
    }
}
