//! Manager review desk over `GET /manager/pending` and `POST /manager/decision`.

mod export;

pub use export::{write_queue_csv, QueueRow};

use std::sync::Arc;

use tracing::info;

use crate::lending::backend::{BackendError, LoanBackend};
use crate::lending::domain::{
    DecisionKind, DecisionReceipt, LoanId, ManagerDecision, PendingLoan,
};

pub const DEFAULT_APPROVAL_COMMENT: &str = "Application meets all criteria. Approved by manager.";

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("loan {0} is not in the pending queue")]
    UnknownLoan(LoanId),
    #[error("a reason is required to reject a loan")]
    MissingReason,
}

/// Local copy of the pending queue plus the decision actions on it.
pub struct ReviewDesk<B> {
    backend: Arc<B>,
    pending: Vec<PendingLoan>,
}

impl<B> ReviewDesk<B>
where
    B: LoanBackend,
{
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            pending: Vec::new(),
        }
    }

    pub fn pending(&self) -> &[PendingLoan] {
        &self.pending
    }

    pub fn find(&self, loan_id: &LoanId) -> Option<&PendingLoan> {
        self.pending.iter().find(|loan| &loan.loan_id == loan_id)
    }

    /// Replace the local queue with the backend's. On failure the queue is left as is.
    pub async fn refresh(&mut self) -> Result<&[PendingLoan], ReviewError> {
        let queue = self.backend.pending_loans().await?;
        info!(pending = queue.pending_loans.len(), "pending queue refreshed");
        self.pending = queue.pending_loans;
        Ok(&self.pending)
    }

    pub async fn approve(
        &mut self,
        loan_id: &LoanId,
        comments: Option<&str>,
    ) -> Result<DecisionReceipt, ReviewError> {
        let comments = comments
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_APPROVAL_COMMENT);
        self.decide(loan_id, DecisionKind::Approved, comments).await
    }

    pub async fn reject(
        &mut self,
        loan_id: &LoanId,
        reason: &str,
    ) -> Result<DecisionReceipt, ReviewError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ReviewError::MissingReason);
        }
        self.decide(loan_id, DecisionKind::Rejected, reason).await
    }

    async fn decide(
        &mut self,
        loan_id: &LoanId,
        decision: DecisionKind,
        comments: &str,
    ) -> Result<DecisionReceipt, ReviewError> {
        if self.find(loan_id).is_none() {
            return Err(ReviewError::UnknownLoan(loan_id.clone()));
        }

        let request = ManagerDecision {
            loan_id: loan_id.clone(),
            decision,
            comments: comments.to_string(),
        };
        let receipt = self.backend.record_decision(&request).await?;

        self.pending.retain(|loan| &loan.loan_id != loan_id);
        info!(%loan_id, decision = decision.label(), status = %receipt.loan_status, "manager decision recorded");
        Ok(receipt)
    }
}
