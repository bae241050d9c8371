use std::fmt;
use std::future::Future;

use super::domain::{
    ChatReply, ChatbotReply, ChatbotRequest, DecisionReceipt, LoanApplication, LoanId,
    ManagerDecision, PendingQueue, StatusSnapshot, SubmissionReceipt,
};

/// The loan service's REST contract as an async seam, so tracking, intake and review
/// logic can be exercised against scripted backends.
pub trait LoanBackend: Send + Sync {
    /// `POST /loans`
    fn submit_application(
        &self,
        application: &LoanApplication,
    ) -> impl Future<Output = Result<SubmissionReceipt, BackendError>> + Send;

    /// `GET /loans/{loan_id}`
    fn fetch_status(
        &self,
        loan_id: &LoanId,
    ) -> impl Future<Output = Result<StatusSnapshot, BackendError>> + Send;

    /// `POST /chat`
    fn send_chat(
        &self,
        loan_id: &LoanId,
        message: &str,
    ) -> impl Future<Output = Result<ChatReply, BackendError>> + Send;

    /// `POST /chatbot`
    fn send_chatbot(
        &self,
        request: &ChatbotRequest,
    ) -> impl Future<Output = Result<ChatbotReply, BackendError>> + Send;

    /// `GET /manager/pending`
    fn pending_loans(&self) -> impl Future<Output = Result<PendingQueue, BackendError>> + Send;

    /// `POST /manager/decision`
    fn record_decision(
        &self,
        decision: &ManagerDecision,
    ) -> impl Future<Output = Result<DecisionReceipt, BackendError>> + Send;
}

/// Backend call that failed; used to pick the fixed user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendOperation {
    Submission,
    StatusCheck,
    Chat,
    Chatbot,
    PendingQueue,
    Decision,
}

impl BackendOperation {
    pub const fn label(self) -> &'static str {
        match self {
            BackendOperation::Submission => "Submission",
            BackendOperation::StatusCheck => "Status check",
            BackendOperation::Chat => "Chat",
            BackendOperation::Chatbot => "Chatbot",
            BackendOperation::PendingQueue => "Pending queue fetch",
            BackendOperation::Decision => "Manager decision",
        }
    }
}

impl fmt::Display for BackendOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error raised by a [`LoanBackend`].
///
/// Client and server errors are deliberately not told apart: any non-success response
/// maps to [`BackendError::Rejected`] with the same message. The status code is kept
/// for logs.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("{operation} failed")]
    Rejected {
        operation: BackendOperation,
        status: u16,
    },
    #[error("{operation} failed: backend unreachable ({message})")]
    Transport {
        operation: BackendOperation,
        message: String,
    },
    #[error("{operation} failed: unexpected response body ({message})")]
    Decode {
        operation: BackendOperation,
        message: String,
    },
}

impl BackendError {
    pub fn operation(&self) -> BackendOperation {
        match self {
            BackendError::Rejected { operation, .. }
            | BackendError::Transport { operation, .. }
            | BackendError::Decode { operation, .. } => *operation,
        }
    }

    pub fn transport(operation: BackendOperation, message: impl Into<String>) -> Self {
        BackendError::Transport {
            operation,
            message: message.into(),
        }
    }
}
