//! Client side of the OpenCred loan service.
//!
//! [`backend::LoanBackend`] is the REST contract; [`http::HttpLoanBackend`] speaks it over
//! HTTP. Everything else in here is driven through that trait so the flows can run
//! against scripted backends in tests.

pub mod assistant;
pub mod backend;
pub mod domain;
pub mod http;
pub mod intake;
pub mod review;
pub mod sanction;
pub mod tracking;

#[cfg(test)]
mod tests;

pub use backend::{BackendError, BackendOperation, LoanBackend};
pub use domain::{
    ChatMessage, ChatReply, ChatbotReply, ChatbotRequest, CollectedFields, DecisionKind,
    DecisionReceipt, LoanApplication, LoanId, LoanStatus, ManagerDecision, PendingLoan,
    PendingQueue, Sender, StatusSnapshot, SubmissionReceipt, TimelineEvent,
};
pub use http::{HttpClientError, HttpLoanBackend};
pub use review::{ReviewDesk, ReviewError};
pub use tracking::{PollHandle, PollPolicy, StatusPoller, StatusTracker};
