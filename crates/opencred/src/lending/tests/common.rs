use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::lending::backend::{BackendError, BackendOperation, LoanBackend};
use crate::lending::domain::{
    ChatReply, ChatbotReply, ChatbotRequest, DecisionReceipt, LoanApplication, LoanId,
    LoanStatus, ManagerDecision, PendingLoan, PendingQueue, StatusSnapshot, SubmissionReceipt,
    TimelineEvent,
};

type Script<T> = Mutex<VecDeque<Result<T, BackendError>>>;

/// Backend answering from per-endpoint queues. An exhausted queue answers with a
/// transport error so runaway loops show up as failures rather than hangs.
#[derive(Default)]
pub(super) struct ScriptedBackend {
    submissions: Script<SubmissionReceipt>,
    statuses: Script<StatusSnapshot>,
    chats: Script<ChatReply>,
    chatbot: Script<ChatbotReply>,
    queues: Script<PendingQueue>,
    decisions: Script<DecisionReceipt>,
    status_calls: AtomicUsize,
    chatbot_requests: Mutex<Vec<ChatbotRequest>>,
    recorded_decisions: Mutex<Vec<ManagerDecision>>,
}

impl ScriptedBackend {
    pub(super) fn push_submission(&self, result: Result<SubmissionReceipt, BackendError>) {
        push(&self.submissions, result);
    }

    pub(super) fn push_status(&self, result: Result<StatusSnapshot, BackendError>) {
        push(&self.statuses, result);
    }

    pub(super) fn push_statuses<I>(&self, results: I)
    where
        I: IntoIterator<Item = Result<StatusSnapshot, BackendError>>,
    {
        for result in results {
            self.push_status(result);
        }
    }

    pub(super) fn push_chat(&self, result: Result<ChatReply, BackendError>) {
        push(&self.chats, result);
    }

    pub(super) fn push_chatbot(&self, result: Result<ChatbotReply, BackendError>) {
        push(&self.chatbot, result);
    }

    pub(super) fn push_queue(&self, result: Result<PendingQueue, BackendError>) {
        push(&self.queues, result);
    }

    pub(super) fn push_decision(&self, result: Result<DecisionReceipt, BackendError>) {
        push(&self.decisions, result);
    }

    pub(super) fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub(super) fn chatbot_requests(&self) -> Vec<ChatbotRequest> {
        self.chatbot_requests
            .lock()
            .expect("chatbot mutex poisoned")
            .clone()
    }

    pub(super) fn recorded_decisions(&self) -> Vec<ManagerDecision> {
        self.recorded_decisions
            .lock()
            .expect("decision mutex poisoned")
            .clone()
    }
}

impl LoanBackend for ScriptedBackend {
    async fn submit_application(
        &self,
        _application: &LoanApplication,
    ) -> Result<SubmissionReceipt, BackendError> {
        next(&self.submissions, BackendOperation::Submission)
    }

    async fn fetch_status(&self, _loan_id: &LoanId) -> Result<StatusSnapshot, BackendError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        next(&self.statuses, BackendOperation::StatusCheck)
    }

    async fn send_chat(&self, _loan_id: &LoanId, _message: &str) -> Result<ChatReply, BackendError> {
        next(&self.chats, BackendOperation::Chat)
    }

    async fn send_chatbot(&self, request: &ChatbotRequest) -> Result<ChatbotReply, BackendError> {
        self.chatbot_requests
            .lock()
            .expect("chatbot mutex poisoned")
            .push(request.clone());
        next(&self.chatbot, BackendOperation::Chatbot)
    }

    async fn pending_loans(&self) -> Result<PendingQueue, BackendError> {
        next(&self.queues, BackendOperation::PendingQueue)
    }

    async fn record_decision(
        &self,
        decision: &ManagerDecision,
    ) -> Result<DecisionReceipt, BackendError> {
        self.recorded_decisions
            .lock()
            .expect("decision mutex poisoned")
            .push(decision.clone());
        next(&self.decisions, BackendOperation::Decision)
    }
}

fn push<T>(script: &Script<T>, result: Result<T, BackendError>) {
    script
        .lock()
        .expect("script mutex poisoned")
        .push_back(result);
}

fn next<T>(script: &Script<T>, operation: BackendOperation) -> Result<T, BackendError> {
    script
        .lock()
        .expect("script mutex poisoned")
        .pop_front()
        .unwrap_or_else(|| Err(BackendError::transport(operation, "script exhausted")))
}

pub(super) fn rejected(operation: BackendOperation) -> BackendError {
    BackendError::Rejected {
        operation,
        status: 500,
    }
}

pub(super) fn offline(operation: BackendOperation) -> BackendError {
    BackendError::transport(operation, "connection refused")
}

pub(super) fn application() -> LoanApplication {
    LoanApplication {
        name: "Asha Verma".to_string(),
        pan: "ABCDE1234F".to_string(),
        income: 85_000.0,
        amount: 500_000.0,
        purpose: "Home Renovation".to_string(),
        tenure_months: Some(36),
        document_name: Some("PAN: pan.pdf, Aadhaar: aadhaar.png".to_string()),
    }
}

pub(super) fn receipt(loan_id: &str) -> SubmissionReceipt {
    SubmissionReceipt {
        loan_id: LoanId::from(loan_id),
        timeline: vec![TimelineEvent::new("Application Submitted", "Received by OpenCred")],
    }
}

pub(super) fn snapshot(status: LoanStatus, explanation: &str) -> StatusSnapshot {
    StatusSnapshot {
        status,
        timeline: vec![
            TimelineEvent::new("Application Submitted", "Received by OpenCred"),
            TimelineEvent::new("OCR Extraction", "Documents read"),
            TimelineEvent::new("AI Underwriting", "Risk scored"),
        ],
        explanation: explanation.to_string(),
        data: Some(application()),
    }
}

pub(super) fn pending_loan(loan_id: &str, name: &str) -> PendingLoan {
    PendingLoan {
        loan_id: LoanId::from(loan_id),
        data: LoanApplication {
            name: name.to_string(),
            ..application()
        },
        sanction_letter: String::new(),
        submitted_at: "2025-11-02T10:15:00".to_string(),
        ai_suggestion: "approve".to_string(),
        ai_confidence: Some(82),
        ai_explanation: "Stable salaried income".to_string(),
    }
}
