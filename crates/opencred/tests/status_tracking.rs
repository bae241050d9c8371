//! End-to-end status tracking over HTTP against an in-process mock of the loan service.

mod common {
    use std::collections::VecDeque;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use url::Url;

    use opencred::lending::{HttpLoanBackend, LoanApplication};

    type Reply = (StatusCode, Value);

    #[derive(Default)]
    pub(super) struct MockLoanService {
        submissions: Mutex<VecDeque<Reply>>,
        statuses: Mutex<VecDeque<Reply>>,
        received: Mutex<Vec<Value>>,
        polled: Mutex<Vec<String>>,
    }

    impl MockLoanService {
        pub(super) fn reply_to_submission(&self, status: StatusCode, body: Value) {
            self.submissions
                .lock()
                .expect("mock mutex poisoned")
                .push_back((status, body));
        }

        pub(super) fn reply_to_status(&self, status: StatusCode, body: Value) {
            self.statuses
                .lock()
                .expect("mock mutex poisoned")
                .push_back((status, body));
        }

        pub(super) fn received(&self) -> Vec<Value> {
            self.received.lock().expect("mock mutex poisoned").clone()
        }

        pub(super) fn polled(&self) -> Vec<String> {
            self.polled.lock().expect("mock mutex poisoned").clone()
        }
    }

    fn next(queue: &Mutex<VecDeque<Reply>>) -> (StatusCode, Json<Value>) {
        let (status, body) = queue
            .lock()
            .expect("mock mutex poisoned")
            .pop_front()
            .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, json!({"detail": "unscripted"})));
        (status, Json(body))
    }

    async fn submit(
        State(mock): State<Arc<MockLoanService>>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        mock.received.lock().expect("mock mutex poisoned").push(body);
        next(&mock.submissions)
    }

    async fn status(
        State(mock): State<Arc<MockLoanService>>,
        Path(loan_id): Path<String>,
    ) -> (StatusCode, Json<Value>) {
        mock.polled.lock().expect("mock mutex poisoned").push(loan_id);
        next(&mock.statuses)
    }

    pub(super) async fn serve(mock: Arc<MockLoanService>) -> SocketAddr {
        let router = Router::new()
            .route("/loans", post(submit))
            .route("/loans/:loan_id", get(status))
            .with_state(mock);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock listener");
        let addr = listener.local_addr().expect("mock address");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("mock server");
        });
        addr
    }

    pub(super) fn backend(addr: SocketAddr) -> HttpLoanBackend {
        let base = Url::parse(&format!("http://{addr}")).expect("valid url");
        HttpLoanBackend::new(base, Duration::from_secs(2)).expect("client builds")
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
}

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use common::*;
use opencred::lending::tracking::{PollPolicy, StatusPoller, TrackerPhase};
use opencred::lending::{BackendError, BackendOperation, LoanBackend, LoanId, LoanStatus};

fn fast_policy() -> PollPolicy {
    PollPolicy::default().with_interval(Duration::from_millis(10))
}

#[tokio::test]
async fn submission_is_polled_until_rejected_with_reason() {
    let mock = Arc::new(MockLoanService::default());
    mock.reply_to_submission(
        StatusCode::OK,
        json!({
            "loan_id": "abc123",
            "timeline": [{"step": "Application Submitted", "detail": "Received", "time": "2025-11-02T10:15:00"}]
        }),
    );
    mock.reply_to_status(
        StatusCode::OK,
        json!({"status": "processing", "timeline": null, "explanation": null}),
    );
    mock.reply_to_status(
        StatusCode::OK,
        json!({
            "status": "rejected",
            "timeline": [
                {"step": "Application Submitted", "detail": "Received", "time": "2025-11-02T10:15:00"},
                {"step": "AI Underwriting", "detail": "Risk scored", "time": "2025-11-02T10:15:04"}
            ],
            "explanation": "Income insufficient",
            "data": {"name": "Asha Verma", "pan": "ABCDE1234F", "income": 85000, "amount": 500000}
        }),
    );
    let addr = serve(mock.clone()).await;
    let mut poller = StatusPoller::new(Arc::new(backend(addr)), fast_policy());

    let loan_id = poller.submit(application()).await.expect("submitted");
    let settled = poller.run_until_settled().await.expect("settles");

    assert_eq!(loan_id, LoanId::from("abc123"));
    assert_eq!(settled.status, LoanStatus::Rejected);
    assert_eq!(settled.explanation, "Income insufficient");
    assert_eq!(settled.timeline.len(), 2);
    assert_eq!(poller.tracker().phase(), TrackerPhase::Settled);
    assert_eq!(mock.polled(), ["abc123", "abc123"]);

    let sent = mock.received();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["name"], "Asha Verma");
    assert_eq!(sent[0]["tenure"], 36);
    assert_eq!(sent[0]["amount"], 500000.0);
}

#[tokio::test]
async fn non_success_submission_is_rejected_without_polling() {
    let mock = Arc::new(MockLoanService::default());
    mock.reply_to_submission(StatusCode::UNPROCESSABLE_ENTITY, json!({"detail": "bad pan"}));
    let addr = serve(mock.clone()).await;
    let mut poller = StatusPoller::new(Arc::new(backend(addr)), fast_policy());

    let error = poller.submit(application()).await.expect_err("rejected");

    assert!(matches!(
        error,
        BackendError::Rejected {
            operation: BackendOperation::Submission,
            status: 422
        }
    ));
    assert_eq!(error.to_string(), "Submission failed");
    assert!(!poller.tracker().is_loading());
    assert!(mock.polled().is_empty());
}

#[tokio::test]
async fn server_errors_during_polling_are_skipped() {
    let mock = Arc::new(MockLoanService::default());
    mock.reply_to_status(StatusCode::SERVICE_UNAVAILABLE, json!({}));
    mock.reply_to_status(StatusCode::NOT_FOUND, json!({"detail": "not yet"}));
    mock.reply_to_status(
        StatusCode::OK,
        json!({"status": "pre_approved", "timeline": [], "explanation": "Strong repayment capacity"}),
    );
    let addr = serve(mock.clone()).await;
    let mut poller = StatusPoller::new(Arc::new(backend(addr)), fast_policy());
    poller.resume(LoanId::from("abc123"));

    let settled = poller.run_until_settled().await.expect("settles");

    assert_eq!(settled.status, LoanStatus::PreApproved);
    assert_eq!(mock.polled().len(), 3);
}

#[tokio::test]
async fn partial_application_echo_still_settles() {
    let mock = Arc::new(MockLoanService::default());
    mock.reply_to_status(
        StatusCode::OK,
        json!({
            "status": "rejected",
            "timeline": [{"step": "Submitted"}],
            "explanation": "Income insufficient",
            "data": {"name": "A", "amount": 500000, "income": 50000}
        }),
    );
    let addr = serve(mock.clone()).await;
    let mut poller = StatusPoller::new(Arc::new(backend(addr)), fast_policy());
    poller.resume(LoanId::from("abc123"));

    let settled = poller.run_until_settled().await.expect("settles");

    assert_eq!(settled.status, LoanStatus::Rejected);
    assert_eq!(settled.data.map(|data| data.name), Some("A".to_string()));
    assert_eq!(mock.polled().len(), 1);
}

#[tokio::test]
async fn unknown_status_labels_are_kept() {
    let mock = Arc::new(MockLoanService::default());
    mock.reply_to_status(
        StatusCode::OK,
        json!({"status": "escalated", "timeline": [], "explanation": "Sent to credit committee"}),
    );
    let addr = serve(mock).await;

    let snapshot = backend(addr)
        .fetch_status(&LoanId::from("abc123"))
        .await
        .expect("decodes");

    assert_eq!(snapshot.status, LoanStatus::Other("escalated".to_string()));
    assert!(snapshot.data.is_none());
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let mock = Arc::new(MockLoanService::default());
    mock.reply_to_status(StatusCode::OK, json!({"timeline": []}));
    let addr = serve(mock).await;

    let error = backend(addr)
        .fetch_status(&LoanId::from("abc123"))
        .await
        .expect_err("missing status");

    assert!(matches!(error, BackendError::Decode { .. }));
    assert_eq!(error.operation(), BackendOperation::StatusCheck);
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);

    let error = backend(addr)
        .fetch_status(&LoanId::from("abc123"))
        .await
        .expect_err("nothing listening");

    assert!(matches!(error, BackendError::Transport { .. }));
}
