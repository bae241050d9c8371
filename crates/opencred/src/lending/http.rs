use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use super::backend::{BackendError, BackendOperation, LoanBackend};
use super::domain::{
    ChatReply, ChatRequest, ChatbotReply, ChatbotRequest, DecisionReceipt, LoanApplication,
    LoanId, ManagerDecision, PendingQueue, StatusSnapshot, SubmissionReceipt,
};
use crate::config::BackendConfig;

/// [`LoanBackend`] speaking JSON over HTTP to the loan service.
#[derive(Debug, Clone)]
pub struct HttpLoanBackend {
    client: Client,
    base_url: Url,
}

/// Failure to construct the underlying HTTP client.
#[derive(Debug, thiserror::Error)]
#[error("unable to build HTTP client: {0}")]
pub struct HttpClientError(#[from] reqwest::Error);

impl HttpLoanBackend {
    pub fn new(base_url: Url, request_timeout: Duration) -> Result<Self, HttpClientError> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, HttpClientError> {
        Self::new(config.base_url.clone(), config.request_timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T>(&self, url: Url, operation: BackendOperation) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        debug!(%url, %operation, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| BackendError::transport(operation, err.to_string()))?;
        decode(response, operation).await
    }

    async fn post_json<B, T>(
        &self,
        url: Url,
        body: &B,
        operation: BackendOperation,
    ) -> Result<T, BackendError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        debug!(%url, %operation, "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| BackendError::transport(operation, err.to_string()))?;
        decode(response, operation).await
    }
}

async fn decode<T>(response: Response, operation: BackendOperation) -> Result<T, BackendError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        return Err(BackendError::Rejected {
            operation,
            status: status.as_u16(),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|err| BackendError::Decode {
            operation,
            message: err.to_string(),
        })
}

impl LoanBackend for HttpLoanBackend {
    async fn submit_application(
        &self,
        application: &LoanApplication,
    ) -> Result<SubmissionReceipt, BackendError> {
        let url = self.endpoint(&["loans"]);
        self.post_json(url, application, BackendOperation::Submission)
            .await
    }

    async fn fetch_status(&self, loan_id: &LoanId) -> Result<StatusSnapshot, BackendError> {
        let url = self.endpoint(&["loans", loan_id.as_str()]);
        self.get_json(url, BackendOperation::StatusCheck).await
    }

    async fn send_chat(&self, loan_id: &LoanId, message: &str) -> Result<ChatReply, BackendError> {
        let url = self.endpoint(&["chat"]);
        let body = ChatRequest {
            loan_id: loan_id.clone(),
            message: message.to_string(),
        };
        self.post_json(url, &body, BackendOperation::Chat).await
    }

    async fn send_chatbot(&self, request: &ChatbotRequest) -> Result<ChatbotReply, BackendError> {
        let url = self.endpoint(&["chatbot"]);
        self.post_json(url, request, BackendOperation::Chatbot).await
    }

    async fn pending_loans(&self) -> Result<PendingQueue, BackendError> {
        let url = self.endpoint(&["manager", "pending"]);
        self.get_json(url, BackendOperation::PendingQueue).await
    }

    async fn record_decision(
        &self,
        decision: &ManagerDecision,
    ) -> Result<DecisionReceipt, BackendError> {
        let url = self.endpoint(&["manager", "decision"]);
        self.post_json(url, decision, BackendOperation::Decision)
            .await
    }
}
