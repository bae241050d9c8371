use chrono::Utc;
use tracing::warn;

use crate::lending::backend::LoanBackend;
use crate::lending::domain::{ChatMessage, LoanId, Sender};

/// Reply from the loan manager chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerReply {
    pub text: String,
    /// True when the backend was unreachable and a local reply was used instead.
    pub offline: bool,
}

/// Applicant-to-manager chat about a submitted loan (`POST /chat`).
#[derive(Debug, Clone)]
pub struct ManagerChat {
    loan_id: LoanId,
    messages: Vec<ChatMessage>,
}

impl ManagerChat {
    pub fn new(loan_id: LoanId, applicant_name: &str) -> Self {
        let greeting = format!(
            "Hello {applicant_name}! I'm reviewing your loan application. How can I assist you today?"
        );
        Self {
            loan_id,
            messages: vec![ChatMessage {
                sender: Sender::Manager,
                text: greeting,
                timestamp: Utc::now().to_rfc3339(),
            }],
        }
    }

    pub fn loan_id(&self) -> &LoanId {
        &self.loan_id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send a message; blank input is ignored and yields `None`.
    pub async fn send<B>(&mut self, backend: &B, text: &str) -> Option<ManagerReply>
    where
        B: LoanBackend,
    {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.messages.push(ChatMessage {
            sender: Sender::User,
            text: text.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        });

        let (reply, timestamp) = match backend.send_chat(&self.loan_id, text).await {
            Ok(reply) => (
                ManagerReply {
                    text: reply.response,
                    offline: false,
                },
                reply.timestamp,
            ),
            Err(error) => {
                warn!(loan_id = %self.loan_id, %error, "manager chat unavailable; using local reply");
                (
                    ManagerReply {
                        text: fallback_reply(text).to_string(),
                        offline: true,
                    },
                    String::new(),
                )
            }
        };

        self.messages.push(ChatMessage {
            sender: Sender::Manager,
            text: reply.text.clone(),
            timestamp: if timestamp.is_empty() {
                Utc::now().to_rfc3339()
            } else {
                timestamp
            },
        });
        Some(reply)
    }
}

/// Local reply picked by keyword when the manager chat cannot be reached.
pub fn fallback_reply(message: &str) -> &'static str {
    let input = message.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|word| input.contains(word));

    if mentions(&["status", "update"]) {
        "Your application is currently under manual review. I'm analyzing your income-to-loan \
         ratio and will have a decision for you within 24 hours."
    } else if mentions(&["document", "upload"]) {
        "All your documents have been received and verified. Is there a specific document \
         you'd like to discuss?"
    } else if mentions(&["income", "salary"]) {
        "I see your monthly income is listed. If you have additional income sources or recent \
         salary increases, please share those details with me."
    } else if mentions(&["help", "question"]) {
        "I'm here to help! You can ask me about your application status, required documents, \
         loan terms, or any concerns you have."
    } else {
        "Thank you for your message. I'm reviewing your application carefully. Is there \
         anything specific about your loan application you'd like to discuss?"
    }
}
