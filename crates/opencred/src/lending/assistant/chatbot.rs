use chrono::{Duration, Utc};
use tracing::{info, warn};

use super::session::ApplicationSession;
use crate::lending::backend::LoanBackend;
use crate::lending::domain::{ChatMessage, ChatbotRequest, CollectedFields, Sender};

pub const GREETING: &str = "Hello! I'm your AI loan assistant from OpenCred. I'll guide you \
through the application step by step and answer any questions along the way.\n\nTo get \
started, could you please tell me your full name?";

pub const CONNECTION_TROUBLE: &str = "I'm having trouble connecting. Could you please try again?";

/// Fields the assistant must collect before handing off.
pub const REQUIRED_FIELDS: [&str; 11] = [
    "fullName",
    "email",
    "phone",
    "pan",
    "address",
    "employmentType",
    "income",
    "amount",
    "purpose",
    "tenure",
    "documentsConfirmed",
];

const DOCUMENTS_CONFIRMED: &str = "documentsConfirmed";

/// Result of sending one message to the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatbotTurn {
    /// Blank input; nothing was sent.
    Ignored,
    Replied {
        reply: String,
        collected: Option<(String, String)>,
    },
    /// The applicant confirmed their documents; the session carries the collected fields.
    HandOff {
        reply: String,
        session: ApplicationSession,
    },
    /// Backend unreachable; a canned reply was appended and the conversation continues.
    Unavailable { reply: String },
}

/// Conversational intake against `POST /chatbot`.
#[derive(Debug, Clone)]
pub struct ChatbotConversation {
    messages: Vec<ChatMessage>,
    collected: CollectedFields,
    session_ttl: Duration,
}

impl ChatbotConversation {
    pub fn new(session_ttl: Duration) -> Self {
        Self {
            messages: vec![message(Sender::Bot, GREETING.to_string(), None)],
            collected: CollectedFields::new(),
            session_ttl,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn collected(&self) -> &CollectedFields {
        &self.collected
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| {
                self.collected
                    .get(*field)
                    .map_or(true, |value| value.trim().is_empty())
            })
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub async fn send<B>(&mut self, backend: &B, text: &str) -> ChatbotTurn
    where
        B: LoanBackend,
    {
        let text = text.trim();
        if text.is_empty() {
            return ChatbotTurn::Ignored;
        }

        let request = ChatbotRequest {
            message: text.to_string(),
            conversation_history: self.messages.clone(),
            collected_data: self.collected.clone(),
        };
        self.messages
            .push(message(Sender::User, text.to_string(), None));

        let reply = match backend.send_chatbot(&request).await {
            Ok(reply) => reply,
            Err(error) => {
                warn!(%error, "assistant unavailable");
                self.messages
                    .push(message(Sender::Bot, CONNECTION_TROUBLE.to_string(), None));
                return ChatbotTurn::Unavailable {
                    reply: CONNECTION_TROUBLE.to_string(),
                };
            }
        };

        self.messages.push(message(
            Sender::Bot,
            reply.response.clone(),
            Some(reply.timestamp.clone()),
        ));

        let Some((field, value)) = reply.collected() else {
            return ChatbotTurn::Replied {
                reply: reply.response,
                collected: None,
            };
        };
        let (field, value) = (field.to_string(), value.to_string());
        info!(field = %field, "assistant collected field");
        self.collected.insert(field.clone(), value.clone());

        if field == DOCUMENTS_CONFIRMED && value == "yes" {
            let session = ApplicationSession::new(self.collected.clone(), Utc::now(), self.session_ttl);
            return ChatbotTurn::HandOff {
                reply: reply.response,
                session,
            };
        }

        ChatbotTurn::Replied {
            reply: reply.response,
            collected: Some((field, value)),
        }
    }
}

fn message(sender: Sender, text: String, timestamp: Option<String>) -> ChatMessage {
    ChatMessage {
        sender,
        text,
        timestamp: timestamp
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| Utc::now().to_rfc3339()),
    }
}
