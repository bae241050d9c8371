//! Conversational flows: the intake assistant, its typed hand-off to the manual form,
//! and the applicant's chat with the reviewing manager.

mod chatbot;
mod session;
mod support;

pub use chatbot::{ChatbotConversation, ChatbotTurn, CONNECTION_TROUBLE, GREETING, REQUIRED_FIELDS};
pub use session::ApplicationSession;
pub use support::{fallback_reply, ManagerChat, ManagerReply};
