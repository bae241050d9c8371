use chrono::{Duration, Utc};

use super::common::*;
use crate::lending::assistant::{
    ChatbotConversation, ChatbotTurn, ManagerChat, CONNECTION_TROUBLE, GREETING, REQUIRED_FIELDS,
};
use crate::lending::backend::BackendOperation;
use crate::lending::domain::{ChatReply, ChatbotReply, LoanId, Sender};
use crate::lending::intake::{ApplicationForm, FormStep};

fn reply(response: &str, field: Option<(&str, &str)>) -> ChatbotReply {
    ChatbotReply {
        response: response.to_string(),
        timestamp: "2025-11-02T10:15:00".to_string(),
        collected_field: field.map(|(name, _)| name.to_string()),
        collected_value: field.map(|(_, value)| value.to_string()),
    }
}

#[tokio::test]
async fn blank_messages_are_not_sent() {
    let backend = ScriptedBackend::default();
    let mut conversation = ChatbotConversation::new(Duration::minutes(30));

    assert_eq!(conversation.send(&backend, "   ").await, ChatbotTurn::Ignored);
    assert!(backend.chatbot_requests().is_empty());
    assert_eq!(conversation.messages().len(), 1);
    assert_eq!(conversation.messages()[0].text, GREETING);
}

#[tokio::test]
async fn collected_fields_accumulate_and_travel_with_each_request() {
    let backend = ScriptedBackend::default();
    backend.push_chatbot(Ok(reply(
        "Nice to meet you, Asha. What's your email?",
        Some(("fullName", "Asha Verma")),
    )));
    backend.push_chatbot(Ok(reply("Thanks! And your phone number?", None)));
    let mut conversation = ChatbotConversation::new(Duration::minutes(30));

    let first = conversation.send(&backend, "I'm Asha Verma").await;
    let second = conversation.send(&backend, "asha@example.com").await;

    assert_eq!(
        first,
        ChatbotTurn::Replied {
            reply: "Nice to meet you, Asha. What's your email?".to_string(),
            collected: Some(("fullName".to_string(), "Asha Verma".to_string())),
        }
    );
    assert!(matches!(second, ChatbotTurn::Replied { collected: None, .. }));
    assert_eq!(
        conversation.collected().get("fullName").map(String::as_str),
        Some("Asha Verma")
    );

    let requests = backend.chatbot_requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].conversation_history.len(), 1);
    assert!(requests[0].collected_data.is_empty());
    assert_eq!(requests[1].message, "asha@example.com");
    assert_eq!(requests[1].conversation_history.len(), 3);
    assert_eq!(
        requests[1].collected_data.get("fullName").map(String::as_str),
        Some("Asha Verma")
    );

    let senders: Vec<Sender> = conversation
        .messages()
        .iter()
        .map(|message| message.sender)
        .collect();
    assert_eq!(
        senders,
        [Sender::Bot, Sender::User, Sender::Bot, Sender::User, Sender::Bot]
    );
    assert_eq!(conversation.missing_fields().len(), REQUIRED_FIELDS.len() - 1);
}

#[tokio::test]
async fn confirming_documents_hands_off_to_the_form() {
    let backend = ScriptedBackend::default();
    for (field, value) in [
        ("fullName", "Asha Verma"),
        ("pan", "ABCDE1234F"),
        ("income", "85000"),
        ("amount", "500000"),
        ("tenure", "24"),
    ] {
        backend.push_chatbot(Ok(reply("Noted.", Some((field, value)))));
    }
    backend.push_chatbot(Ok(reply(
        "Great, let's upload your documents.",
        Some(("documentsConfirmed", "yes")),
    )));
    let mut conversation = ChatbotConversation::new(Duration::minutes(30));

    for answer in ["Asha Verma", "ABCDE1234F", "85000", "500000", "24"] {
        let turn = conversation.send(&backend, answer).await;
        assert!(matches!(turn, ChatbotTurn::Replied { .. }), "{turn:?}");
    }
    let mut session = match conversation.send(&backend, "yes, I have them").await {
        ChatbotTurn::HandOff { session, .. } => session,
        other => panic!("expected hand-off, got {other:?}"),
    };

    let fields = session.take_fields(Utc::now()).expect("live session");
    assert!(session.take_fields(Utc::now()).is_none());

    let form = ApplicationForm::from_collected(&fields);
    assert_eq!(form.step(), FormStep::Documents);
    assert_eq!(form.full_name, "Asha Verma");
    assert_eq!(form.tenure, "24 Months");
    assert!(form.agree_to_terms);
}

#[tokio::test]
async fn declining_documents_does_not_hand_off() {
    let backend = ScriptedBackend::default();
    backend.push_chatbot(Ok(reply(
        "No problem, take your time.",
        Some(("documentsConfirmed", "no")),
    )));
    let mut conversation = ChatbotConversation::new(Duration::minutes(30));

    let turn = conversation.send(&backend, "not yet").await;

    assert!(matches!(turn, ChatbotTurn::Replied { .. }));
}

#[tokio::test]
async fn only_a_lowercase_yes_confirms_documents() {
    let backend = ScriptedBackend::default();
    backend.push_chatbot(Ok(reply(
        "Great, let's continue.",
        Some(("documentsConfirmed", "Yes")),
    )));
    let mut conversation = ChatbotConversation::new(Duration::minutes(30));

    let turn = conversation.send(&backend, "Yes").await;

    assert!(matches!(turn, ChatbotTurn::Replied { .. }), "{turn:?}");
}

#[tokio::test]
async fn unreachable_assistant_apologises_and_continues() {
    let backend = ScriptedBackend::default();
    backend.push_chatbot(Err(offline(BackendOperation::Chatbot)));
    backend.push_chatbot(Ok(reply("I'm back. What's your name?", None)));
    let mut conversation = ChatbotConversation::new(Duration::minutes(30));

    let turn = conversation.send(&backend, "hello").await;
    assert_eq!(
        turn,
        ChatbotTurn::Unavailable {
            reply: CONNECTION_TROUBLE.to_string()
        }
    );
    let last = conversation.messages().last().expect("bot apology");
    assert_eq!(last.sender, Sender::Bot);
    assert_eq!(last.text, CONNECTION_TROUBLE);

    assert!(matches!(
        conversation.send(&backend, "hello again").await,
        ChatbotTurn::Replied { .. }
    ));
}

#[tokio::test]
async fn manager_chat_uses_backend_reply_when_available() {
    let backend = ScriptedBackend::default();
    backend.push_chat(Ok(ChatReply {
        response: "Your file is with underwriting.".to_string(),
        timestamp: "2025-11-02T10:20:00".to_string(),
    }));
    let mut chat = ManagerChat::new(LoanId::from("abc123"), "Asha");

    let reply = chat.send(&backend, "Any update?").await.expect("sent");

    assert!(!reply.offline);
    assert_eq!(reply.text, "Your file is with underwriting.");
    assert!(chat.messages()[0].text.starts_with("Hello Asha!"));
    assert_eq!(chat.messages().len(), 3);
    assert_eq!(chat.messages()[2].timestamp, "2025-11-02T10:20:00");
}

#[tokio::test]
async fn manager_chat_falls_back_to_local_reply() {
    let backend = ScriptedBackend::default();
    backend.push_chat(Err(rejected(BackendOperation::Chat)));
    let mut chat = ManagerChat::new(LoanId::from("abc123"), "Asha");

    assert!(chat.send(&backend, "  ").await.is_none());
    let reply = chat
        .send(&backend, "Did you get my salary slips?")
        .await
        .expect("sent");

    assert!(reply.offline);
    assert!(reply.text.contains("monthly income"));
    assert_eq!(
        chat.messages().last().map(|message| message.sender),
        Some(Sender::Manager)
    );
}
