use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier wrapper for loans registered with the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(pub String);

impl LoanId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LoanId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Application payload as submitted to `POST /loans`.
///
/// The backend echoes the same shape back as the `data` member of a status snapshot,
/// so members other than the name and figures default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub name: String,
    #[serde(default)]
    pub pan: String,
    /// Monthly income in rupees.
    pub income: f64,
    /// Requested loan amount in rupees.
    pub amount: f64,
    #[serde(default)]
    pub purpose: String,
    #[serde(
        default,
        rename = "tenure",
        skip_serializing_if = "Option::is_none"
    )]
    pub tenure_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,
}

/// Loan status as reported by the backend.
///
/// The vocabulary is not consistent across backend revisions, so unknown labels are
/// kept verbatim in [`LoanStatus::Other`] instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LoanStatus {
    Submitted,
    Processing,
    PreApproved,
    Approved,
    Rejected,
    ManualReview,
    PendingManagerApproval,
    Other(String),
}

impl LoanStatus {
    pub fn label(&self) -> &str {
        match self {
            LoanStatus::Submitted => "submitted",
            LoanStatus::Processing => "processing",
            LoanStatus::PreApproved => "pre_approved",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
            LoanStatus::ManualReview => "manual_review",
            LoanStatus::PendingManagerApproval => "pending_manager_approval",
            LoanStatus::Other(label) => label,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "submitted" => LoanStatus::Submitted,
            "processing" => LoanStatus::Processing,
            "pre_approved" => LoanStatus::PreApproved,
            "approved" => LoanStatus::Approved,
            "rejected" => LoanStatus::Rejected,
            "manual_review" => LoanStatus::ManualReview,
            "pending_manager_approval" => LoanStatus::PendingManagerApproval,
            other => LoanStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for LoanStatus {
    fn from(value: String) -> Self {
        LoanStatus::from_label(&value)
    }
}

impl From<LoanStatus> for String {
    fn from(value: LoanStatus) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry of the server-side processing timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub step: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub detail: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub time: String,
}

impl TimelineEvent {
    pub fn new(step: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            detail: detail.into(),
            time: String::new(),
        }
    }

    /// Timestamp of the event when the backend supplied a parseable one.
    pub fn recorded_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.time)
    }
}

/// Full status object returned by `GET /loans/{id}`; replaces prior state wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub status: LoanStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timeline: Vec<TimelineEvent>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub explanation: String,
    /// Echo of the submitted application; a malformed echo decodes as `None`.
    #[serde(default, deserialize_with = "lenient_application")]
    pub data: Option<LoanApplication>,
}

/// Response of `POST /loans`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub loan_id: LoanId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timeline: Vec<TimelineEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
    Manager,
}

/// A single line of a chat transcript, in the shape the chatbot endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub timestamp: String,
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub loan_id: LoanId,
    pub message: String,
}

/// Response of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub timestamp: String,
}

/// Fields gathered by the assistant, keyed by the form field name (`fullName`, `pan`, ...).
pub type CollectedFields = BTreeMap<String, String>;

/// Body of `POST /chatbot`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatbotRequest {
    pub message: String,
    pub conversation_history: Vec<ChatMessage>,
    pub collected_data: CollectedFields,
}

/// Response of `POST /chatbot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatbotReply {
    pub response: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub timestamp: String,
    #[serde(default)]
    pub collected_field: Option<String>,
    #[serde(default)]
    pub collected_value: Option<String>,
}

impl ChatbotReply {
    /// The collected field/value pair, present only when both halves are non-empty.
    pub fn collected(&self) -> Option<(&str, &str)> {
        let field = self.collected_field.as_deref()?.trim();
        let value = self.collected_value.as_deref()?.trim();
        if field.is_empty() || value.is_empty() {
            return None;
        }
        Some((field, value))
    }
}

/// Loan awaiting a manager decision, as listed by `GET /manager/pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingLoan {
    pub loan_id: LoanId,
    pub data: LoanApplication,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sanction_letter: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub submitted_at: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ai_suggestion: String,
    #[serde(default)]
    pub ai_confidence: Option<u8>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ai_explanation: String,
}

impl PendingLoan {
    pub fn submitted_on(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.submitted_at)
    }
}

/// Response of `GET /manager/pending`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PendingQueue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub pending_loans: Vec<PendingLoan>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Approved,
    Rejected,
}

impl DecisionKind {
    pub const fn label(self) -> &'static str {
        match self {
            DecisionKind::Approved => "approved",
            DecisionKind::Rejected => "rejected",
        }
    }
}

/// Body of `POST /manager/decision`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerDecision {
    pub loan_id: LoanId,
    pub decision: DecisionKind,
    pub comments: String,
}

/// Response of `POST /manager/decision`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionReceipt {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    pub loan_status: LoanStatus,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_application<'de, D>(deserializer: D) -> Result<Option<LoanApplication>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

pub(crate) fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_status_labels_are_preserved() {
        let status: LoanStatus = serde_json::from_value(json!("escalated")).expect("parses");
        assert_eq!(status, LoanStatus::Other("escalated".to_string()));
        assert_eq!(serde_json::to_value(&status).expect("serializes"), json!("escalated"));
    }

    #[test]
    fn snapshot_tolerates_null_and_missing_members() {
        let snapshot: StatusSnapshot = serde_json::from_value(json!({
            "status": "pre_approved",
            "explanation": null,
        }))
        .expect("parses");

        assert_eq!(snapshot.status, LoanStatus::PreApproved);
        assert!(snapshot.timeline.is_empty());
        assert!(snapshot.explanation.is_empty());
        assert!(snapshot.data.is_none());
    }

    #[test]
    fn partial_application_echo_still_decodes() {
        let snapshot: StatusSnapshot = serde_json::from_value(json!({
            "status": "rejected",
            "timeline": [{"step": "Submitted"}],
            "explanation": "Income insufficient",
            "data": {"name": "A", "amount": 500000, "income": 50000},
        }))
        .expect("parses");

        assert_eq!(snapshot.status, LoanStatus::Rejected);
        assert_eq!(snapshot.explanation, "Income insufficient");
        let data = snapshot.data.expect("echo kept");
        assert_eq!(data.name, "A");
        assert_eq!(data.amount, 500_000.0);
        assert!(data.pan.is_empty());
    }

    #[test]
    fn malformed_application_echo_is_dropped() {
        let snapshot: StatusSnapshot = serde_json::from_value(json!({
            "status": "approved",
            "explanation": "Strong repayment capacity",
            "data": {"name": "A", "amount": "five lakh"},
        }))
        .expect("parses");

        assert_eq!(snapshot.status, LoanStatus::Approved);
        assert!(snapshot.data.is_none());
    }

    #[test]
    fn backend_timestamps_without_offset_parse() {
        let event = TimelineEvent {
            step: "Submitted".to_string(),
            detail: "Loan application submitted".to_string(),
            time: "2025-11-02T09:15:42.118204".to_string(),
        };
        let parsed = event.recorded_at().expect("timestamp parses");
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2025, 11, 2).expect("valid"));
    }

    #[test]
    fn application_omits_absent_optionals() {
        let application = LoanApplication {
            name: "A".to_string(),
            pan: "ABCDE1234F".to_string(),
            income: 50_000.0,
            amount: 500_000.0,
            purpose: "Personal Loan".to_string(),
            tenure_months: None,
            document_name: None,
        };
        let value = serde_json::to_value(&application).expect("serializes");
        assert!(value.get("tenure").is_none());
        assert!(value.get("document_name").is_none());
    }

    #[test]
    fn collected_requires_both_halves() {
        let reply = ChatbotReply {
            response: "Thanks!".to_string(),
            timestamp: String::new(),
            collected_field: Some("email".to_string()),
            collected_value: Some("  ".to_string()),
        };
        assert!(reply.collected().is_none());
    }
}
