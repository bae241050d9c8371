use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::lending::domain::CollectedFields;

/// Typed hand-off of assistant-collected fields to the manual form.
///
/// A session is single use: reading the fields through [`take_fields`](Self::take_fields)
/// clears it, and it yields nothing once expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSession {
    fields: CollectedFields,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    #[serde(default)]
    cleared: bool,
}

impl ApplicationSession {
    pub fn new(fields: CollectedFields, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            fields,
            created_at: now,
            expires_at: now + ttl,
            cleared: false,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    /// Fields while the session is live, without consuming them.
    pub fn peek(&self, now: DateTime<Utc>) -> Option<&CollectedFields> {
        if self.cleared || self.is_expired(now) {
            None
        } else {
            Some(&self.fields)
        }
    }

    /// Hand the fields over and clear the session, expired or not.
    pub fn take_fields(&mut self, now: DateTime<Utc>) -> Option<CollectedFields> {
        let live = !self.cleared && !self.is_expired(now);
        let fields = std::mem::take(&mut self.fields);
        self.cleared = true;
        live.then_some(fields)
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.cleared = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fields() -> CollectedFields {
        let mut fields = CollectedFields::new();
        fields.insert("fullName".to_string(), "Ravi Kumar".to_string());
        fields.insert("documentsConfirmed".to_string(), "yes".to_string());
        fields
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 2, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn fields_are_single_use() {
        let mut session = ApplicationSession::new(fields(), start(), Duration::minutes(30));
        let now = start() + Duration::minutes(5);

        assert!(session.peek(now).is_some());
        let taken = session.take_fields(now).expect("live session yields fields");
        assert_eq!(taken.get("fullName").map(String::as_str), Some("Ravi Kumar"));

        assert!(session.is_cleared());
        assert!(session.take_fields(now).is_none());
    }

    #[test]
    fn expired_sessions_yield_nothing_and_clear() {
        let mut session = ApplicationSession::new(fields(), start(), Duration::minutes(30));
        let later = start() + Duration::minutes(30);

        assert!(session.is_expired(later));
        assert!(session.peek(later).is_none());
        assert!(session.take_fields(later).is_none());
        assert!(session.is_cleared());
    }

    #[test]
    fn explicit_clear_drops_fields() {
        let mut session = ApplicationSession::new(fields(), start(), Duration::minutes(30));
        session.clear();
        assert!(session.peek(start()).is_none());
    }

    #[test]
    fn sessions_round_trip_through_json() {
        let session = ApplicationSession::new(fields(), start(), Duration::minutes(30));
        let raw = serde_json::to_string(&session).expect("serializes");
        let restored: ApplicationSession = serde_json::from_str(&raw).expect("parses");
        assert_eq!(restored, session);
    }
}
