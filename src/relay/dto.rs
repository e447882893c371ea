use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use super::errors::RelayError;

/// Inbound body. Every field is optional on the wire; `user_id` is enforced later.
#[derive(Debug, Default, Deserialize)]
pub struct OnboardingEventRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub context: Option<Value>,
}

/// Body forwarded to the automation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub user_id: String,
    pub created_at: String,
    pub context: Value,
}

pub fn default_context() -> Value {
    json!({ "platform": "web", "source": "onboarding" })
}

impl OnboardingEventRequest {
    /// An empty body reads as `{}`; anything that is not a JSON object is rejected.
    pub fn parse(body: &[u8]) -> Result<Self, RelayError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| RelayError::Validation(format!("Invalid request body: {e}")))
    }

    /// Checks the one required field. Nothing is defaulted yet.
    pub fn validate(self) -> Result<ValidatedEvent, RelayError> {
        let user_id = self
            .user_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| RelayError::Validation("User ID is required".into()))?;
        Ok(ValidatedEvent {
            user_id,
            created_at: self.created_at,
            context: self.context,
        })
    }
}

/// A request whose `user_id` has been checked.
#[derive(Debug)]
pub struct ValidatedEvent {
    user_id: String,
    created_at: Option<String>,
    context: Option<Value>,
}

impl ValidatedEvent {
    /// Falsy `created_at` becomes `now`; falsy `context` becomes [`default_context`].
    pub fn with_defaults(self, now: OffsetDateTime) -> Result<WebhookEvent, RelayError> {
        let created_at = match self.created_at.filter(|s| !s.is_empty()) {
            Some(ts) => ts,
            None => now
                .format(&Rfc3339)
                .map_err(|e| RelayError::Internal(e.to_string()))?,
        };

        let context = self
            .context
            .filter(is_truthy)
            .unwrap_or_else(default_context);

        Ok(WebhookEvent {
            user_id: self.user_id,
            created_at,
            context,
        })
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod relay_dto_tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn defaults_fill_missing_fields() {
        let now = datetime!(2024-05-01 10:30:00 UTC);
        let event = OnboardingEventRequest::parse(br#"{"user_id":"u1"}"#)
            .unwrap()
            .validate()
            .unwrap()
            .with_defaults(now)
            .unwrap();
        assert_eq!(event.user_id, "u1");
        assert_eq!(event.created_at, "2024-05-01T10:30:00Z");
        assert_eq!(event.context, default_context());
    }

    #[test]
    fn explicit_fields_are_kept() {
        let body = br#"{"user_id":"u1","created_at":"2023-01-01T00:00:00Z","context":{"platform":"ios"}}"#;
        let event = OnboardingEventRequest::parse(body)
            .unwrap()
            .validate()
            .unwrap()
            .with_defaults(OffsetDateTime::now_utc())
            .unwrap();
        assert_eq!(event.created_at, "2023-01-01T00:00:00Z");
        assert_eq!(event.context, json!({"platform": "ios"}));
    }

    #[test]
    fn falsy_context_and_timestamp_fall_back() {
        let now = datetime!(2024-05-01 10:30:00 UTC);
        let body = br#"{"user_id":"u1","created_at":"","context":null}"#;
        let event = OnboardingEventRequest::parse(body)
            .unwrap()
            .validate()
            .unwrap()
            .with_defaults(now)
            .unwrap();
        assert_eq!(event.created_at, "2024-05-01T10:30:00Z");
        assert_eq!(event.context, default_context());

        let event = OnboardingEventRequest::parse(br#"{"user_id":"u1","context":{}}"#)
            .unwrap()
            .validate()
            .unwrap()
            .with_defaults(now)
            .unwrap();
        assert_eq!(event.context, json!({}));
    }

    #[test]
    fn user_id_is_required() {
        let bodies: [&[u8]; 4] = [b"", b"{}", br#"{"user_id":""}"#, br#"{"user_id":null}"#];
        for body in bodies {
            let err = OnboardingEventRequest::parse(body)
                .unwrap()
                .validate()
                .unwrap_err();
            assert!(matches!(err, RelayError::Validation(ref m) if m == "User ID is required"));
        }
    }

    #[test]
    fn non_object_body_is_a_validation_error() {
        assert!(matches!(
            OnboardingEventRequest::parse(b"not json"),
            Err(RelayError::Validation(_))
        ));
        assert!(matches!(
            OnboardingEventRequest::parse(b"[1,2]"),
            Err(RelayError::Validation(_))
        ));
    }
}
