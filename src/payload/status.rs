//! Custom status payload
//!
//! A status with no fields serializes to `null`, which the service reads as
//! "clear the status". Omitting the key altogether means "no change".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::ActionBody;

/// Status fields; absent fields are left out of the payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusOptions {
    pub text: Option<String>,
    pub emoji: Option<String>,
    pub expire_at: Option<DateTime<Utc>>,
}

impl StatusOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    pub fn with_expire_at(mut self, expire_at: DateTime<Utc>) -> Self {
        self.expire_at = Some(expire_at);
        self
    }
}

/// Present status fields under their wire names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusContents {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub emoji_name: Option<String>,
}

/// Custom status; `None` is the explicit "no status" marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusPayload(Option<StatusContents>);

impl StatusPayload {
    pub fn new(options: StatusOptions) -> Self {
        let StatusOptions {
            text,
            emoji,
            expire_at,
        } = options;

        if text.is_none() && emoji.is_none() && expire_at.is_none() {
            return Self::clear();
        }

        Self(Some(StatusContents {
            expires_at: expire_at,
            text,
            emoji_name: emoji,
        }))
    }

    /// Payload that removes the current status
    pub fn clear() -> Self {
        Self(None)
    }

    pub fn is_clear(&self) -> bool {
        self.0.is_none()
    }

    pub fn contents(&self) -> Option<&StatusContents> {
        self.0.as_ref()
    }

    /// `{"custom_status": ...}` body for the user settings endpoint
    pub fn into_settings_body(self) -> ActionBody {
        ActionBody::Json(json!({ "custom_status": self }))
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<StatusOptions> for StatusPayload {
    fn from(options: StatusOptions) -> Self {
        Self::new(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_status_collapses_to_null() {
        let status = StatusPayload::new(StatusOptions::default());
        assert!(status.is_clear());
        assert_eq!(status.to_value(), Value::Null);
        assert_ne!(status.to_value(), json!({}));
    }

    #[test]
    fn test_text_only_status() {
        let status = StatusPayload::new(StatusOptions::new().with_text("hi"));
        assert_eq!(status.to_value(), json!({"text": "hi"}));
    }

    #[test]
    fn test_all_fields_renamed() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let status = StatusPayload::new(
            StatusOptions::new()
                .with_text("busy")
                .with_emoji("🔥")
                .with_expire_at(at),
        );

        assert_eq!(
            status.to_value(),
            json!({
                "expires_at": "2024-01-02T03:04:05Z",
                "text": "busy",
                "emoji_name": "🔥"
            })
        );
    }

    #[test]
    fn test_settings_body_keeps_null_marker() {
        let body = StatusPayload::clear().into_settings_body();
        assert_eq!(body.as_json().unwrap(), &json!({"custom_status": null}));
    }
}
