//! Notification domain types and producer-side validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;
use thiserror::Error;
use ulid::Ulid;

/// Unique identifier for a notification, using ULID for chronological sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub Ulid);

impl NotificationId {
    /// Create a new unique notification ID.
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parse a notification ID from a string.
    pub fn parse(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the client should present a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationKind {
    /// Inline banner across the top of the page.
    Banner,
    /// Blocking dialog the user has to dismiss.
    Modal,
    /// Transient toast in a corner of the screen.
    Toast,
}

impl NotificationKind {
    /// All kinds accepted from producers.
    pub const ALL: [NotificationKind; 3] = [Self::Banner, Self::Modal, Self::Toast];

    /// Producer-facing name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Banner => "BANNER",
            NotificationKind::Modal => "MODAL",
            NotificationKind::Toast => "TOAST",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownKind(s.to_string()))
    }
}

/// Presentation hints passed through to the client untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationStyle {
    pub background_color: String,
    pub text_color: String,
    pub border_color: String,
}

/// Errors raised while validating producer input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("unknown notification kind '{0}', expected one of BANNER, MODAL, TOAST")]
    UnknownKind(String),
}

/// Notification as submitted by a producer, before validation.
///
/// Every field is optional here so that a missing field is reported as a
/// validation failure rather than a deserialization failure. Falsy JSON
/// values (`null`, `false`, `0`) count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNotification {
    #[serde(default, deserialize_with = "falsy_as_none")]
    pub title: Option<String>,
    #[serde(default, alias = "description", deserialize_with = "falsy_as_none")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "falsy_as_none")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "falsy_as_none")]
    pub background_color: Option<String>,
    #[serde(default, deserialize_with = "falsy_as_none")]
    pub text_color: Option<String>,
    #[serde(default, deserialize_with = "falsy_as_none")]
    pub border_color: Option<String>,
}

fn falsy_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::Number(n) if n.as_f64() == Some(0.0) => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(de::Error::custom(format!("expected a string, found {other}"))),
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField(field)),
    }
}

impl RawNotification {
    /// Validate the input into a draft ready for enqueueing.
    ///
    /// Fields are checked in wire order so the first missing one is reported.
    pub fn validate(self) -> Result<NotificationDraft, ValidationError> {
        let title = required(self.title, "title")?;
        let body = required(self.body, "body")?;
        let kind = required(self.kind, "kind")?.parse::<NotificationKind>()?;
        let style = NotificationStyle {
            background_color: required(self.background_color, "backgroundColor")?,
            text_color: required(self.text_color, "textColor")?,
            border_color: required(self.border_color, "borderColor")?,
        };

        Ok(NotificationDraft {
            kind,
            title,
            body,
            style,
        })
    }
}

/// Validated notification content without identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub style: NotificationStyle,
}

/// A notification accepted by the broadcaster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Assigned when the notification is enqueued.
    pub id: NotificationId,
    /// When the notification was enqueued.
    pub created_at: DateTime<Utc>,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub style: NotificationStyle,
}

impl Notification {
    /// Stamp a draft with a fresh ID and the current time.
    pub fn from_draft(draft: NotificationDraft) -> Self {
        Self {
            id: NotificationId::new(),
            created_at: Utc::now(),
            kind: draft.kind,
            title: draft.title,
            body: draft.body,
            style: draft.style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> RawNotification {
        RawNotification {
            title: Some("Maintenance".into()),
            body: Some("Service restarts at 10pm".into()),
            kind: Some("TOAST".into()),
            background_color: Some("#000".into()),
            text_color: Some("#fff".into()),
            border_color: Some("#333".into()),
        }
    }

    #[test]
    fn accepts_complete_input() -> Result<(), ValidationError> {
        let draft = complete().validate()?;
        assert_eq!(draft.kind, NotificationKind::Toast);
        assert_eq!(draft.title, "Maintenance");
        assert_eq!(draft.style.border_color, "#333");
        Ok(())
    }

    #[test]
    fn rejects_each_missing_field() {
        let cases: [(&str, fn(&mut RawNotification)); 6] = [
            ("title", |r| r.title = None),
            ("body", |r| r.body = None),
            ("kind", |r| r.kind = None),
            ("backgroundColor", |r| r.background_color = None),
            ("textColor", |r| r.text_color = None),
            ("borderColor", |r| r.border_color = None),
        ];

        for (field, clear) in cases {
            let mut raw = complete();
            clear(&mut raw);
            assert_eq!(raw.validate(), Err(ValidationError::MissingField(field)));
        }
    }

    #[test]
    fn rejects_blank_fields() {
        let mut raw = complete();
        raw.title = Some(String::new());
        assert_eq!(raw.validate(), Err(ValidationError::MissingField("title")));

        let mut raw = complete();
        raw.text_color = Some("   ".into());
        assert_eq!(
            raw.validate(),
            Err(ValidationError::MissingField("textColor"))
        );
    }

    #[test]
    fn rejects_every_subset_of_fields() {
        // Any non-full subset of the six fields must fail.
        for mask in 0u8..63 {
            let mut raw = complete();
            if mask & 1 == 0 {
                raw.title = None;
            }
            if mask & 2 == 0 {
                raw.body = None;
            }
            if mask & 4 == 0 {
                raw.kind = None;
            }
            if mask & 8 == 0 {
                raw.background_color = None;
            }
            if mask & 16 == 0 {
                raw.text_color = None;
            }
            if mask & 32 == 0 {
                raw.border_color = None;
            }
            assert!(raw.validate().is_err(), "mask {mask:06b} was accepted");
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        for kind in ["ALERT", "toast", "POPUP", "ALERT_DIALOG"] {
            let mut raw = complete();
            raw.kind = Some(kind.into());
            assert_eq!(
                raw.validate(),
                Err(ValidationError::UnknownKind(kind.to_string()))
            );
        }
    }

    #[test]
    fn deserializes_producer_json() -> Result<(), Box<dyn std::error::Error>> {
        let raw: RawNotification = serde_json::from_str(
            r##"{"title":"t","description":"d","kind":"MODAL","backgroundColor":"#000","textColor":"#fff","borderColor":"#333"}"##,
        )?;
        let draft = raw.validate()?;
        assert_eq!(draft.body, "d");
        assert_eq!(draft.kind, NotificationKind::Modal);
        Ok(())
    }

    #[test]
    fn falsy_values_are_missing_fields() -> Result<(), serde_json::Error> {
        let raw: RawNotification = serde_json::from_str(
            r##"{"title":"t","body":"b","kind":false,"backgroundColor":"#000","textColor":"#fff","borderColor":"#333"}"##,
        )?;
        assert_eq!(raw.validate(), Err(ValidationError::MissingField("kind")));

        let raw: RawNotification = serde_json::from_str(r#"{"title":0,"body":null}"#)?;
        assert_eq!(raw.title, None);
        assert_eq!(raw.validate(), Err(ValidationError::MissingField("title")));
        Ok(())
    }

    #[test]
    fn truthy_non_string_is_a_decode_error() {
        assert!(serde_json::from_str::<RawNotification>(r#"{"title":7}"#).is_err());
        assert!(serde_json::from_str::<RawNotification>(r#"{"kind":true}"#).is_err());
    }

    #[test]
    fn stamps_fresh_identity() -> Result<(), ValidationError> {
        let first = Notification::from_draft(complete().validate()?);
        let second = Notification::from_draft(complete().validate()?);
        assert_ne!(first.id, second.id);
        assert!(second.created_at >= first.created_at);
        Ok(())
    }
}
