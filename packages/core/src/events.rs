//! Wire encoding for the server-sent notification stream.

use serde::{Deserialize, Serialize};

use crate::{Notification, NotificationKind};

/// Event-stream comment sent on connect and on every heartbeat tick.
pub const HEARTBEAT_FRAME: &str = ": heartbeat\n\n";

/// Presentation type as understood by the browser client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WireType {
    Alert,
    AlertDialog,
    Toast,
}

impl From<NotificationKind> for WireType {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Banner => WireType::Alert,
            NotificationKind::Modal => WireType::AlertDialog,
            NotificationKind::Toast => WireType::Toast,
        }
    }
}

/// JSON payload of one notification event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireNotification {
    pub id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub title: String,
    pub description: String,
    pub selected_type: WireType,
    pub background_color: String,
    pub text_color: String,
    pub border_color: String,
}

impl From<&Notification> for WireNotification {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.to_string(),
            timestamp: n.created_at.timestamp_millis(),
            title: n.title.clone(),
            description: n.body.clone(),
            selected_type: n.kind.into(),
            background_color: n.style.background_color.clone(),
            text_color: n.style.text_color.clone(),
            border_color: n.style.border_color.clone(),
        }
    }
}

/// One frame written to a subscriber stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    /// Comment frame that keeps idle connections alive.
    Heartbeat,
    /// A notification event.
    Notification(WireNotification),
}

impl StreamFrame {
    /// Encode the frame as event-stream text.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        match self {
            StreamFrame::Heartbeat => Ok(HEARTBEAT_FRAME.to_string()),
            StreamFrame::Notification(payload) => {
                let json = serde_json::to_string(payload)?;
                Ok(format!("data: {}\n\n", json))
            }
        }
    }
}

impl From<&Notification> for StreamFrame {
    fn from(n: &Notification) -> Self {
        StreamFrame::Notification(n.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawNotification;
    use chrono::Utc;

    fn toast() -> Result<Notification, crate::ValidationError> {
        let draft = RawNotification {
            title: Some("Maintenance".into()),
            body: Some("Service restarts at 10pm".into()),
            kind: Some("TOAST".into()),
            background_color: Some("#000".into()),
            text_color: Some("#fff".into()),
            border_color: Some("#333".into()),
        }
        .validate()?;
        Ok(Notification::from_draft(draft))
    }

    #[test]
    fn maps_kinds_to_client_types() {
        assert_eq!(WireType::from(NotificationKind::Banner), WireType::Alert);
        assert_eq!(WireType::from(NotificationKind::Modal), WireType::AlertDialog);
        assert_eq!(WireType::from(NotificationKind::Toast), WireType::Toast);
    }

    #[test]
    fn heartbeat_is_a_comment() -> Result<(), serde_json::Error> {
        assert_eq!(StreamFrame::Heartbeat.encode()?, ": heartbeat\n\n");
        Ok(())
    }

    #[test]
    fn encodes_notification_event() -> Result<(), Box<dyn std::error::Error>> {
        let before = Utc::now().timestamp_millis();
        let notification = toast()?;
        let text = StreamFrame::from(&notification).encode()?;

        assert!(text.starts_with("data: "));
        assert!(text.ends_with("\n\n"));

        let json: serde_json::Value =
            serde_json::from_str(text.trim_start_matches("data: ").trim_end())?;
        assert_eq!(json["id"], notification.id.to_string());
        assert_eq!(json["selectedType"], "TOAST");
        assert_eq!(json["title"], "Maintenance");
        assert_eq!(json["description"], "Service restarts at 10pm");
        assert_eq!(json["backgroundColor"], "#000");
        assert_eq!(json["textColor"], "#fff");
        assert_eq!(json["borderColor"], "#333");

        let timestamp = json["timestamp"].as_i64().ok_or("timestamp not a number")?;
        assert!(timestamp >= before);
        assert!(timestamp - before < 5_000);
        Ok(())
    }

    #[test]
    fn dialog_type_uses_screaming_snake_case() -> Result<(), serde_json::Error> {
        assert_eq!(
            serde_json::to_string(&WireType::AlertDialog)?,
            "\"ALERT_DIALOG\""
        );
        Ok(())
    }
}
