// Webhook embed layout for a notification.

use chrono::{DateTime, SecondsFormat, Utc};
use quannem_api::{Embed, EmbedField, EmbedFooter, WebhookPayload};

use super::Notification;
use crate::model::{display_value, is_falsy};

const REVIEW_COLOR: u32 = 0x00F1_C40F;
const DEFAULT_COLOR: u32 = 0x002E_CC71;
const FOOTER: &str = "Quán Nem System";

/// Build the single-embed webhook payload announcing `notification`.
pub fn payload_for(notification: &Notification, sent_at: DateTime<Utc>) -> WebhookPayload {
    let topic = notification.topic.as_str();
    let color = if topic == "reviews" {
        REVIEW_COLOR
    } else {
        DEFAULT_COLOR
    };

    let fields = notification
        .record
        .fields()
        .iter()
        .map(|(key, value)| EmbedField {
            name: capitalize(key),
            value: if is_falsy(value) {
                "N/A".into()
            } else {
                display_value(value)
            },
            inline: true,
        })
        .collect();

    WebhookPayload::single(Embed {
        title: format!("🔔 New {}", capitalize(topic)),
        color,
        description: format!("A new {topic} has been submitted!"),
        fields,
        footer: EmbedFooter {
            text: FOOTER.into(),
        },
        timestamp: sent_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::Resource;
    use crate::notify::Topic;

    fn notification(topic: Topic, record: serde_json::Value) -> Notification {
        Notification::new(topic, serde_json::from_value(record).unwrap())
    }

    fn sent_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn review_embed_layout() {
        let n = notification(
            Resource::Reviews.into(),
            json!({"name": "Minh", "rating": 5, "comment": "", "id": 7}),
        );
        let payload = payload_for(&n, sent_at());
        let embed = &payload.embeds[0];

        assert_eq!(embed.title, "🔔 New Reviews");
        assert_eq!(embed.color, 0x00F1_C40F);
        assert_eq!(embed.description, "A new reviews has been submitted!");
        assert_eq!(embed.footer.text, "Quán Nem System");
        assert_eq!(embed.timestamp, "2024-05-01T12:00:00.000Z");

        let rendered: Vec<(&str, &str)> = embed
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.value.as_str()))
            .collect();
        assert_eq!(
            rendered,
            [("Name", "Minh"), ("Rating", "5"), ("Comment", "N/A"), ("Id", "7")]
        );
        assert!(embed.fields.iter().all(|f| f.inline));
    }

    #[test]
    fn non_review_topics_use_green() {
        let n = notification(
            Topic::AdminLogin,
            json!({"user": "admin", "status": "Success"}),
        );
        let payload = payload_for(&n, sent_at());
        let embed = &payload.embeds[0];
        assert_eq!(embed.color, 0x002E_CC71);
        assert_eq!(embed.title, "🔔 New Admin_login");
    }

    #[test]
    fn falsy_values_render_as_na() {
        let n = notification(
            Resource::Reservations.into(),
            json!({"guests": 0, "vip": false, "note": null, "ok": true}),
        );
        let values: Vec<String> = payload_for(&n, sent_at()).embeds[0]
            .fields
            .iter()
            .map(|f| f.value.clone())
            .collect();
        assert_eq!(values, ["N/A", "N/A", "N/A", "true"]);
    }

    #[test]
    fn capitalize_handles_empty_and_unicode() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("đặt"), "Đặt");
    }
}
