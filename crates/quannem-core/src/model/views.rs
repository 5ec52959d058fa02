// ── Typed read-only views over schemaless records ──
//
// Baseline files and form submissions do not share a schema (baseline
// reviews carry `comment_vi` / `comment_en`, submitted ones a single
// `comment`). These views resolve the fallbacks in one place.

use serde_json::Value;

use super::record::{Record, display_value, is_falsy};
use super::resource::{Lang, Resource};

/// A reservation as shown on the admin dashboard.
#[derive(Debug, Clone, Copy)]
pub struct ReservationView<'a> {
    record: &'a Record,
}

impl<'a> ReservationView<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self { record }
    }

    pub fn name(&self) -> String {
        self.record.text("name")
    }

    pub fn phone(&self) -> String {
        self.record.text("phone")
    }

    pub fn date(&self) -> String {
        self.record.text("date")
    }

    pub fn time(&self) -> String {
        self.record.text("time")
    }

    pub fn guests(&self) -> String {
        self.record.text("guests")
    }

    pub fn submitted(&self) -> String {
        self.record.timestamp().unwrap_or_default().to_owned()
    }

    pub fn ip(&self) -> String {
        truthy_text(self.record.get("ip")).unwrap_or_else(|| "N/A".into())
    }
}

/// A review card.
#[derive(Debug, Clone, Copy)]
pub struct ReviewView<'a> {
    record: &'a Record,
}

impl<'a> ReviewView<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self { record }
    }

    pub fn name(&self) -> String {
        self.record.text("name")
    }

    /// Star rating clamped to 0..=5. Accepts numbers or numeric strings.
    pub fn rating(&self) -> u8 {
        let raw = match self.record.get("rating") {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        };
        // Clamped to 0..=5, so the cast cannot truncate.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
        let stars = raw.ceil().clamp(0.0, 5.0) as u8;
        stars
    }

    /// Comment in `lang`, falling back to `comment`, then `comment_vi`.
    pub fn comment(&self, lang: Lang) -> Option<String> {
        let localized = format!("comment_{}", lang.as_str());
        truthy_text(self.record.get(&localized))
            .or_else(|| truthy_text(self.record.get("comment")))
            .or_else(|| truthy_text(self.record.get("comment_vi")))
    }

    /// Comment as the admin dashboard shows it: plain `comment` first,
    /// then the Vietnamese and English baseline variants.
    pub fn admin_comment(&self) -> Option<String> {
        ["comment", "comment_vi", "comment_en"]
            .into_iter()
            .find_map(|key| truthy_text(self.record.get(key)))
    }

    /// Review source, or `fallback` when the record has none.
    pub fn source_or(&self, fallback: &str) -> String {
        truthy_text(self.record.get("source")).unwrap_or_else(|| fallback.to_owned())
    }

    /// Five-slot star strip, e.g. `★★★★☆`.
    pub fn stars(&self) -> String {
        star_strip(self.rating())
    }
}

/// Localized thank-you shown after a successful submission.
pub fn thank_you(resource: Resource, lang: Lang, name: &str) -> String {
    match (resource, lang) {
        (Resource::Reservations, Lang::Vi) => {
            format!("Cảm ơn {name}! Đặt bàn của bạn đã được ghi nhận.")
        }
        (Resource::Reservations, Lang::En) => {
            format!("Thank you {name}! Your reservation has been received.")
        }
        (Resource::Reviews, Lang::Vi) => "Cảm ơn đánh giá của bạn!".into(),
        (Resource::Reviews, Lang::En) => "Thank you for your review!".into(),
    }
}

/// Render `filled` of five stars.
pub fn star_strip(filled: u8) -> String {
    (0..5u8)
        .map(|i| if i < filled { '★' } else { '☆' })
        .collect()
}

fn truthy_text(value: Option<&Value>) -> Option<String> {
    value.filter(|v| !is_falsy(v)).map(display_value)
}
