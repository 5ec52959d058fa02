// ── Domain model ──

pub mod record;
pub mod resource;
pub mod views;

pub use record::{Fields, ID_FIELD, Record, TIMESTAMP_FIELD, display_value, is_falsy};
pub use resource::{Lang, Resource};
pub use views::{ReservationView, ReviewView, star_strip, thank_you};
