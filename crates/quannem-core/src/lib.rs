//! Local data layer for the Quán Nem site, between `quannem-api` and the CLI.
//!
//! - **[`DataStore`]**: Merges a resource's static baseline (fetched through
//!   a [`BaselineSource`]) with the local overlay kept in a
//!   [`KeyValueStore`], deduplicating by id. Writes append to the overlay,
//!   stamp `id` / `timestamp`, and queue a notification.
//!
//! - **[`NotificationDispatcher`]**: Background worker delivering
//!   [`Notification`]s to a [`Notifier`] (the webhook in production).
//!   Dispatch never blocks or fails the caller.
//!
//! - **[`AdminGate`]**: Demo admin session: credential check plus a
//!   session flag in a storage port, with login attempts reported.
//!
//! - **Domain model** ([`model`]): schemaless [`Record`]s, the closed
//!   [`Resource`] enum, and read-only display views.

pub mod admin;
pub mod baseline;
pub mod error;
pub mod ids;
pub mod merge;
pub mod model;
pub mod notify;
pub mod storage;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use admin::{ADMIN_SESSION_KEY, AdminCredentials, AdminGate};
pub use baseline::{BaselineSource, StaticBaseline, Unavailable};
pub use error::CoreError;
pub use ids::{ClockIds, IdGenerator, SequentialIds};
pub use merge::merge_sources;
pub use model::{Fields, Lang, Record, ReservationView, Resource, ReviewView, thank_you};
pub use notify::{DispatchWorker, Notification, NotificationDispatcher, Notifier, Topic};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{DEFAULT_WRITE_DELAY, DataStore, WriteConfirmation};
