// ── Local data store ──
//
// Unified view of a resource: the static baseline followed by the local
// overlay, deduplicated by id. Writes only ever touch the overlay.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::baseline::BaselineSource;
use crate::error::CoreError;
use crate::ids::{ClockIds, IdGenerator};
use crate::merge::merge_sources;
use crate::model::{Fields, Record, Resource};
use crate::notify::{DispatchWorker, Notification, NotificationDispatcher, Notifier};
use crate::storage::KeyValueStore;

/// Raise `candidate` above every numeric id already in `overlay`, so a
/// clock that stepped back between runs cannot reissue a stored id.
fn above_existing_ids(candidate: u64, overlay: &[Record]) -> u64 {
    overlay
        .iter()
        .filter_map(|r| r.id().and_then(Value::as_u64))
        .max()
        .map_or(candidate, |max| candidate.max(max.saturating_add(1)))
}

/// Simulated latency applied before every write.
pub const DEFAULT_WRITE_DELAY: Duration = Duration::from_millis(500);

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteConfirmation {
    pub success: bool,
    pub message: String,
    pub data: Record,
}

impl WriteConfirmation {
    fn saved(data: Record) -> Self {
        Self {
            success: true,
            message: "Saved successfully".into(),
            data,
        }
    }
}

/// Baseline + overlay data store.
///
/// Reads never fail: an unavailable baseline or unreadable overlay is
/// logged and treated as empty. Writes fail only when the storage port
/// refuses them. Notifications are queued on a background dispatcher
/// and never affect the outcome of a write.
pub struct DataStore<B> {
    baseline: B,
    storage: Arc<dyn KeyValueStore>,
    ids: Arc<dyn IdGenerator>,
    notifications: NotificationDispatcher,
    worker: Option<DispatchWorker>,
    write_delay: Duration,
    write_lock: Mutex<()>,
}

impl<B: BaselineSource> DataStore<B> {
    /// A store with notifications disabled, clock-based ids and the
    /// default write delay.
    pub fn new(baseline: B, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            baseline,
            storage,
            ids: Arc::new(ClockIds::new()),
            notifications: NotificationDispatcher::disabled(),
            worker: None,
            write_delay: DEFAULT_WRITE_DELAY,
            write_lock: Mutex::new(()),
        }
    }

    /// Forward writes to `notifier` through a background worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_notifier<N: Notifier>(mut self, notifier: N) -> Self {
        let (dispatcher, worker) = NotificationDispatcher::spawn(notifier);
        self.notifications = dispatcher;
        self.worker = Some(worker);
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = delay;
        self
    }

    /// Handle for queueing other notifications on the same worker.
    pub fn notifications(&self) -> NotificationDispatcher {
        self.notifications.clone()
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }

    /// Merged, deduplicated records of `resource`, baseline first.
    pub async fn read(&self, resource: Resource) -> Vec<Record> {
        let baseline = match self.baseline.fetch(resource).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(
                    resource = resource.as_str(),
                    error = %e,
                    "baseline unavailable, using local data only"
                );
                Vec::new()
            }
        };
        let overlay = self.overlay(resource);
        let (from_baseline, from_overlay) = (baseline.len(), overlay.len());

        let merged = merge_sources(baseline, overlay);
        debug!(
            resource = resource.as_str(),
            from_baseline,
            from_overlay,
            merged = merged.len(),
            "read"
        );
        merged
    }

    /// Append a new record built from `fields` to the overlay.
    pub async fn write(
        &self,
        resource: Resource,
        fields: Fields,
    ) -> Result<WriteConfirmation, CoreError> {
        if !self.write_delay.is_zero() {
            tokio::time::sleep(self.write_delay).await;
        }

        let record = {
            let _guard = self.write_lock.lock().await;
            let mut overlay = self.overlay(resource);
            let id = above_existing_ids(self.ids.next_id(), &overlay);
            let record = Record::stamped(fields, id, Utc::now());
            overlay.push(record.clone());

            let encoded = serde_json::to_string(&overlay)
                .map_err(|e| CoreError::Internal(format!("encoding overlay: {e}")))?;
            self.storage.set(resource.storage_key(), &encoded)?;
            record
        };

        info!(
            resource = resource.as_str(),
            id = record.identity().as_deref().unwrap_or("-"),
            "record saved"
        );
        self.notifications
            .dispatch(Notification::new(resource, record.clone()));

        Ok(WriteConfirmation::saved(record))
    }

    /// Records stored locally for `resource`, in insertion order.
    pub fn overlay(&self, resource: Resource) -> Vec<Record> {
        let key = resource.storage_key();
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key, error = %e, "overlay unreadable, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Option<Vec<Record>>>(&raw) {
            Ok(rows) => rows.unwrap_or_default(),
            Err(e) => {
                warn!(key, error = %e, "overlay malformed, treating as empty");
                Vec::new()
            }
        }
    }

    /// Drop every locally stored record of `resource`.
    pub fn clear_overlay(&self, resource: Resource) -> Result<(), CoreError> {
        self.storage.remove(resource.storage_key())?;
        info!(resource = resource.as_str(), "overlay cleared");
        Ok(())
    }

    /// Stop accepting notifications and wait up to `grace` for queued
    /// ones to be delivered.
    pub async fn shutdown(self, grace: Duration) {
        if let Some(worker) = self.worker {
            worker.finish(grace).await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::baseline::StaticBaseline;
    use crate::storage::MemoryStore;

    #[test]
    fn confirmation_serializes_like_the_site_api() {
        let record: Record = serde_json::from_value(json!({"id": 1, "name": "A"})).unwrap();
        let value = serde_json::to_value(WriteConfirmation::saved(record)).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "message": "Saved successfully",
                "data": {"id": 1, "name": "A"}
            })
        );
    }

    #[tokio::test]
    async fn null_overlay_reads_as_empty() {
        let storage = Arc::new(MemoryStore::new());
        storage.set("quannem_reviews_local", "null").unwrap();
        let store = DataStore::new(StaticBaseline::empty(), storage);
        assert!(store.overlay(Resource::Reviews).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn write_waits_for_the_simulated_delay() {
        let store = DataStore::new(StaticBaseline::empty(), Arc::new(MemoryStore::new()));
        let started = tokio::time::Instant::now();
        store.write(Resource::Reviews, Fields::new()).await.unwrap();
        assert!(started.elapsed() >= DEFAULT_WRITE_DELAY);
    }
}
