// ── Notification dispatch ──
//
// Every successful write (and every admin login attempt) is forwarded to
// a notification sink. Delivery runs on one background task fed by an
// unbounded channel: `dispatch` never blocks and never fails the caller.
// Sink errors are logged and dropped (at-most-once, no retry).

mod embed;

pub use embed::payload_for;

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use quannem_api::WebhookClient;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};

use crate::error::CoreError;
use crate::model::{Record, Resource};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    /// A record was added to a resource.
    Resource(Resource),
    /// Someone tried to log in to the admin dashboard.
    AdminLogin,
}

impl Topic {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Resource(r) => r.as_str(),
            Self::AdminLogin => "admin_login",
        }
    }
}

impl From<Resource> for Topic {
    fn from(resource: Resource) -> Self {
        Self::Resource(resource)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub topic: Topic,
    pub record: Record,
}

impl Notification {
    pub fn new(topic: impl Into<Topic>, record: Record) -> Self {
        Self {
            topic: topic.into(),
            record,
        }
    }
}

/// Destination for notifications.
pub trait Notifier: Send + Sync + 'static {
    fn notify(
        &self,
        notification: &Notification,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl Notifier for WebhookClient {
    async fn notify(&self, notification: &Notification) -> Result<(), CoreError> {
        let payload = payload_for(notification, Utc::now());
        self.send(&payload).await?;
        Ok(())
    }
}

// ── Dispatcher ───────────────────────────────────────────────────────

enum DispatchCommand {
    Deliver(Notification),
    Close,
}

/// Cheap, cloneable handle that queues notifications for the worker.
#[derive(Clone, Default)]
pub struct NotificationDispatcher {
    tx: Option<mpsc::UnboundedSender<DispatchCommand>>,
}

impl NotificationDispatcher {
    /// Start the background worker delivering to `notifier`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<N: Notifier>(notifier: N) -> (Self, DispatchWorker) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(delivery_task(notifier, rx));
        (
            Self {
                tx: Some(tx.clone()),
            },
            DispatchWorker { tx, handle },
        )
    }

    /// A dispatcher that silently drops everything.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Queue a notification. Never blocks, never fails.
    pub fn dispatch(&self, notification: Notification) {
        let Some(tx) = &self.tx else {
            trace!(topic = notification.topic.as_str(), "notifications disabled");
            return;
        };
        let topic = notification.topic.as_str();
        if tx.send(DispatchCommand::Deliver(notification)).is_err() {
            warn!(topic, "notification worker has stopped; dropping notification");
        }
    }
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Owner of the background delivery task.
pub struct DispatchWorker {
    tx: mpsc::UnboundedSender<DispatchCommand>,
    handle: JoinHandle<()>,
}

impl DispatchWorker {
    /// Deliver everything queued so far, waiting at most `grace`.
    ///
    /// Notifications still pending after the grace period are abandoned.
    pub async fn finish(self, grace: Duration) {
        if self.tx.send(DispatchCommand::Close).is_err() {
            debug!("notification worker already stopped");
        }

        let mut handle = self.handle;
        match tokio::time::timeout(grace, &mut handle).await {
            Ok(Ok(())) => debug!("notification queue drained"),
            Ok(Err(e)) => warn!(error = %e, "notification worker failed"),
            Err(_) => {
                warn!(
                    grace_ms = u64::try_from(grace.as_millis()).unwrap_or(u64::MAX),
                    "notification drain timed out; pending notifications dropped"
                );
                handle.abort();
            }
        }
    }
}

async fn delivery_task<N: Notifier>(
    notifier: N,
    mut rx: mpsc::UnboundedReceiver<DispatchCommand>,
) {
    while let Some(command) = rx.recv().await {
        let notification = match command {
            DispatchCommand::Deliver(n) => n,
            DispatchCommand::Close => break,
        };
        let topic = notification.topic.as_str();
        match notifier.notify(&notification).await {
            Ok(()) => debug!(topic, "notification delivered"),
            Err(e) => error!(topic, error = %e, "notification failed"),
        }
    }
    debug!("notification worker exiting");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;

    #[derive(Clone, Default)]
    struct Recorder {
        seen: Arc<Mutex<Vec<Notification>>>,
    }

    impl Notifier for Recorder {
        async fn notify(&self, notification: &Notification) -> Result<(), CoreError> {
            self.seen.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    struct AlwaysFails;

    impl Notifier for AlwaysFails {
        async fn notify(&self, _: &Notification) -> Result<(), CoreError> {
            Err(CoreError::Remote {
                status: 500,
                message: "webhook".into(),
            })
        }
    }

    fn sample(topic: impl Into<Topic>) -> Notification {
        let record = serde_json::from_value(json!({"name": "Lan"})).unwrap();
        Notification::new(topic, record)
    }

    #[test]
    fn topic_names() {
        assert_eq!(Topic::from(Resource::Reviews).as_str(), "reviews");
        assert_eq!(Topic::from(Resource::Reservations).as_str(), "reservations");
        assert_eq!(Topic::AdminLogin.as_str(), "admin_login");
    }

    #[tokio::test]
    async fn finish_drains_queued_notifications_in_order() {
        let recorder = Recorder::default();
        let (dispatcher, worker) = NotificationDispatcher::spawn(recorder.clone());

        dispatcher.dispatch(sample(Resource::Reviews));
        dispatcher.dispatch(sample(Topic::AdminLogin));
        worker.finish(Duration::from_secs(5)).await;

        let topics: Vec<&str> = recorder
            .seen
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.topic.as_str())
            .collect();
        assert_eq!(topics, ["reviews", "admin_login"]);
    }

    #[tokio::test]
    async fn sink_failures_do_not_stop_the_worker() {
        let (dispatcher, worker) = NotificationDispatcher::spawn(AlwaysFails);
        dispatcher.dispatch(sample(Resource::Reviews));
        dispatcher.dispatch(sample(Resource::Reviews));
        worker.finish(Duration::from_secs(5)).await;

        // Worker is gone now; dispatch still returns normally.
        dispatcher.dispatch(sample(Resource::Reviews));
    }

    #[test]
    fn disabled_dispatcher_drops_silently() {
        let dispatcher = NotificationDispatcher::disabled();
        assert!(!dispatcher.is_enabled());
        dispatcher.dispatch(sample(Resource::Reservations));
    }
}
