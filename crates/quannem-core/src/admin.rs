// ── Admin session gate ──
//
// A demo-grade login: credentials come from configuration and the
// session is a single flag in a storage port. Every attempt, good or
// bad, is reported to the notification sink.

use std::sync::Arc;

use chrono::Local;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::CoreError;
use crate::model::{Fields, Record};
use crate::notify::{Notification, NotificationDispatcher, Topic};
use crate::storage::KeyValueStore;

/// Storage key of the session flag.
pub const ADMIN_SESSION_KEY: &str = "admin_auth";
const SESSION_FLAG: &str = "true";

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: SecretString,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    fn matches(&self, username: &str, password: &SecretString) -> bool {
        self.username == username && self.password.expose_secret() == password.expose_secret()
    }
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self::new(
            DEFAULT_ADMIN_USERNAME,
            SecretString::from(DEFAULT_ADMIN_PASSWORD.to_owned()),
        )
    }
}

pub struct AdminGate {
    session: Arc<dyn KeyValueStore>,
    credentials: AdminCredentials,
    notifications: NotificationDispatcher,
}

impl AdminGate {
    pub fn new(session: Arc<dyn KeyValueStore>, credentials: AdminCredentials) -> Self {
        Self {
            session,
            credentials,
            notifications: NotificationDispatcher::disabled(),
        }
    }

    /// Report login attempts through `notifications`.
    pub fn with_notifications(mut self, notifications: NotificationDispatcher) -> Self {
        self.notifications = notifications;
        self
    }

    /// Check credentials and open a session.
    ///
    /// The attempt is reported either way; a mismatch returns
    /// [`CoreError::InvalidCredentials`] and leaves any session untouched.
    pub fn login(&self, username: &str, password: &SecretString) -> Result<(), CoreError> {
        let mut fields = Fields::new();
        fields.insert("user".into(), Value::from(username));

        if !self.credentials.matches(username, password) {
            warn!(user = username, "admin login rejected");
            fields.insert("status".into(), Value::from("Failed Attempt"));
            fields.insert("pass_attempt".into(), Value::from("******"));
            self.report(fields);
            return Err(CoreError::InvalidCredentials);
        }

        self.session.set(ADMIN_SESSION_KEY, SESSION_FLAG)?;
        info!(user = username, "admin logged in");

        fields.insert("status".into(), Value::from("Success"));
        fields.insert(
            "time".into(),
            Value::from(Local::now().format("%H:%M:%S").to_string()),
        );
        self.report(fields);
        Ok(())
    }

    pub fn logout(&self) -> Result<(), CoreError> {
        self.session.remove(ADMIN_SESSION_KEY)?;
        info!("admin logged out");
        Ok(())
    }

    /// Whether the session flag is set. An unreadable flag counts as
    /// logged out.
    pub fn is_authenticated(&self) -> bool {
        match self.session.get(ADMIN_SESSION_KEY) {
            Ok(flag) => flag.as_deref() == Some(SESSION_FLAG),
            Err(e) => {
                warn!(error = %e, "admin session unreadable");
                false
            }
        }
    }

    /// Fail with [`CoreError::NotAuthenticated`] unless logged in.
    pub fn require(&self) -> Result<(), CoreError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(CoreError::NotAuthenticated)
        }
    }

    fn report(&self, fields: Fields) {
        self.notifications
            .dispatch(Notification::new(Topic::AdminLogin, Record::new(fields)));
    }
}
