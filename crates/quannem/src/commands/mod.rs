//! Command dispatch: bridges CLI args -> data store -> output formatting.

pub mod admin;
pub mod config_cmd;
pub mod reservations;
pub mod reviews;
pub mod util;

use std::sync::Arc;
use std::time::Duration;

use quannem_api::{BaselineClient, TransportConfig, WebhookClient};
use quannem_core::{AdminGate, CoreError, DataStore, FileStore};
use tracing::debug;

use crate::cli::{Command, GlobalOpts};
use crate::config::Settings;
use crate::error::CliError;

/// How long to wait for queued webhook notifications before exiting.
const NOTIFY_GRACE: Duration = Duration::from_secs(10);

/// Services shared by the data commands.
pub struct App {
    pub store: DataStore<BaselineClient>,
    pub admin: AdminGate,
    pub settings: Settings,
    pub color: bool,
}

impl App {
    /// Wire the HTTP clients, file stores and notifier from settings.
    pub fn build(settings: Settings, color: bool) -> Result<Self, CliError> {
        let transport = TransportConfig {
            tls: settings.tls.clone(),
            timeout: settings.timeout,
        };
        let baseline = BaselineClient::new(settings.base_url.clone(), &transport)?;

        let data_store = FileStore::open(&settings.data_dir).map_err(CoreError::from)?;
        let mut store = DataStore::new(baseline, Arc::new(data_store))
            .with_write_delay(settings.write_delay);

        if let Some(ref url) = settings.webhook {
            let webhook = WebhookClient::new(url.clone(), &transport)?;
            store = store.with_notifier(webhook);
        } else {
            debug!("no webhook configured; notifications disabled");
        }

        let session =
            FileStore::open(settings.data_dir.join("session")).map_err(CoreError::from)?;
        let admin = AdminGate::new(Arc::new(session), settings.admin.clone())
            .with_notifications(store.notifications());

        Ok(Self {
            store,
            admin,
            settings,
            color,
        })
    }

    /// Translate a core error, pointing storage failures at the data dir.
    pub fn error(&self, err: CoreError) -> CliError {
        match err {
            CoreError::Storage(source) => CliError::Storage {
                data_dir: self.settings.data_dir.display().to_string(),
                source: Box::new(source),
            },
            other => other.into(),
        }
    }

    /// Flush pending notifications.
    pub async fn shutdown(self) {
        self.store.shutdown(NOTIFY_GRACE).await;
    }
}

/// Dispatch a data command to the appropriate handler.
pub async fn dispatch(cmd: Command, app: &App, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Reservations(args) => reservations::handle(app, args, global).await,
        Command::Reviews(args) => reviews::handle(app, args, global).await,
        Command::Admin(args) => admin::handle(app, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are handled before dispatch".into(),
        )),
    }
}
