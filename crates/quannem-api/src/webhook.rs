// Webhook delivery client
//
// Posts Discord-style embed payloads to a single configured webhook.
// The URL embeds the webhook token, so it is held as a secret and
// stripped from transport errors before they reach logs.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

// ── Payload types ───────────────────────────────────────────────────

/// Top-level webhook body: `{ "embeds": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

impl WebhookPayload {
    /// A payload carrying exactly one embed.
    pub fn single(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
        }
    }
}

/// One rich embed card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    /// RGB color as an integer (`0xF1C40F` is gold).
    pub color: u32,
    pub description: String,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
    /// ISO-8601 timestamp rendered by the receiving client.
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
}

// ── Client ──────────────────────────────────────────────────────────

/// HTTP client for one webhook endpoint.
pub struct WebhookClient {
    http: reqwest::Client,
    endpoint: SecretString,
}

impl WebhookClient {
    /// Create a webhook client, validating the endpoint URL up front.
    pub fn new(endpoint: SecretString, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, endpoint)
    }

    /// Create a webhook client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, endpoint: SecretString) -> Result<Self, Error> {
        Url::parse(endpoint.expose_secret())?;
        Ok(Self { http, endpoint })
    }

    /// POST a payload. Any non-success status is an error.
    ///
    /// Delivery is at-most-once: there is no retry here.
    pub async fn send(&self, payload: &WebhookPayload) -> Result<(), Error> {
        debug!(embeds = payload.embeds.len(), "POST webhook");

        let resp = self
            .http
            .post(self.endpoint.expose_secret())
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::Transport(e.without_url()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                target: "webhook".into(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for WebhookClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookClient")
            .field("endpoint", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
