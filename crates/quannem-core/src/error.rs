// ── Core error types ──
//
// Errors surfaced by quannem-core. Most HTTP failures never reach a
// caller: the baseline degrades to empty and notifications are logged.
// The `From<quannem_api::Error>` impl exists for the paths that do
// propagate (baseline source and notifier implementations).

use thiserror::Error;

use crate::storage::StorageError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage ──────────────────────────────────────────────────────
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    // ── Admin session ────────────────────────────────────────────────
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Admin session required")]
    NotAuthenticated,

    // ── Input ────────────────────────────────────────────────────────
    #[error("Unknown resource '{name}' (expected 'reservations' or 'reviews')")]
    UnknownResource { name: String },

    // ── Remote (wrapped, not exposed raw) ────────────────────────────
    #[error("Cannot reach {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Remote returned HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Malformed data: {message}")]
    Malformed { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<quannem_api::Error> for CoreError {
    fn from(err: quannem_api::Error) -> Self {
        match err {
            quannem_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if let Some(status) = e.status() {
                    CoreError::Remote {
                        status: status.as_u16(),
                        message: e.to_string(),
                    }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<redacted>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            quannem_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            quannem_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            quannem_api::Error::Status { status, target } => CoreError::Remote {
                status,
                message: target,
            },
            quannem_api::Error::Deserialization { message, body: _ } => {
                CoreError::Malformed { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_maps_to_remote() {
        let err = CoreError::from(quannem_api::Error::Status {
            status: 404,
            target: "http://localhost/assets/data/reviews.json".into(),
        });
        assert!(matches!(err, CoreError::Remote { status: 404, .. }));
    }

    #[test]
    fn deserialization_drops_body() {
        let err = CoreError::from(quannem_api::Error::Deserialization {
            message: "EOF while parsing".into(),
            body: "[{".into(),
        });
        assert_eq!(err.to_string(), "Malformed data: EOF while parsing");
    }
}
