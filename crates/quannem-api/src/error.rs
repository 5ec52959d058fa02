use thiserror::Error;

/// Top-level error type for the `quannem-api` crate.
///
/// Covers every failure mode of the two HTTP surfaces: the static
/// baseline fetch and the webhook POST. `quannem-core` maps these into
/// domain errors or swallows them where the data layer degrades gracefully.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── HTTP ────────────────────────────────────────────────────────
    /// The server answered with a non-success status code.
    #[error("HTTP {status} from {target}")]
    Status { status: u16, target: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
