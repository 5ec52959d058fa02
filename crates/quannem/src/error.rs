//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use quannem_config::ConfigError;
use quannem_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const STORAGE: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach {url}")]
    #[diagnostic(
        code(quannem::connection_failed),
        help(
            "Check that the site is being served and the base URL is right.\n\
             Try: quannem --base-url http://localhost:8000/ reviews list"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(quannem::timeout),
        help("Increase the timeout with --timeout or check the site's responsiveness.")
    )]
    Timeout,

    #[error("Remote error: {message}")]
    #[diagnostic(code(quannem::remote))]
    Remote { message: String },

    // ── Admin ────────────────────────────────────────────────────────
    #[error("Invalid credentials")]
    #[diagnostic(
        code(quannem::auth_failed),
        help(
            "Check the admin username and password.\n\
             Store a password with: quannem config set-secret admin-password"
        )
    )]
    AuthFailed,

    #[error("This command requires an admin session")]
    #[diagnostic(code(quannem::not_authenticated), help("Run: quannem admin login"))]
    NotAuthenticated,

    // ── Storage ──────────────────────────────────────────────────────
    #[error("Could not save your submission")]
    #[diagnostic(
        code(quannem::storage),
        help("Please try again. Data directory: {data_dir}")
    )]
    Storage {
        data_dir: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(quannem::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(quannem::config),
        help("Inspect the resolved configuration with: quannem config show")
    )]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not encode output: {0}")]
    #[diagnostic(code(quannem::json))]
    Json(#[from] serde_json::Error),

    #[error("Could not encode output: {0}")]
    #[diagnostic(code(quannem::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(quannem::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed | Self::NotAuthenticated => exit_code::AUTH,
            Self::Storage { .. } => exit_code::STORAGE,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Storage(source) => CliError::Storage {
                data_dir: "(see --data-dir)".into(),
                source: Box::new(source),
            },
            CoreError::InvalidCredentials => CliError::AuthFailed,
            CoreError::NotAuthenticated => CliError::NotAuthenticated,
            CoreError::UnknownResource { name } => CliError::Validation {
                field: "resource".into(),
                reason: format!("unknown resource '{name}'"),
            },
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::Timeout => CliError::Timeout,
            CoreError::Remote { status, message } => CliError::Remote {
                message: format!("HTTP {status} from {message}"),
            },
            CoreError::Malformed { message } => CliError::Remote { message },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// Bad values are usage errors wherever they were supplied.
impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

impl From<quannem_api::Error> for CliError {
    fn from(err: quannem_api::Error) -> Self {
        CoreError::from(err).into()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use quannem_core::StorageError;

    use super::*;

    #[test]
    fn admin_errors_exit_with_auth_code() {
        assert_eq!(
            CliError::from(CoreError::NotAuthenticated).exit_code(),
            exit_code::AUTH
        );
        assert_eq!(
            CliError::from(CoreError::InvalidCredentials).exit_code(),
            exit_code::AUTH
        );
    }

    #[test]
    fn storage_refusal_asks_to_try_again() {
        let err = CliError::from(CoreError::Storage(StorageError::QuotaExceeded {
            key: "quannem_reviews_local".into(),
            needed: 10,
            limit: 5,
        }));
        assert_eq!(err.exit_code(), exit_code::STORAGE);
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("try again"), "help was: {help}");
    }

    #[test]
    fn invalid_config_values_are_usage_errors() {
        let err = CliError::from(quannem_config::parse_lang("fr").unwrap_err());
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "lang"));
        assert_eq!(err.exit_code(), exit_code::USAGE);

        let err = CliError::from(ConfigError::Keyring("locked".into()));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }
}
