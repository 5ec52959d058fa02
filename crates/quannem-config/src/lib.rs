//! Configuration for the quannem CLI.
//!
//! Layered loading (defaults → `config.toml` → `QUANNEM_*` env), secret
//! resolution (env → keyring → plaintext), and translation of the loaded
//! values into the types `quannem-core` consumes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use quannem_core::admin::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};
use quannem_core::{AdminCredentials, Lang};

/// Service name used for every keyring entry.
pub const KEYRING_SERVICE: &str = "quannem";
/// Keyring account holding the webhook URL.
pub const WEBHOOK_KEYRING_ACCOUNT: &str = "webhook-url";
/// Keyring account holding the admin password.
pub const ADMIN_KEYRING_ACCOUNT: &str = "admin/password";
/// Env var consulted first for the admin password.
pub const ADMIN_PASSWORD_ENV: &str = "QUANNEM_ADMIN_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Site root serving `assets/data/*.json`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Where overlays and the admin session live. Platform data dir when unset.
    pub data_dir: Option<PathBuf>,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Simulated latency before each write, in milliseconds.
    #[serde(default = "default_write_delay_ms")]
    pub write_delay_ms: u64,

    /// Review language: "vi" or "en".
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Path to a PEM CA certificate for a site served with a private CA.
    pub ca_cert: Option<PathBuf>,

    /// Accept any TLS certificate (local dev servers).
    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_output")]
    pub output: String,

    /// "auto", "always" or "never". `--color` overrides it.
    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub webhook: WebhookSettings,

    #[serde(default)]
    pub admin: AdminSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            data_dir: None,
            timeout: default_timeout(),
            write_delay_ms: default_write_delay_ms(),
            lang: default_lang(),
            ca_cert: None,
            insecure: false,
            output: default_output(),
            color: default_color(),
            webhook: WebhookSettings::default(),
            admin: AdminSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WebhookSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Webhook URL (plaintext; prefer keyring or env var).
    pub url: Option<String>,

    /// Environment variable name containing the webhook URL.
    pub url_env: Option<String>,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            url: None,
            url_env: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AdminSettings {
    #[serde(default = "default_admin_username")]
    pub username: String,

    /// Admin password (plaintext; prefer keyring or env var).
    pub password: Option<String>,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            password: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_write_delay_ms() -> u64 {
    500
}
fn default_lang() -> String {
    "vi".into()
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_true() -> bool {
    true
}
fn default_admin_username() -> String {
    DEFAULT_ADMIN_USERNAME.into()
}

// ── Typed accessors ─────────────────────────────────────────────────

impl Config {
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        parse_base_url(&self.base_url)
    }

    pub fn lang(&self) -> Result<Lang, ConfigError> {
        parse_lang(&self.lang)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn write_delay(&self) -> Duration {
        Duration::from_millis(self.write_delay_ms)
    }

    /// Configured data directory, or the platform default.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }
}

pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

pub fn parse_lang(raw: &str) -> Result<Lang, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "lang".into(),
        reason: format!("expected 'vi' or 'en', got '{raw}'"),
    })
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "quannem", "quannem")
}

fn home_fallback(kind: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(kind);
    p.push("quannem");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Platform data directory for overlays and the admin session.
pub fn default_data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit TOML path (missing file = defaults) + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("QUANNEM_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Saving ──────────────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Secret resolution ───────────────────────────────────────────────

fn keyring_secret(account: &str) -> Option<SecretString> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, account).ok()?;
    entry.get_password().ok().map(SecretString::from)
}

/// Store a secret in the system keyring.
pub fn store_keyring_secret(account: &str, secret: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, account)
        .map_err(|e| ConfigError::Keyring(format!("failed to access keyring: {e}")))?;
    entry
        .set_password(secret)
        .map_err(|e| ConfigError::Keyring(format!("failed to store secret: {e}")))
}

/// Resolve the webhook URL: `url_env` → keyring → plaintext.
///
/// `None` when notifications are disabled or nothing is configured.
pub fn resolve_webhook_url(settings: &WebhookSettings) -> Option<SecretString> {
    if !settings.enabled {
        return None;
    }

    // 1. Named env var
    if let Some(ref env_name) = settings.url_env {
        if let Ok(val) = std::env::var(env_name) {
            if !val.is_empty() {
                return Some(SecretString::from(val));
            }
        }
    }

    // 2. System keyring
    if let Some(secret) = keyring_secret(WEBHOOK_KEYRING_ACCOUNT) {
        return Some(secret);
    }

    // 3. Plaintext in config
    settings
        .url
        .as_ref()
        .filter(|u| !u.is_empty())
        .map(|u| SecretString::from(u.clone()))
}

/// Resolve admin credentials: env → keyring → plaintext → built-in default.
pub fn resolve_admin_credentials(settings: &AdminSettings) -> AdminCredentials {
    let password = std::env::var(ADMIN_PASSWORD_ENV)
        .ok()
        .map(SecretString::from)
        .or_else(|| keyring_secret(ADMIN_KEYRING_ACCOUNT))
        .or_else(|| settings.password.clone().map(SecretString::from))
        .unwrap_or_else(|| SecretString::from(DEFAULT_ADMIN_PASSWORD.to_owned()));

    AdminCredentials::new(settings.username.clone(), password)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|jail| {
            let cfg = load_config_from(&jail.directory().join("absent.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(cfg, Config::default());
            assert_eq!(cfg.write_delay(), Duration::from_millis(500));
            assert_eq!(cfg.lang().map_err(|e| e.to_string())?, Lang::Vi);
            Ok(())
        });
    }

    #[test]
    fn file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    base_url = "https://quannem.example/"
                    timeout = 5
                    lang = "en"

                    [webhook]
                    url = "https://hooks.example/abc"
                "#,
            )?;
            jail.set_env("QUANNEM_TIMEOUT", "9");
            jail.set_env("QUANNEM_WEBHOOK__ENABLED", "false");

            let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg.base_url, "https://quannem.example/");
            assert_eq!(cfg.timeout, 9);
            assert_eq!(cfg.lang().map_err(|e| e.to_string())?, Lang::En);
            assert!(!cfg.webhook.enabled);
            assert_eq!(cfg.webhook.url.as_deref(), Some("https://hooks.example/abc"));
            assert_eq!(cfg.admin.username, "admin");
            Ok(())
        });
    }

    #[test]
    fn disabled_webhook_resolves_to_none() {
        let settings = WebhookSettings {
            enabled: false,
            url: Some("https://hooks.example/abc".into()),
            url_env: None,
        };
        assert!(resolve_webhook_url(&settings).is_none());
    }

    #[test]
    fn webhook_url_env_wins_over_plaintext() {
        Jail::expect_with(|jail| {
            jail.set_env("QUANNEM_TEST_HOOK", "https://hooks.example/from-env");
            let settings = WebhookSettings {
                enabled: true,
                url: Some("https://hooks.example/plain".into()),
                url_env: Some("QUANNEM_TEST_HOOK".into()),
            };
            let url = resolve_webhook_url(&settings).ok_or("no url")?;
            assert_eq!(url.expose_secret(), "https://hooks.example/from-env");
            Ok(())
        });
    }

    #[test]
    fn admin_password_env_overrides_config() {
        Jail::expect_with(|jail| {
            jail.set_env(ADMIN_PASSWORD_ENV, "from-env");
            let creds = resolve_admin_credentials(&AdminSettings {
                username: "chef".into(),
                password: Some("plain".into()),
            });
            assert_eq!(creds.username, "chef");
            assert_eq!(creds.password.expose_secret(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn invalid_values_are_reported_by_field() {
        let err = parse_lang("fr").unwrap_err();
        assert!(err.to_string().starts_with("invalid lang"));
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn save_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.admin.username = "chef".into();
        save_config_to(&cfg, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("username = \"chef\""));
    }
}
