//! CLI configuration: thin wrapper around `quannem_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--base-url, --data-dir, --timeout, --lang, --output, --color,
//! --insecure, --ca-cert, --no-notify).

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use secrecy::SecretString;
use url::Url;

use quannem_api::TlsMode;
use quannem_core::{AdminCredentials, Lang};

use crate::cli::{ColorMode, GlobalOpts, LangArg, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use quannem_config::{
    Config, config_path, load_config, parse_base_url, resolve_admin_credentials,
    resolve_webhook_url, save_config, store_keyring_secret,
};

/// Everything a command needs, with flags applied over config.
pub struct Settings {
    pub base_url: Url,
    pub data_dir: PathBuf,
    pub timeout: Duration,
    pub tls: TlsMode,
    pub write_delay: Duration,
    pub lang: Lang,
    pub output: OutputFormat,
    pub color: ColorMode,
    pub webhook: Option<SecretString>,
    pub admin: AdminCredentials,
}

impl From<LangArg> for Lang {
    fn from(arg: LangArg) -> Self {
        match arg {
            LangArg::Vi => Lang::Vi,
            LangArg::En => Lang::En,
        }
    }
}

/// Resolve the output format: flag, then config, then table.
pub fn output_format(global: &GlobalOpts, config: &Config) -> Result<OutputFormat, CliError> {
    if let Some(format) = global.output {
        return Ok(format);
    }
    OutputFormat::from_str(&config.output, true).map_err(|_| CliError::Validation {
        field: "output".into(),
        reason: format!(
            "expected table, json, json-compact, yaml or plain, got '{}'",
            config.output
        ),
    })
}

/// Resolve the color mode: flag, then config.
pub fn color_mode(global: &GlobalOpts, config: &Config) -> Result<ColorMode, CliError> {
    if let Some(mode) = global.color {
        return Ok(mode);
    }
    ColorMode::from_str(&config.color, true).map_err(|_| CliError::Validation {
        field: "color".into(),
        reason: format!("expected auto, always or never, got '{}'", config.color),
    })
}

/// TLS verification: insecure wins, then a custom CA, then system roots.
pub fn tls_mode(global: &GlobalOpts, config: &Config) -> TlsMode {
    if global.insecure || config.insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ca) = global.ca_cert.as_ref().or(config.ca_cert.as_ref()) {
        TlsMode::CustomCa(ca.clone())
    } else {
        TlsMode::System
    }
}

/// Apply CLI flag overrides on top of the loaded config.
pub fn resolve(global: &GlobalOpts, config: &Config) -> Result<Settings, CliError> {
    // 1. Base URL (flag > env/config)
    let base_url = match global.base_url.as_deref() {
        Some(raw) => parse_base_url(raw)?,
        None => config.base_url()?,
    };

    // 2. Data directory
    let data_dir = global
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data_dir());

    // 3. Timeout
    let timeout = global
        .timeout
        .map_or_else(|| config.timeout(), Duration::from_secs);

    // 4. Language
    let lang = match global.lang {
        Some(arg) => arg.into(),
        None => config.lang()?,
    };

    // 5. Secrets
    let webhook = if global.no_notify {
        None
    } else {
        resolve_webhook_url(&config.webhook)
    };
    let admin = resolve_admin_credentials(&config.admin);

    Ok(Settings {
        base_url,
        data_dir,
        timeout,
        tls: tls_mode(global, config),
        write_delay: config.write_delay(),
        lang,
        output: output_format(global, config)?,
        color: color_mode(global, config)?,
        webhook,
        admin,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let argv = ["quannem"].iter().chain(args).chain(&["reviews", "list"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn color_falls_back_to_config() {
        let cfg = Config {
            color: "never".into(),
            ..Config::default()
        };
        assert_eq!(color_mode(&global(&[]), &cfg).unwrap(), ColorMode::Never);
        assert_eq!(
            color_mode(&global(&["--color", "always"]), &cfg).unwrap(),
            ColorMode::Always
        );

        let bad = Config {
            color: "sometimes".into(),
            ..Config::default()
        };
        assert!(color_mode(&global(&[]), &bad).is_err());
    }

    #[test]
    fn tls_mode_prefers_insecure_then_ca() {
        let cfg = Config {
            ca_cert: Some(PathBuf::from("/etc/quannem/ca.pem")),
            ..Config::default()
        };
        assert!(matches!(
            tls_mode(&global(&[]), &Config::default()),
            TlsMode::System
        ));
        assert!(matches!(
            tls_mode(&global(&[]), &cfg),
            TlsMode::CustomCa(ref p) if p.ends_with("ca.pem")
        ));
        assert!(matches!(
            tls_mode(&global(&["--insecure"]), &cfg),
            TlsMode::DangerAcceptInvalid
        ));
        assert!(matches!(
            tls_mode(&global(&["--ca-cert", "/tmp/other.pem"]), &Config::default()),
            TlsMode::CustomCa(ref p) if p.ends_with("other.pem")
        ));
    }
}
