//! Config subcommand handlers.

use clap::ValueEnum;
use dialoguer::{Confirm, Input, Select};

use quannem_config::{ADMIN_KEYRING_ACCOUNT, WEBHOOK_KEYRING_ACCOUNT};

use crate::cli::{ColorMode, ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat, SecretArg};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

// ── Helpers ─────────────────────────────────────────────────────────

const MASK: &str = "****";

/// Copy of the config with plaintext secrets masked.
fn redacted(cfg: &Config) -> Config {
    let mut out = cfg.clone();
    if out.webhook.url.is_some() {
        out.webhook.url = Some(MASK.into());
    }
    if out.admin.password.is_some() {
        out.admin.password = Some(MASK.into());
    }
    out
}

/// Format config for display as TOML-ish text.
fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    let _ = writeln!(out, "base_url = \"{}\"", cfg.base_url);
    let _ = writeln!(out, "data_dir = \"{}\"", cfg.data_dir().display());
    let _ = writeln!(out, "timeout = {}", cfg.timeout);
    let _ = writeln!(out, "write_delay_ms = {}", cfg.write_delay_ms);
    let _ = writeln!(out, "lang = \"{}\"", cfg.lang);
    if let Some(ref ca) = cfg.ca_cert {
        let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
    }
    let _ = writeln!(out, "insecure = {}", cfg.insecure);
    let _ = writeln!(out, "output = \"{}\"", cfg.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.color);

    let _ = writeln!(out);
    let _ = writeln!(out, "[webhook]");
    let _ = writeln!(out, "enabled = {}", cfg.webhook.enabled);
    if let Some(ref url) = cfg.webhook.url {
        let _ = writeln!(out, "url = \"{url}\"");
    }
    if let Some(ref env) = cfg.webhook.url_env {
        let _ = writeln!(out, "url_env = \"{env}\"");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "[admin]");
    let _ = writeln!(out, "username = \"{}\"", cfg.admin.username);
    if let Some(ref pw) = cfg.admin.password {
        let _ = writeln!(out, "password = \"{pw}\"");
    }

    out.trim_end().to_owned()
}

/// Offer to store a secret in the system keyring or return it for plaintext config.
///
/// Returns `Some(secret)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_keyring_storage(
    secret: &str,
    account: &str,
    prompt: &str,
    label: &str,
) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(prompt)
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        config::store_keyring_secret(account, secret)?;
        eprintln!("   ✓ {label} stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(secret.to_owned()))
    }
}

fn parse_field<T: std::str::FromStr>(key: &str, value: &str, expected: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: key.into(),
        reason: format!("must be {expected}"),
    })
}

/// Apply `key = value` to a config, validating the value.
fn apply_setting(cfg: &mut Config, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "base_url" | "base-url" => {
            config::parse_base_url(&value)?;
            cfg.base_url = value;
        }
        "data_dir" | "data-dir" => cfg.data_dir = Some(value.into()),
        "timeout" => cfg.timeout = parse_field(key, &value, "a number (seconds)")?,
        "write_delay_ms" | "write-delay-ms" => {
            cfg.write_delay_ms = parse_field(key, &value, "a number (milliseconds)")?;
        }
        "lang" => {
            quannem_config::parse_lang(&value)?;
            cfg.lang = value;
        }
        "ca_cert" | "ca-cert" => cfg.ca_cert = Some(value.into()),
        "insecure" => cfg.insecure = parse_field(key, &value, "'true' or 'false'")?,
        "output" => {
            OutputFormat::from_str(&value, true).map_err(|_| CliError::Validation {
                field: key.into(),
                reason: "must be table, json, json-compact, yaml or plain".into(),
            })?;
            cfg.output = value;
        }
        "color" => {
            ColorMode::from_str(&value, true).map_err(|_| CliError::Validation {
                field: key.into(),
                reason: "must be auto, always or never".into(),
            })?;
            cfg.color = value;
        }
        "webhook.enabled" => cfg.webhook.enabled = parse_field(key, &value, "'true' or 'false'")?,
        "webhook.url" => cfg.webhook.url = Some(value),
        "webhook.url_env" | "webhook.url-env" => cfg.webhook.url_env = Some(value),
        "admin.username" => cfg.admin.username = value,
        "admin.password" => cfg.admin.password = Some(value),
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: base_url, data_dir, timeout, \
                     write_delay_ms, lang, ca_cert, insecure, output, color, webhook.enabled, \
                     webhook.url, webhook.url_env, admin.username, admin.password"
                ),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("✨ Quán Nem CLI: configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = Config::default();

            // 1. Site root
            let base_url: String = Input::new()
                .with_prompt("Site base URL")
                .default(cfg.base_url.clone())
                .validate_with(|s: &String| config::parse_base_url(s).map(|_| ()))
                .interact_text()
                .map_err(prompt_err)?;
            cfg.base_url = base_url;

            // 2. Language
            let lang = Select::new()
                .with_prompt("Language")
                .items(&["Tiếng Việt (vi)", "English (en)"])
                .default(0)
                .interact()
                .map_err(prompt_err)?;
            cfg.lang = if lang == 0 { "vi" } else { "en" }.into();

            // 3. Webhook
            let wants_webhook = Confirm::new()
                .with_prompt("Send a webhook notification for every submission?")
                .default(true)
                .interact()
                .map_err(prompt_err)?;
            if wants_webhook {
                let url = rpassword::prompt_password("Webhook URL: ").map_err(prompt_err)?;
                if url.is_empty() {
                    return Err(CliError::Validation {
                        field: "webhook.url".into(),
                        reason: "webhook URL cannot be empty".into(),
                    });
                }
                cfg.webhook.url = prompt_keyring_storage(
                    &url,
                    WEBHOOK_KEYRING_ACCOUNT,
                    "Where to store the webhook URL?",
                    "Webhook URL",
                )?;
            } else {
                cfg.webhook.enabled = false;
            }

            // 4. Admin credentials
            let change_admin = Confirm::new()
                .with_prompt("Replace the default admin credentials?")
                .default(true)
                .interact()
                .map_err(prompt_err)?;
            if change_admin {
                cfg.admin.username = Input::new()
                    .with_prompt("Admin username")
                    .default(cfg.admin.username.clone())
                    .interact_text()
                    .map_err(prompt_err)?;
                let pass = rpassword::prompt_password("Admin password: ").map_err(prompt_err)?;
                if pass.is_empty() {
                    return Err(CliError::Validation {
                        field: "admin.password".into(),
                        reason: "password cannot be empty".into(),
                    });
                }
                cfg.admin.password = prompt_keyring_storage(
                    &pass,
                    ADMIN_KEYRING_ACCOUNT,
                    "Where to store the admin password?",
                    "Admin password",
                )?;
            }

            // 5. Write config
            let path = config::save_config(&cfg)?;
            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("\n  Test it: quannem reviews list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config()?);
            let format = config::output_format(global, &cfg)?;
            let out = output::render_single(format, &cfg, format_config, |c| c.base_url.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config()?;
            apply_setting(&mut cfg, &key, value)?;
            let path = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Set {key} in {}", path.display());
            }
            Ok(())
        }

        // ── SetSecret ───────────────────────────────────────────────
        ConfigCommand::SetSecret { secret } => {
            let (account, label) = match secret {
                SecretArg::Webhook => (WEBHOOK_KEYRING_ACCOUNT, "Webhook URL: "),
                SecretArg::AdminPassword => (ADMIN_KEYRING_ACCOUNT, "Admin password: "),
            };
            let value = rpassword::prompt_password(label).map_err(prompt_err)?;
            if value.is_empty() {
                return Err(CliError::Validation {
                    field: "secret".into(),
                    reason: "value cannot be empty".into(),
                });
            }
            config::store_keyring_secret(account, &value)?;
            if !global.quiet {
                eprintln!("✓ Secret stored in system keyring");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_masked() {
        let mut cfg = Config::default();
        cfg.webhook.url = Some("https://hooks.example/secret".into());
        cfg.admin.password = Some("hunter2".into());

        let text = format_config(&redacted(&cfg));
        assert!(!text.contains("secret"));
        assert!(!text.contains("hunter2"));
        assert!(text.contains("url = \"****\""));
    }

    #[test]
    fn set_validates_values() {
        let mut cfg = Config::default();
        apply_setting(&mut cfg, "timeout", "12".into()).unwrap();
        apply_setting(&mut cfg, "webhook.url_env", "HOOK".into()).unwrap();
        assert_eq!(cfg.timeout, 12);
        assert_eq!(cfg.webhook.url_env.as_deref(), Some("HOOK"));

        assert!(apply_setting(&mut cfg, "timeout", "soon".into()).is_err());
        assert!(apply_setting(&mut cfg, "lang", "fr".into()).is_err());
        assert!(apply_setting(&mut cfg, "nope", "x".into()).is_err());
        assert!(apply_setting(&mut cfg, "color", "sometimes".into()).is_err());
        assert!(apply_setting(&mut cfg, "insecure", "maybe".into()).is_err());
    }

    #[test]
    fn tls_keys_are_settable() {
        let mut cfg = Config::default();
        apply_setting(&mut cfg, "ca_cert", "/etc/quannem/ca.pem".into()).unwrap();
        apply_setting(&mut cfg, "insecure", "true".into()).unwrap();
        apply_setting(&mut cfg, "color", "never".into()).unwrap();
        assert_eq!(cfg.ca_cert.as_deref(), Some(std::path::Path::new("/etc/quannem/ca.pem")));
        assert!(cfg.insecure);
        assert_eq!(cfg.color, "never");
    }
}
