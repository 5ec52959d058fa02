//! Admin command handlers.

use std::path::Path;

use dialoguer::Input;
use secrecy::SecretString;
use serde::Serialize;

use quannem_core::Resource;

use crate::cli::{AdminArgs, AdminCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{App, util};

#[derive(Serialize)]
struct SessionStatus {
    authenticated: bool,
}

#[derive(Serialize)]
struct ExportSummary<'a> {
    file: &'a Path,
    count: usize,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(app: &App, args: AdminArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        AdminCommand::Login { username, password } => {
            let username = match username {
                Some(u) => u,
                None => Input::new()
                    .with_prompt("Username")
                    .interact_text()
                    .map_err(util::prompt_err)?,
            };
            let password: SecretString = match password {
                Some(p) => p.into(),
                None => rpassword::prompt_password("Password: ")
                    .map_err(util::prompt_err)?
                    .into(),
            };

            app.admin.login(&username, &password)?;
            if !global.quiet {
                eprintln!("✓ Logged in as {username}");
            }
            Ok(())
        }

        AdminCommand::Logout => {
            app.admin.logout()?;
            if !global.quiet {
                eprintln!("✓ Logged out");
            }
            Ok(())
        }

        AdminCommand::Status => {
            let status = SessionStatus {
                authenticated: app.admin.is_authenticated(),
            };
            let color = app.color;
            let out = output::render_single(
                app.settings.output,
                &status,
                |s| {
                    let text = if s.authenticated {
                        "logged in"
                    } else {
                        "logged out"
                    };
                    output::paint_status(text, s.authenticated, color)
                },
                |s| s.authenticated.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AdminCommand::Export { file } => {
            app.admin.require()?;
            let all = app.store.read(Resource::Reservations).await;
            std::fs::write(&file, output::json_four_space(&all)?)?;

            let summary = ExportSummary {
                file: &file,
                count: all.len(),
            };
            let out = output::render_single(
                app.settings.output,
                &summary,
                |s| {
                    format!(
                        "✓ Exported {} reservations to {}\n  \
                         Replace assets/data/reservations.json with this file to publish them.",
                        s.count,
                        s.file.display()
                    )
                },
                |s| s.file.display().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AdminCommand::Clear { resource } => {
            let resource = Resource::parse(&resource)?;
            app.admin.require()?;
            let local = app.store.overlay(resource).len();
            if !util::confirm(
                &format!("Delete {local} locally stored {resource}? This cannot be undone."),
                global.yes,
            )? {
                return Ok(());
            }
            app.store
                .clear_overlay(resource)
                .map_err(|e| app.error(e))?;
            if !global.quiet {
                eprintln!("✓ Cleared {local} local {resource}");
            }
            Ok(())
        }
    }
}
