//! Reservation command handlers.

use serde_json::Value;
use tabled::Tabled;

use quannem_core::{Record, ReservationView, Resource, WriteConfirmation, thank_you};

use crate::cli::{
    GlobalOpts, OutputFormat, ReservationForm, ReservationsArgs, ReservationsCommand,
};
use crate::error::CliError;
use crate::output;

use super::{App, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReservationRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Guests")]
    guests: String,
    #[tabled(rename = "Submitted")]
    submitted: String,
    #[tabled(rename = "IP")]
    ip: String,
}

impl From<&Record> for ReservationRow {
    fn from(r: &Record) -> Self {
        let v = ReservationView::new(r);
        Self {
            name: v.name(),
            phone: v.phone(),
            date: v.date(),
            time: v.time(),
            guests: v.guests(),
            submitted: util::local_time(&v.submitted()),
            ip: v.ip(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    app: &App,
    args: ReservationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ReservationsCommand::List => {
            app.admin.require()?;
            let mut all = app.store.read(Resource::Reservations).await;
            all.reverse();

            if all.is_empty() && app.settings.output == OutputFormat::Table {
                if !global.quiet {
                    eprintln!("No reservations yet.");
                }
                return Ok(());
            }

            let out = output::render_list(
                app.settings.output,
                &all,
                |r| ReservationRow::from(r),
                util::id_of,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ReservationsCommand::Add(form) => {
            let name = form.name.clone();
            let spinner = output::spinner("Sending...", global.quiet);
            let result = app
                .store
                .write(Resource::Reservations, reservation_fields(form))
                .await;
            spinner.finish_and_clear();
            let confirmation = result.map_err(|e| app.error(e))?;

            let lang = app.settings.lang;
            let out = output::render_single(
                app.settings.output,
                &confirmation,
                |_| thank_you(Resource::Reservations, lang, &name),
                |c: &WriteConfirmation| util::id_of(&c.data),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

/// Field map in the order the booking form submits it.
fn reservation_fields(form: ReservationForm) -> quannem_core::Fields {
    util::form([
        ("name", Value::from(form.name)),
        ("phone", Value::from(form.phone)),
        ("date", Value::from(form.date)),
        ("time", Value::from(form.time)),
        // Submitted as text, like the HTML form does.
        ("guests", Value::from(form.guests.to_string())),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_fields_match_the_booking_form() {
        let fields = reservation_fields(ReservationForm {
            name: "Lan".into(),
            phone: "0901".into(),
            date: "2024-06-20".into(),
            time: "19:00".into(),
            guests: 4,
        });
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "phone", "date", "time", "guests"]);
        assert_eq!(fields["guests"], "4");
    }
}
