//! Review command handlers.

use serde_json::Value;
use tabled::Tabled;

use quannem_core::{Lang, Record, Resource, ReviewView, WriteConfirmation, thank_you};

use crate::cli::{GlobalOpts, ReviewForm, ReviewsArgs, ReviewsCommand};
use crate::error::CliError;
use crate::output;

use super::{App, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReviewRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Comment")]
    comment: String,
    #[tabled(rename = "Source")]
    source: String,
}

/// How a listing presents each review.
#[derive(Clone, Copy)]
struct ReviewStyle {
    lang: Lang,
    admin: bool,
    color: bool,
}

impl ReviewStyle {
    fn row(self, record: &Record) -> ReviewRow {
        let v = ReviewView::new(record);
        let (comment, source) = if self.admin {
            (v.admin_comment(), v.source_or("Imported"))
        } else {
            (v.comment(self.lang), v.source_or("Website"))
        };
        ReviewRow {
            name: v.name(),
            rating: output::paint_stars(&v.stars(), self.color),
            comment: comment.unwrap_or_default(),
            source,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(app: &App, args: ReviewsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ReviewsCommand::List {
            latest_first,
            admin,
        } => {
            if admin {
                app.admin.require()?;
            }
            let mut all = app.store.read(Resource::Reviews).await;
            if latest_first || admin {
                all.reverse();
            }

            let style = ReviewStyle {
                lang: app.settings.lang,
                admin,
                color: app.color,
            };
            let out = output::render_list(
                app.settings.output,
                &all,
                |r| style.row(r),
                util::id_of,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ReviewsCommand::Add(form) => {
            let spinner = output::spinner("Posting...", global.quiet);
            let result = app.store.write(Resource::Reviews, review_fields(form)).await;
            spinner.finish_and_clear();
            let confirmation = result.map_err(|e| app.error(e))?;

            let lang = app.settings.lang;
            let out = output::render_single(
                app.settings.output,
                &confirmation,
                |_| thank_you(Resource::Reviews, lang, ""),
                |c: &WriteConfirmation| util::id_of(&c.data),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

fn review_fields(form: ReviewForm) -> quannem_core::Fields {
    util::form([
        ("name", Value::from(form.name)),
        ("rating", Value::from(form.rating)),
        ("comment", Value::from(form.comment)),
        ("source", Value::from(form.source)),
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(v: Value) -> Record {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn public_row_uses_localized_comment_and_website_source() {
        let rec = record(json!({
            "name": "Hoa", "rating": 4,
            "comment_vi": "Ngon", "comment_en": "Tasty"
        }));
        let style = ReviewStyle {
            lang: Lang::En,
            admin: false,
            color: false,
        };
        let row = style.row(&rec);
        assert_eq!(row.comment, "Tasty");
        assert_eq!(row.source, "Website");
        assert_eq!(row.rating, "★★★★☆");
    }

    #[test]
    fn admin_row_marks_unknown_sources_imported() {
        let rec = record(json!({"name": "Hoa", "rating": 5, "comment_en": "Tasty"}));
        let style = ReviewStyle {
            lang: Lang::Vi,
            admin: true,
            color: false,
        };
        let row = style.row(&rec);
        assert_eq!(row.source, "Imported");
        assert_eq!(row.comment, "Tasty");
    }

    #[test]
    fn rating_is_stored_as_a_number() {
        let fields = review_fields(ReviewForm {
            name: "Hoa".into(),
            rating: 5,
            comment: "Ngon".into(),
            source: "Website Local".into(),
        });
        assert_eq!(fields["rating"], json!(5));
    }
}
