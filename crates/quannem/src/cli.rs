//! Clap derive structures for the `quannem` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Depends only on clap so the build script can render man pages from it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// quannem -- reservations and reviews for the Quán Nem site
#[derive(Debug, Parser)]
#[command(
    name = "quannem",
    version,
    about = "Book tables and post reviews for Quán Nem from the command line",
    long_about = "Reads the site's published reservations and reviews, merges them with \
        locally submitted entries, and forwards every new submission to the \
        configured webhook.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Output format (default from config, else table)
    #[arg(long, short = 'o', global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output (default from config, else auto)
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Site root serving assets/data/*.json (overrides config)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Directory holding local submissions and the admin session
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Do not send webhook notifications
    #[arg(long, global = true)]
    pub no_notify: bool,

    /// Accept invalid TLS certificates (local dev servers)
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// PEM CA certificate for the site (overrides config)
    #[arg(long, global = true)]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Language for review comments and messages (overrides config)
    #[arg(long, global = true)]
    pub lang: Option<LangArg>,
}

// ── Output, Color & Language Enums ───────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LangArg {
    /// Tiếng Việt
    Vi,
    /// English
    En,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Book a table or list bookings (listing requires admin login)
    #[command(alias = "res", alias = "r")]
    Reservations(ReservationsArgs),

    /// Post or read customer reviews
    #[command(alias = "rev")]
    Reviews(ReviewsArgs),

    /// Admin session and data management
    Admin(AdminArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESERVATIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ReservationsArgs {
    #[command(subcommand)]
    pub command: ReservationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReservationsCommand {
    /// List all reservations, most recent first (admin)
    #[command(alias = "ls")]
    List,

    /// Book a table
    Add(ReservationForm),
}

#[derive(Debug, Args)]
pub struct ReservationForm {
    /// Guest name
    #[arg(long)]
    pub name: String,

    /// Contact phone number
    #[arg(long)]
    pub phone: String,

    /// Reservation date (e.g. 2024-06-20)
    #[arg(long)]
    pub date: String,

    /// Reservation time (e.g. 19:00)
    #[arg(long)]
    pub time: String,

    /// Party size
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub guests: u32,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REVIEWS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ReviewsArgs {
    #[command(subcommand)]
    pub command: ReviewsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReviewsCommand {
    /// List reviews
    #[command(alias = "ls")]
    List {
        /// Show the newest reviews first
        #[arg(long)]
        latest_first: bool,

        /// Dashboard view: newest first, raw comments, unknown sources
        /// shown as "Imported" (requires admin login)
        #[arg(long)]
        admin: bool,
    },

    /// Post a review
    Add(ReviewForm),
}

#[derive(Debug, Args)]
pub struct ReviewForm {
    /// Reviewer name
    #[arg(long)]
    pub name: String,

    /// Rating from 1 to 5 stars
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub rating: u8,

    /// Review text
    #[arg(long)]
    pub comment: String,

    /// Where the review came from
    #[arg(long, default_value = "Website Local")]
    pub source: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ADMIN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Open an admin session
    Login {
        /// Admin username (prompted when omitted)
        #[arg(long, short = 'u')]
        username: Option<String>,

        /// Admin password (prompted when omitted)
        #[arg(long, env = "QUANNEM_LOGIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Close the admin session
    Logout,

    /// Show whether an admin session is open
    Status,

    /// Write all reservations to a JSON file for publishing
    Export {
        /// Destination file
        #[arg(long, short = 'f', default_value = "reservations.json")]
        file: PathBuf,
    },

    /// Delete locally stored submissions of one resource
    Clear {
        /// Resource to clear: "reservations" or "reviews"
        resource: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG & COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display current resolved configuration (secrets masked)
    Show,

    /// Print the config file location
    Path,

    /// Set a configuration value
    Set {
        /// Config key (e.g. "base_url", "webhook.url_env", "admin.username")
        key: String,

        /// Value to set
        value: String,
    },

    /// Store the webhook URL or admin password in the system keyring
    SetSecret {
        /// Which secret to store
        secret: SecretArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SecretArg {
    /// Webhook URL
    Webhook,
    /// Admin password
    AdminPassword,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
