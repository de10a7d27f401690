use std::path::PathBuf;

use shelf_core::model::{BookId, BookStatus};

#[derive(clap::Parser, Debug)]
#[command(name = "shelf", version, about = "Keep track of the books you read")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE", env = "SHELF_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Backend base url
    #[arg(long, value_name = "URL", env = "SHELF_BACKEND_URL", global = true)]
    pub backend_url: Option<String>,

    /// Project anon key sent with every request
    #[arg(
        long,
        value_name = "KEY",
        env = "SHELF_ANON_KEY",
        hide_env_values = true,
        global = true
    )]
    pub anon_key: Option<String>,

    /// Where the signed-in session is kept
    #[arg(long, value_name = "FILE", env = "SHELF_SESSION_FILE", global = true)]
    pub session_file: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, value_name = "LEVEL", env = "SHELF_LOG", global = true)]
    pub log_level: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Create an account
    Signup(AccountArgs),
    /// Sign in with email and password
    Login(AccountArgs),
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// List your books with their progress
    Books,
    /// Add a book
    Add(AddArgs),
    /// Show one book with its reading history
    Show {
        id: BookId,
    },
    /// Change status, dates or notes of a book
    Edit(EditArgs),
    /// Log pages read for a book you are reading
    Log(LogArgs),
    /// Delete a book and its reading history
    Delete {
        id: BookId,
    },
    /// Reading goal
    #[command(subcommand)]
    Goal(GoalCommand),
    /// Profile details and shelf counts
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Subscribe an email to the newsletter
    Subscribe {
        email: String,
    },
    /// Write the library as a standalone HTML page
    ExportHtml {
        /// Output file; stdout when omitted
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
pub struct AccountArgs {
    #[arg(short, long)]
    pub email: String,

    #[arg(short, long, env = "SHELF_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    #[arg(short, long)]
    pub title: String,

    #[arg(short, long)]
    pub author: String,

    /// to-read, reading or read
    #[arg(short, long, default_value = "to-read")]
    pub status: String,

    /// Total page count
    #[arg(short, long)]
    pub pages: Option<String>,

    #[arg(short, long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    pub id: BookId,

    #[arg(short, long)]
    pub status: Option<BookStatus>,

    /// YYYY-MM-DD; empty to clear
    #[arg(long)]
    pub start_date: Option<String>,

    /// YYYY-MM-DD; empty to clear
    #[arg(long)]
    pub end_date: Option<String>,

    /// Markdown notes; empty to clear
    #[arg(short, long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct LogArgs {
    pub id: BookId,

    #[arg(short, long)]
    pub pages: String,

    /// YYYY-MM-DD, defaults to today
    #[arg(short, long)]
    pub date: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
pub enum GoalCommand {
    /// Set (or replace) the reading goal
    Set {
        #[arg(short, long)]
        pages: String,

        /// week or month
        #[arg(long)]
        period: String,
    },
    /// Show the goal as a daily pace
    Show,
}

#[derive(clap::Subcommand, Debug)]
pub enum ProfileCommand {
    Show,
    /// Update profile fields; omitted fields keep their value, empty clears
    Set {
        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        country: Option<String>,

        /// male, female, other or prefer-not-to-say
        #[arg(long)]
        gender: Option<String>,
    },
}
