//! Shelfmate command-line client.
//!
//! A headless front end over `shelfmate-client`: sign in, browse the
//! catalogue, track reading sessions offline and sync them later.
//!
//! Credentials and the local store live in `SHELFMATE_DATA_DIR` (default
//! `~/.shelfmate`).

#![allow(clippy::print_stdout, reason = "CLI tool outputs to stdout")]

use anyhow::{Context, Result};
use clap::Parser;
use shelfmate_client::{paths, ClientConfig, Shelfmate};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod account_commands;
mod cli;
mod reading_commands;
mod shop_commands;
mod social_commands;

use cli::{
    BookCommands, Cli, Commands, QuoteCommands, SessionCommands, ShopCommands,
    SubscriptionCommands,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber =
        FmtSubscriber::builder().with_env_filter(filter).with_writer(std::io::stderr).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let data_dir = paths::get_data_dir().context("Failed to prepare data directory")?;
    let config = ClientConfig::load(&data_dir).context("Failed to load configuration")?;
    let app = Shelfmate::open(config, &data_dir).await?;

    match cli.command {
        Commands::Login { email, password } => {
            account_commands::login(&app, &email, &password).await
        },
        Commands::Register { email, username, password, display_name } => {
            account_commands::register(&app, email, username, password, display_name).await
        },
        Commands::Logout => account_commands::logout(&app).await,
        Commands::Whoami { json } => account_commands::whoami(&app, json).await,
        Commands::Books(BookCommands::Search { query, page }) => {
            reading_commands::search_books(&app, &query, page).await
        },
        Commands::Library { status, json } => {
            reading_commands::list_library(&app, status.as_deref(), json).await
        },
        Commands::Session(cmd) => match cmd {
            SessionCommands::Start { book_id, page } => {
                reading_commands::start_session(&app, &book_id, page).await
            },
            SessionCommands::Pause => reading_commands::pause_session(&app).await,
            SessionCommands::Resume => reading_commands::resume_session(&app).await,
            SessionCommands::Finish { end_page } => {
                reading_commands::finish_session(&app, end_page).await
            },
            SessionCommands::Discard => reading_commands::discard_session(&app).await,
            SessionCommands::Status => reading_commands::session_status(&app).await,
            SessionCommands::Sync => reading_commands::sync_sessions(&app).await,
        },
        Commands::Quote(cmd) => match cmd {
            QuoteCommands::Add { book_id, text, page, note, public } => {
                social_commands::add_quote(&app, book_id, text, page, note, public).await
            },
            QuoteCommands::List { book, page } => {
                social_commands::list_quotes(&app, book.as_deref(), page).await
            },
        },
        Commands::Feed { page, json } => social_commands::show_feed(&app, page, json).await,
        Commands::Shop(cmd) => match cmd {
            ShopCommands::List => shop_commands::list_items(&app).await,
            ShopCommands::Buy { item_id } => shop_commands::buy_item(&app, &item_id).await,
        },
        Commands::Subscription(cmd) => match cmd {
            SubscriptionCommands::Status => shop_commands::subscription_status(&app).await,
            SubscriptionCommands::Plans => shop_commands::list_plans(&app).await,
        },
    }
}
