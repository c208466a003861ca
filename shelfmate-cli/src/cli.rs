use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "shelfmate",
    about = "Shelfmate - reading companion from the terminal",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, env = "SHELFMATE_LOG", default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in with email and password")]
    Login {
        #[arg(help = "Account email")]
        email: String,

        #[arg(long, env = "SHELFMATE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    #[command(about = "Create a new account")]
    Register {
        #[arg(help = "Account email")]
        email: String,

        #[arg(help = "Public handle (3-32 characters)")]
        username: String,

        #[arg(long, env = "SHELFMATE_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long, help = "Name shown instead of the handle")]
        display_name: Option<String>,
    },

    #[command(about = "Sign out and forget stored credentials")]
    Logout,

    #[command(about = "Show the signed-in profile and level progress")]
    Whoami {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(subcommand, about = "Browse the catalogue")]
    Books(BookCommands),

    #[command(about = "List books on your shelf")]
    Library {
        #[arg(long, help = "Filter: want_to_read, reading, finished, abandoned")]
        status: Option<String>,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(subcommand, about = "Track a reading session")]
    Session(SessionCommands),

    #[command(subcommand, about = "Save and browse quotes")]
    Quote(QuoteCommands),

    #[command(about = "Show the activity feed")]
    Feed {
        #[arg(long, default_value = "1")]
        page: u32,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(subcommand, about = "Spend coins in the shop")]
    Shop(ShopCommands),

    #[command(subcommand, about = "Premium subscription")]
    Subscription(SubscriptionCommands),
}

#[derive(Subcommand)]
pub enum BookCommands {
    #[command(about = "Search books by title, author or ISBN")]
    Search {
        query: String,

        #[arg(long, default_value = "1")]
        page: u32,
    },
}

#[derive(Subcommand)]
pub enum SessionCommands {
    #[command(about = "Start reading a book")]
    Start {
        #[arg(help = "Book ID")]
        book_id: String,

        #[arg(long, default_value = "0", help = "Page you start on")]
        page: u32,
    },

    #[command(about = "Pause the running session")]
    Pause,

    #[command(about = "Resume a paused session")]
    Resume,

    #[command(about = "Finish the session on the given page")]
    Finish {
        #[arg(help = "Last page read")]
        end_page: u32,
    },

    #[command(about = "Throw away the current session")]
    Discard,

    #[command(about = "Show the current session and pending uploads")]
    Status,

    #[command(about = "Upload queued session changes")]
    Sync,
}

#[derive(Subcommand)]
pub enum QuoteCommands {
    #[command(about = "Save a quote")]
    Add {
        #[arg(help = "Book ID")]
        book_id: String,

        #[arg(help = "Quoted text")]
        text: String,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long, help = "Private note")]
        note: Option<String>,

        #[arg(long, help = "Share the quote in the feed")]
        public: bool,
    },

    #[command(about = "List saved quotes")]
    List {
        #[arg(long, help = "Only quotes from this book")]
        book: Option<String>,

        #[arg(long, default_value = "1")]
        page: u32,
    },
}

#[derive(Subcommand)]
pub enum ShopCommands {
    #[command(about = "List items for sale")]
    List,

    #[command(about = "Buy an item with coins")]
    Buy {
        #[arg(help = "Item ID")]
        item_id: String,
    },
}

#[derive(Subcommand)]
pub enum SubscriptionCommands {
    #[command(about = "Show the current subscription")]
    Status,

    #[command(about = "List available plans")]
    Plans,
}
