use clap::{Args, Parser, Subcommand, ValueEnum};
use flashdeck_text::DEFAULT_MAX_BACKUPS;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    Text,
    Sqlite,
}

#[derive(Debug, Parser, Clone)]
#[command(name = "flashdeck", version, about = "Terminal flashcards")]
pub struct Cli {
    /// Storage backend
    #[arg(long, value_enum, default_value_t = StoreKind::Text, env = "FLASHDECK_STORE")]
    pub store: StoreKind,

    /// Root data directory (defaults to the platform data dir)
    #[arg(long, env = "FLASHDECK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// SQLite DB path when --store sqlite (defaults to <data-dir>/flashdeck.sqlite3)
    #[arg(long, env = "FLASHDECK_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// User whose decks the text store reads
    #[arg(long, short = 'u', env = "FLASHDECK_USER", default_value = "default")]
    pub user: String,

    /// Backups kept per deck by the text store (0 disables)
    #[arg(long, env = "FLASHDECK_MAX_BACKUPS", default_value_t = DEFAULT_MAX_BACKUPS)]
    pub max_backups: usize,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Defaults to the interactive shell
    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Interactive shell
    Shell,
    /// Deck operations
    #[command(subcommand)]
    Deck(DeckCmd),
    /// Card operations
    #[command(subcommand)]
    Card(CardCmd),
    /// Study a deck once in random order
    Study { deck: String },
    /// Export decks
    #[command(subcommand)]
    Export(ExportCmd),
    /// Import decks
    #[command(subcommand)]
    Import(ImportCmd),
    /// Text-store users
    #[command(subcommand)]
    User(UserCmd),
}

#[derive(Debug, Subcommand, Clone)]
pub enum DeckCmd {
    Add { name: String },
    List,
    Rm { name: String },
}

#[derive(Debug, Subcommand, Clone)]
pub enum CardCmd {
    Add(CardAdd),
    List { deck: String },
    Rm { deck: String, front: String },
    Clear { deck: String },
}

#[derive(Debug, Args, Clone)]
pub struct CardAdd {
    #[arg(long)]
    pub deck: String,
    #[arg(long)]
    pub front: String,
    #[arg(long, default_value = "")]
    pub back: String,
}

#[derive(Debug, Subcommand, Clone)]
pub enum ExportCmd {
    Json { path: PathBuf, #[arg(long)] deck: Option<String> },
    Csv { path: PathBuf, #[arg(long)] deck: Option<String> },
}

#[derive(Debug, Subcommand, Clone)]
pub enum ImportCmd {
    Json { path: PathBuf },
    /// Rows are deck,front,back; --deck sends every row to one deck
    Csv { path: PathBuf, #[arg(long)] deck: Option<String> },
}

#[derive(Debug, Subcommand, Clone)]
pub enum UserCmd {
    Add { name: String },
    List,
}
