use clap::{ArgAction, Parser, Subcommand};
use dailydose_core::{load_config, AppError, Category, HubConfig};
use std::path::PathBuf;
use tracing::Level;

/// CLI configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "dailydose")]
#[command(
    author,
    version,
    about = "Your daily dose of advice, books, quotes and cute dogs"
)]
#[command(after_help = "Examples:
  dailydose                        # Interactive menu
  dailydose everything             # Fetch one of each and exit
  dailydose stats                  # Show how many items are saved
  dailydose --data-dir ~/dose quote")]
pub struct Config {
    /// Path to a TOML configuration file
    #[arg(long, env = "DAILYDOSE_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the CSV stores
    #[arg(long, env = "DAILYDOSE_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory holding the error log
    #[arg(long, env = "DAILYDOSE_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(
        long,
        env = "DAILYDOSE_TIMEOUT",
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: Option<u64>,

    /// Show diagnostics on stderr (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available CLI commands. Without one, the interactive menu starts.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Fetch and save a random piece of advice
    Advice,
    /// Fetch and save a book recommendation
    Book,
    /// Fetch and save an inspirational quote
    Quote,
    /// Fetch and save a cute dog image URL
    Dog,
    /// Fetch all four, in order
    Everything,
    /// Show saved item counts
    Stats,
}

impl Command {
    /// The category fetched by a single-category command.
    pub fn category(&self) -> Option<Category> {
        match self {
            Command::Advice => Some(Category::Advice),
            Command::Book => Some(Category::Book),
            Command::Quote => Some(Category::Quote),
            Command::Dog => Some(Category::Dog),
            Command::Everything | Command::Stats => None,
        }
    }
}

impl Config {
    /// Loads the configuration file and applies command line overrides.
    pub fn resolve(&self) -> Result<HubConfig, AppError> {
        let mut hub = load_config(self.config.as_deref())?;
        self.apply_overrides(&mut hub);
        Ok(hub)
    }

    pub fn apply_overrides(&self, hub: &mut HubConfig) {
        if let Some(dir) = &self.data_dir {
            hub.storage.data_dir = dir.clone();
        }
        if let Some(dir) = &self.log_dir {
            hub.storage.log_dir = dir.clone();
        }
        if let Some(secs) = self.timeout {
            hub.http.timeout_secs = secs;
        }
    }

    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    }
}
