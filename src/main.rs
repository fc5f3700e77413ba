mod commands;
mod logging;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use filemover_core::archive::{ArchiveToolKind, ExtractMode};
use filemover_core::config::Config;
use filemover_core::constants::{DEFAULT_MAX_RESULTS, DEFAULT_WINDOW_DAYS};

const DEFAULT_PROVIDER: &str = "google";

#[derive(Parser)]
#[command(name = "filemover")]
#[command(about = "Copy and extract event photos into folders named after calendar events")]
#[command(version)]
struct Cli {
    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recent calendar events that match your keywords
    Events {
        /// How many days back to look
        #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS)]
        days: i64,

        /// Maximum number of events to fetch
        #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
        max: usize,

        /// Calendar provider (e.g. "google")
        #[arg(short, long, default_value = DEFAULT_PROVIDER)]
        provider: String,
    },
    /// Copy files and extract zip archives into an event folder
    Ingest {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Event folder name
        #[arg(short, long, conflicts_with = "suggest")]
        event: Option<String>,

        /// Pick the event folder name from matching calendar events
        #[arg(short, long)]
        suggest: bool,

        /// Calendar provider used by --suggest
        #[arg(short, long, default_value = DEFAULT_PROVIDER)]
        provider: String,

        /// Folder inside the event folder
        #[arg(long, default_value = "")]
        subfolder: String,

        /// Override the configured extract mode (smart or images)
        #[arg(long)]
        mode: Option<ExtractMode>,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Sign in to a calendar provider
    Auth {
        provider: String, // e.g. "google"
    },
    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommand>,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print settings and file locations
    Show,
    /// Set the folder event folders are created in
    Root { path: String },
    /// List or edit the event keywords
    Keywords {
        #[command(subcommand)]
        action: Option<KeywordsAction>,
    },
    /// Set the folder name template, e.g. "{date:%Y-%m-%d}_{event}"
    Format { template: String },
    /// Set how archives are extracted
    Extract {
        #[arg(long)]
        mode: Option<ExtractMode>,

        #[arg(long)]
        tool: Option<ArchiveToolKind>,

        /// Comma-separated image extensions kept in images mode
        #[arg(long, value_delimiter = ',')]
        images: Option<Vec<String>>,
    },
}

#[derive(Subcommand)]
enum KeywordsAction {
    List,
    /// Replace all keywords with a comma-separated list
    Set { keywords: String },
    Add {
        #[arg(required = true)]
        keywords: Vec<String>,
    },
    Remove {
        #[arg(required = true)]
        keywords: Vec<String>,
    },
    /// Restore the built-in keyword list
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = Config::config_dir()?;
    logging::init(cli.verbose, &config_dir);
    let mut config = Config::load_from(config_dir);
    tracing::debug!(dir = %config.dir().display(), "loaded config");

    match cli.command {
        Commands::Events {
            days,
            max,
            provider,
        } => commands::events::run(&config, &provider, days, max).await,
        Commands::Ingest {
            files,
            event,
            suggest,
            provider,
            subfolder,
            mode,
            yes,
        } => {
            let args = commands::ingest::IngestArgs {
                files,
                event,
                suggest,
                provider,
                subfolder,
                mode,
                yes,
            };
            commands::ingest::run(&config, args).await
        }
        Commands::Auth { provider } => commands::auth::run(&provider).await,
        Commands::Config { command } => match command.unwrap_or(ConfigCommand::Show) {
            ConfigCommand::Show => commands::config::show(&config),
            ConfigCommand::Root { path } => commands::config::set_root(&mut config, &path),
            ConfigCommand::Keywords { action } => {
                commands::config::keywords(&mut config, action.unwrap_or(KeywordsAction::List))
            }
            ConfigCommand::Format { template } => {
                commands::config::set_format(&mut config, &template)
            }
            ConfigCommand::Extract { mode, tool, images } => {
                commands::config::set_extract(&mut config, mode, tool, images)
            }
        },
    }
}
