use std::path::PathBuf;

use anyhow::Result;
use dialoguer::{Confirm, Select};
use filemover_core::archive::{ArchiveExtractor, ExtractMode};
use filemover_core::calendar::Provider;
use filemover_core::config::Config;
use filemover_core::ingest::{FileIngestor, resolve_destination};
use filemover_core::suggest::FetchOptions;
use owo_colors::OwoColorize;

use super::fetch_with_spinner;
use crate::render::Render;

pub struct IngestArgs {
    pub files: Vec<PathBuf>,
    pub event: Option<String>,
    pub suggest: bool,
    pub provider: String,
    pub subfolder: String,
    pub mode: Option<ExtractMode>,
    pub yes: bool,
}

pub async fn run(config: &Config, args: IngestArgs) -> Result<()> {
    let event = match args.event {
        Some(event) => event,
        None if args.suggest => pick_suggestion(config, &args.provider, args.yes).await?,
        None => String::new(),
    };
    let event = event.trim();

    let dest = resolve_destination(&config.base_root(), event, &args.subfolder);

    // Without an event name files land straight in the base root
    if event.is_empty() && !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("No event name given. Put files directly in {}?", dest.display()))
            .default(false)
            .interact()?;

        if !confirmed {
            return Ok(());
        }
    }

    let mut settings = config.extract().clone();
    if let Some(mode) = args.mode {
        settings.mode = mode;
    }
    let ingestor = FileIngestor::new(ArchiveExtractor::from_settings(&settings));

    println!("{} {}", "Destination:".bold(), dest.display());

    // Copying blocks; keep the runtime free to act on Ctrl-C.
    let files = args.files;
    let outcome = tokio::task::spawn_blocking(move || ingestor.ingest(&files, &dest)).await?;

    match outcome {
        Ok(report) => {
            println!("{}", report.render());
            Ok(())
        }
        Err(err) => {
            println!("{}", err.completed.render());
            anyhow::bail!(
                "Stopped at {}: {}\nFiles before it were processed; files after it were not.",
                err.file.display(),
                err.error
            )
        }
    }
}

/// Ask which matching event to use. The most recent one is the default.
async fn pick_suggestion(config: &Config, provider_name: &str, yes: bool) -> Result<String> {
    let provider = Provider::from_name(provider_name);
    let suggestions = fetch_with_spinner(config, &provider, &FetchOptions::default()).await?;

    let Some(latest) = suggestions.len().checked_sub(1) else {
        anyhow::bail!(
            "No matching events found.\n\n\
            Name the folder yourself with:\n  \
            filemover ingest --event <NAME> <FILES>..."
        );
    };

    if yes {
        println!("{} {}", "Event:".bold(), suggestions[latest].name);
        return Ok(suggestions[latest].name.clone());
    }

    let items: Vec<String> = suggestions.iter().map(|s| s.render()).collect();
    let selection = Select::new()
        .with_prompt("Event")
        .items(&items)
        .default(latest)
        .interact()?;

    Ok(suggestions[selection].name.clone())
}
