use anyhow::Result;
use chrono::Local;
use filemover_core::archive::{ArchiveToolKind, ExtractMode};
use filemover_core::config::{BaseRootFile, Config, ExtractSettings, FormatFile, KeywordsFile};
use filemover_core::keywords::KeywordSet;
use filemover_core::name_format::EventFormat;
use owo_colors::OwoColorize;

use crate::KeywordsAction;
use crate::logging::error_log_path;
use crate::utils::tui::pluralize;

const PREVIEW_EVENT: &str = "Event";

pub fn show(config: &Config) -> Result<()> {
    println!("{}", "Paths".bold());
    println!("  Config:     {}", config.dir().display());
    println!("  Error log:  {}", error_log_path(config.dir()).display());

    println!("\n{}", "Settings".bold());
    println!(
        "  Base root:  {} {}",
        config.display_base_root(),
        format!("({})", config.base_root().display()).dimmed()
    );
    println!(
        "  Format:     {} {}",
        config.event_format(),
        format!("(e.g. {})", preview(config.event_format())?).dimmed()
    );
    println!(
        "  Extract:    {} with {}",
        config.extract().mode,
        config.extract().tool
    );
    println!("  Images:     {}", config.extract().image_extensions.join(", "));
    println!(
        "  Keywords:   {} {}",
        config.keywords().len(),
        pluralize("keyword", config.keywords().len()).dimmed()
    );

    Ok(())
}

pub fn set_root(config: &mut Config, path: &str) -> Result<()> {
    config.set_base_root(path.trim())?;
    println!(
        "Base root set to {} {}",
        config.display_base_root().green(),
        format!("(saved to {})", config.file_path::<BaseRootFile>().display()).dimmed()
    );
    Ok(())
}

pub fn keywords(config: &mut Config, action: KeywordsAction) -> Result<()> {
    let mut keywords = config.keywords().clone();

    match action {
        KeywordsAction::List => {
            if keywords.is_empty() {
                println!("{}", "No keywords".dimmed());
            }
            for keyword in keywords.as_slice() {
                println!("  {keyword}");
            }
            return Ok(());
        }
        KeywordsAction::Set { keywords: input } => {
            keywords = KeywordSet::parse_list(&input);
            println!("Keywords replaced ({} total)", keywords.len());
        }
        KeywordsAction::Add { keywords: input } => {
            let added = keywords.add(&input);
            println!("Added {} {}", added, pluralize("keyword", added));
        }
        KeywordsAction::Remove { keywords: input } => {
            let removed = keywords.remove(&input);
            println!("Removed {} {}", removed, pluralize("keyword", removed));
        }
        KeywordsAction::Reset => {
            keywords = KeywordSet::default();
            println!("Keywords reset to the built-in list");
        }
    }

    config.set_keywords(keywords)?;
    println!(
        "{}",
        format!("(saved to {})", config.file_path::<KeywordsFile>().display()).dimmed()
    );
    Ok(())
}

pub fn set_format(config: &mut Config, template: &str) -> Result<()> {
    config.set_event_format(template)?;
    println!(
        "Format set to {} {}",
        config.event_format().green(),
        format!("(e.g. {})", preview(config.event_format())?).dimmed()
    );
    println!(
        "{}",
        format!("(saved to {})", config.file_path::<FormatFile>().display()).dimmed()
    );
    Ok(())
}

pub fn set_extract(
    config: &mut Config,
    mode: Option<ExtractMode>,
    tool: Option<ArchiveToolKind>,
    images: Option<Vec<String>>,
) -> Result<()> {
    let current = config.extract();
    let settings = ExtractSettings {
        mode: mode.unwrap_or(current.mode),
        tool: tool.unwrap_or(current.tool),
        image_extensions: images.unwrap_or_else(|| current.image_extensions.clone()),
    };

    config.set_extract(settings)?;
    println!(
        "Archives: {} with {} {}",
        config.extract().mode.green(),
        config.extract().tool.green(),
        format!("(saved to {})", config.file_path::<ExtractSettings>().display()).dimmed()
    );
    Ok(())
}

fn preview(format: &EventFormat) -> Result<String> {
    Ok(format.render(PREVIEW_EVENT, &Local::now().naive_local())?)
}
