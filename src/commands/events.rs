use anyhow::Result;
use filemover_core::calendar::Provider;
use filemover_core::config::Config;
use filemover_core::suggest::FetchOptions;
use owo_colors::OwoColorize;

use super::fetch_with_spinner;
use crate::render::Render;
use crate::utils::tui::pluralize;

pub async fn run(config: &Config, provider_name: &str, days: i64, max_results: usize) -> Result<()> {
    if config.keywords().is_empty() {
        anyhow::bail!(
            "No keywords configured, so no event can match.\n\n\
            Add some with:\n  \
            filemover config keywords add <KEYWORD>..."
        );
    }

    let provider = Provider::from_name(provider_name);
    let options = FetchOptions {
        window_days: days,
        max_results,
        ..FetchOptions::default()
    };
    let suggestions = fetch_with_spinner(config, &provider, &options).await?;

    if suggestions.is_empty() {
        println!("{}", format!("No matching events in the last {days} days").dimmed());
        return Ok(());
    }

    for suggestion in &suggestions {
        println!("{}", suggestion.render());
    }
    println!(
        "\n{} {}",
        suggestions.len(),
        pluralize("matching event", suggestions.len()).dimmed()
    );

    Ok(())
}
