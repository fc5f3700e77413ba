//! Terminal rendering for filemover-core types.

use filemover_core::calendar::EventTime;
use filemover_core::ingest::IngestReport;
use filemover_core::suggest::Suggestion;
use owo_colors::OwoColorize;

use crate::utils::tui::pluralize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for EventTime {
    fn render(&self) -> String {
        match self {
            EventTime::Date(date) => format!("{:<16}", date.format("%Y-%m-%d").to_string()),
            EventTime::DateTime(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

impl Render for Suggestion {
    fn render(&self) -> String {
        format!("{}  {}", self.event.start.render().dimmed(), self.name)
    }
}

impl Render for IngestReport {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        for (source, target) in &self.copied {
            let name = target.file_name().unwrap_or_default().to_string_lossy();
            let renamed = source.file_name() != target.file_name();
            if renamed {
                let from = format!("(from {})", source.display());
                lines.push(format!("   {} {} {}", "+".green(), name.green(), from.dimmed()));
            } else {
                lines.push(format!("   {} {}", "+".green(), name.green()));
            }
        }

        for (source, extraction) in &self.extracted {
            let count = extraction.entries.len();
            lines.push(format!(
                "   {} {} {}",
                "⇣".cyan(),
                source.file_name().unwrap_or_default().to_string_lossy().cyan(),
                format!("→ {} ({} {})", extraction.dir.display(), count, pluralize("item", count)).dimmed()
            ));
        }

        for warning in &self.warnings {
            lines.push(format!("   {} {}", "!".yellow(), warning.error.to_string().yellow()));
        }

        let processed = self.processed();
        let mut summary = format!("\n{} {} processed", processed, pluralize("file", processed));
        if !self.warnings.is_empty() {
            summary.push_str(&format!(", {} skipped", self.warnings.len()));
        }
        lines.push(summary);

        lines.join("\n")
    }
}
