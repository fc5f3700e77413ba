pub mod auth;
pub mod config;
pub mod events;
pub mod ingest;

use anyhow::Result;
use filemover_core::FileMoverError;
use filemover_core::calendar::Provider;
use filemover_core::config::Config;
use filemover_core::suggest::{FetchOptions, Suggestion, fetch_suggestions};
use tokio_util::sync::CancellationToken;

use crate::utils::tui::create_spinner;

/// Exit status for a run stopped with Ctrl-C.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Fetch suggestions behind a spinner. Ctrl-C cancels the fetch and kills the provider.
pub async fn fetch_with_spinner(
    config: &Config,
    provider: &Provider,
    options: &FetchOptions,
) -> Result<Vec<Suggestion>> {
    let cancel = CancellationToken::new();
    let spinner = create_spinner(format!("Fetching events from {}...", provider.name()));
    let fetch = fetch_suggestions(
        provider,
        config.keywords(),
        config.event_format(),
        options,
        &cancel,
    );
    let result = until_interrupted(fetch, ctrl_c()).await;
    spinner.finish_and_clear();

    // Tokio keeps its SIGINT handler once installed, so later Ctrl-C needs its own listener.
    exit_on_interrupt();

    match result {
        Some(result) => Ok(result?),
        None => {
            cancel.cancel();
            tracing::debug!(provider = provider.name(), "fetch interrupted");
            Err(FileMoverError::Cancelled.into())
        }
    }
}

/// Run `work` unless `interrupt` fires first. The losing future is dropped.
async fn until_interrupted<T>(
    work: impl Future<Output = T>,
    interrupt: impl Future<Output = ()>,
) -> Option<T> {
    tokio::select! {
        output = work => Some(output),
        () = interrupt => None,
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::debug!(error = %e, "could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// End the process on the next Ctrl-C.
fn exit_on_interrupt() {
    tokio::spawn(async {
        ctrl_c().await;
        eprintln!();
        std::process::exit(INTERRUPTED_EXIT_CODE);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct SetOnDrop(Arc<AtomicBool>);

    impl Drop for SetOnDrop {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_work_finishing_first_returns_output() {
        let result = until_interrupted(async { 7 }, std::future::pending()).await;
        assert_eq!(result, Some(7));
    }

    #[tokio::test]
    async fn test_interrupt_drops_work() {
        let dropped = Arc::new(AtomicBool::new(false));
        let guard = SetOnDrop(dropped.clone());
        let work = async move {
            let _guard = guard;
            std::future::pending::<()>().await
        };

        let result = until_interrupted(work, async {}).await;

        assert!(result.is_none());
        assert!(dropped.load(Ordering::SeqCst));
    }
}
