//! Generate static files

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::generator::{GenerateStats, Generator};
use crate::{Folio, CONFIG_FILE};

/// Generate the static site
pub async fn run(folio: &Folio) -> Result<()> {
    build(folio).await.map(|_| ())
}

/// Generate and report what was written
pub async fn build(folio: &Folio) -> Result<GenerateStats> {
    let start = Instant::now();

    let stats = Generator::new(folio).generate().await?;

    tracing::info!(
        "Generated {} pages ({} posts) in {:.2}s",
        stats.pages,
        stats.posts,
        start.elapsed().as_secs_f64()
    );

    Ok(stats)
}

/// Watch content and configuration, regenerating on every change.
///
/// Configuration is re-read for each rebuild. A failed rebuild is reported
/// and watching continues.
pub async fn watch(folio: &Folio) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Create debouncer to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        move |result: DebounceEventResult| {
            let _ = tx.send(result);
        },
    )?;

    if folio.content_dir.exists() {
        debouncer
            .watcher()
            .watch(&folio.content_dir, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", folio.content_dir);
    } else {
        tracing::warn!(
            "Content directory {:?} does not exist, not watching it",
            folio.content_dir
        );
    }

    let config_path = folio.base_dir.join(CONFIG_FILE);
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    while let Some(result) = rx.recv().await {
        match result {
            Ok(events) => {
                let changed: Vec<_> = events
                    .iter()
                    .filter(|e| is_relevant(&e.path))
                    .collect();
                if changed.is_empty() {
                    continue;
                }
                for event in &changed {
                    tracing::info!("File changed: {}", event.path.display());
                }

                let rebuilt = match Folio::new(&folio.base_dir) {
                    Ok(current) => build(&current).await,
                    Err(e) => Err(e),
                };
                if let Err(e) = rebuilt {
                    tracing::error!("Generation failed: {:#}", e);
                }
            }
            Err(e) => tracing::warn!("Watch error: {:?}", e),
        }
    }

    Ok(())
}

/// Editor swap files and hidden files do not trigger rebuilds
fn is_relevant(path: &std::path::Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    !name.starts_with('.') && !name.ends_with('~') && !name.ends_with(".swp")
}
