//! File watching for live persona reload

use anyhow::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::debug;

/// Watches the persona file and emits a debounced signal on change.
/// Dropping the watcher stops it.
pub struct PersonaWatcher {
    _watcher: RecommendedWatcher,
}

impl PersonaWatcher {
    /// Start watching `path`, debounced to at most one signal per
    /// `debounce_ms`
    pub fn start(path: &Path, debounce_ms: u64) -> Result<(Self, mpsc::Receiver<()>)> {
        let (tx, rx) = mpsc::channel(8);
        let debounce = Duration::from_millis(debounce_ms);
        let last_signal: Mutex<Option<Instant>> = Mutex::new(None);

        let mut watcher = RecommendedWatcher::new(
            move |res: std::result::Result<Event, notify::Error>| {
                let Ok(event) = res else { return };
                if !matches!(
                    event.kind,
                    notify::EventKind::Modify(_) | notify::EventKind::Create(_)
                ) {
                    return;
                }

                let mut last = last_signal.lock().unwrap_or_else(|e| e.into_inner());
                if last.map(|t| t.elapsed() < debounce).unwrap_or(false) {
                    return;
                }
                *last = Some(Instant::now());

                // Receiver lagging just drops the extra signal
                let _ = tx.try_send(());
            },
            Config::default(),
        )?;

        watcher.watch(path, RecursiveMode::NonRecursive)?;
        debug!("Watching persona file: {:?}", path);

        Ok((Self { _watcher: watcher }, rx))
    }
}
