// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! File watcher for hot-reloading show files.
//!
//! Modifications are debounced, then the file is loaded and validated on
//! the watcher thread. Only shows that would start cleanly are delivered as
//! `Reloaded`; everything else becomes an `Error` event and the running
//! show is left alone.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::debug;

use super::ShowFile;

/// Default debounce window in milliseconds
const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Events emitted by the config watcher
#[derive(Debug, Clone)]
pub enum ConfigEvent {
    /// Show file was modified and successfully reloaded
    Reloaded(Box<ShowFile>),
    /// Show file was modified but failed to load or validate
    Error(String),
    /// A new file was created in the watch directory
    FileCreated(PathBuf),
    /// A file was deleted from the watch directory
    FileDeleted(PathBuf),
}

/// Show file watcher with debouncing and validation
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    event_receiver: Receiver<ConfigEvent>,
    watched_path: PathBuf,
}

impl ConfigWatcher {
    /// Create a new watcher for a show file or a directory of show files
    ///
    /// # Arguments
    /// * `path` - Path to watch (file or directory)
    /// * `debounce_ms` - Debounce duration in milliseconds (default: 500)
    pub fn new<P: AsRef<Path>>(path: P, debounce_ms: Option<u64>) -> Result<Self> {
        let watched_path = path.as_ref().to_path_buf();
        let debounce_duration = Duration::from_millis(debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS));

        let (event_tx, event_rx): (Sender<ConfigEvent>, Receiver<ConfigEvent>) = mpsc::channel();
        let (notify_tx, notify_rx): (Sender<Event>, Receiver<Event>) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            },
            Config::default(),
        )
        .map_err(|e| anyhow!("Failed to create file watcher: {}", e))?;

        let mode = if watched_path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };

        watcher
            .watch(&watched_path, mode)
            .map_err(|e| anyhow!("Failed to watch path {:?}: {}", watched_path, e))?;

        let root = watched_path.clone();
        std::thread::spawn(move || debounce_loop(notify_rx, event_tx, root, debounce_duration));

        Ok(Self {
            _watcher: watcher,
            event_receiver: event_rx,
            watched_path,
        })
    }

    /// Try to receive the next config event (non-blocking)
    pub fn try_recv(&self) -> Option<ConfigEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Receive all pending config events
    pub fn recv_all(&self) -> Vec<ConfigEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Get the path being watched
    pub fn watched_path(&self) -> &Path {
        &self.watched_path
    }
}

fn debounce_loop(
    notify_rx: Receiver<Event>,
    event_tx: Sender<ConfigEvent>,
    root: PathBuf,
    debounce: Duration,
) {
    let mut last_event_time: Option<Instant> = None;
    let mut pending_paths: Vec<PathBuf> = Vec::new();

    loop {
        match notify_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => match event.kind {
                EventKind::Create(_) => {
                    for path in event.paths {
                        let _ = event_tx.send(ConfigEvent::FileCreated(path));
                    }
                }
                EventKind::Remove(_) => {
                    for path in event.paths {
                        let _ = event_tx.send(ConfigEvent::FileDeleted(path));
                    }
                }
                EventKind::Modify(_) => {
                    for path in event.paths {
                        if !pending_paths.contains(&path) {
                            pending_paths.push(path);
                        }
                    }
                    last_event_time = Some(Instant::now());
                }
                _ => {}
            },
            Err(mpsc::RecvTimeoutError::Timeout) => {
                let settled = last_event_time.is_some_and(|t| t.elapsed() >= debounce);
                if !settled {
                    continue;
                }
                for path in pending_paths.drain(..) {
                    if !is_show_file(&path) && path != root {
                        continue;
                    }
                    debug!(?path, "reloading show file");
                    let event = match validate_config(&path) {
                        Ok(show) => ConfigEvent::Reloaded(Box::new(show)),
                        Err(e) => ConfigEvent::Error(format!("Failed to load {:?}: {:#}", path, e)),
                    };
                    let _ = event_tx.send(event);
                }
                last_event_time = None;
            }
            // Watcher was dropped, exit thread
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
}

fn is_show_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml" | "toml")
    )
}

/// Load and validate a show without applying it
pub fn validate_config<P: AsRef<Path>>(path: P) -> Result<ShowFile> {
    let show = ShowFile::load(path.as_ref())?;
    show.validate()
        .with_context(|| format!("Invalid show file: {:?}", path.as_ref()))?;
    Ok(show)
}
