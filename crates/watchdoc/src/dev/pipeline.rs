//! The background watch loop.
//!
//! One task owns the watcher stream and the debouncer. It selects over the
//! next stream item and the single pending timer. Fired commands run on
//! their own task so a long build never stalls event intake; reloads are a
//! non-blocking broadcast and run inline.

use crate::dev::command;
use crate::dev::debounce::{Action, DebounceDispatcher};
use crate::dev::paths::{is_noise, is_skipped_directory};
use crate::dev::reload::ReloadBroadcaster;
use crate::dev::watcher::{ChangeEvent, ChangeKind, FileWatcher, WatchMessage, WatchStream};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Where fired decisions go.
#[async_trait]
pub trait DispatchTarget: Send + Sync + 'static {
    /// Run the rebuild command to completion.
    async fn run_command(&self, command: &str);

    /// Signal connected browsers to reload.
    fn reload(&self);
}

/// Production target: shell command execution and WebSocket broadcast.
#[derive(Debug, Clone)]
pub struct LiveReloadTarget {
    broadcaster: ReloadBroadcaster,
}

impl LiveReloadTarget {
    pub fn new(broadcaster: ReloadBroadcaster) -> Self {
        Self { broadcaster }
    }
}

#[async_trait]
impl DispatchTarget for LiveReloadTarget {
    async fn run_command(&self, cmd: &str) {
        // Outcome is already logged; the output tree change that follows
        // triggers the reload.
        let _ = command::run(cmd).await;
    }

    fn reload(&self) {
        self.broadcaster.reload();
    }
}

/// Watch loop state.
pub struct WatchLoop<T: DispatchTarget> {
    dispatcher: DebounceDispatcher,
    target: Arc<T>,
    watcher: Option<Arc<Mutex<FileWatcher>>>,
}

impl<T: DispatchTarget> WatchLoop<T> {
    pub fn new(dispatcher: DebounceDispatcher, target: Arc<T>) -> Self {
        Self {
            dispatcher,
            target,
            watcher: None,
        }
    }

    /// Attach the watcher that feeds the stream.
    ///
    /// The loop keeps it alive and registers directories created after
    /// startup.
    pub fn with_watcher(mut self, watcher: FileWatcher) -> Self {
        self.watcher = Some(Arc::new(Mutex::new(watcher)));
        self
    }

    /// Consume the stream until it closes.
    pub async fn run(mut self, mut stream: WatchStream) {
        loop {
            let deadline = self.dispatcher.deadline();
            let timer = tokio::time::sleep_until(
                deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600)),
            );

            tokio::select! {
                message = stream.recv() => match message {
                    Some(WatchMessage::Change(event)) => self.handle_change(event),
                    Some(WatchMessage::Error(e)) => tracing::warn!("Watcher error: {}", e),
                    None => {
                        tracing::debug!("Watch stream closed, stopping watch loop");
                        break;
                    }
                },
                _ = timer, if deadline.is_some() => self.fire(),
            }
        }
    }

    fn handle_change(&mut self, event: ChangeEvent) {
        if event.kind == ChangeKind::Create {
            self.track_new_directory(&event);
        }

        self.dispatcher.observe(&event, Instant::now());
    }

    /// Register a directory created after startup.
    ///
    /// The stat and walk are blocking, so they run on the blocking pool.
    /// Events inside the new tree that land before registration are missed.
    fn track_new_directory(&self, event: &ChangeEvent) {
        let Some(watcher) = self.watcher.as_ref() else {
            return;
        };

        if is_noise(&event.path) || is_skipped_directory(&event.path) {
            return;
        }

        let watcher = Arc::clone(watcher);
        let path = event.path.clone();
        tokio::task::spawn_blocking(move || {
            if !path.is_dir() {
                return;
            }
            let added = watcher.lock().watch_tree(&path);
            tracing::debug!("Watching new directory {} ({} directories)", path.display(), added);
        });
    }

    fn fire(&mut self) {
        match self.dispatcher.fire() {
            Some(Action::RunCommand(cmd)) => {
                let target = Arc::clone(&self.target);
                tokio::spawn(async move {
                    target.run_command(&cmd).await;
                });
            }
            Some(Action::Reload) => self.target.reload(),
            Some(Action::Nothing) => {
                tracing::debug!("Change outside source and output roots, ignoring")
            }
            None => {}
        }
    }
}
