//! Debounced routing of change events.
//!
//! Bursts of file changes collapse into a single decision. Each qualifying
//! event replaces whatever is pending and restarts the quiet period, so only
//! the last event of a burst is acted on. Its classification is captured when
//! the timer is armed and is not re-evaluated when the timer fires.

use crate::dev::paths::{is_noise, is_under, is_under_any};
use crate::dev::watcher::ChangeEvent;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::Instant;

/// Quiet period after the most recent qualifying event.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(200);

/// Classification captured from the triggering event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Path is under one of the source roots
    pub is_source: bool,
    /// Path is under the served root
    pub is_output: bool,
}

/// What to do when the quiet period ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run the rebuild command; the rebuilt output triggers its own reload later
    RunCommand(String),
    /// Tell connected browsers to reload
    Reload,
    /// Nothing to do
    Nothing,
}

impl Decision {
    /// Resolve the decision against the configured rebuild command.
    ///
    /// A source change with a command runs the command and does not also
    /// reload.
    pub fn action(&self, command: Option<&str>) -> Action {
        match command {
            Some(cmd) if self.is_source => Action::RunCommand(cmd.to_string()),
            _ if self.is_output => Action::Reload,
            _ => Action::Nothing,
        }
    }
}

/// Debounce state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebounceState {
    /// No timer armed
    Idle,
    /// Timer armed with a captured decision
    Pending { decision: Decision, deadline: Instant },
}

/// Single-slot, replace-on-arrival debouncer.
#[derive(Debug)]
pub struct DebounceDispatcher {
    served_root: PathBuf,
    sources: Vec<PathBuf>,
    command: Option<String>,
    window: Duration,
    state: DebounceState,
}

impl DebounceDispatcher {
    pub fn new(served_root: PathBuf, sources: Vec<PathBuf>, command: Option<String>) -> Self {
        Self {
            served_root,
            sources,
            command: command.filter(|c| !c.trim().is_empty()),
            window: DEBOUNCE_WINDOW,
            state: DebounceState::Idle,
        }
    }

    /// Override the quiet period.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Classify an event against the configured roots.
    pub fn classify(&self, event: &ChangeEvent) -> Decision {
        Decision {
            is_source: is_under_any(&event.path, &self.sources),
            is_output: is_under(&event.path, &self.served_root),
        }
    }

    /// Feed one event in.
    ///
    /// Returns true if the event qualified and (re)armed the timer. Noise and
    /// operations other than write/create are ignored.
    pub fn observe(&mut self, event: &ChangeEvent, now: Instant) -> bool {
        if !event.is_write_or_create() || is_noise(&event.path) {
            return false;
        }

        let decision = self.classify(event);
        tracing::debug!(
            "File changed: {} (source: {}, output: {})",
            event.path.display(),
            decision.is_source,
            decision.is_output
        );

        self.state = DebounceState::Pending {
            decision,
            deadline: now + self.window,
        };
        true
    }

    /// When the pending timer fires, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            DebounceState::Pending { deadline, .. } => Some(deadline),
            DebounceState::Idle => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, DebounceState::Pending { .. })
    }

    pub fn state(&self) -> &DebounceState {
        &self.state
    }

    /// Fire the timer: go idle and hand back the action to run.
    ///
    /// Returns `None` when nothing was pending.
    pub fn fire(&mut self) -> Option<Action> {
        match std::mem::replace(&mut self.state, DebounceState::Idle) {
            DebounceState::Pending { decision, .. } => {
                Some(decision.action(self.command.as_deref()))
            }
            DebounceState::Idle => None,
        }
    }
}
