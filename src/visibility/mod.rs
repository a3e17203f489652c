//! Pause and resume polling when the host application is backgrounded.
//!
//! The host owns a `watch::Sender<Visibility>` and reports foreground /
//! background changes on it; the watcher only reacts to transitions.
//! Hidden pauses every registered query, Visible resumes every registered
//! query (including ones individually stopped before the app was hidden).

use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Whether the host application is in the foreground.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    pub fn from_hidden(hidden: bool) -> Self {
        if hidden {
            Visibility::Hidden
        } else {
            Visibility::Visible
        }
    }

    pub fn is_hidden(self) -> bool {
        self == Visibility::Hidden
    }
}

/// Background task applying visibility transitions to a registry.
pub struct VisibilityWatcher {
    registry: Arc<Registry>,
    visibility: watch::Receiver<Visibility>,
}

impl VisibilityWatcher {
    pub fn new(registry: Arc<Registry>, visibility: watch::Receiver<Visibility>) -> Self {
        Self {
            registry,
            visibility,
        }
    }

    /// Apply one visibility state to the registry.
    pub fn apply(&self, visibility: Visibility) {
        match visibility {
            Visibility::Hidden => self.registry.stop_polling(),
            Visibility::Visible => self.registry.start_polling(),
        }
    }

    /// Start the watcher. The task ends when `cancel_token` fires or the
    /// host drops its sender.
    pub fn start(mut self, cancel_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut current = *self.visibility.borrow_and_update();
            tracing::info!(visibility = ?current, "Visibility watcher started");

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        tracing::info!("Visibility watcher shutting down");
                        break;
                    }
                    changed = self.visibility.changed() => {
                        if changed.is_err() {
                            tracing::debug!("Visibility source closed");
                            break;
                        }
                        let next = *self.visibility.borrow_and_update();
                        if next != current {
                            tracing::debug!(from = ?current, to = ?next, "Visibility changed");
                            current = next;
                            self.apply(next);
                        }
                    }
                }
            }
        })
    }
}
