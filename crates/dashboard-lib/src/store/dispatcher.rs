//! Dispatch handles that feed actions into the store loop

use super::action::Action;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

/// Anything that accepts actions.
///
/// Dispatch is fire-and-forget: implementations handle their own failures.
pub trait Dispatch {
    fn dispatch(&self, action: Action);
}

/// Create a dispatcher and the receiving end consumed by [`super::Store::run`]
pub fn channel(buffer: usize) -> (Dispatcher, mpsc::Receiver<Action>) {
    let (tx, rx) = mpsc::channel(buffer);
    (Dispatcher { tx }, rx)
}

/// Cloneable handle queueing actions for the store event loop
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: mpsc::Sender<Action>,
}

impl Dispatcher {
    /// Queue an action, waiting for room in the channel
    pub async fn send(&self, action: Action) {
        let name = action.name();
        if self.tx.send(action).await.is_err() {
            warn!(action = name, "Store loop stopped, dropping action");
        }
    }

    /// True once the store loop has stopped receiving
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Dispatch for Dispatcher {
    fn dispatch(&self, action: Action) {
        let name = action.name();
        match self.tx.try_send(action) {
            Ok(()) => debug!(action = name, "queued action"),
            Err(TrySendError::Full(_)) => {
                warn!(action = name, "Action queue is full, dropping action");
            }
            Err(TrySendError::Closed(_)) => {
                warn!(action = name, "Store loop stopped, dropping action");
            }
        }
    }
}

/// Dispatch target that only records actions, for driving components in tests
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    actions: Arc<Mutex<Vec<Action>>>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Actions recorded so far, oldest first
    pub fn actions(&self) -> Vec<Action> {
        self.actions
            .lock()
            .map(|actions| actions.clone())
            .unwrap_or_default()
    }
}

impl Dispatch for ActionLog {
    fn dispatch(&self, action: Action) {
        if let Ok(mut actions) = self.actions.lock() {
            actions.push(action);
        }
    }
}
