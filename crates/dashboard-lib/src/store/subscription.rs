//! Projections of store snapshots into component props

use super::state::AppState;
use std::sync::Arc;
use tokio::sync::watch;

/// Watches store snapshots through a projection function.
///
/// [`Subscription::changed`] only resolves when the projected props differ
/// from the last value it yielded, so unrelated state changes are skipped.
pub struct Subscription<P, F> {
    rx: watch::Receiver<Arc<AppState>>,
    project: F,
    last: P,
}

impl<P, F> Subscription<P, F>
where
    P: Clone + PartialEq,
    F: Fn(&AppState) -> P,
{
    pub fn new(rx: watch::Receiver<Arc<AppState>>, project: F) -> Self {
        let snapshot = rx.borrow().clone();
        let last = project(&snapshot);
        Self { rx, project, last }
    }

    /// Props projected from the most recently seen snapshot
    pub fn current(&self) -> &P {
        &self.last
    }

    /// Wait for the next change of the projected props.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<P> {
        loop {
            if self.rx.changed().await.is_err() {
                return None;
            }
            let snapshot = self.rx.borrow_and_update().clone();
            let next = (self.project)(&snapshot);
            if next != self.last {
                self.last = next.clone();
                return Some(next);
            }
        }
    }
}
