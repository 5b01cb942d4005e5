//! Latest-value state store for a screen.
//!
//! Backed by [`tokio::sync::watch`]: every [`StateStore::set`] overwrites the
//! current value, observers always see values in the order they were set,
//! but an observer that is not polling may skip intermediate values.

use std::sync::Arc;

use futures_util::Stream;
use tokio::sync::watch;

/// Holds the single current value of a screen's state.
#[derive(Debug)]
pub struct StateStore<S> {
    tx: Arc<watch::Sender<S>>,
}

impl<S> Clone for StateStore<S> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<S: Clone + Send + Sync + 'static> StateStore<S> {
    /// Creates a store holding `initial`.
    #[must_use]
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Overwrites the current value and notifies every watcher.
    ///
    /// Works whether or not anyone is watching.
    pub fn set(&self, state: S) {
        self.tx.send_replace(state);
    }

    /// Returns a copy of the current value.
    #[must_use]
    pub fn current(&self) -> S {
        self.tx.borrow().clone()
    }

    /// Starts watching the store from its current value.
    #[must_use]
    pub fn watch(&self) -> StateWatcher<S> {
        StateWatcher {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read side of a [`StateStore`], handed to the UI.
#[derive(Debug, Clone)]
pub struct StateWatcher<S> {
    rx: watch::Receiver<S>,
}

impl<S: Clone + Send + Sync + 'static> StateWatcher<S> {
    /// Returns a copy of the latest value without marking it seen.
    #[must_use]
    pub fn current(&self) -> S {
        self.rx.borrow().clone()
    }

    /// Waits for a value newer than the last one this watcher saw.
    ///
    /// Returns `None` once the store and every writer are gone.
    pub async fn changed(&mut self) -> Option<S> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Waits until the current value satisfies `predicate`, checking the
    /// latest value first.
    ///
    /// Returns `None` if the store goes away before that happens.
    pub async fn wait_for(&mut self, predicate: impl FnMut(&S) -> bool) -> Option<S> {
        self.rx
            .wait_for(predicate)
            .await
            .ok()
            .map(|state| state.clone())
    }

    /// Converts the watcher into a stream: the latest value first, then every
    /// value it observes afterwards.
    pub fn into_stream(self) -> impl Stream<Item = S> + Send + 'static {
        futures_util::stream::unfold((self, true), |(mut watcher, first)| async move {
            if first {
                let current = watcher.rx.borrow_and_update().clone();
                return Some((current, (watcher, false)));
            }
            let next = watcher.changed().await?;
            Some((next, (watcher, false)))
        })
    }
}
