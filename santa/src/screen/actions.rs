//! One-shot action delivery for a screen.
//!
//! Actions are transient directives (navigate, show a toast). Each one is
//! handed to exactly one observer: taking it removes it from the buffer, so
//! an observer that attaches later never sees it again. Actions sent while
//! nobody is observing stay queued until someone does.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::Stream;
use tokio::sync::{Mutex, mpsc};

/// Creates a connected sender/observer pair.
///
/// The buffer is unbounded so that a detached UI never causes an action to
/// be dropped; once more than `backlog_warn` actions are waiting, each send
/// logs a warning.
#[must_use]
pub fn action_channel<A>(backlog_warn: usize) -> (ActionSender<A>, Actions<A>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let pending = Arc::new(AtomicUsize::new(0));
    (
        ActionSender {
            tx,
            pending: Arc::clone(&pending),
            backlog_warn,
        },
        Actions {
            rx: Arc::new(Mutex::new(rx)),
            pending,
        },
    )
}

/// Write side of the action channel. Never blocks.
#[derive(Debug)]
pub struct ActionSender<A> {
    tx: mpsc::UnboundedSender<A>,
    pending: Arc<AtomicUsize>,
    backlog_warn: usize,
}

impl<A> Clone for ActionSender<A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            pending: Arc::clone(&self.pending),
            backlog_warn: self.backlog_warn,
        }
    }
}

impl<A> ActionSender<A> {
    /// Enqueues an action. Returns `false` if every observer handle is gone.
    pub fn send(&self, action: A) -> bool {
        // Counted before sending so a fast observer never decrements first.
        let pending = self.pending.fetch_add(1, Ordering::AcqRel) + 1;
        if self.tx.send(action).is_err() {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            tracing::debug!("action dropped: no observer handle left");
            return false;
        }
        if pending > self.backlog_warn {
            tracing::warn!(pending, "screen actions are piling up unobserved");
        }
        true
    }
}

/// Read side of the action channel.
///
/// Cloning gives another observer of the same queue; observers compete for
/// actions, each action going to whichever observer takes it first.
#[derive(Debug)]
pub struct Actions<A> {
    rx: Arc<Mutex<mpsc::UnboundedReceiver<A>>>,
    pending: Arc<AtomicUsize>,
}

impl<A> Clone for Actions<A> {
    fn clone(&self) -> Self {
        Self {
            rx: Arc::clone(&self.rx),
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<A: Send + 'static> Actions<A> {
    /// Takes the next action, waiting until one is sent.
    ///
    /// Returns `None` once the queue is empty and the screen is gone.
    pub async fn next(&self) -> Option<A> {
        let mut rx = self.rx.lock().await;
        let action = rx.recv().await?;
        self.pending.fetch_sub(1, Ordering::AcqRel);
        Some(action)
    }

    /// Takes the next action if one is already waiting.
    ///
    /// Returns `None` when the queue is empty or another observer is
    /// currently taking an action.
    #[must_use]
    pub fn try_next(&self) -> Option<A> {
        let mut rx = self.rx.try_lock().ok()?;
        let action = rx.try_recv().ok()?;
        self.pending.fetch_sub(1, Ordering::AcqRel);
        Some(action)
    }

    /// Number of actions waiting to be taken.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Observes the queue as a stream. Dropping the stream detaches without
    /// losing anything still queued.
    pub fn observe(&self) -> impl Stream<Item = A> + Send + 'static {
        futures_util::stream::unfold(self.clone(), |actions| async move {
            let action = actions.next().await?;
            Some((action, actions))
        })
    }
}
