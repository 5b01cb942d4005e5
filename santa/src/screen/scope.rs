//! Cancellation domain for the command tasks of one screen.
//!
//! Every command a controller runs is spawned through its [`ScreenScope`].
//! Closing the scope (explicitly or by dropping it) cancels every task still
//! in flight and shuts the write gate: once [`ScreenScope::close`] returns,
//! no task of that screen writes to its state store or action channel again,
//! even if the collaborator it was awaiting resolves later.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use parking_lot::RwLock;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

/// Errors from the screen task machinery.
#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    /// The screen was created outside a tokio runtime.
    #[error("no tokio runtime available for screen commands: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    /// A command was issued after the screen was closed.
    #[error("screen `{screen}` is closed, command `{command}` not started")]
    Closed {
        /// Screen name.
        screen: &'static str,
        /// Command that was refused.
        command: &'static str,
    },
}

/// Shared between a scope and the writers it hands out.
#[derive(Debug)]
pub(crate) struct Lifetime {
    screen: &'static str,
    /// `true` while the screen is open. Writers hold the read lock for the
    /// duration of a write; closing takes the write lock.
    open: RwLock<bool>,
    token: CancellationToken,
}

impl Lifetime {
    pub(crate) const fn screen(&self) -> &'static str {
        self.screen
    }

    /// Runs `write` only if the screen is still open.
    pub(crate) fn gated<T>(&self, write: impl FnOnce() -> T) -> Option<T> {
        let open = self.open.read();
        if !*open {
            tracing::debug!(screen = self.screen, "write after close discarded");
            return None;
        }
        Some(write())
    }

    fn is_open(&self) -> bool {
        *self.open.read()
    }

    fn close(&self) {
        let mut open = self.open.write();
        if *open {
            *open = false;
            self.token.cancel();
            tracing::debug!(screen = self.screen, "screen closed");
        }
    }
}

/// Owns the lifetime of one screen's command tasks.
#[derive(Debug)]
pub struct ScreenScope {
    lifetime: Arc<Lifetime>,
    runtime: Handle,
}

impl ScreenScope {
    /// Creates an open scope whose tasks run on `runtime`.
    #[must_use]
    pub fn new(screen: &'static str, runtime: Handle) -> Self {
        Self {
            lifetime: Arc::new(Lifetime {
                screen,
                open: RwLock::new(true),
                token: CancellationToken::new(),
            }),
            runtime,
        }
    }

    /// Creates a scope on the runtime the caller is running in.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::NoRuntime`] outside a tokio runtime.
    pub fn current(screen: &'static str) -> Result<Self, ScreenError> {
        Ok(Self::new(screen, Handle::try_current()?))
    }

    pub(crate) fn lifetime(&self) -> Arc<Lifetime> {
        Arc::clone(&self.lifetime)
    }

    /// Returns `true` once the scope has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.lifetime.is_open()
    }

    /// Cancels all in-flight tasks and blocks any further writes. Idempotent.
    pub fn close(&self) {
        self.lifetime.close();
    }

    /// Resolves when the scope is closed.
    pub fn closed(&self) -> impl Future<Output = ()> + Send + 'static {
        self.lifetime.token.clone().cancelled_owned()
    }

    /// Spawns one command task.
    ///
    /// The task stops at its next suspension point when the scope closes. If
    /// it panics, the panic is contained and `recover` runs so the screen is
    /// not left mid-command.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::Closed`] if the scope is already closed.
    pub fn spawn<F, R>(&self, command: &'static str, task: F, recover: R) -> Result<(), ScreenError>
    where
        F: Future<Output = ()> + Send + 'static,
        R: FnOnce() + Send + 'static,
    {
        let screen = self.lifetime.screen;
        if self.is_closed() {
            return Err(ScreenError::Closed { screen, command });
        }

        let token = self.lifetime.token.clone();
        self.runtime.spawn(async move {
            tracing::debug!(screen, command, "command started");
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    tracing::debug!(screen, command, "command cancelled with its screen");
                }
                result = AssertUnwindSafe(task).catch_unwind() => {
                    if result.is_err() {
                        tracing::error!(screen, command, "command panicked, restoring screen");
                        recover();
                    } else {
                        tracing::debug!(screen, command, "command finished");
                    }
                }
            }
        });
        Ok(())
    }
}

impl Drop for ScreenScope {
    fn drop(&mut self) {
        self.close();
    }
}
