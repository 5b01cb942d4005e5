//! Per-screen controller machinery.
//!
//! A [`Screen`] bundles what every controller owns:
//! - a [`StateStore`] with the screen's single current state,
//! - an action channel delivering one-shot [`Actions`] to the UI,
//! - a [`ScreenScope`] in which command tasks run and are cancelled.
//!
//! Command tasks write through an [`Emitter`], which refuses every write once
//! the screen is closed.

pub mod actions;
pub mod scope;
pub mod state;

use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Handle;

use crate::config::ScreenConfig;

pub use actions::{ActionSender, Actions, action_channel};
pub use scope::{ScreenError, ScreenScope};
pub use state::{StateStore, StateWatcher};

use scope::Lifetime;

/// State, actions and task scope of one screen.
#[derive(Debug)]
pub struct Screen<S, A> {
    scope: ScreenScope,
    emitter: Emitter<S, A>,
    actions: Actions<A>,
}

impl<S, A> Screen<S, A>
where
    S: Clone + Send + Sync + std::fmt::Debug + 'static,
    A: Send + std::fmt::Debug + 'static,
{
    /// Opens a screen in `initial` state whose commands run on `runtime`.
    #[must_use]
    pub fn new(name: &'static str, initial: S, runtime: Handle, config: &ScreenConfig) -> Self {
        let scope = ScreenScope::new(name, runtime);
        let (sender, actions) = action_channel(config.action_backlog_warn);
        let emitter = Emitter {
            state: StateStore::new(initial),
            actions: sender,
            lifetime: scope.lifetime(),
        };
        Self {
            scope,
            emitter,
            actions,
        }
    }

    /// Watches the screen state.
    #[must_use]
    pub fn state(&self) -> StateWatcher<S> {
        self.emitter.state.watch()
    }

    /// Current screen state.
    #[must_use]
    pub fn current_state(&self) -> S {
        self.emitter.state.current()
    }

    /// Observer handle for the screen's actions.
    #[must_use]
    pub fn actions(&self) -> Actions<A> {
        self.actions.clone()
    }

    /// A writer for a command task.
    #[must_use]
    pub fn emitter(&self) -> Emitter<S, A> {
        self.emitter.clone()
    }

    /// Runs a command in the screen's scope. A command issued after close is
    /// logged and dropped.
    pub fn launch<F, R>(&self, command: &'static str, task: F, recover: R)
    where
        F: Future<Output = ()> + Send + 'static,
        R: FnOnce() + Send + 'static,
    {
        if let Err(e) = self.scope.spawn(command, task, recover) {
            tracing::warn!(error = %e, "command ignored");
        }
    }

    /// Closes the screen, cancelling its in-flight commands.
    pub fn close(&self) {
        self.scope.close();
    }

    /// Returns `true` once the screen has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.scope.is_closed()
    }
}

/// Gated writer to a screen's state store and action channel.
#[derive(Debug)]
pub struct Emitter<S, A> {
    state: StateStore<S>,
    actions: ActionSender<A>,
    lifetime: Arc<Lifetime>,
}

impl<S, A> Clone for Emitter<S, A> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            actions: self.actions.clone(),
            lifetime: Arc::clone(&self.lifetime),
        }
    }
}

impl<S, A> Emitter<S, A>
where
    S: Clone + Send + Sync + std::fmt::Debug + 'static,
    A: Send + std::fmt::Debug + 'static,
{
    /// Sets the screen state. Returns `false` if the screen is closed.
    pub fn set_state(&self, state: S) -> bool {
        let screen = self.lifetime.screen();
        self.lifetime
            .gated(|| {
                tracing::debug!(screen, ?state, "state");
                self.state.set(state);
            })
            .is_some()
    }

    /// Emits an action. Returns `false` if the screen is closed.
    pub fn send(&self, action: A) -> bool {
        let screen = self.lifetime.screen();
        self.lifetime
            .gated(|| {
                tracing::debug!(screen, ?action, "action");
                self.actions.send(action)
            })
            .unwrap_or(false)
    }
}
