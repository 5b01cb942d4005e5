//! Profile screen.
//!
//! Loads the signed-in user's name as soon as the screen opens and offers
//! logout, account deletion and a jump to the edit screen.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;

use santa_proto::Outcome;

use crate::config::ScreenConfig;
use crate::screen::{Actions, Screen, StateWatcher};
use crate::usecase::UsersUseCases;

/// State of the profile screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileState {
    /// The user's name is being fetched.
    Loading,
    /// The user's name is known.
    Loaded(String),
}

/// One-shot directives for the profile screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileAction {
    /// Leave for the login screen.
    NavigateToLoginScreen,
    /// Show a generic error message.
    ShowError,
    /// Open the profile edit screen.
    NavigateToEditProfile,
}

/// Controller of the profile screen.
#[derive(Debug)]
pub struct ProfileController<U> {
    use_cases: Arc<U>,
    screen: Screen<ProfileState, ProfileAction>,
    /// Last successfully loaded name.
    username: Arc<Mutex<Option<String>>>,
}

impl<U: UsersUseCases> ProfileController<U> {
    /// Opens the screen and starts loading the user's name.
    pub fn new(use_cases: Arc<U>, runtime: Handle) -> Self {
        Self::with_config(use_cases, runtime, &ScreenConfig::default())
    }

    /// Opens the screen with explicit settings and starts loading the
    /// user's name.
    pub fn with_config(use_cases: Arc<U>, runtime: Handle, config: &ScreenConfig) -> Self {
        let controller = Self {
            use_cases,
            screen: Screen::new("profile", ProfileState::Loading, runtime, config),
            username: Arc::new(Mutex::new(None)),
        };
        controller.update_username();
        controller
    }

    /// Watches the screen state.
    #[must_use]
    pub fn state(&self) -> StateWatcher<ProfileState> {
        self.screen.state()
    }

    /// Current screen state.
    #[must_use]
    pub fn current_state(&self) -> ProfileState {
        self.screen.current_state()
    }

    /// Observer handle for the screen's actions.
    #[must_use]
    pub fn actions(&self) -> Actions<ProfileAction> {
        self.screen.actions()
    }

    /// Reloads the user's name.
    ///
    /// On failure only [`ProfileAction::ShowError`] is emitted and the state
    /// stays [`ProfileState::Loading`].
    pub fn update_username(&self) {
        let emitter = self.screen.emitter();
        let recovery = self.screen.emitter();
        let use_cases = Arc::clone(&self.use_cases);
        let username = Arc::clone(&self.username);
        let last_known = Arc::clone(&self.username);

        let task = async move {
            emitter.set_state(ProfileState::Loading);
            match use_cases.get_self_info().await {
                Outcome::Success(user) => {
                    *username.lock() = Some(user.username.clone());
                    emitter.set_state(ProfileState::Loaded(user.username));
                }
                Outcome::Failure(error) => {
                    tracing::warn!(%error, "could not load profile");
                    emitter.send(ProfileAction::ShowError);
                }
            }
        };

        self.screen.launch("update_username", task, move || {
            let name = last_known.lock().clone();
            if let Some(name) = name {
                recovery.set_state(ProfileState::Loaded(name));
            }
            recovery.send(ProfileAction::ShowError);
        });
    }

    /// Signs out: navigates to the login screen.
    pub fn logout(&self) {
        self.screen.emitter().send(ProfileAction::NavigateToLoginScreen);
    }

    /// Deletes the account, then navigates to the login screen whether or
    /// not the deletion succeeded.
    pub fn delete_account(&self) {
        let emitter = self.screen.emitter();
        let recovery = self.screen.emitter();
        let use_cases = Arc::clone(&self.use_cases);

        let task = async move {
            if let Outcome::Failure(error) = use_cases.delete_user().await {
                tracing::warn!(%error, "account deletion failed, signing out anyway");
            }
            emitter.send(ProfileAction::NavigateToLoginScreen);
        };

        self.screen.launch("delete_account", task, move || {
            recovery.send(ProfileAction::ShowError);
        });
    }

    /// Opens the profile edit screen.
    pub fn edit_username(&self) {
        self.screen.emitter().send(ProfileAction::NavigateToEditProfile);
    }

    /// Closes the screen: in-flight commands are cancelled and will not
    /// touch state or actions any more.
    pub fn close(&self) {
        self.screen.close();
    }
}
