//! Room creation screen.
//!
//! [`CreateRoomController`] turns the raw form into a validated request,
//! calls [`RoomsUseCases::create_room`] once per valid submission and
//! reports the result through its state and actions.

pub mod form;

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::runtime::Handle;

use santa_proto::room::RoomInfo;
use santa_proto::{DomainError, ErrorInfo, Outcome};

use crate::config::ScreenConfig;
use crate::screen::{Actions, Screen, StateStore, StateWatcher};
use crate::text::{StringKey, UiText};
use crate::usecase::RoomsUseCases;

pub use form::{RoomFormError, validate_room_form};

/// State of the room creation screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateRoomState {
    /// Waiting for the form to be submitted.
    Idle,
    /// A submission is being processed.
    Loading,
    /// The room was created.
    Loaded(RoomInfo),
    /// The service rejected the room; rendered inline.
    Error(DomainError),
}

/// One-shot directives for the room creation screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateRoomAction {
    /// Show a transient error message.
    ShowError(UiText),
    /// Tell the user the room was created.
    ShowSuccess,
}

/// Controller of the room creation screen.
#[derive(Debug)]
pub struct CreateRoomController<U> {
    use_cases: Arc<U>,
    screen: Screen<CreateRoomState, CreateRoomAction>,
    date: StateStore<Option<NaiveDate>>,
}

impl<U: RoomsUseCases> CreateRoomController<U> {
    /// Opens the screen with default settings; commands run on `runtime`.
    pub fn new(use_cases: Arc<U>, runtime: Handle) -> Self {
        Self::with_config(use_cases, runtime, &ScreenConfig::default())
    }

    /// Opens the screen with explicit settings.
    pub fn with_config(use_cases: Arc<U>, runtime: Handle, config: &ScreenConfig) -> Self {
        Self {
            use_cases,
            screen: Screen::new("create_room", CreateRoomState::Idle, runtime, config),
            date: StateStore::new(None),
        }
    }

    /// Watches the screen state.
    #[must_use]
    pub fn state(&self) -> StateWatcher<CreateRoomState> {
        self.screen.state()
    }

    /// Current screen state.
    #[must_use]
    pub fn current_state(&self) -> CreateRoomState {
        self.screen.current_state()
    }

    /// Observer handle for the screen's actions.
    #[must_use]
    pub fn actions(&self) -> Actions<CreateRoomAction> {
        self.screen.actions()
    }

    /// Watches the selected gift exchange date.
    #[must_use]
    pub fn date(&self) -> StateWatcher<Option<NaiveDate>> {
        self.date.watch()
    }

    /// Currently selected gift exchange date.
    #[must_use]
    pub fn current_date(&self) -> Option<NaiveDate> {
        self.date.current()
    }

    /// Selects a gift exchange date. Does not touch the screen state.
    pub fn set_date(&self, date: Option<NaiveDate>) {
        self.date.set(date);
    }

    /// Clears the selected date. Does not touch the screen state.
    pub fn clear_date(&self) {
        self.date.set(None);
    }

    /// Submits the room form.
    ///
    /// Returns immediately; the outcome shows up as state and actions.
    pub fn create_room(
        &self,
        name: &str,
        password: Option<&str>,
        date: Option<NaiveDate>,
        max_price: Option<&str>,
    ) {
        let emitter = self.screen.emitter();
        let recovery = self.screen.emitter();
        let use_cases = Arc::clone(&self.use_cases);
        let name = name.to_string();
        let password = password.map(str::to_string);
        let max_price = max_price.map(str::to_string);

        let task = async move {
            emitter.set_state(CreateRoomState::Loading);

            let request =
                match validate_room_form(&name, password.as_deref(), date, max_price.as_deref()) {
                    Ok(request) => request,
                    Err(e) => {
                        tracing::debug!(error = %e, "room form rejected");
                        emitter.send(CreateRoomAction::ShowError(e.string_key().into()));
                        emitter.set_state(CreateRoomState::Idle);
                        return;
                    }
                };

            match use_cases.create_room(request).await {
                Outcome::Success(room) => {
                    emitter.set_state(CreateRoomState::Loaded(room));
                    emitter.send(CreateRoomAction::ShowSuccess);
                }
                Outcome::Failure(ErrorInfo::Domain(error)) => {
                    tracing::warn!(%error, "room creation refused");
                    emitter.set_state(CreateRoomState::Error(error));
                }
                Outcome::Failure(ErrorInfo::Unclassified { name }) => {
                    tracing::warn!(error = %name, "room creation failed");
                    emitter.set_state(CreateRoomState::Idle);
                    emitter.send(CreateRoomAction::ShowError(UiText::Plain(name)));
                }
            }
        };

        self.screen.launch("create_room", task, move || {
            recovery.set_state(CreateRoomState::Idle);
            recovery.send(CreateRoomAction::ShowError(StringKey::UnexpectedError.into()));
        });
    }

    /// Closes the screen: in-flight submissions are cancelled and will not
    /// touch state or actions any more.
    pub fn close(&self) {
        self.screen.close();
    }
}
