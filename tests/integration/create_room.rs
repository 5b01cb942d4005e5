//! Integration tests for the room creation screen.
//!
//! Drives `CreateRoomController` against the in-memory backend: form
//! rejections, the success path, both failure classes, the date field and
//! action delivery to competing observers.
//!
//! Verification command: `cargo test --test create_room`

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::runtime::Handle;

use santa::room::{CreateRoomAction, CreateRoomController, CreateRoomState};
use santa::text::{StringKey, UiText};
use santa::usecase::memory::{MemoryBackend, Operation};
use santa_proto::{DomainError, DomainErrorKind, ErrorInfo};

// =============================================================================
// Helpers
// =============================================================================

const TIMEOUT: Duration = Duration::from_secs(5);

fn open(backend: MemoryBackend) -> (CreateRoomController<MemoryBackend>, Arc<MemoryBackend>) {
    let backend = Arc::new(backend);
    let controller = CreateRoomController::new(Arc::clone(&backend), Handle::current());
    (controller, backend)
}

/// Submits a form that fails validation and returns the action it produced
/// once the screen is back to `Idle`.
async fn rejected(
    name: &str,
    password: Option<&str>,
    max_price: Option<&str>,
) -> CreateRoomAction {
    let (controller, backend) = open(MemoryBackend::new("u-1", "Nick"));
    let actions = controller.actions();

    controller.create_room(name, password, None, max_price);

    let action = tokio::time::timeout(TIMEOUT, actions.next())
        .await
        .unwrap()
        .unwrap();
    let mut state = controller.state();
    tokio::time::timeout(TIMEOUT, state.wait_for(|s| *s == CreateRoomState::Idle))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(backend.calls(Operation::CreateRoom), 0, "no call for a bad form");
    assert_eq!(actions.try_next(), None, "one action per command");
    action
}

fn show_error(key: StringKey) -> CreateRoomAction {
    CreateRoomAction::ShowError(UiText::Resource(key))
}

// =============================================================================
// Form rejections
// =============================================================================

#[tokio::test]
async fn empty_name_is_rejected() {
    assert_eq!(
        rejected("", None, None).await,
        show_error(StringKey::RoomNameEmpty)
    );
}

#[tokio::test]
async fn name_over_twenty_chars_is_rejected() {
    assert_eq!(
        rejected(&"A".repeat(21), None, None).await,
        show_error(StringKey::RoomNameTooLong)
    );
}

#[tokio::test]
async fn non_numeric_price_is_rejected() {
    assert_eq!(
        rejected("Valid", None, Some("abc")).await,
        show_error(StringKey::WrongMaxPrice)
    );
}

#[tokio::test]
async fn price_over_limit_is_rejected() {
    assert_eq!(
        rejected("Valid", None, Some("2000000")).await,
        show_error(StringKey::MaxPriceTooHigh)
    );
}

#[tokio::test]
async fn short_password_is_rejected() {
    assert_eq!(
        rejected("Valid", Some("short1"), None).await,
        show_error(StringKey::PasswordTooShort)
    );
}

#[tokio::test]
async fn blank_name_wins_over_bad_password() {
    assert_eq!(
        rejected("   ", Some("x"), Some("-5")).await,
        show_error(StringKey::RoomNameEmpty)
    );
}

// =============================================================================
// Use-case outcomes
// =============================================================================

#[tokio::test]
async fn valid_form_goes_idle_loading_loaded_with_one_success() {
    let (controller, backend) = open(MemoryBackend::new("u-1", "Nick").held());
    let actions = controller.actions();
    let mut state = controller.state();
    assert_eq!(state.current(), CreateRoomState::Idle);

    controller.create_room("Valid", Some("longenoughpass1"), None, Some("100"));

    let loading = tokio::time::timeout(TIMEOUT, state.changed()).await.unwrap();
    assert_eq!(loading, Some(CreateRoomState::Loading));
    assert_eq!(actions.try_next(), None);

    backend.release(1);
    let Some(CreateRoomState::Loaded(room)) =
        tokio::time::timeout(TIMEOUT, state.changed()).await.unwrap()
    else {
        panic!("expected the created room");
    };
    assert_eq!(room.name, "Valid");
    assert_eq!(room.max_price, Some(100));
    assert_eq!(room.owner_id, "u-1");

    assert_eq!(
        tokio::time::timeout(TIMEOUT, actions.next()).await.unwrap(),
        Some(CreateRoomAction::ShowSuccess)
    );
    tokio::task::yield_now().await;
    assert_eq!(actions.try_next(), None);
    assert_eq!(backend.calls(Operation::CreateRoom), 1);
}

#[tokio::test]
async fn structured_failure_is_shown_inline() {
    let (controller, backend) = open(MemoryBackend::new("u-1", "Nick"));
    let actions = controller.actions();
    let mut state = controller.state();

    controller.create_room("Office", None, None, None);
    tokio::time::timeout(TIMEOUT, state.wait_for(|s| matches!(s, CreateRoomState::Loaded(_))))
        .await
        .unwrap();
    let _ = actions.next().await;

    // Same name again: the backend refuses it.
    controller.create_room("Office", None, None, None);
    let refused = tokio::time::timeout(
        TIMEOUT,
        state.wait_for(|s| matches!(s, CreateRoomState::Error(_))),
    )
    .await
    .unwrap();

    assert_eq!(
        refused,
        Some(CreateRoomState::Error(DomainError::new(
            DomainErrorKind::RoomAlreadyExists
        )))
    );
    assert_eq!(actions.try_next(), None);
    assert_eq!(backend.calls(Operation::CreateRoom), 2);
}

#[tokio::test]
async fn unclassified_failure_returns_to_idle_with_opaque_name() {
    let (controller, backend) = open(MemoryBackend::new("u-1", "Nick"));
    backend.fail_next(
        Operation::CreateRoom,
        ErrorInfo::unclassified("SocketTimeoutException"),
    );
    let actions = controller.actions();

    controller.create_room("Office", None, None, None);

    assert_eq!(
        tokio::time::timeout(TIMEOUT, actions.next()).await.unwrap(),
        Some(CreateRoomAction::ShowError(UiText::Plain(
            "SocketTimeoutException".to_string()
        )))
    );
    assert_eq!(controller.current_state(), CreateRoomState::Idle);
    assert!(backend.rooms().is_empty());
}

#[tokio::test]
async fn controller_is_reusable_after_a_rejection() {
    let (controller, backend) = open(MemoryBackend::new("u-1", "Nick"));
    let actions = controller.actions();
    let mut state = controller.state();

    controller.create_room("", None, None, None);
    assert_eq!(
        actions.next().await,
        Some(show_error(StringKey::RoomNameEmpty))
    );

    let date = NaiveDate::from_ymd_opt(2026, 12, 24);
    controller.create_room("Office", None, date, None);
    let Some(CreateRoomState::Loaded(room)) = tokio::time::timeout(
        TIMEOUT,
        state.wait_for(|s| matches!(s, CreateRoomState::Loaded(_))),
    )
    .await
    .unwrap() else {
        panic!("expected the created room");
    };
    assert_eq!(room.date, date);
    assert_eq!(backend.rooms().len(), 1);
}

// =============================================================================
// Date field
// =============================================================================

#[tokio::test]
async fn clearing_date_twice_keeps_it_empty() {
    let (controller, _) = open(MemoryBackend::new("u-1", "Nick"));
    let mut dates = controller.date();

    controller.set_date(NaiveDate::from_ymd_opt(2026, 12, 24));
    assert_eq!(
        dates.changed().await,
        Some(NaiveDate::from_ymd_opt(2026, 12, 24))
    );

    controller.clear_date();
    assert_eq!(controller.current_date(), None);
    controller.clear_date();
    assert_eq!(controller.current_date(), None);
    assert_eq!(controller.current_state(), CreateRoomState::Idle);
}

// =============================================================================
// Action delivery
// =============================================================================

#[tokio::test]
async fn competing_observers_never_share_an_action() {
    const COMMANDS: usize = 8;

    let (controller, _) = open(MemoryBackend::new("u-1", "Nick"));
    let first = controller.actions();
    let second = controller.actions();

    let collect = |actions: santa::screen::Actions<CreateRoomAction>| {
        tokio::spawn(async move {
            let mut taken = 0;
            while tokio::time::timeout(Duration::from_millis(200), actions.next())
                .await
                .ok()
                .flatten()
                .is_some()
            {
                taken += 1;
            }
            taken
        })
    };
    let first = collect(first);
    let second = collect(second);

    for _ in 0..COMMANDS {
        controller.create_room("", None, None, None);
    }

    let total = first.await.unwrap() + second.await.unwrap();
    assert_eq!(total, COMMANDS);
    assert_eq!(controller.actions().try_next(), None);
}

#[tokio::test]
async fn late_observer_gets_only_undelivered_actions() {
    let (controller, _) = open(MemoryBackend::new("u-1", "Nick"));
    let early = controller.actions();

    controller.create_room("", None, None, None);
    assert_eq!(
        tokio::time::timeout(TIMEOUT, early.next()).await.unwrap(),
        Some(show_error(StringKey::RoomNameEmpty))
    );
    drop(early);

    controller.create_room(&"A".repeat(21), None, None, None);
    let late = controller.actions();
    assert_eq!(
        tokio::time::timeout(TIMEOUT, late.next()).await.unwrap(),
        Some(show_error(StringKey::RoomNameTooLong))
    );
}
