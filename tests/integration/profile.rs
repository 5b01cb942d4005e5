//! Integration tests for the profile screen.
//!
//! Covers loading the name on open, refreshing it, the navigation buttons
//! and account deletion against the in-memory backend.
//!
//! Verification command: `cargo test --test profile`

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use santa::profile::{ProfileAction, ProfileController, ProfileState};
use santa::usecase::memory::{MemoryBackend, Operation};
use santa_proto::{DomainError, DomainErrorKind, ErrorInfo};

const TIMEOUT: Duration = Duration::from_secs(5);

fn open(backend: &Arc<MemoryBackend>) -> ProfileController<MemoryBackend> {
    ProfileController::new(Arc::clone(backend), Handle::current())
}

async fn loaded(controller: &ProfileController<MemoryBackend>) -> String {
    let mut state = controller.state();
    match tokio::time::timeout(
        TIMEOUT,
        state.wait_for(|s| matches!(s, ProfileState::Loaded(_))),
    )
    .await
    .unwrap()
    {
        Some(ProfileState::Loaded(name)) => name,
        other => panic!("expected a loaded name, got {other:?}"),
    }
}

#[tokio::test]
async fn opening_the_screen_loads_the_name() {
    let backend = Arc::new(MemoryBackend::new("u-1", "Nick").held());
    let controller = open(&backend);

    assert_eq!(controller.current_state(), ProfileState::Loading);
    backend.release(1);
    assert_eq!(loaded(&controller).await, "Nick");
    assert_eq!(controller.actions().try_next(), None);
}

#[tokio::test]
async fn refresh_picks_up_a_new_name() {
    let backend = Arc::new(MemoryBackend::new("u-1", "Nick"));
    let controller = open(&backend);
    assert_eq!(loaded(&controller).await, "Nick");

    backend.rename_user("Saint Nick");
    let mut state = controller.state();
    controller.update_username();

    let renamed = tokio::time::timeout(
        TIMEOUT,
        state.wait_for(|s| *s == ProfileState::Loaded("Saint Nick".to_string())),
    )
    .await
    .unwrap();
    assert!(renamed.is_some());
    assert_eq!(backend.calls(Operation::GetSelfInfo), 2);
}

#[tokio::test]
async fn failed_load_emits_error_and_stays_loading() {
    let backend = Arc::new(MemoryBackend::new("u-1", "Nick"));
    backend.fail_next(
        Operation::GetSelfInfo,
        ErrorInfo::Domain(DomainError::new(DomainErrorKind::Unauthorized)),
    );
    let controller = open(&backend);

    assert_eq!(
        tokio::time::timeout(TIMEOUT, controller.actions().next())
            .await
            .unwrap(),
        Some(ProfileAction::ShowError)
    );
    assert_eq!(controller.current_state(), ProfileState::Loading);

    // A later refresh recovers.
    controller.update_username();
    assert_eq!(loaded(&controller).await, "Nick");
}

#[tokio::test]
async fn buttons_navigate_without_touching_state() {
    let backend = Arc::new(MemoryBackend::new("u-1", "Nick"));
    let controller = open(&backend);
    assert_eq!(loaded(&controller).await, "Nick");
    let actions = controller.actions();

    controller.edit_username();
    controller.logout();

    assert_eq!(actions.try_next(), Some(ProfileAction::NavigateToEditProfile));
    assert_eq!(actions.try_next(), Some(ProfileAction::NavigateToLoginScreen));
    assert_eq!(actions.try_next(), None);
    assert_eq!(
        controller.current_state(),
        ProfileState::Loaded("Nick".to_string())
    );
}

#[tokio::test]
async fn delete_waits_for_the_backend_before_navigating() {
    let backend = Arc::new(MemoryBackend::new("u-1", "Nick").held());
    let controller = open(&backend);
    backend.release(1);
    assert_eq!(loaded(&controller).await, "Nick");
    let actions = controller.actions();

    controller.delete_account();
    while backend.in_flight() == 0 {
        tokio::task::yield_now().await;
    }
    assert_eq!(actions.try_next(), None);

    backend.release(1);
    assert_eq!(
        tokio::time::timeout(TIMEOUT, actions.next()).await.unwrap(),
        Some(ProfileAction::NavigateToLoginScreen)
    );
    assert_eq!(backend.calls(Operation::DeleteUser), 1);
}

#[tokio::test]
async fn delete_navigates_even_when_the_backend_refuses() {
    let backend = Arc::new(MemoryBackend::new("u-1", "Nick"));
    let controller = open(&backend);
    assert_eq!(loaded(&controller).await, "Nick");
    backend.fail_next(
        Operation::DeleteUser,
        ErrorInfo::Domain(DomainError::new(DomainErrorKind::Forbidden)),
    );

    controller.delete_account();

    assert_eq!(
        tokio::time::timeout(TIMEOUT, controller.actions().next())
            .await
            .unwrap(),
        Some(ProfileAction::NavigateToLoginScreen)
    );
    assert_eq!(controller.actions().try_next(), None);
}
