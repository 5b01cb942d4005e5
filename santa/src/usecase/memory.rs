//! In-process backend implementing every use-case.
//!
//! Keeps one user and its rooms in memory. Calls can be slowed down with a
//! fixed latency, held until explicitly released, or made to fail with a
//! scripted [`ErrorInfo`], which is what the controller tests and the demo
//! CLI need.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Semaphore;

use santa_proto::room::{RoomCreateRequest, RoomInfo};
use santa_proto::user::UserInfo;
use santa_proto::{DomainErrorKind, ErrorInfo, Outcome};

use super::{RoomsUseCases, UsersUseCases};
use crate::config::BackendConfig;

/// The use-case operations the backend serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// [`RoomsUseCases::create_room`].
    CreateRoom,
    /// [`UsersUseCases::get_self_info`].
    GetSelfInfo,
    /// [`UsersUseCases::delete_user`].
    DeleteUser,
}

/// In-memory Secret Santa backend.
#[derive(Debug)]
pub struct MemoryBackend {
    owner_id: String,
    latency: Duration,
    user: Mutex<Option<UserInfo>>,
    rooms: Mutex<Vec<RoomInfo>>,
    faults: Mutex<HashMap<Operation, VecDeque<ErrorInfo>>>,
    calls: Mutex<HashMap<Operation, usize>>,
    /// When set, every call waits for a permit before completing.
    hold: Option<Semaphore>,
    in_flight: AtomicUsize,
}

impl MemoryBackend {
    /// A backend signed in as `username` with id `owner_id`, answering
    /// immediately.
    pub fn new(owner_id: impl Into<String>, username: impl Into<String>) -> Self {
        let owner_id = owner_id.into();
        Self {
            user: Mutex::new(Some(UserInfo {
                user_id: owner_id.clone(),
                username: username.into(),
            })),
            owner_id,
            latency: Duration::ZERO,
            rooms: Mutex::new(Vec::new()),
            faults: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
            hold: None,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// A backend built from the `[backend]` configuration section.
    #[must_use]
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.owner_id.clone(), config.username.clone()).with_latency(config.latency)
    }

    /// Delays every call by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Makes every call wait until [`release`](Self::release) lets it
    /// through.
    #[must_use]
    pub fn held(mut self) -> Self {
        self.hold = Some(Semaphore::new(0));
        self
    }

    /// Lets `calls` held calls complete. No-op for a backend that is not
    /// [`held`](Self::held).
    pub fn release(&self, calls: usize) {
        if let Some(hold) = &self.hold {
            hold.add_permits(calls);
        }
    }

    /// Makes the next call of `operation` fail with `error`. Failures queue
    /// up in order.
    pub fn fail_next(&self, operation: Operation, error: ErrorInfo) {
        self.faults
            .lock()
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// How many times `operation` has been called.
    #[must_use]
    pub fn calls(&self, operation: Operation) -> usize {
        self.calls.lock().get(&operation).copied().unwrap_or(0)
    }

    /// Calls that have started but not yet completed.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Rooms created so far.
    #[must_use]
    pub fn rooms(&self) -> Vec<RoomInfo> {
        self.rooms.lock().clone()
    }

    /// Replaces the signed-in user's display name.
    pub fn rename_user(&self, username: impl Into<String>) {
        if let Some(user) = self.user.lock().as_mut() {
            user.username = username.into();
        }
    }

    /// Common prologue of every call: count it, wait out latency and hold,
    /// then hand back a scripted failure if one is queued.
    async fn arrive(&self, operation: Operation) -> Option<ErrorInfo> {
        *self.calls.lock().entry(operation).or_default() += 1;
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        let _in_flight = InFlight(&self.in_flight);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some(hold) = &self.hold
            && let Ok(permit) = hold.acquire().await
        {
            permit.forget();
        }

        let fault = self
            .faults
            .lock()
            .get_mut(&operation)
            .and_then(VecDeque::pop_front);
        if let Some(ref error) = fault {
            tracing::debug!(?operation, %error, "scripted failure");
        }
        fault
    }
}

/// Decrements the in-flight counter when a call completes or is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl RoomsUseCases for MemoryBackend {
    async fn create_room(&self, request: RoomCreateRequest) -> Outcome<RoomInfo> {
        if let Some(error) = self.arrive(Operation::CreateRoom).await {
            return Outcome::Failure(error);
        }

        let mut rooms = self.rooms.lock();
        if rooms
            .iter()
            .any(|room| room.owner_id == self.owner_id && room.name == request.name)
        {
            return Outcome::domain(DomainErrorKind::RoomAlreadyExists);
        }
        let room = RoomInfo::created_from(request, self.owner_id.clone());
        rooms.push(room.clone());
        tracing::info!(room = %room.name, "room created");
        Outcome::Success(room)
    }
}

impl UsersUseCases for MemoryBackend {
    async fn get_self_info(&self) -> Outcome<UserInfo> {
        if let Some(error) = self.arrive(Operation::GetSelfInfo).await {
            return Outcome::Failure(error);
        }

        self.user
            .lock()
            .clone()
            .map_or_else(|| Outcome::domain(DomainErrorKind::UserNotFound), Outcome::Success)
    }

    async fn delete_user(&self) -> Outcome<()> {
        if let Some(error) = self.arrive(Operation::DeleteUser).await {
            return Outcome::Failure(error);
        }

        if self.user.lock().take().is_none() {
            return Outcome::domain(DomainErrorKind::UserNotFound);
        }
        self.rooms.lock().retain(|room| room.owner_id != self.owner_id);
        tracing::info!(user = %self.owner_id, "user deleted");
        Outcome::Success(())
    }
}
