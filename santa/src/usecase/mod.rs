//! Use-case boundary consumed by the screen controllers.
//!
//! Each use-case performs one business operation against the service and
//! resolves to exactly one [`Outcome`]. Expected failures come back as
//! [`Outcome::Failure`]; implementations never panic on them.
//!
//! Implementations:
//! - [`memory::MemoryBackend`]: in-process backend for tests and the demo CLI

pub mod memory;

use std::future::Future;

use santa_proto::Outcome;
use santa_proto::room::{RoomCreateRequest, RoomInfo};
use santa_proto::user::UserInfo;

/// Room operations.
pub trait RoomsUseCases: Send + Sync + 'static {
    /// Creates a room from an already validated request.
    fn create_room(
        &self,
        request: RoomCreateRequest,
    ) -> impl Future<Output = Outcome<RoomInfo>> + Send;
}

/// Operations on the signed-in user.
pub trait UsersUseCases: Send + Sync + 'static {
    /// Fetches the signed-in user's profile.
    fn get_self_info(&self) -> impl Future<Output = Outcome<UserInfo>> + Send;

    /// Deletes the signed-in user's account.
    fn delete_user(&self) -> impl Future<Output = Outcome<()>> + Send;
}
