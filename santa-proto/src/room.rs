//! Room DTOs exchanged with the Secret Santa service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum room name length in characters.
pub const MAX_ROOM_NAME_LEN: usize = 20;

/// Highest accepted gift price limit.
pub const MAX_GIFT_PRICE: i32 = 1_000_000;

/// Minimum room password length in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Maximum room password length in characters.
pub const MAX_PASSWORD_LEN: usize = 20;

/// Validated payload for creating a room.
///
/// Only built by the room form validation pipeline, so every field already
/// satisfies the limits above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCreateRequest {
    /// Display name of the room.
    #[serde(rename = "room_name")]
    pub name: String,
    /// Optional join password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Optional gift exchange date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Optional gift price limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<i32>,
}

/// A room as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfo {
    /// Display name of the room.
    #[serde(rename = "room_name")]
    pub name: String,
    /// Gift exchange date, if set.
    pub date: Option<NaiveDate>,
    /// Identifier of the user who created the room.
    pub owner_id: String,
    /// Gift price limit, if set.
    #[serde(default)]
    pub max_price: Option<i32>,
    /// Whether gifts have already been assigned.
    #[serde(default)]
    pub game_started: bool,
    /// Number of members currently in the room.
    pub members_count: u32,
}

impl RoomInfo {
    /// A freshly created room: only its owner is a member.
    #[must_use]
    pub fn created_from(request: RoomCreateRequest, owner_id: impl Into<String>) -> Self {
        Self {
            name: request.name,
            date: request.date,
            owner_id: owner_id.into(),
            max_price: request.max_price,
            game_started: false,
            members_count: 1,
        }
    }
}
