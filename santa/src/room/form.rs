//! Validation of the raw room creation form.
//!
//! Checks run in a fixed order and the first failure is reported alone:
//! name, then max price, then password.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use santa_proto::room::{
    MAX_GIFT_PRICE, MAX_PASSWORD_LEN, MAX_ROOM_NAME_LEN, MIN_PASSWORD_LEN, RoomCreateRequest,
};

use crate::text::StringKey;

#[allow(clippy::expect_used)]
static PASSWORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("password pattern is valid"));

/// First rule the room form violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RoomFormError {
    /// Room name is empty or whitespace.
    #[error("room name is empty")]
    EmptyName,
    /// Room name exceeds the maximum length.
    #[error("room name longer than {} characters", MAX_ROOM_NAME_LEN)]
    NameTooLong,
    /// Max price is not a whole number, or is negative.
    #[error("max price is not a valid amount")]
    InvalidPrice,
    /// Max price exceeds the service limit.
    #[error("max price above {}", MAX_GIFT_PRICE)]
    PriceTooHigh,
    /// Password exceeds the maximum length.
    #[error("password longer than {} characters", MAX_PASSWORD_LEN)]
    PasswordTooLong,
    /// Password contains characters outside `[A-Za-z0-9_]`.
    #[error("password has invalid characters")]
    InvalidPasswordFormat,
    /// Password is shorter than the minimum length.
    #[error("password shorter than {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,
}

impl RoomFormError {
    /// String resource describing this error to the user.
    #[must_use]
    pub const fn string_key(self) -> StringKey {
        match self {
            Self::EmptyName => StringKey::RoomNameEmpty,
            Self::NameTooLong => StringKey::RoomNameTooLong,
            Self::InvalidPrice => StringKey::WrongMaxPrice,
            Self::PriceTooHigh => StringKey::MaxPriceTooHigh,
            Self::PasswordTooLong => StringKey::PasswordTooLong,
            Self::InvalidPasswordFormat => StringKey::InvalidPasswordFormat,
            Self::PasswordTooShort => StringKey::PasswordTooShort,
        }
    }
}

/// Validates raw form input into a [`RoomCreateRequest`].
///
/// Blank password and blank or `"0"` max price mean "not set". The name and
/// an accepted password are passed through unchanged.
///
/// # Errors
///
/// Returns the first [`RoomFormError`] in check order.
pub fn validate_room_form(
    name: &str,
    password: Option<&str>,
    date: Option<NaiveDate>,
    max_price: Option<&str>,
) -> Result<RoomCreateRequest, RoomFormError> {
    validate_name(name)?;
    let max_price = parse_max_price(max_price)?;
    let password = validate_password(password)?;

    Ok(RoomCreateRequest {
        name: name.to_string(),
        password,
        date,
        max_price,
    })
}

fn validate_name(name: &str) -> Result<(), RoomFormError> {
    if name.trim().is_empty() {
        return Err(RoomFormError::EmptyName);
    }
    if name.chars().count() > MAX_ROOM_NAME_LEN {
        return Err(RoomFormError::NameTooLong);
    }
    Ok(())
}

fn parse_max_price(raw: Option<&str>) -> Result<Option<i32>, RoomFormError> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty() && *r != "0") else {
        return Ok(None);
    };

    let price: i32 = raw.parse().map_err(|_| RoomFormError::InvalidPrice)?;
    if price > MAX_GIFT_PRICE {
        return Err(RoomFormError::PriceTooHigh);
    }
    if price < 0 {
        return Err(RoomFormError::InvalidPrice);
    }
    Ok(Some(price))
}

fn validate_password(raw: Option<&str>) -> Result<Option<String>, RoomFormError> {
    let Some(password) = raw.filter(|p| !p.trim().is_empty()) else {
        return Ok(None);
    };

    let len = password.chars().count();
    if len > MAX_PASSWORD_LEN {
        return Err(RoomFormError::PasswordTooLong);
    }
    if !PASSWORD_PATTERN.is_match(password) {
        return Err(RoomFormError::InvalidPasswordFormat);
    }
    if len < MIN_PASSWORD_LEN {
        return Err(RoomFormError::PasswordTooShort);
    }
    Ok(Some(password.to_string()))
}
