//! User-facing message descriptors.
//!
//! Controllers never produce display strings themselves: they name a string
//! resource by [`StringKey`] and the UI resolves it in the current locale.
//! [`UiText::Plain`] carries text that needs no translation.

use std::fmt;

/// String resources referenced by the screen controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKey {
    RoomNameEmpty,
    RoomNameTooLong,
    WrongMaxPrice,
    MaxPriceTooHigh,
    PasswordTooLong,
    InvalidPasswordFormat,
    PasswordTooShort,
    UnexpectedError,
}

impl StringKey {
    /// Resource name as it appears in the localization tables.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::RoomNameEmpty => "room_name_empty_error",
            Self::RoomNameTooLong => "room_length_too_high",
            Self::WrongMaxPrice => "wrong_max_price",
            Self::MaxPriceTooHigh => "max_price_too_high_error",
            Self::PasswordTooLong => "password_length_too_high_error",
            Self::InvalidPasswordFormat => "invalid_password_format",
            Self::PasswordTooShort => "password_too_short",
            Self::UnexpectedError => "unexpected_error",
        }
    }
}

/// Text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiText {
    /// A localized string resource.
    Resource(StringKey),
    /// Literal text.
    Plain(String),
}

impl From<StringKey> for UiText {
    fn from(key: StringKey) -> Self {
        Self::Resource(key)
    }
}

impl fmt::Display for UiText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource(key) => write!(f, "@string/{}", key.key()),
            Self::Plain(text) => f.write_str(text),
        }
    }
}
