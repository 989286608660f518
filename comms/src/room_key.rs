use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of characters in every private room key.
pub const ROOM_KEY_LENGTH: usize = 8;

/// A shareable private room key.
///
/// Keys are case-insensitive; a parsed key is always stored uppercased so it can be
/// compared and forwarded to the server as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomKey(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomKeyError {
    #[error("room key must be {expected} characters long, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

impl RoomKey {
    /// Validates user input and normalizes it into a [RoomKey].
    /// Surrounding whitespace is ignored, the length is checked on the uppercased key.
    pub fn parse(input: &str) -> Result<Self, RoomKeyError> {
        let normalized = input.trim().to_uppercase();
        let actual = normalized.chars().count();

        if actual != ROOM_KEY_LENGTH {
            return Err(RoomKeyError::InvalidLength {
                expected: ROOM_KEY_LENGTH,
                actual,
            });
        }

        Ok(RoomKey(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoomKey {
    type Err = RoomKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomKey::parse(s)
    }
}

impl TryFrom<String> for RoomKey {
    type Error = RoomKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RoomKey::parse(&value)
    }
}

impl From<RoomKey> for String {
    fn from(key: RoomKey) -> Self {
        key.0
    }
}
