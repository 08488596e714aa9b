//! Shared lifecycle status for directory entities.

use serde::{Deserialize, Serialize};

/// Lifecycle status shared by agents and users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryStatus {
    /// The entity may read and write session data.
    Active,
    /// The entity is suspended and every session-scoped call is rejected.
    Inactive,
}

impl DirectoryStatus {
    /// Returns the status as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for DirectoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an invalid directory status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectoryStatusError(String);

impl std::fmt::Display for ParseDirectoryStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid directory status: '{}'", self.0)
    }
}

impl std::error::Error for ParseDirectoryStatusError {}

impl TryFrom<&str> for DirectoryStatus {
    type Error = ParseDirectoryStatusError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(ParseDirectoryStatusError(s.to_owned())),
        }
    }
}
