//! The role of the speaker that produced a message.
//!
//! A message's role is both a structural marker (system prompts are
//! typically excluded from some summarisation passes, tool results are
//! excluded from others) and the categorical `role_type` read back by
//! downstream consumers of session history.

use serde::{Deserialize, Serialize};

/// The role of a message's author.
///
/// # Examples
///
/// ```
/// use eion::message::domain::Role;
///
/// assert_eq!(Role::User.as_str(), "user");
/// assert_eq!(Role::try_from("assistant"), Ok(Role::Assistant));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// No role has been assigned yet.
    #[serde(rename = "norole")]
    NoRole,

    /// A system prompt or instruction.
    System,

    /// A response produced by an assistant agent.
    Assistant,

    /// Input supplied by the end user.
    User,

    /// The declared intent of a function call, distinct from its result.
    Function,

    /// The result of a tool invocation.
    Tool,
}

impl Role {
    /// Returns the role as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoRole => "norole",
            Self::System => "system",
            Self::Assistant => "assistant",
            Self::User => "user",
            Self::Function => "function",
            Self::Tool => "tool",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an invalid role string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError(String);

impl std::fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid role: '{}'", self.0)
    }
}

impl std::error::Error for ParseRoleError {}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "norole" => Ok(Self::NoRole),
            "system" => Ok(Self::System),
            "assistant" => Ok(Self::Assistant),
            "user" => Ok(Self::User),
            "function" => Ok(Self::Function),
            "tool" => Ok(Self::Tool),
            _ => Err(ParseRoleError(s.to_owned())),
        }
    }
}
