//! Agent permission grants.

use serde::{Deserialize, Serialize};

/// The four operations a session-scoped endpoint can grant to an agent,
/// encoded the way `spec.md` §3 specifies: a short permission string whose
/// characters are drawn from `c`/`r`/`u`/`d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PermissionSet {
    /// May create new messages, entities, and facts.
    pub create: bool,
    /// May read session history and graph content.
    pub read: bool,
    /// May update existing facts during conflict resolution.
    pub update: bool,
    /// May delete sessions, messages, or facts.
    pub delete: bool,
}

impl PermissionSet {
    /// Grants every operation.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            create: true,
            read: true,
            update: true,
            delete: true,
        }
    }

    /// Grants read-only access.
    #[must_use]
    pub const fn read_only() -> Self {
        Self {
            create: false,
            read: true,
            update: false,
            delete: false,
        }
    }

    /// Returns the canonical permission string, e.g. `"cru"`.
    #[must_use]
    pub fn as_str(&self) -> String {
        let mut out = String::with_capacity(4);
        if self.create {
            out.push('c');
        }
        if self.read {
            out.push('r');
        }
        if self.update {
            out.push('u');
        }
        if self.delete {
            out.push('d');
        }
        out
    }
}

impl TryFrom<&str> for PermissionSet {
    type Error = ParsePermissionError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut permissions = Self::default();
        for ch in s.chars() {
            match ch {
                'c' => permissions.create = true,
                'r' => permissions.read = true,
                'u' => permissions.update = true,
                'd' => permissions.delete = true,
                other => return Err(ParsePermissionError(other)),
            }
        }
        Ok(permissions)
    }
}

/// Error returned when a permission string contains an unrecognised character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsePermissionError(char);

impl std::fmt::Display for ParsePermissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid permission character: '{}'", self.0)
    }
}

impl std::error::Error for ParsePermissionError {}
