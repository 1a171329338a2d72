use serde::{Deserialize, Serialize};

/// Platform or per-account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Read-only visitor, no space of their own.
    Guest,
    /// Regular member.
    User,
    /// Administrator (platform-wide or within an account).
    Admin,
}

impl Role {
    /// Whether this role carries administrative rights.
    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// User or account lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Created but not yet activated.
    Pending,
    /// Active.
    Active,
    /// Deactivated.
    Inactive,
}

/// Access mode attached to a tenant membership.
///
/// This is the 4-valued policy stored on the membership edge; it collapses
/// into the 3-valued [`Permission`] when the resolver evaluates a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// No access.
    NotAllowed,
    /// Read-only access.
    ReadOnly,
    /// Full read-write access.
    ReadWrite,
    /// Append-only access (write without overwrite at the application layer).
    AppendOnly,
}

/// Effective permission for a (virtual path, claims) pair.
///
/// Ordered: `NotAllowed < ReadOnly < ReadWrite`, so `>=` expresses
/// "at least" checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Access denied.
    NotAllowed,
    /// Read access only; write methods are rejected.
    ReadOnly,
    /// Full access.
    ReadWrite,
}

impl Permission {
    /// Whether any access at all is granted.
    #[must_use]
    pub fn is_allowed(self) -> bool {
        self != Self::NotAllowed
    }

    /// Whether write methods are permitted.
    #[must_use]
    pub fn allows_write(self) -> bool {
        self == Self::ReadWrite
    }
}

impl From<AccessMode> for Permission {
    /// Collapse a membership access mode into an effective permission.
    ///
    /// `AppendOnly` maps to `ReadWrite`: the 3-valued permission cannot
    /// express append, and the method gate has no way to tell an appending
    /// PUT from an overwriting one.
    fn from(mode: AccessMode) -> Self {
        match mode {
            AccessMode::NotAllowed => Self::NotAllowed,
            AccessMode::ReadOnly => Self::ReadOnly,
            AccessMode::ReadWrite | AccessMode::AppendOnly => Self::ReadWrite,
        }
    }
}
