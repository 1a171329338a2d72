use serde::{Deserialize, Serialize};

use crate::id::{AccountId, UserId};
use crate::permission::{AccessMode, Role};

/// Request-scoped claims decoded from a verified bearer token.
///
/// Constructed once per request by the external token collaborator,
/// immutable afterwards. The gateway never inspects the token itself;
/// it trusts these fields and fails closed on anything they do not prove.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user.
    #[serde(rename = "userID")]
    pub user_id: UserId,
    /// Selected account, or [`AccountId::NONE`] when the token was issued
    /// without an account context.
    #[serde(rename = "accountID")]
    pub account_id: AccountId,
    /// Username (display only, never used for resolution).
    pub username: String,
    /// Account name (display only).
    #[serde(rename = "accountName")]
    pub account_name: String,
    /// Role within the selected account.
    #[serde(rename = "roleAccount")]
    pub role_account: Role,
    /// Platform-wide role.
    #[serde(rename = "rolePlatform")]
    pub role_platform: Role,
    /// Access mode granted on the selected account's space.
    #[serde(rename = "accessMode")]
    pub account_access_mode: AccessMode,
    /// Access mode granted on the public space.
    #[serde(rename = "publicAccessMode")]
    pub public_access_mode: AccessMode,
}

impl Claims {
    /// Claims for a regular user with no account selected and read-only
    /// public access. Useful as a test fixture base.
    #[must_use]
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            account_id: AccountId::NONE,
            username: String::new(),
            account_name: String::new(),
            role_account: Role::User,
            role_platform: Role::User,
            account_access_mode: AccessMode::NotAllowed,
            public_access_mode: AccessMode::ReadOnly,
        }
    }

    /// Whether the token carries a platform-admin role.
    #[must_use]
    pub fn is_platform_admin(&self) -> bool {
        self.role_platform.is_admin()
    }
}
