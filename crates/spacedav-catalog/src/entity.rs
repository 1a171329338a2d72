use serde::{Deserialize, Serialize};
use spacedav_core::{AccessMode, AccountId, DatasetId, Role, Status, UserId};

/// A platform user.
///
/// `space` is the user's root directory name under the configured user
/// prefix. It is unique, non-empty once created, and never changes after
/// assignment; relocation only ever moves dataset content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Row id.
    pub id: UserId,
    /// Login name, unique.
    pub name: String,
    /// Display name.
    pub nickname: String,
    /// Platform-wide role.
    pub role: Role,
    /// Lifecycle status.
    pub status: Status,
    /// Path segment of the user's space, unique.
    pub space: String,
}

/// An account (historically a scheduling queue). Every non-default account
/// is also a tenant root; the default account backs the public namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Row id.
    pub id: AccountId,
    /// Account name, unique.
    pub name: String,
    /// Display name.
    pub nickname: String,
    /// Path segment of the account's space, unique.
    pub space: String,
}

/// Membership edge between a user and an account.
///
/// Consulted at token issuance: the verifier snapshots `role` and
/// `access_mode` into the request claims, so the gateway itself never
/// queries this row per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Member.
    pub user_id: UserId,
    /// Account.
    pub account_id: AccountId,
    /// Role within the account.
    pub role: Role,
    /// Access mode over the account's space.
    pub access_mode: AccessMode,
}

/// Whether a dataset row holds a dataset or a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// Training/input data.
    Dataset,
    /// Model artifacts.
    Model,
}

/// A dataset or model registered on the platform.
///
/// `url` is the current real-path location and is the one mutable field the
/// gateway writes (as the terminal step of a relocation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Row id.
    pub id: DatasetId,
    /// Dataset name.
    pub name: String,
    /// Current real filesystem location.
    pub url: String,
    /// Dataset or model.
    pub data_type: DataType,
    /// Owning user.
    pub user_id: UserId,
}

/// Sharing edge granting a user read access to a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserDataset {
    /// Grantee.
    pub user_id: UserId,
    /// Shared dataset.
    pub dataset_id: DatasetId,
}

/// Sharing edge granting an account's members read access to a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountDataset {
    /// Grantee account.
    pub account_id: AccountId,
    /// Shared dataset.
    pub dataset_id: DatasetId,
}
