//! Namespace catalog seam.
//!
//! The gateway core never talks to the relational store directly; it sees
//! this crate's [`Catalog`] trait. The trait covers exactly the queries the
//! core issues: point lookups by id, the two unbounded scans the provisioner
//! needs, the sharing-edge checks for dataset namespaces, and the single
//! update the relocation coordinator performs (`Dataset.url`).
//!
//! [`MemoryCatalog`] is a complete in-process implementation used by tests
//! and embedding callers; production deployments adapt their own query layer
//! to the trait.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod entity;
mod error;
mod memory;

pub use entity::{Account, AccountDataset, DataType, Dataset, User, UserAccount, UserDataset};
pub use error::{CatalogError, CatalogResult};
pub use memory::MemoryCatalog;

use async_trait::async_trait;
use spacedav_core::{AccountId, DatasetId, UserId};

/// Read (and one write) access to the namespace catalog.
///
/// Implementations must treat backend unavailability as
/// [`CatalogError::Unavailable`], never as an empty result: callers rely on
/// the distinction to fail closed.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Look up a user by id.
    async fn user_by_id(&self, id: UserId) -> CatalogResult<User>;

    /// Look up an account by id.
    async fn account_by_id(&self, id: AccountId) -> CatalogResult<Account>;

    /// Look up a dataset by id.
    async fn dataset_by_id(&self, id: DatasetId) -> CatalogResult<Dataset>;

    /// All user rows. Used by the space provisioner only.
    async fn all_users(&self) -> CatalogResult<Vec<User>>;

    /// All account rows. Used by the space provisioner only.
    async fn all_accounts(&self) -> CatalogResult<Vec<Account>>;

    /// Whether a user↔dataset sharing edge exists.
    async fn user_dataset_exists(&self, user: UserId, dataset: DatasetId) -> CatalogResult<bool>;

    /// Whether an account↔dataset sharing edge exists.
    async fn account_dataset_exists(
        &self,
        account: AccountId,
        dataset: DatasetId,
    ) -> CatalogResult<bool>;

    /// Persist a dataset's new location.
    ///
    /// Must be idempotent: setting the url to its current value is a no-op
    /// success, so a caller recovering from a partial relocation can simply
    /// retry.
    async fn update_dataset_url(&self, id: DatasetId, url: &str) -> CatalogResult<()>;
}
