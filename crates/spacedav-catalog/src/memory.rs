use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use spacedav_core::{AccountId, DatasetId, UserId};

use crate::entity::{Account, AccountDataset, Dataset, User, UserDataset};
use crate::error::{CatalogError, CatalogResult};
use crate::Catalog;

/// In-memory catalog.
///
/// Complete implementation of [`Catalog`] over concurrent maps. Used by the
/// test suites and by embedding callers that keep tenant records in-process;
/// production deployments adapt their own query layer instead.
///
/// [`set_unavailable`](Self::set_unavailable) flips the catalog into an
/// unavailable state so fail-closed behavior is testable without a real
/// backend outage.
#[derive(Default)]
pub struct MemoryCatalog {
    users: DashMap<UserId, User>,
    accounts: DashMap<AccountId, Account>,
    datasets: DashMap<DatasetId, Dataset>,
    user_datasets: DashSet<UserDataset>,
    account_datasets: DashSet<AccountDataset>,
    unavailable: AtomicBool,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user row.
    pub fn put_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    /// Insert or replace an account row.
    pub fn put_account(&self, account: Account) {
        self.accounts.insert(account.id, account);
    }

    /// Insert or replace a dataset row.
    pub fn put_dataset(&self, dataset: Dataset) {
        self.datasets.insert(dataset.id, dataset);
    }

    /// Grant a user read access to a dataset.
    pub fn share_with_user(&self, user: UserId, dataset: DatasetId) {
        self.user_datasets.insert(UserDataset {
            user_id: user,
            dataset_id: dataset,
        });
    }

    /// Grant an account's members read access to a dataset.
    pub fn share_with_account(&self, account: AccountId, dataset: DatasetId) {
        self.account_datasets.insert(AccountDataset {
            account_id: account,
            dataset_id: dataset,
        });
    }

    /// Make every subsequent call fail with [`CatalogError::Unavailable`]
    /// until cleared. Test hook for fail-closed coverage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> CatalogResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable("injected outage".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn user_by_id(&self, id: UserId) -> CatalogResult<User> {
        self.check_available()?;
        self.users
            .get(&id)
            .map(|u| u.clone())
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    async fn account_by_id(&self, id: AccountId) -> CatalogResult<Account> {
        self.check_available()?;
        self.accounts
            .get(&id)
            .map(|a| a.clone())
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    async fn dataset_by_id(&self, id: DatasetId) -> CatalogResult<Dataset> {
        self.check_available()?;
        self.datasets
            .get(&id)
            .map(|d| d.clone())
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    async fn all_users(&self) -> CatalogResult<Vec<User>> {
        self.check_available()?;
        Ok(self.users.iter().map(|u| u.clone()).collect())
    }

    async fn all_accounts(&self) -> CatalogResult<Vec<Account>> {
        self.check_available()?;
        Ok(self.accounts.iter().map(|a| a.clone()).collect())
    }

    async fn user_dataset_exists(&self, user: UserId, dataset: DatasetId) -> CatalogResult<bool> {
        self.check_available()?;
        Ok(self.user_datasets.contains(&UserDataset {
            user_id: user,
            dataset_id: dataset,
        }))
    }

    async fn account_dataset_exists(
        &self,
        account: AccountId,
        dataset: DatasetId,
    ) -> CatalogResult<bool> {
        self.check_available()?;
        Ok(self.account_datasets.contains(&AccountDataset {
            account_id: account,
            dataset_id: dataset,
        }))
    }

    async fn update_dataset_url(&self, id: DatasetId, url: &str) -> CatalogResult<()> {
        self.check_available()?;
        let mut dataset = self
            .datasets
            .get_mut(&id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        dataset.url = url.to_owned();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::DataType;
    use spacedav_core::{Role, Status};

    fn sample_user(id: u64, space: &str) -> User {
        User {
            id: UserId(id),
            name: format!("u{id}"),
            nickname: String::new(),
            role: Role::User,
            status: Status::Active,
            space: space.to_owned(),
        }
    }

    #[tokio::test]
    async fn point_lookup_and_miss() {
        let catalog = MemoryCatalog::new();
        catalog.put_user(sample_user(7, "alice"));

        let user = catalog.user_by_id(UserId(7)).await.unwrap();
        assert_eq!(user.space, "alice");

        let err = catalog.user_by_id(UserId(8)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn injected_outage_is_not_a_miss() {
        let catalog = MemoryCatalog::new();
        catalog.put_user(sample_user(7, "alice"));
        catalog.set_unavailable(true);

        let err = catalog.user_by_id(UserId(7)).await.unwrap_err();
        assert!(!err.is_not_found());

        catalog.set_unavailable(false);
        assert!(catalog.user_by_id(UserId(7)).await.is_ok());
    }

    #[tokio::test]
    async fn update_dataset_url_is_idempotent() {
        let catalog = MemoryCatalog::new();
        catalog.put_dataset(Dataset {
            id: DatasetId(42),
            name: "weights".to_owned(),
            url: "/spaces/user/alice/weights.bin".to_owned(),
            data_type: DataType::Model,
            user_id: UserId(7),
        });

        catalog
            .update_dataset_url(DatasetId(42), "/spaces/model/42/weights.bin")
            .await
            .unwrap();
        // Retrying with the same value succeeds and changes nothing.
        catalog
            .update_dataset_url(DatasetId(42), "/spaces/model/42/weights.bin")
            .await
            .unwrap();

        let dataset = catalog.dataset_by_id(DatasetId(42)).await.unwrap();
        assert_eq!(dataset.url, "/spaces/model/42/weights.bin");
    }
}
