use std::sync::Arc;

use spacedav_catalog::{Catalog, CatalogError, Dataset};
use spacedav_core::{Claims, Permission};
use tracing::{debug, warn};

use crate::namespace::{Namespace, VirtualPath};

/// Maps (virtual path, claims) to an effective [`Permission`].
///
/// Fail-closed throughout: malformed paths, unknown selectors, lookup
/// misses and catalog outages all resolve to `NotAllowed`. A backend
/// failure during an existence check must never widen access.
pub struct PermissionResolver {
    catalog: Arc<dyn Catalog>,
}

impl PermissionResolver {
    /// Create a resolver over the given catalog.
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// Resolve the caller's permission for a virtual path.
    ///
    /// Pure over its inputs plus at most two catalog point lookups; no
    /// side effects.
    pub async fn resolve(&self, virtual_path: &str, claims: &Claims) -> Permission {
        let parsed = match VirtualPath::parse(virtual_path) {
            Ok(p) => p,
            Err(e) => {
                debug!(path = virtual_path, error = %e, "unresolvable path, denying");
                return Permission::NotAllowed;
            },
        };

        match parsed {
            // Namespace listing: enumeration is readable, never writable.
            VirtualPath::Root => Permission::ReadOnly,
            VirtualPath::Namespaced { namespace, .. } => {
                self.resolve_namespace(namespace, claims).await
            },
        }
    }

    async fn resolve_namespace(&self, namespace: Namespace, claims: &Claims) -> Permission {
        match namespace {
            // Public is a singleton namespace; the token already carries
            // the caller's mode for it.
            Namespace::Public => claims.public_access_mode.into(),

            Namespace::User => match self.catalog.user_by_id(claims.user_id).await {
                Ok(_) => Permission::ReadWrite,
                Err(e) => deny_on_lookup("user", &e),
            },

            Namespace::Account => {
                if !claims.account_id.is_selected() {
                    return Permission::NotAllowed;
                }
                match self.catalog.account_by_id(claims.account_id).await {
                    Ok(_) => claims.account_access_mode.into(),
                    Err(e) => deny_on_lookup("account", &e),
                }
            },

            Namespace::AdminPublic | Namespace::AdminUser | Namespace::AdminAccount => {
                if claims.is_platform_admin() {
                    Permission::ReadWrite
                } else {
                    Permission::NotAllowed
                }
            },

            Namespace::Dataset(id) | Namespace::Model(id) => {
                match self.catalog.dataset_by_id(id).await {
                    Ok(dataset) => self.resolve_data_access(&dataset, claims).await,
                    Err(e) => deny_on_lookup("dataset", &e),
                }
            },
        }
    }

    /// Owner and platform admin get full access; a sharing edge grants
    /// read; everyone else is denied.
    async fn resolve_data_access(&self, dataset: &Dataset, claims: &Claims) -> Permission {
        if dataset.user_id == claims.user_id || claims.is_platform_admin() {
            return Permission::ReadWrite;
        }

        match self
            .catalog
            .user_dataset_exists(claims.user_id, dataset.id)
            .await
        {
            Ok(true) => return Permission::ReadOnly,
            Ok(false) => {},
            Err(e) => return deny_on_lookup("user-dataset share", &e),
        }

        if claims.account_id.is_selected() {
            match self
                .catalog
                .account_dataset_exists(claims.account_id, dataset.id)
                .await
            {
                Ok(true) => return Permission::ReadOnly,
                Ok(false) => {},
                Err(e) => return deny_on_lookup("account-dataset share", &e),
            }
        }

        Permission::NotAllowed
    }
}

fn deny_on_lookup(what: &str, err: &CatalogError) -> Permission {
    if err.is_not_found() {
        debug!(what, "lookup miss, denying");
    } else {
        // Outage, not absence. Still deny; never default open.
        warn!(what, error = %err, "catalog unavailable during permission check, denying");
    }
    Permission::NotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacedav_catalog::{DataType, MemoryCatalog, User};
    use spacedav_core::{AccessMode, AccountId, DatasetId, Role, Status, UserId};

    fn catalog_with_user(id: u64) -> Arc<MemoryCatalog> {
        let catalog = Arc::new(MemoryCatalog::new());
        catalog.put_user(User {
            id: UserId(id),
            name: format!("u{id}"),
            nickname: String::new(),
            role: Role::User,
            status: Status::Active,
            space: format!("space-{id}"),
        });
        catalog
    }

    #[tokio::test]
    async fn public_is_claims_pass_through() {
        let resolver = PermissionResolver::new(Arc::new(MemoryCatalog::new()));
        let mut claims = Claims::for_user(UserId(7));
        claims.public_access_mode = AccessMode::ReadOnly;
        assert_eq!(
            resolver.resolve("/public/x", &claims).await,
            Permission::ReadOnly
        );
        claims.public_access_mode = AccessMode::ReadWrite;
        assert_eq!(
            resolver.resolve("/public/x", &claims).await,
            Permission::ReadWrite
        );
    }

    #[tokio::test]
    async fn user_namespace_needs_existing_row() {
        let catalog = catalog_with_user(7);
        let resolver = PermissionResolver::new(catalog);
        let claims = Claims::for_user(UserId(7));
        assert_eq!(
            resolver.resolve("/user/notes.txt", &claims).await,
            Permission::ReadWrite
        );

        let stranger = Claims::for_user(UserId(8));
        assert_eq!(
            resolver.resolve("/user/notes.txt", &stranger).await,
            Permission::NotAllowed
        );
    }

    #[tokio::test]
    async fn admin_mirrors_require_platform_admin() {
        let resolver = PermissionResolver::new(Arc::new(MemoryCatalog::new()));
        let mut claims = Claims::for_user(UserId(7));
        for path in ["/admin-user/x", "/admin-public/x", "/admin-account/x"] {
            assert_eq!(resolver.resolve(path, &claims).await, Permission::NotAllowed);
        }
        claims.role_platform = Role::Admin;
        for path in ["/admin-user/x", "/admin-public/x", "/admin-account/x"] {
            assert_eq!(resolver.resolve(path, &claims).await, Permission::ReadWrite);
        }
    }

    #[tokio::test]
    async fn unknown_selector_denied() {
        let resolver = PermissionResolver::new(Arc::new(MemoryCatalog::new()));
        let claims = Claims::for_user(UserId(7));
        assert_eq!(
            resolver.resolve("/shared/x", &claims).await,
            Permission::NotAllowed
        );
    }

    #[tokio::test]
    async fn root_listing_is_read_only() {
        let resolver = PermissionResolver::new(Arc::new(MemoryCatalog::new()));
        let claims = Claims::for_user(UserId(7));
        assert_eq!(resolver.resolve("/", &claims).await, Permission::ReadOnly);
    }

    #[tokio::test]
    async fn catalog_outage_fails_closed() {
        let catalog = catalog_with_user(7);
        catalog.set_unavailable(true);
        let resolver = PermissionResolver::new(catalog);
        let claims = Claims::for_user(UserId(7));
        assert_eq!(
            resolver.resolve("/user/notes.txt", &claims).await,
            Permission::NotAllowed
        );
    }

    #[tokio::test]
    async fn dataset_owner_share_and_stranger() {
        let catalog = catalog_with_user(7);
        catalog.put_dataset(spacedav_catalog::Dataset {
            id: DatasetId(42),
            name: "weights".to_owned(),
            url: "/spaces/dataset/42/weights".to_owned(),
            data_type: DataType::Dataset,
            user_id: UserId(7),
        });
        catalog.share_with_user(UserId(9), DatasetId(42));
        catalog.share_with_account(AccountId(3), DatasetId(42));
        let resolver = PermissionResolver::new(catalog);

        let owner = Claims::for_user(UserId(7));
        assert_eq!(
            resolver.resolve("/dataset/42/weights", &owner).await,
            Permission::ReadWrite
        );

        let grantee = Claims::for_user(UserId(9));
        assert_eq!(
            resolver.resolve("/dataset/42/weights", &grantee).await,
            Permission::ReadOnly
        );

        let mut member = Claims::for_user(UserId(10));
        member.account_id = AccountId(3);
        assert_eq!(
            resolver.resolve("/dataset/42/weights", &member).await,
            Permission::ReadOnly
        );

        let stranger = Claims::for_user(UserId(11));
        assert_eq!(
            resolver.resolve("/dataset/42/weights", &stranger).await,
            Permission::NotAllowed
        );
    }
}
