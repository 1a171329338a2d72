use std::path::PathBuf;
use std::sync::Arc;

use spacedav_catalog::{Catalog, CatalogError};
use spacedav_core::{Claims, GatewayError, GatewayResult, NotFoundKind, SpaceConfig};
use spacedav_fs::path::join_real;

use crate::namespace::{Namespace, VirtualPath};

/// Maps (virtual path, claims) to a real filesystem path.
///
/// Mirrors the resolver's namespace dispatch but substitutes the tenant's
/// concrete `space` segment and prepends the configured real-root prefix.
/// Performs no filesystem I/O: a pure mapping plus at most one catalog
/// lookup. The gateway front always resolves permission first and aborts
/// on `NotAllowed`, so no ownership re-check happens here.
pub struct PathRedirector {
    catalog: Arc<dyn Catalog>,
    config: SpaceConfig,
}

impl PathRedirector {
    /// Create a redirector over the given catalog and namespace config.
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>, config: SpaceConfig) -> Self {
        Self { catalog, config }
    }

    /// Translate a virtual path into its real location.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::InvalidPath`] for malformed paths, unknown
    ///   selectors, or the bare namespace listing root.
    /// - [`GatewayError::NotFound`] when the claimed user/account/dataset
    ///   row does not exist.
    /// - [`GatewayError::Catalog`] when the store is unreachable.
    pub async fn redirect(&self, virtual_path: &str, claims: &Claims) -> GatewayResult<PathBuf> {
        let parsed = VirtualPath::parse(virtual_path)?;
        self.redirect_parsed(&parsed, claims).await
    }

    /// Like [`redirect`](Self::redirect), but additionally rejects paths
    /// with no concrete target beyond the namespace root. Write operations
    /// must use this variant.
    ///
    /// # Errors
    ///
    /// As [`redirect`](Self::redirect), plus [`GatewayError::InvalidPath`]
    /// when the path is exactly a namespace root.
    pub async fn redirect_for_write(
        &self,
        virtual_path: &str,
        claims: &Claims,
    ) -> GatewayResult<PathBuf> {
        let parsed = VirtualPath::parse(virtual_path)?;
        if !parsed.has_target() {
            return Err(GatewayError::InvalidPath(format!(
                "write requires a concrete target: {virtual_path}"
            )));
        }
        self.redirect_parsed(&parsed, claims).await
    }

    async fn redirect_parsed(
        &self,
        parsed: &VirtualPath,
        claims: &Claims,
    ) -> GatewayResult<PathBuf> {
        let VirtualPath::Namespaced { namespace, rest } = parsed else {
            return Err(GatewayError::InvalidPath(
                "the namespace listing root has no real location".to_owned(),
            ));
        };

        match namespace {
            Namespace::Public => Ok(join_real(&self.config.public_space_prefix, rest)),

            Namespace::User => {
                let user = self
                    .catalog
                    .user_by_id(claims.user_id)
                    .await
                    .map_err(|e| classify(NotFoundKind::User, claims.user_id.to_string(), e))?;
                let root = join_real(&self.config.user_space_prefix, &[user.space.clone()]);
                Ok(rest.iter().fold(root, |p, seg| p.join(seg)))
            },

            Namespace::Account => {
                if !claims.account_id.is_selected() {
                    return Err(GatewayError::not_found(
                        NotFoundKind::Account,
                        claims.account_id.to_string(),
                    ));
                }
                let account = self
                    .catalog
                    .account_by_id(claims.account_id)
                    .await
                    .map_err(|e| {
                        classify(NotFoundKind::Account, claims.account_id.to_string(), e)
                    })?;
                let root = join_real(&self.config.account_space_prefix, &[account.space.clone()]);
                Ok(rest.iter().fold(root, |p, seg| p.join(seg)))
            },

            // Admin mirrors substitute no tenant: the admin-supplied rest
            // already names a concrete space segment. The admin gate was
            // enforced by the resolver.
            Namespace::AdminPublic => Ok(join_real(&self.config.public_space_prefix, rest)),
            Namespace::AdminUser => Ok(join_real(&self.config.user_space_prefix, rest)),
            Namespace::AdminAccount => Ok(join_real(&self.config.account_space_prefix, rest)),

            Namespace::Dataset(id) | Namespace::Model(id) => {
                let dataset = self
                    .catalog
                    .dataset_by_id(*id)
                    .await
                    .map_err(|e| classify(NotFoundKind::Dataset, id.to_string(), e))?;
                // The record's url is authoritative; relocation stays
                // transparent to clients addressing by id.
                Ok(join_real(&dataset.url, rest))
            },
        }
    }
}

fn classify(kind: NotFoundKind, what: String, err: CatalogError) -> GatewayError {
    if err.is_not_found() {
        GatewayError::NotFound { kind, what }
    } else {
        GatewayError::Catalog(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacedav_catalog::{Account, DataType, Dataset, MemoryCatalog, User};
    use spacedav_core::{AccountId, DatasetId, Role, Status, UserId};

    fn fixture() -> (Arc<MemoryCatalog>, PathRedirector) {
        let catalog = Arc::new(MemoryCatalog::new());
        catalog.put_user(User {
            id: UserId(7),
            name: "alice".to_owned(),
            nickname: String::new(),
            role: Role::User,
            status: Status::Active,
            space: "alice".to_owned(),
        });
        catalog.put_account(Account {
            id: AccountId(1),
            name: "default".to_owned(),
            nickname: String::new(),
            space: "default".to_owned(),
        });
        catalog.put_dataset(Dataset {
            id: DatasetId(42),
            name: "weights".to_owned(),
            url: "/spaces/dataset/42/weights".to_owned(),
            data_type: DataType::Dataset,
            user_id: UserId(7),
        });
        let redirector = PathRedirector::new(Arc::clone(&catalog) as Arc<dyn Catalog>, SpaceConfig::default());
        (catalog, redirector)
    }

    #[tokio::test]
    async fn public_prefix_substitution() {
        let (_c, r) = fixture();
        let claims = Claims::for_user(UserId(7));
        let real = r.redirect("/public/report.txt", &claims).await.unwrap();
        assert_eq!(real, PathBuf::from("/spaces/public/report.txt"));
    }

    #[tokio::test]
    async fn user_space_substitution() {
        let (_c, r) = fixture();
        let claims = Claims::for_user(UserId(7));
        let real = r.redirect("/user/notes/today.md", &claims).await.unwrap();
        assert_eq!(real, PathBuf::from("/spaces/user/alice/notes/today.md"));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (_c, r) = fixture();
        let claims = Claims::for_user(UserId(999));
        let err = r.redirect("/user/x", &claims).await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::NotFound {
                kind: NotFoundKind::User,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn account_space_substitution() {
        let (_c, r) = fixture();
        let mut claims = Claims::for_user(UserId(7));
        claims.account_id = AccountId(1);
        let real = r.redirect("/account/model.bin", &claims).await.unwrap();
        assert_eq!(real, PathBuf::from("/spaces/account/default/model.bin"));
    }

    #[tokio::test]
    async fn admin_mirror_takes_rest_verbatim() {
        let (_c, r) = fixture();
        let claims = Claims::for_user(UserId(7));
        let real = r.redirect("/admin-user/bob/data", &claims).await.unwrap();
        assert_eq!(real, PathBuf::from("/spaces/user/bob/data"));
    }

    #[tokio::test]
    async fn dataset_follows_record_url() {
        let (_c, r) = fixture();
        let claims = Claims::for_user(UserId(7));
        let real = r.redirect("/dataset/42/part-0.bin", &claims).await.unwrap();
        assert_eq!(real, PathBuf::from("/spaces/dataset/42/weights/part-0.bin"));
    }

    #[tokio::test]
    async fn redirect_is_pure_for_fixed_catalog() {
        let (_c, r) = fixture();
        let claims = Claims::for_user(UserId(7));
        let a = r.redirect("/user/data", &claims).await.unwrap();
        let b = r.redirect("/user/data", &claims).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn write_needs_concrete_target() {
        let (_c, r) = fixture();
        let claims = Claims::for_user(UserId(7));
        assert!(r.redirect_for_write("/user", &claims).await.is_err());
        assert!(r.redirect_for_write("/user/f.txt", &claims).await.is_ok());
    }

    #[tokio::test]
    async fn outage_is_not_a_miss() {
        let (catalog, r) = fixture();
        catalog.set_unavailable(true);
        let claims = Claims::for_user(UserId(7));
        let err = r.redirect("/user/x", &claims).await.unwrap_err();
        assert!(matches!(err, GatewayError::Catalog(_)));
    }
}
