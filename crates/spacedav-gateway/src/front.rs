use std::path::{Path, PathBuf};
use std::sync::Arc;

use spacedav_catalog::Catalog;
use spacedav_core::{Claims, GatewayError, GatewayResult, SpaceConfig};
use spacedav_fs::{FsDirEntry, FsError, GatewayFs};
use thiserror::Error;
use tracing::{debug, info};

use crate::redirect::PathRedirector;
use crate::relocate::fs_err;
use crate::resolver::PermissionResolver;

/// The HTTP/WebDAV methods the gateway authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum DavMethod {
    Get,
    Head,
    Options,
    Post,
    Put,
    Delete,
    Mkcol,
    Move,
    Copy,
    Propfind,
    Proppatch,
    Lock,
    Unlock,
}

impl DavMethod {
    /// Whether the method mutates the target and therefore requires
    /// `ReadWrite`.
    #[must_use]
    pub fn is_write(self) -> bool {
        matches!(
            self,
            Self::Proppatch
                | Self::Mkcol
                | Self::Put
                | Self::Move
                | Self::Copy
                | Self::Lock
                | Self::Unlock
                | Self::Delete
        )
    }
}

/// An HTTP method the gateway does not recognize.
///
/// Produced by [`DavMethod::from_str`] only; distinct from the path and
/// permission errors in [`GatewayError`] because a bad method is neither.
#[derive(Debug, Error)]
#[error("unsupported method: {0}")]
pub struct UnknownMethod(pub String);

impl std::str::FromStr for DavMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "MKCOL" => Ok(Self::Mkcol),
            "MOVE" => Ok(Self::Move),
            "COPY" => Ok(Self::Copy),
            "PROPFIND" => Ok(Self::Propfind),
            "PROPPATCH" => Ok(Self::Proppatch),
            "LOCK" => Ok(Self::Lock),
            "UNLOCK" => Ok(Self::Unlock),
            other => Err(UnknownMethod(other.to_owned())),
        }
    }
}

/// Per-request authorization gate.
///
/// For every inbound request: resolve the caller's permission, gate the
/// method against it, then redirect to the real path the protocol engine
/// should serve. No filesystem access happens before the permission check
/// passes.
pub struct GatewayFront {
    resolver: PermissionResolver,
    redirector: PathRedirector,
    fs: Arc<dyn GatewayFs>,
    config: SpaceConfig,
}

impl GatewayFront {
    /// Create a front over the given collaborators.
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>, fs: Arc<dyn GatewayFs>, config: SpaceConfig) -> Self {
        Self {
            resolver: PermissionResolver::new(Arc::clone(&catalog)),
            redirector: PathRedirector::new(catalog, config.clone()),
            fs,
            config,
        }
    }

    /// The resolver, for callers that only need a permission.
    #[must_use]
    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    /// The redirector, for callers that already hold a permission.
    #[must_use]
    pub fn redirector(&self) -> &PathRedirector {
        &self.redirector
    }

    /// Authorize a request and return the real path to forward.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::PermissionDenied`] when the resolver says
    ///   `NotAllowed`, or the method writes and the permission is
    ///   `ReadOnly`.
    /// - Redirection errors as produced by [`PathRedirector`].
    pub async fn authorize(
        &self,
        method: DavMethod,
        virtual_path: &str,
        claims: &Claims,
    ) -> GatewayResult<PathBuf> {
        let permission = self.resolver.resolve(virtual_path, claims).await;
        if !permission.is_allowed() {
            debug!(path = virtual_path, user = %claims.user_id, "denied");
            return Err(GatewayError::denied("no access to this namespace"));
        }
        if method.is_write() && !permission.allows_write() {
            debug!(path = virtual_path, user = %claims.user_id, ?method, "read-only, write method rejected");
            return Err(GatewayError::denied("namespace is read-only for this token"));
        }

        if method.is_write() {
            self.redirector.redirect_for_write(virtual_path, claims).await
        } else {
            self.redirector.redirect(virtual_path, claims).await
        }
    }

    /// Force the open directory mode onto a freshly created entry.
    ///
    /// Called after a successful MKCOL/PUT: the tenant-root parent may
    /// carry a group-inherit bit that the protocol engine's own mode
    /// argument does not override.
    ///
    /// # Errors
    ///
    /// Propagates the underlying chmod failure.
    pub async fn ensure_open_mode(&self, real_path: &Path) -> GatewayResult<()> {
        self.fs
            .set_mode(real_path, self.config.tenant_dir_mode)
            .await
            .map_err(fs_err)
    }

    /// Eagerly provision a set of real paths (the `checkspace` flow):
    /// each missing path is created as a directory with the default mode.
    ///
    /// # Errors
    ///
    /// The first stat or creation failure, unchanged.
    pub async fn check_space(&self, real_paths: &[PathBuf]) -> GatewayResult<()> {
        for path in real_paths {
            match self.fs.stat(path).await {
                Ok(_) => {},
                Err(FsError::NotFound(_)) => {
                    info!(path = %path.display(), "provisioning requested directory");
                    self.fs
                        .mkdir_all(path, self.config.default_dir_mode)
                        .await
                        .map_err(fs_err)?;
                },
                Err(e) => return Err(fs_err(e)),
            }
        }
        Ok(())
    }

    /// List a real directory on behalf of an already-authorized request.
    ///
    /// # Errors
    ///
    /// Propagates the underlying read failure; a missing path surfaces as
    /// a typed not-found.
    pub async fn list_dir(&self, real_path: &Path) -> GatewayResult<Vec<FsDirEntry>> {
        self.fs.read_dir(real_path).await.map_err(fs_err)
    }
}
