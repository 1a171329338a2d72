use std::path::{Path, PathBuf};
use std::sync::Arc;

use spacedav_catalog::{Catalog, DataType, Dataset};
use spacedav_core::{Claims, DatasetId, GatewayError, GatewayResult, NotFoundKind, SpaceConfig};
use spacedav_fs::{FsError, GatewayFs};
use tracing::{info, warn};

use crate::redirect::PathRedirector;
use crate::resolver::PermissionResolver;

/// Orchestrates move/restore of files and datasets.
///
/// Every operation runs the same strict step order: conflict check,
/// parent provisioning, atomic rename, then (dataset flows only) the
/// record update. Each step's failure aborts immediately and leaves prior
/// steps' effects in place; there is no rollback. A rename that succeeds
/// while the record update fails surfaces as
/// [`GatewayError::RenamedButNotRecorded`] so an operator or repair job
/// can reconcile by retrying the update.
pub struct RelocationCoordinator {
    catalog: Arc<dyn Catalog>,
    fs: Arc<dyn GatewayFs>,
    resolver: PermissionResolver,
    redirector: PathRedirector,
    config: SpaceConfig,
}

impl RelocationCoordinator {
    /// Create a coordinator over the given collaborators.
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>, fs: Arc<dyn GatewayFs>, config: SpaceConfig) -> Self {
        Self {
            resolver: PermissionResolver::new(Arc::clone(&catalog)),
            redirector: PathRedirector::new(Arc::clone(&catalog), config.clone()),
            catalog,
            fs,
            config,
        }
    }

    /// Move a real path to another real path.
    ///
    /// Steps, in order:
    /// 1. Conflict check: an existing destination fails with
    ///    [`GatewayError::Conflict`] unless `overwrite`, in which case it
    ///    is removed first.
    /// 2. Parent provisioning: missing destination ancestors are created
    ///    with the open tenant-root mode.
    /// 3. Atomic rename. Cross-device renames propagate the underlying
    ///    error as-is.
    ///
    /// # Errors
    ///
    /// The first failing step's error, unchanged. Source and destination
    /// are untouched when the conflict check fails.
    pub async fn move_entry(&self, src: &Path, dst: &Path, overwrite: bool) -> GatewayResult<()> {
        self.prepare_destination(dst, overwrite).await?;
        self.fs.rename(src, dst).await.map_err(fs_err)?;
        info!(src = %src.display(), dst = %dst.display(), "moved");
        Ok(())
    }

    /// Copy a real path to another real path, leaving the source in place.
    ///
    /// Runs the same conflict-check and parent-provisioning steps as
    /// [`move_entry`](Self::move_entry), then copies the tree instead of
    /// renaming. There is no record step: copies create new content, they
    /// never relocate registered content.
    ///
    /// # Errors
    ///
    /// The first failing step's error, unchanged. A partially written
    /// destination is left in place for the caller to inspect or remove.
    pub async fn copy_entry(&self, src: &Path, dst: &Path, overwrite: bool) -> GatewayResult<()> {
        self.prepare_destination(dst, overwrite).await?;
        self.copy_tree(src, dst).await?;
        info!(src = %src.display(), dst = %dst.display(), "copied");
        Ok(())
    }

    /// Conflict check and parent provisioning shared by move and copy.
    async fn prepare_destination(&self, dst: &Path, overwrite: bool) -> GatewayResult<()> {
        match self.fs.stat(dst).await {
            Ok(_) => {
                if !overwrite {
                    return Err(GatewayError::Conflict(dst.display().to_string()));
                }
                self.fs.remove_all(dst).await.map_err(fs_err)?;
            },
            Err(FsError::NotFound(_)) => {},
            Err(e) => return Err(fs_err(e)),
        }

        if let Some(parent) = dst.parent() {
            match self.fs.stat(parent).await {
                Ok(_) => {},
                Err(FsError::NotFound(_)) => {
                    self.fs
                        .mkdir_all(parent, self.config.tenant_dir_mode)
                        .await
                        .map_err(fs_err)?;
                },
                Err(e) => return Err(fs_err(e)),
            }
        }
        Ok(())
    }

    /// Recursive copy over the filesystem seam. Iterative with an explicit
    /// work list so directory depth never recurses on the stack.
    async fn copy_tree(&self, src: &Path, dst: &Path) -> GatewayResult<()> {
        let mut pending = vec![(src.to_path_buf(), dst.to_path_buf())];
        while let Some((s, d)) = pending.pop() {
            let meta = self.fs.stat(&s).await.map_err(fs_err)?;
            if meta.is_dir {
                self.fs
                    .mkdir_all(&d, self.config.default_dir_mode)
                    .await
                    .map_err(fs_err)?;
                for entry in self.fs.read_dir(&s).await.map_err(fs_err)? {
                    pending.push((s.join(&entry.name), d.join(&entry.name)));
                }
            } else {
                let bytes = self.fs.read_file(&s).await.map_err(fs_err)?;
                self.fs.write_file(&d, &bytes).await.map_err(fs_err)?;
            }
        }
        Ok(())
    }

    /// Move between two virtual paths on behalf of a caller.
    ///
    /// Both source and destination must resolve to `ReadWrite` for the
    /// caller; either failing denies the whole operation before any
    /// filesystem access.
    ///
    /// # Errors
    ///
    /// [`GatewayError::PermissionDenied`] when either side is not
    /// writable; otherwise as [`move_entry`](Self::move_entry).
    pub async fn move_virtual(
        &self,
        src_virtual: &str,
        dst_virtual: &str,
        claims: &Claims,
        overwrite: bool,
    ) -> GatewayResult<()> {
        let src_perm = self.resolver.resolve(src_virtual, claims).await;
        let dst_perm = self.resolver.resolve(dst_virtual, claims).await;
        if !src_perm.allows_write() || !dst_perm.allows_write() {
            return Err(GatewayError::denied(
                "moving files requires write access to both source and destination",
            ));
        }

        let src = self.redirector.redirect_for_write(src_virtual, claims).await?;
        let dst = self.redirector.redirect_for_write(dst_virtual, claims).await?;
        self.move_entry(&src, &dst, overwrite).await
    }

    /// Copy between two virtual paths on behalf of a caller.
    ///
    /// The source must be at least readable and the destination writable
    /// for the caller; either failing denies the whole operation before
    /// any filesystem access. Backs the "create dataset from an existing
    /// directory" flow, where the source is often a shared read-only space.
    ///
    /// # Errors
    ///
    /// [`GatewayError::PermissionDenied`] when the source is not readable
    /// or the destination not writable; otherwise as
    /// [`copy_entry`](Self::copy_entry).
    pub async fn copy_virtual(
        &self,
        src_virtual: &str,
        dst_virtual: &str,
        claims: &Claims,
        overwrite: bool,
    ) -> GatewayResult<()> {
        let src_perm = self.resolver.resolve(src_virtual, claims).await;
        let dst_perm = self.resolver.resolve(dst_virtual, claims).await;
        if !src_perm.is_allowed() || !dst_perm.allows_write() {
            return Err(GatewayError::denied(
                "copying files requires read access to the source and write access to the destination",
            ));
        }

        let src = self.redirector.redirect(src_virtual, claims).await?;
        let dst = self.redirector.redirect_for_write(dst_virtual, claims).await?;
        self.copy_entry(&src, &dst, overwrite).await
    }

    /// Administratively relocate a dataset or model to its canonical
    /// location, `<dataset-prefix>/<id>/<basename>` or
    /// `<model-prefix>/<id>/<basename>` by row type. The destination is
    /// computed, never caller-supplied, which removes a class of
    /// path-injection concerns for this flow.
    ///
    /// # Errors
    ///
    /// [`GatewayError::PermissionDenied`] unless the caller is a platform
    /// admin; [`GatewayError::NotFound`] for an unknown dataset;
    /// otherwise as [`move_entry`](Self::move_entry) plus the
    /// record-update semantics of [`GatewayError::RenamedButNotRecorded`].
    pub async fn relocate_dataset_or_model(
        &self,
        id: DatasetId,
        claims: &Claims,
    ) -> GatewayResult<PathBuf> {
        require_platform_admin(claims)?;
        let dataset = self.dataset(id).await?;

        let prefix = match dataset.data_type {
            DataType::Model => &self.config.model_prefix,
            DataType::Dataset => &self.config.dataset_prefix,
        };
        let mut dest = PathBuf::from(prefix);
        dest.push(dataset.id.0.to_string());
        let base = Path::new(&dataset.url)
            .file_name()
            .ok_or_else(|| GatewayError::InvalidPath(dataset.url.clone()))?;
        dest.push(base);

        self.move_and_record(&dataset, &dest).await?;
        Ok(dest)
    }

    /// Move a dataset to an admin-supplied real destination, persisting
    /// the new location.
    ///
    /// # Errors
    ///
    /// As [`relocate_dataset_or_model`](Self::relocate_dataset_or_model),
    /// except the destination is caller-supplied and taken verbatim.
    pub async fn move_dataset(
        &self,
        id: DatasetId,
        dest: &Path,
        claims: &Claims,
    ) -> GatewayResult<()> {
        require_platform_admin(claims)?;
        let dataset = self.dataset(id).await?;
        self.move_and_record(&dataset, dest).await
    }

    /// Restore a dataset to an admin-supplied real destination.
    ///
    /// When the destination is an existing directory, the source's base
    /// name is appended first — "move into folder" semantics.
    ///
    /// # Errors
    ///
    /// As [`relocate_dataset_or_model`](Self::relocate_dataset_or_model),
    /// except the destination is caller-supplied.
    pub async fn restore_dataset(
        &self,
        id: DatasetId,
        dest: &Path,
        claims: &Claims,
    ) -> GatewayResult<PathBuf> {
        require_platform_admin(claims)?;
        let dataset = self.dataset(id).await?;

        let mut dest = dest.to_path_buf();
        match self.fs.stat(&dest).await {
            Ok(meta) if meta.is_dir => {
                if let Some(base) = Path::new(&dataset.url).file_name() {
                    dest.push(base);
                }
            },
            Ok(_) | Err(FsError::NotFound(_)) => {},
            Err(e) => return Err(fs_err(e)),
        }

        self.move_and_record(&dataset, &dest).await?;
        Ok(dest)
    }

    /// Steps 1–3 then the record update. The update is not transactional
    /// with the rename; its failure yields `RenamedButNotRecorded` with
    /// the destination the filesystem now reflects.
    async fn move_and_record(&self, dataset: &Dataset, dest: &Path) -> GatewayResult<()> {
        self.move_entry(Path::new(&dataset.url), dest, false).await?;

        let dest_str = dest.display().to_string();
        if let Err(e) = self.catalog.update_dataset_url(dataset.id, &dest_str).await {
            warn!(
                dataset = %dataset.id,
                dest = %dest_str,
                error = %e,
                "rename succeeded but record update failed; record is stale"
            );
            return Err(GatewayError::RenamedButNotRecorded {
                id: dataset.id.0,
                dest: dest_str,
                source: Box::new(GatewayError::Catalog(e.to_string())),
            });
        }
        Ok(())
    }

    async fn dataset(&self, id: DatasetId) -> GatewayResult<Dataset> {
        self.catalog.dataset_by_id(id).await.map_err(|e| {
            if e.is_not_found() {
                GatewayError::not_found(NotFoundKind::Dataset, id.to_string())
            } else {
                GatewayError::Catalog(e.to_string())
            }
        })
    }
}

fn require_platform_admin(claims: &Claims) -> GatewayResult<()> {
    if claims.is_platform_admin() {
        Ok(())
    } else {
        Err(GatewayError::denied("platform admin role required"))
    }
}

pub(crate) fn fs_err(e: FsError) -> GatewayError {
    match e {
        FsError::NotFound(p) => GatewayError::not_found(NotFoundKind::Path, p),
        FsError::Io(io) => GatewayError::Fs(io),
    }
}
