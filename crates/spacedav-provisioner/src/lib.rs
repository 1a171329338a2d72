//! Space provisioner: a periodic task ensuring every known tenant
//! (user or account) has its root directory on the shared filesystem.
//!
//! Best-effort and self-healing: per-tenant failures are logged and the
//! scan moves on; nothing here ever terminates the host process. Directory
//! creation is idempotent and the provisioner is the sole writer of root
//! directories, so no locking is needed.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use spacedav_catalog::Catalog;
use spacedav_core::SpaceConfig;
use spacedav_fs::{FsError, GatewayFs};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Outcome of one provisioner pass. Lets tests single-step iterations
/// instead of waiting on real timers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    /// Tenant roots examined.
    pub checked: usize,
    /// Roots that were missing and got created.
    pub created: usize,
    /// Tenants skipped because of an error (logged, not fatal).
    pub failed: usize,
}

/// Periodic tenant-root provisioner.
pub struct SpaceProvisioner {
    catalog: Arc<dyn Catalog>,
    fs: Arc<dyn GatewayFs>,
    config: SpaceConfig,
}

impl SpaceProvisioner {
    /// Create a provisioner over the given collaborators.
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>, fs: Arc<dyn GatewayFs>, config: SpaceConfig) -> Self {
        Self { catalog, fs, config }
    }

    /// Run the scan loop until `cancel` fires.
    ///
    /// One pass runs immediately on startup, then once per configured
    /// interval. The pass itself is not cancellable; the loop exits at
    /// the next tick after cancellation.
    pub async fn run(&self, cancel: CancellationToken) {
        let period = Duration::from_secs(self.config.scan_interval_secs.max(1));
        let mut ticker = tokio::time::interval(period);
        info!(interval_secs = period.as_secs(), "space provisioner started");

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("space provisioner stopping");
                    return;
                }
                _ = ticker.tick() => {
                    let report = self.scan_once().await;
                    debug!(
                        checked = report.checked,
                        created = report.created,
                        failed = report.failed,
                        "provisioner pass complete"
                    );
                }
            }
        }
    }

    /// One full pass over all users and accounts.
    ///
    /// Enumeration failure for a whole table is logged and counted; it
    /// never panics or aborts the other table's scan.
    pub async fn scan_once(&self) -> ScanReport {
        let mut report = ScanReport::default();

        match self.catalog.all_users().await {
            Ok(users) => {
                for user in users {
                    let root = PathBuf::from(&self.config.user_space_prefix).join(&user.space);
                    self.ensure_root(&root, &mut report).await;
                }
            },
            Err(e) => {
                warn!(error = %e, "could not enumerate users, skipping this pass");
                report.failed += 1;
            },
        }

        match self.catalog.all_accounts().await {
            Ok(accounts) => {
                for account in accounts {
                    let root =
                        PathBuf::from(&self.config.account_space_prefix).join(&account.space);
                    self.ensure_root(&root, &mut report).await;
                }
            },
            Err(e) => {
                warn!(error = %e, "could not enumerate accounts, skipping this pass");
                report.failed += 1;
            },
        }

        report
    }

    async fn ensure_root(&self, root: &std::path::Path, report: &mut ScanReport) {
        report.checked += 1;
        match self.fs.stat(root).await {
            Ok(_) => {},
            Err(FsError::NotFound(_)) => {
                match self.fs.mkdir_all(root, self.config.tenant_dir_mode).await {
                    Ok(()) => {
                        info!(root = %root.display(), "created tenant root");
                        report.created += 1;
                    },
                    Err(e) => {
                        warn!(root = %root.display(), error = %e, "could not create tenant root");
                        report.failed += 1;
                    },
                }
            },
            Err(e) => {
                warn!(root = %root.display(), error = %e, "could not stat tenant root");
                report.failed += 1;
            },
        }
    }
}
