use serde::{Deserialize, Serialize};

/// Namespace and provisioning configuration consumed by the gateway.
///
/// Loaded from the host application's config file (TOML); every field has a
/// default so an empty `[spaces]` table yields a working layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpaceConfig {
    /// Real root under which user spaces live (`<prefix>/<space>`).
    pub user_space_prefix: String,
    /// Real root under which account spaces live (`<prefix>/<space>`).
    pub account_space_prefix: String,
    /// Real root of the shared public space.
    pub public_space_prefix: String,
    /// Real root for administratively relocated models (`<prefix>/<id>/...`).
    pub model_prefix: String,
    /// Real root for administratively relocated datasets (`<prefix>/<id>/...`).
    pub dataset_prefix: String,
    /// Mode for tenant root directories. The group-inherit friendly open
    /// mode; also forced onto entries created through the gateway.
    pub tenant_dir_mode: u32,
    /// Mode for ordinary directories created on behalf of clients.
    pub default_dir_mode: u32,
    /// Seconds between provisioner scans.
    pub scan_interval_secs: u64,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            user_space_prefix: "/spaces/user".to_owned(),
            account_space_prefix: "/spaces/account".to_owned(),
            public_space_prefix: "/spaces/public".to_owned(),
            model_prefix: "/spaces/model".to_owned(),
            dataset_prefix: "/spaces/dataset".to_owned(),
            tenant_dir_mode: 0o777,
            default_dir_mode: 0o755,
            scan_interval_secs: 90,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_toml() {
        let cfg: SpaceConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, SpaceConfig::default());
        assert_eq!(cfg.tenant_dir_mode, 0o777);
    }

    #[test]
    fn partial_override() {
        let cfg: SpaceConfig = toml::from_str(
            r#"
            user_space_prefix = "/mnt/shared/user"
            scan_interval_secs = 120
            "#,
        )
        .unwrap();
        assert_eq!(cfg.user_space_prefix, "/mnt/shared/user");
        assert_eq!(cfg.scan_interval_secs, 120);
        assert_eq!(cfg.public_space_prefix, "/spaces/public");
    }

    #[test]
    fn unknown_field_rejected() {
        let res: Result<SpaceConfig, _> = toml::from_str("user_prefix = \"/x\"");
        assert!(res.is_err());
    }
}
