use spacedav_core::{DatasetId, GatewayError, GatewayResult};
use spacedav_fs::path::clean_virtual_path;

/// Namespace selected by the first segment of a virtual path.
///
/// A closed set: an unrecognized selector is a parse error, never a
/// silently-false string match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// Shared public space.
    Public,
    /// The caller's own user space.
    User,
    /// The caller's selected account space.
    Account,
    /// Admin mirror of the public space.
    AdminPublic,
    /// Admin mirror of all user spaces.
    AdminUser,
    /// Admin mirror of all account spaces.
    AdminAccount,
    /// A dataset's space, addressed by row id.
    Dataset(DatasetId),
    /// A model's space, addressed by row id.
    Model(DatasetId),
}

impl Namespace {
    /// Whether this is one of the `admin-*` mirrors.
    #[must_use]
    pub fn is_admin_mirror(self) -> bool {
        matches!(self, Self::AdminPublic | Self::AdminUser | Self::AdminAccount)
    }

    /// Whether this namespace addresses a dataset/model row.
    #[must_use]
    pub fn is_data(self) -> bool {
        matches!(self, Self::Dataset(_) | Self::Model(_))
    }
}

/// A parsed, normalized virtual path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VirtualPath {
    /// The empty path: the namespace listing root.
    Root,
    /// A path inside a namespace.
    Namespaced {
        /// Selected namespace.
        namespace: Namespace,
        /// Remaining tenant-relative segments (may be empty).
        rest: Vec<String>,
    },
}

impl VirtualPath {
    /// Parse and normalize a client-supplied virtual path.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidPath`] for traversal above the root,
    /// an unknown namespace selector, or a dataset/model selector without a
    /// numeric id.
    pub fn parse(raw: &str) -> GatewayResult<Self> {
        let mut segments = clean_virtual_path(raw)
            .map_err(|e| GatewayError::InvalidPath(e.to_string()))?
            .into_iter();

        let Some(selector) = segments.next() else {
            return Ok(Self::Root);
        };

        let namespace = match selector.as_str() {
            "public" => Namespace::Public,
            "user" => Namespace::User,
            "account" => Namespace::Account,
            "admin-public" => Namespace::AdminPublic,
            "admin-user" => Namespace::AdminUser,
            "admin-account" => Namespace::AdminAccount,
            "dataset" => Namespace::Dataset(parse_data_id(raw, segments.next())?),
            "model" => Namespace::Model(parse_data_id(raw, segments.next())?),
            other => {
                return Err(GatewayError::InvalidPath(format!(
                    "unknown namespace selector: {other}"
                )));
            },
        };

        Ok(Self::Namespaced {
            namespace,
            rest: segments.collect(),
        })
    }

    /// Whether the path addresses a concrete target beyond the namespace
    /// root. Write operations require this.
    #[must_use]
    pub fn has_target(&self) -> bool {
        match self {
            Self::Root => false,
            // A dataset/model id is itself a concrete directory.
            Self::Namespaced { namespace, rest } => namespace.is_data() || !rest.is_empty(),
        }
    }
}

fn parse_data_id(raw: &str, segment: Option<String>) -> GatewayResult<DatasetId> {
    segment
        .as_deref()
        .and_then(|s| s.parse::<u64>().ok())
        .map(DatasetId)
        .ok_or_else(|| GatewayError::InvalidPath(format!("missing dataset id in: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_dispatch() {
        let vp = VirtualPath::parse("/public/report.txt").unwrap();
        assert_eq!(
            vp,
            VirtualPath::Namespaced {
                namespace: Namespace::Public,
                rest: vec!["report.txt".to_owned()],
            }
        );

        let vp = VirtualPath::parse("admin-user/alice/data").unwrap();
        let VirtualPath::Namespaced { namespace, rest } = vp else {
            panic!("expected namespaced path");
        };
        assert!(namespace.is_admin_mirror());
        assert_eq!(rest, vec!["alice", "data"]);
    }

    #[test]
    fn dataset_selector_carries_id() {
        let vp = VirtualPath::parse("/dataset/42/weights.bin").unwrap();
        assert_eq!(
            vp,
            VirtualPath::Namespaced {
                namespace: Namespace::Dataset(DatasetId(42)),
                rest: vec!["weights.bin".to_owned()],
            }
        );

        assert!(VirtualPath::parse("/dataset/abc/x").is_err());
        assert!(VirtualPath::parse("/dataset").is_err());
    }

    #[test]
    fn empty_path_is_root() {
        assert_eq!(VirtualPath::parse("/").unwrap(), VirtualPath::Root);
        assert!(!VirtualPath::Root.has_target());
    }

    #[test]
    fn unknown_selector_rejected() {
        assert!(VirtualPath::parse("/shared/x").is_err());
    }

    #[test]
    fn traversal_rejected() {
        assert!(VirtualPath::parse("/user/../../etc").is_err());
    }

    #[test]
    fn namespace_root_has_no_target() {
        assert!(!VirtualPath::parse("/user").unwrap().has_target());
        assert!(VirtualPath::parse("/user/f.txt").unwrap().has_target());
        // The dataset id itself is a concrete directory.
        assert!(VirtualPath::parse("/dataset/42").unwrap().has_target());
    }
}
