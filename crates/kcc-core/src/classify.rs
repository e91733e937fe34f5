//! Controller-type classifier.
//!
//! Decides whether a resource is implemented via the direct path, the
//! legacy Terraform-generated path, or is unknown. Direct takes precedence:
//! once a direct-tree match exists, the legacy location is never used.

use crate::config::Config;
use crate::error::Result;
use crate::locate::search_tree;
use crate::paths;
use crate::types::{ControllerType, ControllerTypeInfo};
use std::path::Path;

/// Outcome of the best-effort proto-definition probe.
///
/// `Failed` and `NotFound` surface identically to callers (no proto), but
/// are distinguished here so a future caller can tell a broken probe from
/// a genuinely missing proto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtoProbe {
    Found(String),
    NotFound,
    Failed,
}

impl ProtoProbe {
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Found(path) => Some(path),
            Self::NotFound | Self::Failed => None,
        }
    }
}

/// Classify a resource's controller implementation.
///
/// Absence of any match is not an error at this layer; `unknown` is a
/// valid classification.
pub fn detect_controller_type(config: &Config, resource: &str) -> Result<ControllerTypeInfo> {
    let resource_lower = resource.to_lowercase();

    let direct_matches = search_tree(
        &config.repo_root,
        paths::DIRECT_TREE,
        &resource_lower,
        "_types.go",
    )?;
    let legacy_matches = search_tree(
        &config.repo_root,
        paths::LEGACY_TREE,
        &resource_lower,
        paths::TYPES_SUFFIX,
    )?;

    let has_direct_types = !direct_matches.is_empty();
    let has_terraform_types = !legacy_matches.is_empty();

    let mut controller_type = ControllerType::Unknown;
    let mut location = None;
    let mut service = None;
    let mut version = None;

    if has_direct_types {
        controller_type = ControllerType::Direct;
        let path = direct_matches[0].clone();
        // apis/{service}/{version}/{resource}_types.go
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() >= 4 {
            service = Some(parts[1].to_string());
            version = Some(parts[2].to_string());
        }
        location = Some(path);
    } else if has_terraform_types {
        controller_type = ControllerType::Terraform;
        let path = legacy_matches[0].clone();
        // pkg/clients/generated/apis/{service}/{version}/{resource}_types.go
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() >= 6 {
            service = Some(parts[4].to_string());
            version = Some(parts[5].to_string());
        }
        location = Some(path);
    }

    let probe = match &service {
        Some(service) => probe_proto(&config.repo_root, service),
        None => ProtoProbe::NotFound,
    };
    let proto_location = probe.location().map(String::from);

    Ok(ControllerTypeInfo {
        resource: resource.to_string(),
        controller_type,
        location,
        migration_needed: controller_type == ControllerType::Terraform,
        has_direct_types,
        has_terraform_types,
        has_proto: proto_location.is_some(),
        proto_location,
        service,
        version,
    })
}

/// Best-effort search for a `.proto` file under a `/{service}/` path
/// component in the external proto tree. Any filesystem failure degrades
/// to `Failed` rather than propagating.
pub fn probe_proto(repo_root: &Path, service: &str) -> ProtoProbe {
    let segment = format!("/{service}/");
    match search_tree(repo_root, paths::PROTO_TREE, "", ".proto") {
        Ok(matches) => matches
            .into_iter()
            .find(|path| path.contains(&segment))
            .map_or(ProtoProbe::NotFound, ProtoProbe::Found),
        Err(_) => ProtoProbe::Failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    fn test_config(dir: &TempDir) -> Config {
        Config::new(dir.path(), "Test", "test@example.com")
    }

    #[test]
    fn direct_resource_is_classified_direct() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "apis/svcx/v1/foobar_types.go");
        let config = test_config(&dir);

        let info = detect_controller_type(&config, "FooBar").unwrap();
        assert_eq!(info.controller_type, ControllerType::Direct);
        assert!(!info.migration_needed);
        assert_eq!(info.location.as_deref(), Some("apis/svcx/v1/foobar_types.go"));
        assert_eq!(info.service.as_deref(), Some("svcx"));
        assert_eq!(info.version.as_deref(), Some("v1"));
    }

    #[test]
    fn legacy_resource_is_classified_terraform() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "pkg/clients/generated/apis/svcy/v1/widget_types.go");
        let config = test_config(&dir);

        let info = detect_controller_type(&config, "Widget").unwrap();
        assert_eq!(info.controller_type, ControllerType::Terraform);
        assert!(info.migration_needed);
        assert_eq!(info.service.as_deref(), Some("svcy"));
        assert_eq!(info.version.as_deref(), Some("v1"));
    }

    #[test]
    fn direct_takes_precedence_over_terraform() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "apis/svcx/v1/widget_types.go");
        touch(dir.path(), "pkg/clients/generated/apis/svcy/v1/widget_types.go");
        let config = test_config(&dir);

        let info = detect_controller_type(&config, "Widget").unwrap();
        assert_eq!(info.controller_type, ControllerType::Direct);
        assert!(!info.migration_needed);
        assert!(info.has_direct_types);
        assert!(info.has_terraform_types);
        assert_eq!(info.service.as_deref(), Some("svcx"));
    }

    #[test]
    fn no_match_is_unknown_not_error() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let info = detect_controller_type(&config, "Ghost").unwrap();
        assert_eq!(info.controller_type, ControllerType::Unknown);
        assert!(!info.migration_needed);
        assert!(info.location.is_none());
        assert!(info.service.is_none());
    }

    #[test]
    fn proto_probe_finds_service_proto() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "pkg/clients/generated/apis/svcy/v1/widget_types.go");
        touch(
            dir.path(),
            "mockgcp/third_party/googleapis/google/cloud/svcy/v1/widget.proto",
        );
        let config = test_config(&dir);

        let info = detect_controller_type(&config, "Widget").unwrap();
        assert!(info.has_proto);
        assert_eq!(
            info.proto_location.as_deref(),
            Some("mockgcp/third_party/googleapis/google/cloud/svcy/v1/widget.proto")
        );
    }

    #[test]
    fn missing_proto_tree_degrades_to_no_proto() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "pkg/clients/generated/apis/svcy/v1/widget_types.go");
        let config = test_config(&dir);

        let info = detect_controller_type(&config, "Widget").unwrap();
        assert!(!info.has_proto);
        assert!(info.proto_location.is_none());
    }

    #[test]
    fn probe_distinguishes_not_found_from_found() {
        let dir = TempDir::new().unwrap();
        touch(
            dir.path(),
            "mockgcp/third_party/googleapis/google/cloud/other/v1/thing.proto",
        );
        assert_eq!(probe_proto(dir.path(), "svcy"), ProtoProbe::NotFound);
        assert!(matches!(probe_proto(dir.path(), "other"), ProtoProbe::Found(_)));
    }
}
