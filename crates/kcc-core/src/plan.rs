//! Migration planner.
//!
//! Produces the human-actionable 7-phase checklist for a resource that
//! still needs migration. Task lists and effort estimates are advisory
//! prose; completion is only ever verified by `migration_status`.

use crate::classify::detect_controller_type;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::paths;
use crate::types::{MigrationPhase, MigrationPlan, ProtoInfo};
use std::collections::BTreeMap;

/// Create a migration plan for a resource.
///
/// Fails with a precondition error if the resource is already direct (the
/// message names the existing location and points at field addition
/// instead), or if service/version cannot be resolved.
pub fn plan_migration(config: &Config, resource: &str) -> Result<MigrationPlan> {
    let info = detect_controller_type(config, resource)?;

    if !info.migration_needed {
        let location = info.location.as_deref().unwrap_or("unknown location");
        return Err(Error::PreconditionFailed(format!(
            "{resource} is already a direct controller at {location}.\nNo migration needed. Use add-field to add fields."
        )));
    }

    let (Some(service), Some(version)) = (info.service.clone(), info.version.clone()) else {
        return Err(Error::MissingServiceVersion {
            resource: resource.to_string(),
        });
    };

    let resource_lower = resource.to_lowercase();

    let mut target_files = BTreeMap::new();
    target_files.insert(
        "types_file".to_string(),
        paths::types_file(&service, &version, &resource_lower),
    );
    target_files.insert(
        "identity_file".to_string(),
        paths::identity_file(&service, &version, &resource_lower),
    );
    target_files.insert(
        "controller_file".to_string(),
        paths::controller_file(&service, &resource_lower),
    );
    target_files.insert("mapper_file".to_string(), paths::mapper_file(&service));
    target_files.insert(
        "mockgcp_file".to_string(),
        paths::mockgcp_file(&service, &resource_lower),
    );
    target_files.insert(
        "test_fixtures_dir".to_string(),
        paths::test_fixtures_dir(&service, &version, &resource_lower),
    );

    let proto_task = match &info.proto_location {
        Some(location) => format!("Proto exists at {location}"),
        None => "Check if proto exists in mockgcp/third_party/googleapis".to_string(),
    };

    let phases = vec![
        MigrationPhase {
            phase: 1,
            name: "Proto Definitions".to_string(),
            description: "Ensure proto definitions exist for the resource".to_string(),
            tasks: vec![
                proto_task,
                "Identify proto package and message name".to_string(),
                "Note any custom fields needed".to_string(),
            ],
            estimated_time: "1-2 hours".to_string(),
        },
        MigrationPhase {
            phase: 2,
            name: "API Types (KRM)".to_string(),
            description: "Create Kubernetes resource model types".to_string(),
            tasks: vec![
                format!("Create {}", target_files["types_file"]),
                "Define Spec struct with all fields".to_string(),
                "Add +kcc:proto= annotations for each field".to_string(),
                "Define nested types if needed".to_string(),
                "Follow naming conventions (PascalCase)".to_string(),
            ],
            estimated_time: "4-6 hours".to_string(),
        },
        MigrationPhase {
            phase: 3,
            name: "Identity Handler".to_string(),
            description: "Create resource name parsing and construction".to_string(),
            tasks: vec![
                format!("Create {}", target_files["identity_file"]),
                "Implement resource name format (e.g., projects/{project}/...)".to_string(),
                "Add parent identity handling".to_string(),
                "Implement String() method".to_string(),
            ],
            estimated_time: "2-3 hours".to_string(),
        },
        MigrationPhase {
            phase: 4,
            name: "Mapper Generation".to_string(),
            description: "Generate KRM/proto conversion functions".to_string(),
            tasks: vec![
                format!("Run ./dev/tasks/generate-mapper {resource}"),
                format!("Verify {} updated", target_files["mapper_file"]),
                "Check for any mapper errors".to_string(),
            ],
            estimated_time: "30 minutes".to_string(),
        },
        MigrationPhase {
            phase: 5,
            name: "Controller Implementation".to_string(),
            description: "Implement CRUD operations".to_string(),
            tasks: vec![
                format!("Create {}", target_files["controller_file"]),
                "Implement Find() method".to_string(),
                "Implement Create() method".to_string(),
                "Implement Update() method with field mask".to_string(),
                "Implement Delete() method".to_string(),
                "Implement Export() method".to_string(),
                "Add reference resolution (if needed)".to_string(),
            ],
            estimated_time: "6-8 hours".to_string(),
        },
        MigrationPhase {
            phase: 6,
            name: "MockGCP Implementation".to_string(),
            description: "Create mock GCP server for testing".to_string(),
            tasks: vec![
                format!("Create {}", target_files["mockgcp_file"]),
                "Implement Get method".to_string(),
                "Implement List method".to_string(),
                "Implement Create method with LRO".to_string(),
                "Implement Update method with LRO".to_string(),
                "Implement Delete method with LRO".to_string(),
                "Add resource name parsing".to_string(),
            ],
            estimated_time: "4-6 hours".to_string(),
        },
        MigrationPhase {
            phase: 7,
            name: "Test Fixtures".to_string(),
            description: "Create test cases".to_string(),
            tasks: vec![
                format!("Create {}/", target_files["test_fixtures_dir"]),
                "Create create.yaml with initial resource".to_string(),
                "Create update.yaml with changed fields".to_string(),
                "Add _http.log for HTTP golden files".to_string(),
                "Run tests and update golden files".to_string(),
            ],
            estimated_time: "2-3 hours".to_string(),
        },
    ];

    let proto_info = Some(ProtoInfo {
        service: service.clone(),
        version: normalize_proto_version(&version),
        proto_package: format!("google.cloud.{service}.v1"),
        proto_message: resource.to_string(),
    });

    let next_action = if info.has_proto {
        "Start with Phase 2: Create API types using scaffold-types".to_string()
    } else {
        "Check Phase 1: Verify proto definitions exist".to_string()
    };

    Ok(MigrationPlan {
        resource: resource.to_string(),
        current_type: info.controller_type,
        needs_migration: true,
        phases,
        target_files,
        proto_info,
        next_action,
    })
}

/// Rewrite alpha/beta version suffixes to plain `v1` for the proto
/// package. File paths are never rewritten.
fn normalize_proto_version(version: &str) -> String {
    if version == "v1alpha1" || version == "v1beta1" {
        "v1".to_string()
    } else {
        version.to_string()
    }
}
