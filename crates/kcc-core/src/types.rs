//! Core types for the migration assistant.
//!
//! Everything here is derived fresh from the repository file tree on each
//! query; none of these values are cached or persisted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a resource's controller is implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerType {
    /// Hand-written implementation; the migration target.
    Direct,
    /// Legacy generated implementation; presence means migration is needed.
    Terraform,
    /// No types file found in either tree.
    Unknown,
}

impl ControllerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Terraform => "terraform",
            Self::Unknown => "unknown",
        }
    }
}

/// Derived status of a single migration phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseState {
    NotStarted,
    InProgress,
    Completed,
}

impl PhaseState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

/// Semantic type tag for a new field. Closed set; anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Int64,
    Bool,
    Object,
    Array,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int64 => "int64",
            Self::Bool => "bool",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// Parse a type tag; `None` for anything outside the closed set.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(Self::String),
            "int64" => Some(Self::Int64),
            "bool" => Some(Self::Bool),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            _ => None,
        }
    }
}

/// Where a resource's files live, plus which of them exist right now.
///
/// Existence of one artifact never implies existence of another; each is an
/// independent stat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLocation {
    pub resource: String,
    pub service: String,
    pub version: String,
    /// Repo-relative path of the matched types file.
    pub types_file: String,
    pub controller_file: String,
    pub mapper_file: String,
    pub test_fixtures_dir: String,
    /// Per-artifact existence, keyed by role name.
    pub files_exist: BTreeMap<String, bool>,
    /// All types-file matches, lexicographic walk order. The first entry is
    /// the one used; more than one entry means the tie-break fired.
    pub candidates: Vec<String>,
}

/// Classification of a resource's implementation path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerTypeInfo {
    pub resource: String,
    #[serde(rename = "type")]
    pub controller_type: ControllerType,
    /// First matched types file, if any.
    pub location: Option<String>,
    pub migration_needed: bool,
    pub has_direct_types: bool,
    pub has_terraform_types: bool,
    pub has_proto: bool,
    pub proto_location: Option<String>,
    pub service: Option<String>,
    pub version: Option<String>,
}

/// Status of one phase, with per-artifact existence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseStatus {
    pub number: u8,
    pub name: String,
    pub status: PhaseState,
    pub files_exist: BTreeMap<String, bool>,
}

/// Overall migration status for a resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationStatus {
    pub resource: String,
    /// E.g. `"3/7 phases"`, or `"Migration complete"`.
    pub overall_progress: String,
    /// First non-completed phase in order, or the last phase if all done.
    pub current_phase: PhaseStatus,
    pub phases: Vec<PhaseStatus>,
    pub next_action: String,
    /// True once the first four phases (proto, types, identity, mapper)
    /// are completed.
    pub can_add_fields: bool,
}

/// One checklist entry in a migration plan. Tasks and estimates are
/// advisory prose, not verified facts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationPhase {
    pub phase: u8,
    pub name: String,
    pub description: String,
    pub tasks: Vec<String>,
    pub estimated_time: String,
}

/// Proto package identifiers inferred for a resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtoInfo {
    pub service: String,
    /// Normalized: alpha/beta suffixes rewritten to plain `v1`.
    pub version: String,
    pub proto_package: String,
    pub proto_message: String,
}

/// Complete migration plan for a resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationPlan {
    pub resource: String,
    pub current_type: ControllerType,
    pub needs_migration: bool,
    pub phases: Vec<MigrationPhase>,
    /// Target file path per artifact role.
    pub target_files: BTreeMap<String, String>,
    pub proto_info: Option<ProtoInfo>,
    pub next_action: String,
}

/// A field to insert into an existing types file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Owning resource (used for the default parent type and nested-type
    /// naming).
    pub resource: String,
    pub field_name: String,
    /// Semantic type tag. Accepted as-is at parse time and validated
    /// against the closed set ([`FieldType`]) when the field is rendered,
    /// so unknown tags are rejected with a taxonomy error rather than a
    /// deserialization failure.
    pub field_type: String,
    /// Proto field path for the annotation comment.
    pub proto_path: String,
    /// Parent struct to insert into. Defaults to `<Resource>Spec`.
    #[serde(default)]
    pub parent_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Serialized (JSON tag) name. Defaults to the field name with a
    /// lower-cased first character.
    #[serde(default)]
    pub json_name: Option<String>,
}
