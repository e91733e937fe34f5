//! Field inserter.
//!
//! A text-level editor that appends a new field to an existing Go struct
//! declaration without parsing Go. The struct-location heuristic is a
//! deliberate, documented limitation of the source system and is kept as
//! the contract here, isolated behind [`InsertionStrategy`] so a real
//! parser-backed implementation can drop in without changing callers.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{FieldSpec, FieldType};

/// Locates where a new field should be inserted in a types file.
///
/// Returns the line index at which to splice the new field block, or None
/// if the parent type cannot be located unambiguously.
pub trait InsertionStrategy {
    fn insertion_point(&self, content: &str, parent_type: &str) -> Option<usize>;
}

/// Production strategy: line-scan for `type <Parent> struct {`, track the
/// last line carrying a json serialization tag, and insert immediately
/// after it once the closing `}` line is reached. New fields always land
/// as the last field; no semantic ordering is attempted.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagScanStrategy;

impl InsertionStrategy for TagScanStrategy {
    fn insertion_point(&self, content: &str, parent_type: &str) -> Option<usize> {
        let open_marker = format!("type {parent_type} struct {{");
        let mut in_struct = false;
        let mut last_field_line: Option<usize> = None;

        for (i, line) in content.split('\n').enumerate() {
            if line.contains(&open_marker) {
                in_struct = true;
                continue;
            }
            if in_struct {
                if line.contains("`json:") {
                    last_field_line = Some(i);
                }
                if line.trim() == "}" {
                    // Empty struct: insert just before the closing brace.
                    return Some(last_field_line.map_or(i, |l| l + 1));
                }
            }
        }
        None
    }
}

/// Insert a field into a types file using the default strategy.
///
/// Returns the rendered field block. On success the file is rewritten in
/// place; every line outside the inserted block is preserved byte for
/// byte.
pub fn add_field(config: &Config, types_file: &str, spec: &FieldSpec) -> Result<String> {
    add_field_with(config, types_file, spec, &TagScanStrategy)
}

/// Insert a field using an explicit insertion strategy.
pub fn add_field_with(
    config: &Config,
    types_file: &str,
    spec: &FieldSpec,
    strategy: &dyn InsertionStrategy,
) -> Result<String> {
    // Reject unsupported type tags before touching the file.
    let go_type = go_type_for(spec)?;

    let path = config.repo_root.join(types_file);
    let content = std::fs::read_to_string(&path)?;
    let json_name = spec
        .json_name
        .clone()
        .unwrap_or_else(|| lower_first(&spec.field_name));
    let block = render_field_block(spec, &go_type, &json_name);

    let parent_type = spec
        .parent_type
        .clone()
        .unwrap_or_else(|| format!("{}Spec", spec.resource));

    let Some(at) = strategy.insertion_point(&content, &parent_type) else {
        return Err(Error::PreconditionFailed(format!(
            "could not find parent type: {parent_type}\n\nMake sure the type exists in {types_file}"
        )));
    };

    let lines: Vec<&str> = content.split('\n').collect();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + 1);
    out.extend_from_slice(&lines[..at]);
    out.push(&block);
    out.extend_from_slice(&lines[at..]);
    let rewritten = out.join("\n");

    std::fs::write(&path, rewritten)?;
    Ok(block)
}

/// Fixed mapping from semantic type tags to declared Go types. Scalars are
/// nullable; arrays default to a sequence of strings; objects reference a
/// nested type named `<Resource>_<FieldName>`. Tags outside the closed set
/// are an `UnsupportedFieldType` error naming the tag.
fn go_type_for(spec: &FieldSpec) -> Result<String> {
    let Some(field_type) = FieldType::from_tag(&spec.field_type) else {
        return Err(Error::UnsupportedFieldType(spec.field_type.clone()));
    };
    match field_type {
        FieldType::String => Ok("*string".to_string()),
        FieldType::Int64 => Ok("*int64".to_string()),
        FieldType::Bool => Ok("*bool".to_string()),
        FieldType::Array => Ok("[]string".to_string()),
        FieldType::Object => Ok(format!("*{}_{}", spec.resource, spec.field_name)),
    }
}

/// Render the field block: optional description comment, the mandatory
/// proto annotation, and the field line itself. Tab-indented to match the
/// surrounding struct body.
fn render_field_block(spec: &FieldSpec, go_type: &str, json_name: &str) -> String {
    let mut lines = Vec::new();
    if let Some(description) = &spec.description {
        lines.push(format!("\t// {description}"));
    }
    lines.push(format!("\t// +kcc:proto={}", spec.proto_path));
    lines.push(format!(
        "\t{} {} `json:\"{},omitempty\"`",
        spec.field_name, go_type, json_name
    ));
    lines.join("\n")
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
