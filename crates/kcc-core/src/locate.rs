//! Artifact locator.
//!
//! Finds the types file for a resource under the direct tree and computes
//! the expected locations of every other artifact from fixed path
//! templates. Existence is re-checked on every call; nothing is cached.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::paths;
use crate::types::ResourceLocation;
use std::collections::BTreeMap;
use std::path::Path;

/// Locate the files for a resource.
///
/// The resource name is matched case-insensitively against types-file
/// names under `apis/`. When multiple files match, the lexicographically
/// first in directory-walk order is used; the full candidate list is
/// returned so callers can detect the tie-break.
pub fn find_resource(config: &Config, resource: &str) -> Result<ResourceLocation> {
    let resource_lower = resource.to_lowercase();

    let candidates = search_tree(
        &config.repo_root,
        paths::DIRECT_TREE,
        &resource_lower,
        paths::TYPES_SUFFIX,
    )?;

    let Some(types_file) = candidates.first().cloned() else {
        return Err(Error::NotFound {
            resource: resource.to_string(),
            pattern: paths::direct_search_pattern(&resource_lower),
        });
    };

    // Parse apis/{service}/{version}/{resource}_types.go
    let parts: Vec<&str> = types_file.split('/').collect();
    if parts.len() < 4 {
        return Err(Error::MalformedPath(types_file));
    }
    let service = parts[1].to_string();
    let version = parts[2].to_string();
    let resource_name = parts[3].trim_end_matches("_types.go").to_string();

    let controller_file = paths::controller_file(&service, &resource_name);
    let mapper_file = paths::mapper_file(&service);
    let test_fixtures_dir = paths::test_fixtures_dir(&service, &version, &resource_name);

    let mut files_exist = BTreeMap::new();
    files_exist.insert("types".to_string(), exists(&config.repo_root, &types_file));
    files_exist.insert(
        "controller".to_string(),
        exists(&config.repo_root, &controller_file),
    );
    files_exist.insert("mapper".to_string(), exists(&config.repo_root, &mapper_file));
    files_exist.insert(
        "test_fixtures".to_string(),
        exists(&config.repo_root, &test_fixtures_dir),
    );

    Ok(ResourceLocation {
        resource: resource_name,
        service,
        version,
        types_file,
        controller_file,
        mapper_file,
        test_fixtures_dir,
        files_exist,
        candidates,
    })
}

/// Check whether a repo-relative file or directory exists.
pub fn exists(repo_root: &Path, rel: &str) -> bool {
    repo_root.join(rel).exists()
}

/// Walk `root/tree` depth-first with sorted directory entries, collecting
/// repo-relative paths whose file name contains `needle` and ends with
/// `suffix`. A missing tree root yields an empty result, not an error.
pub fn search_tree(
    root: &Path,
    tree: &str,
    needle: &str,
    suffix: &str,
) -> Result<Vec<String>> {
    let start = root.join(tree);
    if !start.is_dir() {
        return Ok(Vec::new());
    }
    let mut matches = Vec::new();
    walk(&start, root, needle, suffix, &mut matches)?;
    Ok(matches)
}

fn walk(
    dir: &Path,
    root: &Path,
    needle: &str,
    suffix: &str,
    matches: &mut Vec<String>,
) -> Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|e| e.path())
        .collect();
    // Sorted for a deterministic lexicographic walk order.
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk(&path, root, needle, suffix, matches)?;
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            let lower = name.to_lowercase();
            if lower.contains(needle) && lower.ends_with(suffix) {
                if let Ok(rel) = path.strip_prefix(root) {
                    matches.push(rel.to_string_lossy().replace('\\', "/"));
                }
            }
        }
    }
    Ok(())
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
    fn finds_types_file_and_parses_segments() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "apis/svcx/v1/foobar_types.go");
        let config = test_config(&dir);

        let loc = find_resource(&config, "FooBar").unwrap();
        assert_eq!(loc.resource, "foobar");
        assert_eq!(loc.service, "svcx");
        assert_eq!(loc.version, "v1");
        assert_eq!(loc.types_file, "apis/svcx/v1/foobar_types.go");
        assert_eq!(
            loc.controller_file,
            "pkg/controller/direct/svcx/foobar_controller.go"
        );
        assert!(loc.files_exist["types"]);
        assert!(!loc.files_exist["controller"]);
        assert!(!loc.files_exist["mapper"]);
        assert!(!loc.files_exist["test_fixtures"]);
    }

    #[test]
    fn existence_flags_are_independent() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "apis/svcx/v1/foobar_types.go");
        touch(dir.path(), "pkg/controller/direct/svcx/mapper.generated.go");
        let config = test_config(&dir);

        let loc = find_resource(&config, "foobar").unwrap();
        assert!(loc.files_exist["types"]);
        assert!(loc.files_exist["mapper"]);
        assert!(!loc.files_exist["controller"]);
    }

    #[test]
    fn missing_resource_reports_search_pattern() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("apis")).unwrap();
        let config = test_config(&dir);

        let err = find_resource(&config, "Nothing").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("apis/**/*nothing*types.go"), "{message}");
    }

    #[test]
    fn tie_break_picks_first_in_walk_order() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "apis/svcb/v1/widget_types.go");
        touch(dir.path(), "apis/svca/v1/widget_types.go");
        let config = test_config(&dir);

        let loc = find_resource(&config, "Widget").unwrap();
        assert_eq!(loc.types_file, "apis/svca/v1/widget_types.go");
        assert_eq!(loc.candidates.len(), 2);
    }

    #[test]
    fn match_is_case_insensitive_on_filenames() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "apis/svcx/v1/foobar_types.go");
        let config = test_config(&dir);

        assert!(find_resource(&config, "FOOBAR").is_ok());
        assert!(find_resource(&config, "fooBar").is_ok());
    }

    #[test]
    fn empty_tree_root_is_not_found_not_io_error() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let err = find_resource(&config, "Widget").unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
