//! Fixed path templates for resource artifacts.
//!
//! The repository layout is positional: `apis/{service}/{version}/...` for
//! the direct tree, `pkg/clients/generated/apis/{service}/{version}/...`
//! for the legacy tree. All paths returned here are repo-relative with
//! forward slashes.

/// Search root for direct-controller types files.
pub const DIRECT_TREE: &str = "apis";

/// Search root for legacy (Terraform-generated) types files.
pub const LEGACY_TREE: &str = "pkg/clients/generated";

/// Search root for proto definitions.
pub const PROTO_TREE: &str = "mockgcp/third_party/googleapis";

/// Suffix that identifies a types file.
pub const TYPES_SUFFIX: &str = "types.go";

pub fn types_file(service: &str, version: &str, resource_lower: &str) -> String {
    format!("apis/{service}/{version}/{resource_lower}_types.go")
}

pub fn identity_file(service: &str, version: &str, resource_lower: &str) -> String {
    format!("apis/{service}/{version}/{resource_lower}_identity.go")
}

pub fn controller_file(service: &str, resource_lower: &str) -> String {
    format!("pkg/controller/direct/{service}/{resource_lower}_controller.go")
}

pub fn mapper_file(service: &str) -> String {
    format!("pkg/controller/direct/{service}/mapper.generated.go")
}

pub fn mockgcp_file(service: &str, resource_lower: &str) -> String {
    format!("mockgcp/mock{service}/{resource_lower}.go")
}

pub fn test_fixtures_dir(service: &str, version: &str, resource_lower: &str) -> String {
    format!("pkg/test/resourcefixture/testdata/basic/{service}/{version}/{resource_lower}")
}

pub fn create_yaml(service: &str, version: &str, resource_lower: &str) -> String {
    format!("{}/create.yaml", test_fixtures_dir(service, version, resource_lower))
}

pub fn update_yaml(service: &str, version: &str, resource_lower: &str) -> String {
    format!("{}/update.yaml", test_fixtures_dir(service, version, resource_lower))
}

/// Glob-style default proto location, used when no proto file was
/// discovered for the service.
pub fn default_proto_glob(service: &str) -> String {
    format!("mockgcp/third_party/googleapis/google/cloud/{service}/v1/*.proto")
}

/// Search pattern quoted in NotFound errors for the direct tree.
pub fn direct_search_pattern(resource_lower: &str) -> String {
    format!("apis/**/*{resource_lower}*types.go")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_substitute_all_parameters() {
        assert_eq!(
            types_file("compute", "v1beta1", "urlmap"),
            "apis/compute/v1beta1/urlmap_types.go"
        );
        assert_eq!(
            controller_file("compute", "urlmap"),
            "pkg/controller/direct/compute/urlmap_controller.go"
        );
        assert_eq!(
            mapper_file("compute"),
            "pkg/controller/direct/compute/mapper.generated.go"
        );
        assert_eq!(mockgcp_file("compute", "urlmap"), "mockgcp/mockcompute/urlmap.go");
        assert_eq!(
            create_yaml("compute", "v1beta1", "urlmap"),
            "pkg/test/resourcefixture/testdata/basic/compute/v1beta1/urlmap/create.yaml"
        );
    }

    #[test]
    fn default_proto_glob_is_v1() {
        assert_eq!(
            default_proto_glob("networkservices"),
            "mockgcp/third_party/googleapis/google/cloud/networkservices/v1/*.proto"
        );
    }

    #[test]
    fn search_pattern_names_the_resource() {
        assert_eq!(direct_search_pattern("foobar"), "apis/**/*foobar*types.go");
    }
}
