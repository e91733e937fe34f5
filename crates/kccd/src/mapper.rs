//! Mapper generation.
//!
//! The KRM/proto conversion functions are produced by the repository's own
//! tooling; this module only invokes it and relays the output. The command
//! is opaque: one blocking invocation, no retries, no timeout.

use kcc_core::config::Config;
use kcc_core::error::{Error, Result};
use std::process::Command;

const MAPPER_COMMAND: &str = "./dev/tasks/generate-mapper";

/// Run `./dev/tasks/generate-mapper {resource}` in the repo root.
///
/// Returns combined stdout+stderr on success. On any failure the combined
/// output is passed through verbatim, followed by remediation guidance.
pub fn generate_mapper(config: &Config, resource: &str) -> Result<String> {
    let command_line = format!("{MAPPER_COMMAND} {resource}");

    let output = Command::new(MAPPER_COMMAND)
        .arg(resource)
        .current_dir(&config.repo_root)
        .output()
        .map_err(|e| Error::ExternalCommand {
            command: command_line.clone(),
            output: e.to_string(),
        })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if !output.status.success() {
        return Err(Error::ExternalCommand {
            command: command_line,
            output: format!(
                "Failed to generate mapper for {resource}:\n\n{combined}\n\n\
                 Make sure:\n\
                 1. Proto annotations (+kcc:proto=) are correct\n\
                 2. Proto definitions exist in mockgcp/third_party/googleapis/\n\
                 3. Field names match proto (use snake_case in annotation)"
            ),
        });
    }

    Ok(format!(
        "Mapper generated successfully for {resource}\n\n{combined}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn install_script(dir: &TempDir, body: &str) {
        let tasks = dir.path().join("dev/tasks");
        std::fs::create_dir_all(&tasks).unwrap();
        let script = tasks.join("generate-mapper");
        std::fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn test_config(dir: &TempDir) -> Config {
        Config::new(dir.path(), "Test", "test@example.com")
    }

    #[test]
    fn success_returns_combined_output() {
        let dir = TempDir::new().unwrap();
        install_script(&dir, "echo \"mapper for $1\"; echo warn >&2");
        let config = test_config(&dir);

        let out = generate_mapper(&config, "Widget").unwrap();
        assert!(out.contains("Mapper generated successfully for Widget"), "{out}");
        assert!(out.contains("mapper for Widget"), "{out}");
        assert!(out.contains("warn"), "{out}");
    }

    #[test]
    fn nonzero_exit_carries_output_and_guidance() {
        let dir = TempDir::new().unwrap();
        install_script(&dir, "echo \"no proto for $1\" >&2; exit 1");
        let config = test_config(&dir);

        let err = generate_mapper(&config, "Widget").unwrap_err();
        let Error::ExternalCommand { command, output } = err else {
            panic!("expected ExternalCommand, got {err:?}");
        };
        assert_eq!(command, "./dev/tasks/generate-mapper Widget");
        assert!(output.contains("no proto for Widget"), "{output}");
        assert!(output.contains("+kcc:proto="), "{output}");
    }

    #[test]
    fn missing_script_is_an_external_command_error() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let err = generate_mapper(&config, "Widget").unwrap_err();
        assert!(matches!(err, Error::ExternalCommand { .. }));
    }
}
