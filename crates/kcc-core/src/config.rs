//! Configuration for the migration assistant.
//!
//! An explicit value constructed once at startup and passed by reference
//! into every operation; there is no ambient global state. Precedence for
//! each setting: environment variables > JSON config file > caller-supplied
//! fallback (the daemon supplies `git config` output for the author).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("could not parse config file {path}: {message}")]
    Parse { path: String, message: String },

    #[error(
        "git author not configured. Set either:\n\
         1. KCC_AUTHOR_EMAIL and KCC_AUTHOR_NAME environment variables, or\n\
         2. git.author_name / git.author_email in {config_path}, or\n\
         3. git config user.email and user.name"
    )]
    MissingAuthor { config_path: String },

    #[error(
        "repository path not configured. Set either:\n\
         1. KCC_REPO_PATH environment variable, or\n\
         2. kcc_repo_path in {config_path}"
    )]
    MissingRepoPath { config_path: String },
}

/// Git author identity used for commits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitAuthor {
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_email: String,
}

/// Commit rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rules {
    /// Always enforced; the file cannot disable it.
    #[serde(default = "default_true")]
    pub block_ai_attribution: bool,
    #[serde(default = "default_true")]
    pub require_conventional_commits: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            block_ai_attribution: true,
            require_conventional_commits: true,
        }
    }
}

/// On-disk shape of the JSON config file.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    git: GitAuthor,
    #[serde(default)]
    kcc_repo_path: Option<String>,
    #[serde(default)]
    rules: Option<Rules>,
}

/// Resolved configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Root of the target repository; all artifact paths are relative to it.
    pub repo_root: PathBuf,
    pub author: GitAuthor,
    pub rules: Rules,
}

impl Config {
    /// Construct directly (used by tests and embedding callers).
    pub fn new(repo_root: impl Into<PathBuf>, author_name: &str, author_email: &str) -> Self {
        Self {
            repo_root: repo_root.into(),
            author: GitAuthor {
                author_name: author_name.to_string(),
                author_email: author_email.to_string(),
            },
            rules: Rules::default(),
        }
    }

    /// Default config file location (`~/.config/kccd/config.json`).
    pub fn default_file_path() -> PathBuf {
        let home = std::env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from);
        home.join(".config/kccd/config.json")
    }

    /// Load configuration from the environment and an optional JSON file.
    ///
    /// `author_fallback` is consulted only when neither the environment nor
    /// the file supplies an author identity (the daemon passes the repo's
    /// `git config` values here).
    pub fn load(
        config_path: &Path,
        author_fallback: Option<GitAuthor>,
    ) -> Result<Self, ConfigError> {
        let file = match std::fs::read_to_string(config_path) {
            Ok(data) => {
                serde_json::from_str::<ConfigFile>(&data).map_err(|e| ConfigError::Parse {
                    path: config_path.display().to_string(),
                    message: e.to_string(),
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ConfigFile::default(),
            Err(e) => return Err(ConfigError::Read(e)),
        };

        let fallback = author_fallback.unwrap_or_default();

        let author_email = first_nonempty(&[
            std::env::var("KCC_AUTHOR_EMAIL").unwrap_or_default(),
            file.git.author_email.clone(),
            fallback.author_email,
        ]);
        let author_name = first_nonempty(&[
            std::env::var("KCC_AUTHOR_NAME").unwrap_or_default(),
            file.git.author_name.clone(),
            fallback.author_name,
        ]);
        let repo_path = first_nonempty(&[
            std::env::var("KCC_REPO_PATH").unwrap_or_default(),
            file.kcc_repo_path.clone().unwrap_or_default(),
        ]);

        if author_email.is_empty() || author_name.is_empty() {
            return Err(ConfigError::MissingAuthor {
                config_path: config_path.display().to_string(),
            });
        }
        if repo_path.is_empty() {
            return Err(ConfigError::MissingRepoPath {
                config_path: config_path.display().to_string(),
            });
        }

        let mut rules = file.rules.unwrap_or_default();
        rules.block_ai_attribution = true;

        Ok(Self {
            repo_root: PathBuf::from(repo_path),
            author: GitAuthor {
                author_name,
                author_email,
            },
            rules,
        })
    }
}

fn first_nonempty(values: &[String]) -> String {
    values
        .iter()
        .find(|v| !v.is_empty())
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, json: &str) -> PathBuf {
        let path = dir.path().join("config.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn loads_from_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "git": {"author_name": "Jo Dev", "author_email": "jo@example.com"},
                "kcc_repo_path": "/src/k8s-config-connector"
            }"#,
        );
        let config = Config::load(&path, None).unwrap();
        assert_eq!(config.author.author_name, "Jo Dev");
        assert_eq!(config.author.author_email, "jo@example.com");
        assert_eq!(config.repo_root, PathBuf::from("/src/k8s-config-connector"));
        assert!(config.rules.block_ai_attribution);
    }

    #[test]
    fn author_fallback_used_when_file_and_env_absent() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"kcc_repo_path": "/src/repo"}"#);
        let fallback = GitAuthor {
            author_name: "From Git".to_string(),
            author_email: "git@example.com".to_string(),
        };
        let config = Config::load(&path, Some(fallback)).unwrap();
        assert_eq!(config.author.author_name, "From Git");
    }

    #[test]
    fn missing_repo_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{"git": {"author_name": "Jo", "author_email": "jo@example.com"}}"#,
        );
        let result = Config::load(&path, None);
        assert!(matches!(result, Err(ConfigError::MissingRepoPath { .. })));
    }

    #[test]
    fn missing_author_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"kcc_repo_path": "/src/repo"}"#);
        let result = Config::load(&path, None);
        assert!(matches!(result, Err(ConfigError::MissingAuthor { .. })));
    }

    #[test]
    fn block_ai_attribution_cannot_be_disabled() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "git": {"author_name": "Jo", "author_email": "jo@example.com"},
                "kcc_repo_path": "/src/repo",
                "rules": {"block_ai_attribution": false, "require_conventional_commits": false}
            }"#,
        );
        let config = Config::load(&path, None).unwrap();
        assert!(config.rules.block_ai_attribution);
        assert!(!config.rules.require_conventional_commits);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "not json");
        let result = Config::load(&path, None);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
