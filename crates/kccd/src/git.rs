//! Git operations for the migration daemon.
//!
//! All commits go through validation: the commit message is checked
//! against the AI-attribution blocklist and (optionally) the conventional
//! commit format, and the repository's git identity must match the
//! configured author before anything is staged.

use kcc_core::config::{Config, GitAuthor};
use std::path::Path;
use std::process::Command;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("{0}")]
    Validation(String),
    #[error("git command failed: {0}")]
    CommandFailed(String),
    #[error("failed to execute git: {0}")]
    Execution(#[from] std::io::Error),
    #[error("invalid utf-8 in git output")]
    InvalidUtf8,
}

pub type Result<T> = std::result::Result<T, GitError>;

/// Terms that must never appear in a commit message, matched
/// case-insensitively. Enforced for all contributors.
const BANNED_TERMS: &[&str] = &[
    "claude",
    "anthropic",
    "gemini",
    "openai",
    "gpt",
    "chatgpt",
    "co-authored-by: claude",
    "co-authored-by: gemini",
    "co-authored-by: chatgpt",
    "noreply@anthropic.com",
    "noreply@openai.com",
    "🤖 generated",
    "ai-generated",
    "generated with claude",
    "generated with gemini",
];

const COMMIT_TYPES: &[&str] = &[
    "feat", "fix", "docs", "style", "refactor", "perf", "test", "chore",
];

/// Get the short-format status of the working tree.
pub fn status(repo_root: &Path) -> Result<String> {
    let output = Command::new("git")
        .args(["status", "--short"])
        .current_dir(repo_root)
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::CommandFailed(format!("git status: {stderr}")));
    }

    String::from_utf8(output.stdout).map_err(|_| GitError::InvalidUtf8)
}

/// Reject commit messages that attribute work to AI tooling.
pub fn validate_commit_message(message: &str) -> Result<()> {
    let lower = message.to_lowercase();
    for term in BANNED_TERMS {
        if lower.contains(term) {
            return Err(GitError::Validation(format!(
                "BLOCKED: commit message contains '{term}'\n\n\
                 AI attribution is not allowed in k8s-config-connector contributions.\n\
                 Remove all references to AI tools from commit messages.\n\n\
                 This rule is enforced for ALL contributors."
            )));
        }
    }
    Ok(())
}

/// Enforce `<type>(<scope>): <description>` on the first line.
pub fn validate_conventional_commit(message: &str) -> Result<()> {
    let first_line = message.lines().next().unwrap_or("");
    if is_conventional(first_line) {
        return Ok(());
    }
    Err(GitError::Validation(format!(
        "commit message does not follow conventional commit format.\n\n\
         Expected format: <type>(<scope>): <description>\n\n\
         Types: feat, fix, docs, style, refactor, perf, test, chore\n\
         Example: \"feat: Add defaultCustomErrorResponsePolicy to ComputeURLMap\"\n\n\
         Your message: \"{first_line}\""
    )))
}

fn is_conventional(first_line: &str) -> bool {
    for commit_type in COMMIT_TYPES {
        let Some(rest) = first_line.strip_prefix(commit_type) else {
            continue;
        };
        // Optional non-empty (scope).
        let rest = if let Some(after_paren) = rest.strip_prefix('(') {
            match after_paren.find(')') {
                Some(0) | None => continue,
                Some(close) => &after_paren[close + 1..],
            }
        } else {
            rest
        };
        if let Some(description) = rest.strip_prefix(": ") {
            if !description.is_empty() {
                return true;
            }
        }
    }
    false
}

/// Check that the repository's git identity matches the configured author.
pub fn validate_git_config(repo_root: &Path, author: &GitAuthor) -> Result<()> {
    let current_email = git_config_value(repo_root, "user.email")?;
    let current_name = git_config_value(repo_root, "user.name")?;

    if current_email != author.author_email || current_name != author.author_name {
        return Err(GitError::Validation(format!(
            "git config mismatch\n\n\
             Current in repository: {current_name} <{current_email}>\n\
             Expected from config: {} <{}>\n\n\
             Run in {}:\n  \
             git config user.email \"{}\"\n  \
             git config user.name \"{}\"",
            author.author_name,
            author.author_email,
            repo_root.display(),
            author.author_email,
            author.author_name,
        )));
    }
    Ok(())
}

fn git_config_value(repo_root: &Path, key: &str) -> Result<String> {
    let output = Command::new("git")
        .args(["config", key])
        .current_dir(repo_root)
        .output()?;

    if !output.status.success() {
        return Err(GitError::CommandFailed(format!(
            "failed to check git config {key}"
        )));
    }

    Ok(String::from_utf8(output.stdout)
        .map_err(|_| GitError::InvalidUtf8)?
        .trim()
        .to_string())
}

/// Read the author identity from git config, for use as a config fallback.
///
/// Best-effort: missing keys come back as empty strings.
pub fn read_git_author() -> GitAuthor {
    let read = |key: &str| {
        Command::new("git")
            .args(["config", key])
            .output()
            .ok()
            .filter(|o| o.status.success())
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };
    GitAuthor {
        author_name: read("user.name"),
        author_email: read("user.email"),
    }
}

/// Create a commit with a validated message and the configured identity.
///
/// Stages the given files, or everything (`git add -A`) when the list is
/// empty. The author identity is forced through the environment so a stray
/// repo-local identity cannot leak into the commit.
pub fn create_commit(config: &Config, message: &str, files: &[String]) -> Result<()> {
    if config.rules.block_ai_attribution {
        validate_commit_message(message)?;
    }
    if config.rules.require_conventional_commits {
        validate_conventional_commit(message)?;
    }
    validate_git_config(&config.repo_root, &config.author)?;

    if files.is_empty() {
        run_git(&config.repo_root, &["add", "-A"])?;
    } else {
        for file in files {
            run_git(&config.repo_root, &["add", file])?;
        }
    }

    let output = Command::new("git")
        .args(["commit", "-m", message])
        .current_dir(&config.repo_root)
        .env("GIT_AUTHOR_NAME", &config.author.author_name)
        .env("GIT_AUTHOR_EMAIL", &config.author.author_email)
        .env("GIT_COMMITTER_NAME", &config.author.author_name)
        .env("GIT_COMMITTER_EMAIL", &config.author.author_email)
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        return Err(GitError::CommandFailed(format!(
            "git commit: {stdout}{stderr}"
        )));
    }

    Ok(())
}

fn run_git(repo_root: &Path, args: &[&str]) -> Result<()> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_root)
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::CommandFailed(format!(
            "git {}: {stderr}",
            args.join(" ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_repo(name: &str, email: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        Command::new("git")
            .args(["init"])
            .current_dir(dir.path())
            .output()
            .unwrap();
        Command::new("git")
            .args(["config", "user.email", email])
            .current_dir(dir.path())
            .output()
            .unwrap();
        Command::new("git")
            .args(["config", "user.name", name])
            .current_dir(dir.path())
            .output()
            .unwrap();
        std::fs::write(dir.path().join("README.md"), "# Test").unwrap();
        Command::new("git")
            .args(["add", "."])
            .current_dir(dir.path())
            .output()
            .unwrap();
        Command::new("git")
            .args(["commit", "-m", "chore: initial commit"])
            .current_dir(dir.path())
            .output()
            .unwrap();
        dir
    }

    #[test]
    fn banned_terms_are_rejected_case_insensitively() {
        for message in [
            "feat: add field (thanks Claude)",
            "fix: Co-Authored-By: CLAUDE",
            "feat: ai-generated mapper",
            "chore: 🤖 generated",
        ] {
            let err = validate_commit_message(message).unwrap_err();
            assert!(matches!(err, GitError::Validation(_)), "{message}");
        }
    }

    #[test]
    fn clean_message_passes_attribution_check() {
        validate_commit_message("feat: add Size field to Widget").unwrap();
    }

    #[test]
    fn conventional_commit_accepts_valid_forms() {
        for message in [
            "feat: Add defaultCustomErrorResponsePolicy to ComputeURLMap",
            "fix(svcy): handle empty spec",
            "chore: bump deps",
            "refactor(locate): simplify walk",
        ] {
            validate_conventional_commit(message).unwrap();
        }
    }

    #[test]
    fn conventional_commit_rejects_invalid_forms() {
        for message in [
            "Add a field",
            "feature: something",
            "feat:missing space",
            "feat(): empty scope",
            "feat: ",
        ] {
            let err = validate_conventional_commit(message).unwrap_err();
            assert!(matches!(err, GitError::Validation(_)), "{message}");
        }
    }

    #[test]
    fn conventional_check_only_looks_at_first_line() {
        validate_conventional_commit("feat: add field\n\nfree-form body text here").unwrap();
    }

    #[test]
    fn git_config_mismatch_names_remediation_commands() {
        let dir = setup_test_repo("Other Person", "other@example.com");
        let author = GitAuthor {
            author_name: "Jo Dev".to_string(),
            author_email: "jo@example.com".to_string(),
        };

        let err = validate_git_config(dir.path(), &author).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("git config user.email \"jo@example.com\""), "{message}");
        assert!(message.contains("git config user.name \"Jo Dev\""), "{message}");
    }

    #[test]
    fn matching_git_config_passes() {
        let dir = setup_test_repo("Jo Dev", "jo@example.com");
        let author = GitAuthor {
            author_name: "Jo Dev".to_string(),
            author_email: "jo@example.com".to_string(),
        };
        validate_git_config(dir.path(), &author).unwrap();
    }

    #[test]
    fn status_reports_untracked_files() {
        let dir = setup_test_repo("Jo Dev", "jo@example.com");
        assert_eq!(status(dir.path()).unwrap().trim(), "");

        std::fs::write(dir.path().join("new.txt"), "data").unwrap();
        let out = status(dir.path()).unwrap();
        assert!(out.contains("new.txt"), "{out}");
    }

    #[test]
    fn create_commit_stages_named_files_and_commits() {
        let dir = setup_test_repo("Jo Dev", "jo@example.com");
        let config = Config::new(dir.path(), "Jo Dev", "jo@example.com");

        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();

        create_commit(&config, "feat: add a.txt only", &["a.txt".to_string()]).unwrap();

        // b.txt stays untracked.
        let out = status(dir.path()).unwrap();
        assert!(out.contains("b.txt"), "{out}");
        assert!(!out.contains("a.txt"), "{out}");

        let log = Command::new("git")
            .args(["log", "-1", "--pretty=%an <%ae> %s"])
            .current_dir(dir.path())
            .output()
            .unwrap();
        let line = String::from_utf8_lossy(&log.stdout);
        assert!(line.contains("Jo Dev <jo@example.com> feat: add a.txt only"), "{line}");
    }

    #[test]
    fn create_commit_rejects_banned_message_before_staging() {
        let dir = setup_test_repo("Jo Dev", "jo@example.com");
        let config = Config::new(dir.path(), "Jo Dev", "jo@example.com");

        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        let err = create_commit(&config, "feat: generated with claude", &[]).unwrap_err();
        assert!(matches!(err, GitError::Validation(_)));

        // Nothing was staged.
        let out = status(dir.path()).unwrap();
        assert!(out.contains("?? a.txt"), "{out}");
    }

    #[test]
    fn create_commit_skips_format_check_when_rule_disabled() {
        let dir = setup_test_repo("Jo Dev", "jo@example.com");
        let mut config = Config::new(dir.path(), "Jo Dev", "jo@example.com");
        config.rules.require_conventional_commits = false;

        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        create_commit(&config, "free-form message", &[]).unwrap();
    }
}
