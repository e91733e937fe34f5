//! Shared error taxonomy for migration operations.
//!
//! Every variant carries enough context for the caller to self-correct:
//! the pattern searched, the offending identifier, or the raw external
//! output. Nothing here is retried automatically.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No artifact matched the search pattern. The message names the exact
    /// pattern attempted so the caller can check their resource name.
    #[error(
        "resource not found: {resource}\n\nsearched for: {pattern}\n\nmake sure the resource exists and has a types file"
    )]
    NotFound { resource: String, pattern: String },

    /// The operation's precondition does not hold (e.g., planning a
    /// migration for a resource that needs none, or inserting into a
    /// missing parent type).
    #[error("{0}")]
    PreconditionFailed(String),

    /// A field-type tag outside the supported closed set.
    #[error("unsupported field type: {0} (expected string, int64, bool, object, or array)")]
    UnsupportedFieldType(String),

    /// A matched path did not have the expected segment layout.
    #[error("unexpected types file path format: {0}")]
    MalformedPath(String),

    /// Service/version could not be recovered for a resource.
    #[error("could not determine service/version for {resource}")]
    MissingServiceVersion { resource: String },

    /// An external command exited nonzero. `output` is the captured
    /// combined stdout/stderr, verbatim.
    #[error("command failed: {command}\n\n{output}")]
    ExternalCommand { command: String, output: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
