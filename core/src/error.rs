//! Error types for conversion and option loading.

use thiserror::Error;

/// Errors that can occur while converting a declaration tree or loading
/// converter options.
#[derive(Debug, Error)]
pub enum Error {
    /// A declaration kind outside the set the converter supports.
    ///
    /// Conversion aborts on the first one; no partial document is returned.
    #[error("unsupported declaration kind '{kind}' for '{dest}'")]
    UnsupportedDeclarationKind { kind: String, dest: String },

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
