use std::path::PathBuf;

/// Errors raised by the glue around the diff core.
///
/// Parsing and classification never fail; these variants cover the
/// collaborators: filesystem, configuration, git and text generation.
/// Library crates return this type directly; the binary converts it into a
/// `miette` report at the boundary.
///
/// # Examples
///
/// ```
/// use scenarist_core::ScenaristError;
///
/// let err = ScenaristError::Config("missing generator command".into());
/// assert!(err.to_string().contains("missing generator command"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ScenaristError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    #[diagnostic(code(scenarist::io))]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    #[diagnostic(code(scenarist::config))]
    Config(String),

    /// Git operation failure.
    #[error("git error: {0}")]
    #[diagnostic(code(scenarist::git))]
    Git(String),

    /// The text-generation collaborator failed. The message is opaque.
    #[error("generation error: {0}")]
    #[diagnostic(code(scenarist::generation))]
    Generation(String),

    /// JSON serialization failure.
    #[error("serialization error: {0}")]
    #[diagnostic(code(scenarist::serialization))]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    #[diagnostic(code(scenarist::toml))]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    #[diagnostic(code(scenarist::file_not_found))]
    FileNotFound(PathBuf),
}
