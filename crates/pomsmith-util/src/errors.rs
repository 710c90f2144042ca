use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all pomsmith operations.
#[derive(Debug, Error, Diagnostic)]
pub enum PomsmithError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed build manifest (e.g. pom.xml).
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check your pom.xml for XML syntax errors"))]
    Manifest { message: String },

    /// A version range expression could not be parsed.
    #[error("Malformed version range '{expression}': {reason}")]
    #[diagnostic(help("Ranges look like [1.0,2.0), (,3.0] or [1.5]"))]
    MalformedRange { expression: String, reason: String },

    /// No published version satisfies the nearest hard range.
    #[error("No version of {coordinate} satisfies {range}")]
    #[diagnostic(help(
        "Widen the range, check the configured repositories, or pass --fallback-version"
    ))]
    NoSatisfyingVersion { coordinate: String, range: String },

    /// A requirement chain was resolved without any constraints.
    #[error("Cannot resolve an empty requirement chain")]
    InvalidChain,

    /// Dependency resolution failed for another reason.
    #[error("Dependency resolution failed: {message}")]
    Resolution { message: String },

    /// Network request or download failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Global configuration could not be read.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check ~/.pomsmith/config.toml"))]
    Config { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type PomsmithResult<T> = miette::Result<T>;
