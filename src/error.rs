use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types raised while building the descriptor.
///
/// Every variant is fatal to initialization: nothing is retried and no
/// partially built descriptor is ever served.
#[derive(Error, Debug)]
pub enum Error {
    /// A required configuration field is absent
    #[error("missing required configuration field `{0}`")]
    MissingConfig(&'static str),

    /// An `apis` entry has an extension no dialect handles
    #[error("unsupported API source file {}", .0.display())]
    UnsupportedExtension(PathBuf),

    /// A source, config or UI file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A comment block does not follow the doc-comment grammar
    #[error("malformed doc comment: {0}")]
    CommentSyntax(String),

    /// A Rust source file could not be parsed
    #[error("failed to parse Rust source {}: {message}", file.display())]
    RustSyntax { file: PathBuf, message: String },

    /// A fragment body or structured source is not valid YAML
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A parsed document does not have the `path -> method -> operation` shape
    #[error("invalid fragment: {0}")]
    InvalidFragment(String),

    /// The schema registry failed to produce a JSON schema
    #[error("schema generation failed for `{name}`: {message}")]
    Schema { name: String, message: String },

    /// A configuration value is present but unusable
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Wraps an I/O error with the path that triggered it
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
