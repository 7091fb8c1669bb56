use thiserror::Error;

/// The single configuration error kind.
///
/// Every variant aborts server startup; none is retried by the loader.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error(
        "expecting URI in variable [{property}]; please prefix the file with file:/// \
         for local files or file://<server>/ for remote files"
    )]
    MalformedLocator { property: String },

    #[error(
        "cannot locate {0}; if this is a local file, please confirm you've provided \
         file:/// as a URI prefix"
    )]
    NotFound(String),

    #[error("invalid yaml in {origin}: {source}")]
    InvalidDocument {
        origin: String,
        source: serde_yaml::Error,
    },

    #[error("invalid yaml: please remove properties [{}] from {origin}", .names.join(", "))]
    UnknownProperties { origin: String, names: Vec<String> },
}
