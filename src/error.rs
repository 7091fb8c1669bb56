use crate::config::ConfigError;
use thiserror::Error;

/// Top-level error type for the lealone-config library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The resource resolved but could not be read back. The locator has
    /// already opened it once, so this is an environment fault rather than
    /// a problem with the configuration itself.
    #[error("failed to read configuration from '{origin}': {source}")]
    Read {
        origin: String,
        source: std::io::Error,
    },
}
