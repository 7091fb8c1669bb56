use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_yaml::Value;
use tracing::info;

use super::checker::{strip_nulls, unknown_properties};
use super::env::PropertySource;
use super::locator::{Locator, Resource, SearchPath};
use super::model::Config;
use super::schema::Described;
use super::ConfigError;
use crate::Error;

/// Builder for locating and loading the server configuration.
///
/// The identifier is taken, in order, from [`with_identifier`](Self::with_identifier),
/// the `lealone.config` property (`LEALONE_CONFIG`), or the default
/// `lealone.yaml`. It may be a `file://` or `http(s)://` URL, or a name
/// looked up on the search path.
///
/// ## Example
///
/// ```no_run
/// use lealone_config::{Config, ConfigLoader};
///
/// let config: Config = ConfigLoader::builder()
///     .with_search_dir("/opt/lealone/conf")
///     .load()?;
/// # Ok::<(), lealone_config::Error>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .load() is called"]
pub struct ConfigLoader {
    identifier: Option<String>,
    properties: PropertySource,
    search_path: Option<SearchPath>,
}

impl ConfigLoader {
    /// Creates a loader that reads `LEALONE_CONFIG` and searches the
    /// bundled directories.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Overrides the identifier, ignoring the `config` property.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Reads the identifier override from a different property source.
    pub fn with_properties(mut self, properties: PropertySource) -> Self {
        self.properties = properties;
        self
    }

    /// Appends a directory to the search path.
    ///
    /// The first call replaces the bundled default directories.
    pub fn with_search_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.search_path
            .get_or_insert_with(SearchPath::new)
            .push(dir);
        self
    }

    /// Replaces the search path.
    pub fn with_search_path(mut self, search_path: SearchPath) -> Self {
        self.search_path = Some(search_path);
        self
    }

    /// Resolves the configured identifier without reading it.
    pub fn locate(&self) -> Result<Resource, ConfigError> {
        let locator = Locator::new(
            self.properties.clone(),
            self.search_path.clone().unwrap_or_else(SearchPath::bundled),
        );
        match self.identifier.as_deref() {
            Some(identifier) => locator.resolve(Some(identifier)),
            None => locator.locate(),
        }
    }

    /// Locates, reads, and validates the configuration.
    pub fn load<T: DeserializeOwned + Described>(&self) -> Result<T, Error> {
        let resource = self.locate()?;
        load_from(&resource)
    }
}

/// Loads the server [`Config`] using the default identifier resolution.
pub fn load_config() -> Result<Config, Error> {
    ConfigLoader::builder().load()
}

/// Reads `resource` fully and validates it as `T`.
///
/// Failing to read a resource that resolved is reported as [`Error::Read`],
/// not as a configuration error.
pub fn load_from<T: DeserializeOwned + Described>(resource: &Resource) -> Result<T, Error> {
    info!("Loading settings from {resource}");

    let origin = resource.to_string();
    let read_error = |source| Error::Read {
        origin: origin.clone(),
        source,
    };

    let mut bytes = Vec::new();
    {
        let mut stream = resource.open().map_err(read_error)?;
        stream.read_to_end(&mut bytes).map_err(read_error)?;
    }

    Ok(parse(&bytes, &origin)?)
}

/// Parses a YAML document as `T`, rejecting properties `T` does not declare.
///
/// Unknown names are gathered over the whole document before failing, so
/// the error lists all of them at once.
pub fn parse<T: DeserializeOwned + Described>(bytes: &[u8], origin: &str) -> Result<T, ConfigError> {
    let invalid = |source| ConfigError::InvalidDocument {
        origin: origin.to_string(),
        source,
    };

    let mut document: Value = serde_yaml::from_slice(bytes).map_err(invalid)?;
    document.apply_merge().map_err(invalid)?;
    if document.is_null() {
        document = Value::Mapping(Default::default());
    }

    let unknown = unknown_properties(&document, T::schema());
    strip_nulls(&mut document, T::schema());
    let config = serde_yaml::from_value(document).map_err(invalid)?;

    if !unknown.is_empty() {
        return Err(ConfigError::UnknownProperties {
            origin: origin.to_string(),
            names: unknown.into_iter().collect(),
        });
    }
    Ok(config)
}
