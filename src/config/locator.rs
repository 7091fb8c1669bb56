//! Resolution of a configuration identifier to a readable resource.
//!
//! An identifier is tried as a URL first, then against the bundled search
//! path. Only when both fail is it rejected.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use url::Url;

use super::env::PropertySource;
use super::ConfigError;

/// Identifier used when no override is configured.
pub const DEFAULT_CONFIGURATION: &str = "lealone.yaml";

/// Property key holding the identifier override.
pub const CONFIG_PROPERTY: &str = "config";

/// Prefix expected on identifiers that point at explicit files.
pub const REQUIRED_PREFIX: &str = "file://";

/// A configuration resource that can be opened for reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    File(PathBuf),
    Remote(Url),
}

impl Resource {
    /// Builds a resource from a parsed URL.
    ///
    /// `file` URLs become local paths; `http` and `https` stay remote. Any
    /// other scheme is unsupported.
    pub fn from_url(url: Url) -> io::Result<Self> {
        let scheme = url.scheme().to_string();
        match scheme.as_str() {
            "file" => url.to_file_path().map(Resource::File).map_err(|()| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("not a local file URL: {url}"),
                )
            }),
            "http" | "https" => Ok(Resource::Remote(url)),
            _ => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("unsupported URL scheme '{scheme}'"),
            )),
        }
    }

    /// Opens a fresh stream over the resource. The caller owns it.
    pub fn open(&self) -> io::Result<Box<dyn Read>> {
        match self {
            Resource::File(path) => Ok(Box::new(File::open(path)?)),
            Resource::Remote(url) => open_remote(url),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::File(path) => write!(f, "{}", path.display()),
            Resource::Remote(url) => write!(f, "{url}"),
        }
    }
}

#[cfg(feature = "remote")]
fn open_remote(url: &Url) -> io::Result<Box<dyn Read>> {
    let response = reqwest::blocking::get(url.clone())
        .and_then(|response| response.error_for_status())
        .map_err(io::Error::other)?;
    Ok(Box::new(response))
}

#[cfg(not(feature = "remote"))]
fn open_remote(url: &Url) -> io::Result<Box<dyn Read>> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("remote configuration requires the `remote` feature: {url}"),
    ))
}

/// Ordered directories searched for bundled configuration files.
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// Creates an empty search path.
    pub fn new() -> Self {
        Self::default()
    }

    /// The directories a server distribution ships its configuration in:
    /// the working directory, `./conf`, and the same pair next to the
    /// executable.
    pub fn bundled() -> Self {
        let mut path = Self::new().with_dir(".").with_dir("conf");
        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            path.push(&exe_dir);
            path.push(exe_dir.join("conf"));
        }
        path
    }

    pub fn with_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.push(dir);
        self
    }

    pub fn push(&mut self, dir: impl AsRef<Path>) {
        self.dirs.push(dir.as_ref().to_path_buf());
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Returns the first regular file named `name` under the search path.
    ///
    /// `name` must stay inside the searched directory: absolute names and
    /// names with `..` never match.
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        if name.is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        self.dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
    }
}

/// Resolves configuration identifiers to resources.
#[derive(Debug, Clone)]
pub struct Locator {
    properties: PropertySource,
    search_path: SearchPath,
}

impl Locator {
    pub fn new(properties: PropertySource, search_path: SearchPath) -> Self {
        Self {
            properties,
            search_path,
        }
    }

    /// Resolves the identifier configured through the `config` property,
    /// falling back to [`DEFAULT_CONFIGURATION`].
    pub fn locate(&self) -> Result<Resource, ConfigError> {
        let configured = self.properties.get(CONFIG_PROPERTY);
        self.resolve(configured.as_deref())
    }

    /// Resolves `identifier`, or the default identifier when `None`.
    ///
    /// A URL only counts when it actually opens; a well-formed URL to a
    /// missing file falls through to the search path like any other name.
    pub fn resolve(&self, identifier: Option<&str>) -> Result<Resource, ConfigError> {
        let identifier = identifier.unwrap_or(DEFAULT_CONFIGURATION);

        match open_url(identifier) {
            Ok(resource) => {
                debug!(%resource, "resolved configuration URL");
                return Ok(resource);
            }
            Err(e) => debug!(identifier, error = %e, "not an openable URL, trying search path"),
        }

        if let Some(path) = self.search_path.find(identifier) {
            debug!(path = %path.display(), "resolved configuration on search path");
            return Ok(Resource::File(path));
        }

        if !identifier.starts_with(REQUIRED_PREFIX) {
            return Err(ConfigError::MalformedLocator {
                property: self.properties.property_name(CONFIG_PROPERTY),
            });
        }
        Err(ConfigError::NotFound(identifier.to_string()))
    }
}

impl Default for Locator {
    fn default() -> Self {
        Self::new(PropertySource::default(), SearchPath::bundled())
    }
}

fn open_url(identifier: &str) -> io::Result<Resource> {
    let url = Url::parse(identifier)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let resource = Resource::from_url(url)?;
    // Only proving it opens; the stream is dropped here.
    resource.open()?;
    Ok(resource)
}
