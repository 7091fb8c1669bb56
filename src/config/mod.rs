//! Configuration loading and validation.

mod checker;
mod env;
mod error;
mod loader;
mod locator;
mod model;
mod schema;

pub use checker::unknown_properties;
pub use env::PropertySource;
pub use error::ConfigError;
pub use loader::{load_config, load_from, parse, ConfigLoader};
pub use locator::{
    Locator, Resource, SearchPath, CONFIG_PROPERTY, DEFAULT_CONFIGURATION, REQUIRED_PREFIX,
};
pub use model::{Config, EncryptionOptions, PluggableEngineDef};
pub use schema::{Described, Field, Schema, Shape};
