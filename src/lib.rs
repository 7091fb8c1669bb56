pub mod config;
mod error;

pub use config::{load_config, Config, ConfigError, ConfigLoader};
pub use error::Error;
