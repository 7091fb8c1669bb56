//! The server configuration read from `lealone.yaml`.

use std::collections::BTreeMap;

use serde::{de, Deserialize, Deserializer, Serialize};

use super::schema::{Described, Field, Schema};

/// Root of the server configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_dir: String,
    pub listen_address: String,
    pub scheduler: Option<PluggableEngineDef>,
    pub sql_engines: Vec<PluggableEngineDef>,
    pub storage_engines: Vec<PluggableEngineDef>,
    pub transaction_engines: Vec<PluggableEngineDef>,
    pub protocol_server_engines: Vec<PluggableEngineDef>,
    pub server_encryption_options: Option<EncryptionOptions>,
    pub client_encryption_options: Option<EncryptionOptions>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: "./lealone_data".to_string(),
            listen_address: "127.0.0.1".to_string(),
            scheduler: None,
            sql_engines: Vec::new(),
            storage_engines: Vec::new(),
            transaction_engines: Vec::new(),
            protocol_server_engines: Vec::new(),
            server_encryption_options: None,
            client_encryption_options: None,
        }
    }
}

impl Config {
    pub fn sql_engine(&self, name: &str) -> Option<&PluggableEngineDef> {
        find_engine(&self.sql_engines, name)
    }

    pub fn storage_engine(&self, name: &str) -> Option<&PluggableEngineDef> {
        find_engine(&self.storage_engines, name)
    }

    pub fn transaction_engine(&self, name: &str) -> Option<&PluggableEngineDef> {
        find_engine(&self.transaction_engines, name)
    }

    pub fn protocol_server_engine(&self, name: &str) -> Option<&PluggableEngineDef> {
        find_engine(&self.protocol_server_engines, name)
    }
}

fn find_engine<'a>(engines: &'a [PluggableEngineDef], name: &str) -> Option<&'a PluggableEngineDef> {
    engines.iter().find(|e| e.name.eq_ignore_ascii_case(name))
}

/// A swappable backend component.
///
/// `parameters` is free-form: its keys are interpreted by the engine, not by
/// the configuration loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluggableEngineDef {
    pub name: String,
    pub enabled: bool,
    #[serde(deserialize_with = "string_map")]
    pub parameters: BTreeMap<String, String>,
}

impl Default for PluggableEngineDef {
    fn default() -> Self {
        Self {
            name: String::new(),
            enabled: true,
            parameters: BTreeMap::new(),
        }
    }
}

impl PluggableEngineDef {
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncryptionOptions {
    pub enabled: bool,
    pub keystore: Option<String>,
    pub keystore_password: Option<String>,
    pub truststore: Option<String>,
    pub truststore_password: Option<String>,
    pub cipher_suites: Vec<String>,
    pub protocol: Option<String>,
    pub algorithm: Option<String>,
    pub store_type: Option<String>,
    pub require_client_auth: bool,
}

/// Reads a string-to-string map, rendering scalar values as strings.
///
/// `port: 9210` is as valid as `port: "9210"`; nested collections are not.
fn string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, serde_yaml::Value>>::deserialize(deserializer)?;
    raw.unwrap_or_default()
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Null => String::new(),
                _ => {
                    return Err(<D::Error as de::Error>::custom(format!(
                        "parameter '{key}' must be a scalar value"
                    )))
                }
            };
            Ok((key, value))
        })
        .collect()
}

static ENGINE_SCHEMA: Schema = Schema::new(
    "PluggableEngineDef",
    &[
        Field::value("name"),
        Field::value("enabled"),
        Field::open_map("parameters"),
    ],
);

static ENCRYPTION_SCHEMA: Schema = Schema::new(
    "EncryptionOptions",
    &[
        Field::value("enabled"),
        Field::value("keystore"),
        Field::value("keystore_password"),
        Field::value("truststore"),
        Field::value("truststore_password"),
        Field::value("cipher_suites"),
        Field::value("protocol"),
        Field::value("algorithm"),
        Field::value("store_type"),
        Field::value("require_client_auth"),
    ],
);

static CONFIG_SCHEMA: Schema = Schema::new(
    "Config",
    &[
        Field::value("base_dir"),
        Field::value("listen_address"),
        Field::object("scheduler", &ENGINE_SCHEMA),
        Field::list("sql_engines", &ENGINE_SCHEMA),
        Field::list("storage_engines", &ENGINE_SCHEMA),
        Field::list("transaction_engines", &ENGINE_SCHEMA),
        Field::list("protocol_server_engines", &ENGINE_SCHEMA),
        Field::object("server_encryption_options", &ENCRYPTION_SCHEMA),
        Field::object("client_encryption_options", &ENCRYPTION_SCHEMA),
    ],
);

impl Described for Config {
    fn schema() -> &'static Schema {
        &CONFIG_SCHEMA
    }
}

impl Described for PluggableEngineDef {
    fn schema() -> &'static Schema {
        &ENGINE_SCHEMA
    }
}

impl Described for EncryptionOptions {
    fn schema() -> &'static Schema {
        &ENCRYPTION_SCHEMA
    }
}
