use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use bursar_shared::const_config::client::{
    CLIENT_DEFAULT_REQUEST_TIMEOUT_SECS, CLIENT_DEFAULT_SERVER_ADDRESS,
};
use serde_aux::field_attributes::deserialize_number_from_string;

pub const DEFAULT_SESSION_FILE: &str = "bursar_session.json";

#[derive(serde::Deserialize, Clone, Debug, Default)]
pub struct Configuration {
    #[serde(default)]
    pub client: ClientSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ClientSettings {
    #[serde(default = "default_server_address")]
    pub server_address: String,
    #[serde(
        default = "default_request_timeout_secs",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub request_timeout_secs: u64,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct StorageSettings {
    /// Where the session is persisted between runs
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_address: default_server_address(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            session_file: default_session_file(),
        }
    }
}

fn default_server_address() -> String {
    CLIENT_DEFAULT_SERVER_ADDRESS.to_string()
}

fn default_request_timeout_secs() -> u64 {
    CLIENT_DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_session_file() -> PathBuf {
    DEFAULT_SESSION_FILE.into()
}

/// Loads the configuration from `configuration_directory` for the environment
/// named by `APP_ENVIRONMENT` (defaults to `local`)
pub fn get_configuration(
    configuration_directory: &Path,
) -> Result<Configuration, config::ConfigError> {
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    get_configuration_for(configuration_directory, environment)
}

/// `base.toml` must exist, the environment file is optional. Environment
/// variables override both, e.g. `APP_CLIENT__SERVER_ADDRESS=http://10.0.0.2:8000`
/// sets `client.server_address`
pub fn get_configuration_for(
    configuration_directory: &Path,
    environment: Environment,
) -> Result<Configuration, config::ConfigError> {
    let environment_filename = format!("{}.toml", environment.as_str());
    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.toml"),
        ))
        .add_source(
            config::File::from(configuration_directory.join(environment_filename))
                .required(false),
        )
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Configuration>()
}

/// The possible runtime environment for our application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}
