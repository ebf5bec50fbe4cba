use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::messages::Messages;

pub const DEFAULT_SERVER: &str = "http://localhost:8000";
pub const DEFAULT_API_PREFIX: &str = "debug";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1500;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Settings of the task client.
///
/// Values are layered: built-in defaults, then an optional `askbox.toml` /
/// `askbox.yaml` (or an explicit file), then `ASKBOX__*` environment
/// variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
#[readonly::make]
pub struct ClientSettings {
    /// Base URL of the job system
    pub server: String,
    /// Path prefix the job endpoints are mounted under
    pub api_prefix: String,
    pub poll_interval_ms: u64,
    pub request_timeout_secs: u64,
    pub messages: Messages,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            messages: Messages::default(),
        }
    }
}

impl ClientSettings {
    pub fn get_environment() -> Environment {
        Environment::default()
            .prefix("ASKBOX")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    /// Load settings from the default locations and the process environment
    pub fn new(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::build(config_file, Self::get_environment())
    }

    pub(crate) fn build(
        config_file: Option<&Path>,
        environment: Environment,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("askbox").required(false)),
        };

        let settings: ClientSettings = builder.add_source(environment).build()?.try_deserialize()?;
        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.trim().is_empty() {
            return Err(ConfigError::Message("server must not be empty".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Message(
                "poll_interval_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    /// Fails like a zero interval from a file or the environment would
    pub fn with_poll_interval_ms(mut self, poll_interval_ms: u64) -> Result<Self, ConfigError> {
        self.poll_interval_ms = poll_interval_ms;
        self.validate()?;
        Ok(self)
    }

    pub fn with_request_timeout_secs(mut self, request_timeout_secs: u64) -> Self {
        self.request_timeout_secs = request_timeout_secs;
        self
    }

    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
