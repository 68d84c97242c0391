use crate::{env_optional, env_or_default, env_parse, ConfigError, FromEnv};
use std::time::Duration;

const DEFAULT_URL: &str = "nats://127.0.0.1:4222";
const DEFAULT_PUBLISH_TIMEOUT_SECS: u64 = 5;

/// Username/password pair for the broker
#[derive(Clone)]
pub struct NatsCredentials {
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for NatsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NatsCredentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// NATS connection configuration
#[derive(Clone, Debug)]
pub struct NatsConfig {
    pub url: String,
    pub credentials: Option<NatsCredentials>,
    /// Upper bound for a single publish (including flush)
    pub publish_timeout: Duration,
}

impl NatsConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials: None,
            publish_timeout: Duration::from_secs(DEFAULT_PUBLISH_TIMEOUT_SECS),
        }
    }
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

impl FromEnv for NatsConfig {
    /// Environment variables:
    /// - `NATS_URL` (default: nats://127.0.0.1:4222)
    /// - `NATS_USER` / `NATS_PASSWORD` (optional, both or neither)
    /// - `NATS_PUBLISH_TIMEOUT_SECS` (default: 5)
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_or_default("NATS_URL", DEFAULT_URL);

        let credentials = match (env_optional("NATS_USER"), env_optional("NATS_PASSWORD")) {
            (Some(user), Some(password)) => Some(NatsCredentials { user, password }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::MissingEnvVar("NATS_PASSWORD".to_string())),
            (None, Some(_)) => return Err(ConfigError::MissingEnvVar("NATS_USER".to_string())),
        };

        let timeout_secs: u64 = env_parse(
            "NATS_PUBLISH_TIMEOUT_SECS",
            &DEFAULT_PUBLISH_TIMEOUT_SECS.to_string(),
        )?;

        Ok(Self {
            url,
            credentials,
            publish_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
