//! Mutation notifications over NATS.
//!
//! Each create, update and delete publishes the user id as a plain-text body
//! to a fixed subject. Publishing is best-effort: one attempt, bounded by a
//! timeout, with failures reported to the caller as [`NotifyError`].

use async_nats::connection::State;
use async_trait::async_trait;
use core_config::nats::NatsConfig;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserEvent {
    Created,
    Updated,
    Deleted,
}

impl UserEvent {
    pub const fn subject(&self) -> &'static str {
        match self {
            UserEvent::Created => "user_create",
            UserEvent::Updated => "user_update",
            UserEvent::Deleted => "user_delete",
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("broker unreachable: {0}")]
    Connectivity(String),

    #[error("publish timed out after {0:?}")]
    Timeout(Duration),

    #[error("publish failed: {0}")]
    Publish(String),
}

/// Publishes mutation events
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: UserEvent, id: Uuid) -> Result<(), NotifyError>;
}

/// Connect to NATS using the configured URL and optional credentials.
pub async fn connect(config: &NatsConfig) -> Result<async_nats::Client, async_nats::ConnectError> {
    let mut options = async_nats::ConnectOptions::new().name(env!("CARGO_PKG_NAME"));
    if let Some(credentials) = &config.credentials {
        options = options.user_and_password(
            credentials.user.clone(),
            credentials.password.clone(),
        );
    }

    let client = options.connect(config.url.as_str()).await?;
    info!(url = %config.url, "Connected to NATS");
    Ok(client)
}

/// Notifier backed by a shared NATS client
#[derive(Clone)]
pub struct NatsNotifier {
    client: async_nats::Client,
    timeout: Duration,
}

impl NatsNotifier {
    pub fn new(client: async_nats::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    async fn publish(&self, subject: &'static str, payload: String) -> Result<(), NotifyError> {
        self.client
            .publish(subject, payload.into())
            .await
            .map_err(|e| NotifyError::Publish(e.to_string()))?;
        self.client
            .flush()
            .await
            .map_err(|e| NotifyError::Publish(e.to_string()))
    }
}

#[async_trait]
impl Notifier for NatsNotifier {
    #[instrument(skip(self), fields(subject = event.subject()))]
    async fn notify(&self, event: UserEvent, id: Uuid) -> Result<(), NotifyError> {
        let state = self.client.connection_state();
        if !matches!(state, State::Connected) {
            let err = NotifyError::Connectivity(format!("connection state is {state:?}"));
            error!(user_id = %id, "Failed to publish event: {}", err);
            return Err(err);
        }

        let result = match tokio::time::timeout(
            self.timeout,
            self.publish(event.subject(), id.to_string()),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(NotifyError::Timeout(self.timeout)),
        };

        match &result {
            Ok(()) => info!(user_id = %id, "Published event"),
            Err(e) => error!(user_id = %id, "Failed to publish event: {}", e),
        }
        result
    }
}
