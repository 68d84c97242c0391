//! NATS test infrastructure
//!
//! `TestNats` starts a core NATS server in a container and connects a client to it.

use async_nats::{Client, Subscriber};
use futures::StreamExt;
use std::time::Duration;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::nats::Nats;

/// Test NATS wrapper; the container is removed when this is dropped.
///
/// ```no_run
/// use test_utils::TestNats;
///
/// # async fn example() {
/// let nats = TestNats::new().await;
/// let mut subscriber = nats.client().subscribe("user_create").await.unwrap();
/// // ... publish through the code under test ...
/// let body = TestNats::next_payload(&mut subscriber).await;
/// # }
/// ```
pub struct TestNats {
    #[allow(dead_code)]
    container: ContainerAsync<Nats>,
    client: Client,
    pub connection_string: String,
}

impl TestNats {
    pub async fn new() -> Self {
        let container = Nats::default()
            .with_tag("2.10-alpine")
            .start()
            .await
            .expect("Failed to start NATS container");

        let host_port = container
            .get_host_port_ipv4(4222)
            .await
            .expect("Failed to get NATS port");

        let connection_string = format!("nats://127.0.0.1:{}", host_port);

        let client = async_nats::connect(&connection_string)
            .await
            .expect("Failed to connect to NATS");

        tracing::info!(port = host_port, "Test NATS ready");

        Self {
            container,
            client,
            connection_string,
        }
    }

    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// Wait up to five seconds for the next message and return its body as text.
    pub async fn next_payload(subscriber: &mut Subscriber) -> String {
        let message = tokio::time::timeout(Duration::from_secs(5), subscriber.next())
            .await
            .expect("Timeout waiting for message")
            .expect("Subscription closed");

        String::from_utf8(message.payload.to_vec()).expect("Payload is not UTF-8")
    }
}

impl Drop for TestNats {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test NATS container");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_nats_round_trip() {
        let nats = TestNats::new().await;
        let client = nats.client();

        let mut subscriber = client.subscribe("test.subject").await.unwrap();
        client.publish("test.subject", "hello".into()).await.unwrap();
        client.flush().await.unwrap();

        assert_eq!(TestNats::next_payload(&mut subscriber).await, "hello");
    }
}
