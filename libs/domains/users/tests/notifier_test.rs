//! Integration tests for the NATS notifier against a real server.

use domain_users::*;
use std::time::Duration;
use test_utils::TestNats;
use uuid::Uuid;

#[tokio::test]
async fn test_created_event_publishes_id_on_user_create() {
    let nats = TestNats::new().await;
    let mut subscriber = nats.client().subscribe("user_create").await.unwrap();
    let notifier = NatsNotifier::new(nats.client(), Duration::from_secs(5));
    let id = Uuid::new_v4();

    notifier.notify(UserEvent::Created, id).await.unwrap();

    assert_eq!(TestNats::next_payload(&mut subscriber).await, id.to_string());
}

#[tokio::test]
async fn test_each_event_uses_its_own_subject() {
    let nats = TestNats::new().await;
    let client = nats.client();
    let mut updates = client.subscribe("user_update").await.unwrap();
    let mut deletes = client.subscribe("user_delete").await.unwrap();
    let notifier = NatsNotifier::new(client, Duration::from_secs(5));

    let updated = Uuid::new_v4();
    let deleted = Uuid::new_v4();
    notifier.notify(UserEvent::Updated, updated).await.unwrap();
    notifier.notify(UserEvent::Deleted, deleted).await.unwrap();

    assert_eq!(TestNats::next_payload(&mut updates).await, updated.to_string());
    assert_eq!(TestNats::next_payload(&mut deletes).await, deleted.to_string());
}

#[tokio::test]
async fn test_service_store_announces_new_id() {
    let nats = TestNats::new().await;
    let mut subscriber = nats.client().subscribe("user_create").await.unwrap();
    let service = UserService::new(
        InMemoryUserRepository::new(),
        NatsNotifier::new(nats.client(), Duration::from_secs(5)),
    );

    let id = service
        .store(InputUser {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            nickname: "ada".into(),
            password: "password1".into(),
            email: "ada@example.com".into(),
            country: "gb".into(),
        })
        .await
        .unwrap();

    assert_eq!(TestNats::next_payload(&mut subscriber).await, id.to_string());
}
