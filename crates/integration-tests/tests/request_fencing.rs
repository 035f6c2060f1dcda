//! Stale-response fencing.
//!
//! When a newer request is dispatched on a store before an older one
//! resolves, the older response is discarded: its invocation resolves as
//! `Superseded` and slice state reflects only the newer response.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use tutorhub_core::Role;
use tutorhub_integration_tests::StubApi;
use tutorhub_portal::api::ApiClient;
use tutorhub_portal::store::{AssignmentStore, StoreError};

#[tokio::test]
async fn test_slow_stale_listing_never_overwrites_fresher_state() {
    let stub = StubApi::new();
    let student = stub.seed_user("Sam Student", "sam@example.com", Role::Student);
    let subject = stub.seed_subject("Algebra");
    let id = stub.seed_assignment("Algebra HW", student, subject);

    let base_url = stub.spawn().await;
    let api = ApiClient::new(base_url).expect("api client");
    let token = SecretString::from(StubApi::token_for(student));

    let store = Arc::new(AssignmentStore::new());

    // Slow listing request, then a fast detail request issued after it.
    stub.set_delay("list_assignments", Duration::from_millis(200));
    let slow = {
        let store = Arc::clone(&store);
        let api = api.clone();
        let token = token.clone();
        tokio::spawn(async move { store.fetch_all(&api, &token).await })
    };

    // Give the slow request time to be dispatched before the fast one.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let fresh = store
        .fetch_by_id(&api, &token, id)
        .await
        .expect("fresh fetch");

    let stale = slow.await.expect("join");
    assert!(matches!(stale, Err(StoreError::Superseded)));

    // The stale listing was discarded: the collection it would have filled
    // stays empty while the fresher detail response survives.
    let snapshot = store.snapshot().await;
    assert!(snapshot.assignments.is_empty());
    assert_eq!(snapshot.current.as_ref().map(|a| a.id), Some(fresh.id));
    assert!(snapshot.phase.error.is_none());
}

#[tokio::test]
async fn test_latest_of_two_listings_wins() {
    let stub = StubApi::new();
    let student = stub.seed_user("Sam Student", "sam@example.com", Role::Student);
    let subject = stub.seed_subject("Algebra");
    stub.seed_assignment("Algebra HW", student, subject);

    let base_url = stub.spawn().await;
    let api = ApiClient::new(base_url).expect("api client");
    let token = SecretString::from(StubApi::token_for(student));

    let store = Arc::new(AssignmentStore::new());

    stub.set_delay("list_assignments", Duration::from_millis(200));
    let slow = {
        let store = Arc::clone(&store);
        let api = api.clone();
        let token = token.clone();
        tokio::spawn(async move { store.fetch_all(&api, &token).await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    stub.clear_delay("list_assignments");

    // A record arrives between the two dispatches; only the newer listing
    // may land.
    stub.seed_assignment("Geometry HW", student, subject);
    let fresh = store.fetch_all(&api, &token).await.expect("fresh listing");
    assert_eq!(fresh.len(), 2);

    let stale = slow.await.expect("join");
    assert!(matches!(stale, Err(StoreError::Superseded)));
    assert_eq!(store.snapshot().await.assignments.len(), 2);
}
