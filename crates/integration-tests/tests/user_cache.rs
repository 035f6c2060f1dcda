//! TTL cache behavior of the user and tutor listings.
//!
//! A non-forced fetch that hits a fresh cache entry performs no network
//! call; a forced fetch always goes to the network; invalidation and TTL
//! expiry both drop the entry.

use std::time::Duration;

use secrecy::SecretString;

use tutorhub_core::{Role, UserId};
use tutorhub_integration_tests::StubApi;
use tutorhub_portal::api::ApiClient;
use tutorhub_portal::store::UserStore;

async fn harness() -> (StubApi, ApiClient, SecretString) {
    let stub = StubApi::new();
    let admin = stub.seed_user("Ada Admin", "ada@example.com", Role::Admin);
    stub.seed_user("Tina Tutor", "tina@example.com", Role::Tutor);
    stub.seed_user("Sam Student", "sam@example.com", Role::Student);

    let base_url = stub.spawn().await;
    let api = ApiClient::new(base_url).expect("api client");
    let token = SecretString::from(StubApi::token_for(admin));
    (stub, api, token)
}

#[tokio::test]
async fn test_fresh_cache_entry_skips_the_network() {
    let (stub, api, token) = harness().await;
    let store = UserStore::new();

    let first = store.fetch_all(&api, &token, false).await.expect("fetch");
    assert_eq!(stub.hits("list_users"), 1);

    // Same listing, no second request.
    let second = store.fetch_all(&api, &token, false).await.expect("cached");
    assert_eq!(stub.hits("list_users"), 1);
    assert_eq!(first, second);
    assert_eq!(store.snapshot().await.users, second);
}

#[tokio::test]
async fn test_forced_fetch_always_goes_to_the_network() {
    let (stub, api, token) = harness().await;
    let store = UserStore::new();

    store.fetch_all(&api, &token, false).await.expect("fetch");
    store.fetch_all(&api, &token, true).await.expect("forced");
    assert_eq!(stub.hits("list_users"), 2);
}

#[tokio::test]
async fn test_forced_fetch_observes_new_registrations() {
    let (stub, api, token) = harness().await;
    let store = UserStore::new();

    let before = store.fetch_all(&api, &token, false).await.expect("fetch");
    stub.seed_user("New Tutor", "new@example.com", Role::Tutor);

    // Cached entry still reflects the old listing.
    let cached = store.fetch_all(&api, &token, false).await.expect("cached");
    assert_eq!(cached.len(), before.len());

    let forced = store.fetch_all(&api, &token, true).await.expect("forced");
    assert_eq!(forced.len(), before.len() + 1);
}

#[tokio::test]
async fn test_invalidate_drops_both_listings() {
    let (stub, api, token) = harness().await;
    let store = UserStore::new();

    store.fetch_all(&api, &token, false).await.expect("users");
    store.fetch_tutors(&api, &token, false).await.expect("tutors");
    assert_eq!(stub.hits("list_users"), 1);
    assert_eq!(stub.hits("list_tutors"), 1);

    store.invalidate().await;

    store.fetch_all(&api, &token, false).await.expect("users again");
    store.fetch_tutors(&api, &token, false).await.expect("tutors again");
    assert_eq!(stub.hits("list_users"), 2);
    assert_eq!(stub.hits("list_tutors"), 2);
}

#[tokio::test]
async fn test_ttl_expiry_refetches() {
    let (stub, api, token) = harness().await;
    let store = UserStore::with_ttl(Duration::from_millis(50));

    store.fetch_all(&api, &token, false).await.expect("fetch");
    assert_eq!(stub.hits("list_users"), 1);

    tokio::time::sleep(Duration::from_millis(80)).await;

    store.fetch_all(&api, &token, false).await.expect("refetch");
    assert_eq!(stub.hits("list_users"), 2);
}

#[tokio::test]
async fn test_tutor_listing_contains_only_tutors() {
    let (_stub, api, token) = harness().await;
    let store = UserStore::new();

    let tutors = store.fetch_tutors(&api, &token, false).await.expect("tutors");
    assert_eq!(tutors.len(), 1);
    assert!(tutors.iter().all(|u| u.role == Role::Tutor));
}

#[tokio::test]
async fn test_fetch_me_returns_the_authenticated_profile() {
    let (stub, api, _token) = harness().await;
    // Log in as the student instead of the admin.
    let student_token = SecretString::from(StubApi::token_for(UserId::new(3)));
    let store = UserStore::new();

    let me = store.fetch_me(&api, &student_token).await.expect("me");
    assert_eq!(me.name, "Sam Student");
    assert_eq!(stub.hits("users_me"), 1);
}
