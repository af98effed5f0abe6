//! Client and server together over a real socket and an in-memory bucket.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use tokio::net::TcpListener;

use guest_client::{GuestListManager, HttpSyncClient, LocalStore, ManualClock, MemoryStore, SyncApi};
use guest_core::updates::HouseholdUpdateBuilder;
use guest_server::{AppState, app, serve};
use guest_store::{GuestListService, HouseholdStore};

async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app(AppState::new(GuestListService::new(HouseholdStore::in_memory())));
    tokio::spawn(async move {
        serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn manager(base: &str) -> GuestListManager<HttpSyncClient> {
    let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
    GuestListManager::new(HttpSyncClient::new(base), store, Arc::new(ManualClock::new()))
}

#[tokio::test]
async fn edits_reach_a_second_client() {
    let base = spawn_server().await;

    let mut alice = manager(&base);
    alice.refresh().await.unwrap();
    assert!(alice.households().is_empty());

    let first = alice.add_household();
    let second = alice.add_household();
    alice
        .update_household(
            &first,
            HouseholdUpdateBuilder::new().envelope_name("The Brennan Family").build(),
        )
        .unwrap();
    let response = alice.flush().await.unwrap().unwrap();
    assert!(response.saved);
    assert_eq!(response.upserted, 2);

    let mut bob = manager(&base);
    bob.refresh().await.unwrap();
    let ids: Vec<&str> = bob.households().iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);
    assert_eq!(bob.households()[0].slug, "the_brennan_family");

    bob.remove_household(&second).unwrap();
    let response = bob.flush().await.unwrap().unwrap();
    assert_eq!(response.deleted, 1);

    let snapshot = HttpSyncClient::new(&base).fetch().await.unwrap();
    assert_eq!(snapshot.households.len(), 1);
    assert_eq!(snapshot.households[0].id, first);
    assert!(snapshot.updated_at.is_some());
}

#[tokio::test]
async fn unreachable_server_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut client = manager(&format!("http://{addr}"));
    assert!(client.refresh().await.is_err());
    assert_eq!(client.households().len(), 3);
}
