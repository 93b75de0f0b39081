use std::sync::Arc;

use sitework::api::ListQuery;
use sitework::api::memory::{InMemoryService, Operation};
use sitework::domain::{Approval, Bid, Invoice, Record, Rfi, Submittal};
use sitework::view::overview::status_counts;
use sitework::view::{LoadOutcome, OverviewServices};

struct Fixture {
    bids: Arc<InMemoryService<Bid>>,
    rfis: Arc<InMemoryService<Rfi>>,
    invoices: Arc<InMemoryService<Invoice>>,
    services: OverviewServices,
}

fn fixture() -> Fixture {
    let bids = Arc::new(InMemoryService::<Bid>::seeded());
    let rfis = Arc::new(InMemoryService::<Rfi>::seeded());
    let invoices = Arc::new(InMemoryService::<Invoice>::seeded());
    let services = OverviewServices {
        bids: bids.clone(),
        rfis: rfis.clone(),
        submittals: Arc::new(InMemoryService::<Submittal>::seeded()),
        invoices: invoices.clone(),
        approvals: Arc::new(InMemoryService::<Approval>::seeded()),
    };
    Fixture {
        bids,
        rfis,
        invoices,
        services,
    }
}

#[tokio::test]
async fn test_overview_loads_every_collection() {
    let fixture = fixture();
    let overview = fixture
        .services
        .load(&ListQuery::for_project("prj-100"))
        .await
        .unwrap();

    assert_eq!(overview.bids.len(), 5);
    assert_eq!(overview.rfis.len(), 4);
    assert_eq!(overview.invoices.len(), Invoice::samples().len());

    let counts = status_counts(&overview.bids);
    assert_eq!(counts.get("won"), Some(&1));
    assert_eq!(counts.get("under_review"), Some(&1));
    assert_eq!(counts.values().sum::<usize>(), 5);

    assert_eq!(fixture.bids.calls().len(), 1);
    assert_eq!(fixture.rfis.calls().len(), 1);
}

#[tokio::test]
async fn test_one_failed_collection_fails_the_whole_load() {
    let fixture = fixture();
    fixture.invoices.fail_next(Operation::List);

    let err = fixture
        .services
        .load(&ListQuery::for_project("prj-100"))
        .await
        .unwrap_err();

    assert!(err.is_request_failure());
    assert!(err.to_string().contains("/invoices"));
}

#[tokio::test]
async fn test_store_keeps_previous_overview_when_a_load_fails() {
    let fixture = fixture();
    let invoices = fixture.invoices.clone();
    let store = fixture.services.store(ListQuery::for_project("prj-100"));

    assert!(store.load().await.is_applied());
    let loaded = store.value();
    assert_eq!(loaded.bids.len(), 5);

    invoices.fail_next(Operation::List);
    assert!(matches!(store.refresh().await, LoadOutcome::Failed(_)));

    let snapshot = store.snapshot();
    assert_eq!(snapshot.value, loaded);
    assert!(snapshot.error.is_some());
    assert!(!snapshot.is_loading);
}

#[tokio::test]
async fn test_store_reloads_on_project_change() {
    let fixture = fixture();
    let store = fixture.services.store(ListQuery::for_project("prj-100"));
    store.load().await;

    let outcome = store.load_key(ListQuery::for_project("prj-404")).await;
    assert!(matches!(outcome, Some(LoadOutcome::Applied)));
    assert!(store.value().bids.is_empty());
    assert!(store.value().rfis.is_empty());

    assert!(store.load_key(ListQuery::for_project("prj-404")).await.is_none());
}
