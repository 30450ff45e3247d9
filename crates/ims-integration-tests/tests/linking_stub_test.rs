//! Linked-document workflow against the in-process stub server.
//!
//! Each test starts its own `ims-stub` router on an ephemeral port, talks to
//! it through `ImsClient`, and drives `DocumentLinker` end to end: create,
//! refetch, match, link, summarize.

use std::time::Duration;

use ims_client::{DocumentFilter, ImsApiConfig, ImsClient};
use ims_core::{
    CategoryId, DocumentId, IncubatorId, PeriodicityId, SessionContext, Subcategory,
    SubcategoryId, Target, UserId,
};
use ims_linking::resolution::IdSource;
use ims_linking::{
    DocumentLinker, DocumentSubmission, IdentifierStrategy, LinkingConfig, SummaryStatus,
};
use ims_stub::{router, AppState, StubOptions};

/// Start a stub server on a random available port.
/// Returns (client, shutdown_signal_sender).
async fn start_stub(options: StubOptions) -> (ImsClient, tokio::sync::oneshot::Sender<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind to random port");
    let port = listener.local_addr().unwrap().port();

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let app = router(AppState::new(options));

    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async {
                rx.await.ok();
            })
            .await
            .ok();
    });

    let client = ImsClient::new(ImsApiConfig::local_mock(port, "test-token").unwrap()).unwrap();
    for _ in 0..50 {
        if client.health().await.unwrap_or(false) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    (client, tx)
}

fn ctx() -> SessionContext {
    SessionContext::new(UserId::new(7), IncubatorId::new(3))
}

fn config() -> LinkingConfig {
    LinkingConfig {
        settle_delay: Duration::from_millis(20),
        call_timeout: Duration::from_secs(5),
        ..LinkingConfig::default()
    }
}

fn audit_report() -> DocumentSubmission {
    let mut form = DocumentSubmission {
        name: "Audit Report".into(),
        description: "Quarterly audit report for board review".into(),
        category_id: Some(CategoryId::new(1)),
        subcategory_id: Some(SubcategoryId::new(10)),
        periodicity_id: Some(PeriodicityId::new(2)),
        applicability: "mandatory".into(),
        reference_link: "https://example.com/audit".into(),
        ..Default::default()
    };
    form.select_category(CategoryId::new(2))
        .select_subcategory(SubcategoryId::new(21));
    form
}

fn t(c: u64, s: u64) -> Target {
    Target::new(CategoryId::new(c), SubcategoryId::new(s))
}

fn id_for(report: &ims_linking::LinkingReport, target: Target) -> DocumentId {
    report
        .resolution
        .resolved
        .iter()
        .find(|r| r.target == target)
        .map(|r| r.document_id)
        .unwrap()
}

#[tokio::test]
async fn audit_report_is_created_resolved_and_cross_linked() {
    let (client, _shutdown) = start_stub(StubOptions::default()).await;
    let catalog = client.catalog().subcategories(IncubatorId::new(3), None).await.unwrap();

    let linker = DocumentLinker::new(client.clone(), config());
    let report = linker.submit(&audit_report(), &catalog, &ctx()).await.unwrap();

    assert_eq!(report.targets, vec![t(1, 10), t(2, 21)]);
    assert_eq!(report.summary.status, SummaryStatus::Success);
    assert_eq!(
        report.summary.to_string(),
        "2 documents created, 2 links created, 0 failed"
    );

    let primary = id_for(&report, t(1, 10));
    let secondary = id_for(&report, t(2, 21));

    let primary_links = client.links().list(primary).await.unwrap();
    assert_eq!(primary_links.len(), 1);
    assert_eq!(primary_links[0].subcategory_id, SubcategoryId::new(21));

    let secondary_links = client.links().list(secondary).await.unwrap();
    assert_eq!(secondary_links.len(), 1);
    assert_eq!(secondary_links[0].subcategory_id, SubcategoryId::new(10));

    let rows = client
        .documents()
        .list(&DocumentFilter::incubator(IncubatorId::new(3)))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.document_name == "Audit Report"));
    assert!(rows
        .iter()
        .all(|r| r.reference_link.as_deref() == Some("https://example.com/audit")));
}

#[tokio::test]
async fn resolution_falls_back_to_list_when_create_omits_ids() {
    let (client, _shutdown) = start_stub(StubOptions {
        omit_create_ids: true,
    })
    .await;
    let catalog = client.catalog().subcategories(IncubatorId::new(3), None).await.unwrap();

    let config = LinkingConfig {
        id_strategy: IdentifierStrategy::PreferResponse,
        ..config()
    };
    let linker = DocumentLinker::new(client, config);
    let report = linker.submit(&audit_report(), &catalog, &ctx()).await.unwrap();

    assert_eq!(report.resolution.resolved.len(), 2);
    assert!(report
        .resolution
        .resolved
        .iter()
        .all(|r| r.source == IdSource::ListLookup));
    assert_eq!(report.summary.status, SummaryStatus::Success);
    assert_eq!(report.summary.links_created, 2);
}

#[tokio::test]
async fn prefer_response_uses_returned_ids() {
    let (client, _shutdown) = start_stub(StubOptions::default()).await;
    let catalog = client.catalog().subcategories(IncubatorId::new(3), None).await.unwrap();

    let config = LinkingConfig {
        id_strategy: IdentifierStrategy::PreferResponse,
        ..config()
    };
    let linker = DocumentLinker::new(client, config);
    let report = linker.submit(&audit_report(), &catalog, &ctx()).await.unwrap();

    assert_eq!(report.resolution.lookups, 0);
    assert!(report
        .resolution
        .resolved
        .iter()
        .all(|r| r.source == IdSource::Response));
    assert_eq!(report.summary.status, SummaryStatus::Success);
}

#[tokio::test]
async fn server_rejection_of_one_target_is_partial() {
    let (client, _shutdown) = start_stub(StubOptions::default()).await;

    // The local catalog knows subcategory 29 under category 2; the server
    // does not, so that create is rejected while the others proceed.
    let mut catalog = client.catalog().subcategories(IncubatorId::new(3), None).await.unwrap();
    catalog.push(Subcategory {
        id: SubcategoryId::new(29),
        category_id: CategoryId::new(2),
        name: "Retired".into(),
    });

    let mut form = audit_report();
    form.select_subcategory(SubcategoryId::new(29))
        .select_category(CategoryId::new(3));

    let linker = DocumentLinker::new(client, config());
    let report = linker.submit(&form, &catalog, &ctx()).await.unwrap();

    assert_eq!(report.targets, vec![t(1, 10), t(2, 21), t(2, 29), t(3, 30)]);
    assert_eq!(report.summary.documents_created, 3);
    assert_eq!(report.summary.documents_failed, 1);
    assert_eq!(report.summary.links_created, 4);
    assert_eq!(report.summary.status, SummaryStatus::Partial);
    assert!(report.summary.failures[0].contains("rejected the request (400)"));
}

#[tokio::test]
async fn documents_are_scoped_to_their_incubator() {
    let (client, _shutdown) = start_stub(StubOptions::default()).await;
    let catalog = client.catalog().subcategories(IncubatorId::new(3), None).await.unwrap();
    let linker = DocumentLinker::new(client.clone(), config());

    let other = SessionContext::new(UserId::new(8), IncubatorId::new(4));
    linker.submit(&audit_report(), &catalog, &ctx()).await.unwrap();
    let report = linker.submit(&audit_report(), &catalog, &other).await.unwrap();
    assert_eq!(report.summary.status, SummaryStatus::Success);

    for incubator in [3, 4] {
        let rows = client
            .documents()
            .list(&DocumentFilter::incubator(IncubatorId::new(incubator)))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2, "incubator {incubator}");
    }
}

#[tokio::test]
async fn resubmitting_the_same_name_links_the_newest_rows() {
    let (client, _shutdown) = start_stub(StubOptions::default()).await;
    let catalog = client.catalog().subcategories(IncubatorId::new(3), None).await.unwrap();
    let linker = DocumentLinker::new(client, config());

    let first = linker.submit(&audit_report(), &catalog, &ctx()).await.unwrap();
    let second = linker.submit(&audit_report(), &catalog, &ctx()).await.unwrap();

    assert!(id_for(&second, t(1, 10)) > id_for(&first, t(2, 21)));
    assert!(id_for(&second, t(2, 21)) > id_for(&first, t(2, 21)));
}

#[tokio::test]
async fn single_record_get_update_delete() {
    let (client, _shutdown) = start_stub(StubOptions::default()).await;
    let catalog = client.catalog().subcategories(IncubatorId::new(3), None).await.unwrap();
    let linker = DocumentLinker::new(client.clone(), config());
    let report = linker.submit(&audit_report(), &catalog, &ctx()).await.unwrap();
    let primary = id_for(&report, t(1, 10));

    let validated = linker.validate(&audit_report(), &catalog).unwrap();
    let mut descriptor = validated.descriptor;
    descriptor.name = "Annual Audit Report".into();
    client
        .documents()
        .update(primary, &descriptor, t(1, 11), &ctx())
        .await
        .unwrap();

    let documents = client.documents();
    let fetched = documents.get(primary, IncubatorId::new(3)).await.unwrap().unwrap();
    assert_eq!(fetched.document_name, "Annual Audit Report");
    assert_eq!(fetched.subcategory_id, SubcategoryId::new(11));

    // Another incubator can neither see nor delete the row.
    assert!(documents.get(primary, IncubatorId::new(4)).await.unwrap().is_none());
    assert!(documents.delete(primary, IncubatorId::new(4)).await.is_err());

    documents.delete(primary, IncubatorId::new(3)).await.unwrap();
    assert!(documents.get(primary, IncubatorId::new(3)).await.unwrap().is_none());
    assert!(client.links().list(primary).await.unwrap().is_empty());
    assert!(documents.delete(primary, IncubatorId::new(3)).await.is_err());
}
