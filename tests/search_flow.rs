mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio_test::{assert_err, assert_ok};

use cinesearch::{
    models::{PaginationCursor, SearchFilters},
    services::{
        SearchController, SearchOutcome, SearchPhase, NO_MORE_RESULTS, NO_PAGE_BEFORE_FIRST,
    },
};
use common::{query_builder, search_page, FakeTransport, RecordingNotifier};

fn controller(
    transport: &Arc<FakeTransport>,
    notifier: &Arc<RecordingNotifier>,
) -> SearchController {
    SearchController::new(
        transport.clone(),
        notifier.clone(),
        query_builder(),
        SearchFilters::default(),
        Duration::from_millis(2000),
    )
}

#[tokio::test]
async fn test_batman_search_scenario() {
    let transport = Arc::new(FakeTransport::new().respond("query=batman", search_page(1, 18, 9, 1)));
    let notifier = Arc::new(RecordingNotifier::default());
    let controller = controller(&transport, &notifier);

    let outcome = assert_ok!(controller.search("batman").await);
    assert_eq!(outcome, SearchOutcome::Updated);

    let snapshot = controller.snapshot().await;
    assert_eq!(
        snapshot.cursor,
        PaginationCursor {
            page: 1,
            total_pages: 9
        }
    );
    assert_eq!(snapshot.results.unwrap().results.len(), 18);
    assert_eq!(
        transport.requests(),
        vec!["http://test.local/3/search/movie?api_key=test_key&language=en-US&query=batman&page=1&include_adult=false"]
    );
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn test_paging_through_five_pages() {
    let transport = Arc::new(
        FakeTransport::new()
            .respond("page=1&", search_page(1, 20, 5, 100))
            .respond("page=2&", search_page(2, 20, 5, 200))
            .respond("page=3&", search_page(3, 20, 5, 300))
            .respond("page=4&", search_page(4, 20, 5, 400))
            .respond("page=5&", search_page(5, 13, 5, 500)),
    );
    let notifier = Arc::new(RecordingNotifier::default());
    let controller = controller(&transport, &notifier);

    assert_ok!(controller.search("star trek").await);
    for _ in 0..4 {
        assert_eq!(
            assert_ok!(controller.next_page().await),
            SearchOutcome::Updated
        );
    }
    assert_eq!(controller.cursor().await.page, 5);

    assert_eq!(
        assert_ok!(controller.next_page().await),
        SearchOutcome::Boundary
    );
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.cursor.page, 5);
    assert_eq!(snapshot.results.unwrap().results[0].id, Some(500));
    assert_eq!(notifier.messages(), vec![NO_MORE_RESULTS]);
    assert_eq!(notifier.durations(), vec![Duration::from_millis(2000)]);

    // Every request reused the same search text
    assert_eq!(transport.requests().len(), 5);
    assert!(transport
        .requests()
        .iter()
        .all(|url| url.contains("query=star%20trek")));
}

#[tokio::test]
async fn test_previous_from_first_page() {
    let transport = Arc::new(FakeTransport::new().respond("query=heat", search_page(1, 20, 3, 1)));
    let notifier = Arc::new(RecordingNotifier::default());
    let controller = controller(&transport, &notifier);

    assert_ok!(controller.search("heat").await);
    assert_eq!(
        assert_ok!(controller.previous_page().await),
        SearchOutcome::Boundary
    );
    assert_eq!(controller.cursor().await.page, 1);
    assert_eq!(notifier.messages(), vec![NO_PAGE_BEFORE_FIRST]);
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_new_search_resets_cursor_until_response() {
    let gate = Arc::new(Notify::new());
    let transport = Arc::new(
        FakeTransport::new()
            .respond("query=batman", search_page(3, 20, 9, 300))
            .respond_gated("query=new%20text", search_page(1, 4, 2, 1), gate.clone()),
    );
    let notifier = Arc::new(RecordingNotifier::default());
    let controller = controller(&transport, &notifier);

    assert_ok!(controller.search("batman").await);
    assert_ok!(controller.next_page().await);
    assert_ok!(controller.next_page().await);
    assert_eq!(controller.cursor().await.page, 3);

    let observe = async {
        transport.wait_for_requests(4).await;
        let in_flight = controller.snapshot().await;
        gate.notify_one();
        in_flight
    };
    let (outcome, in_flight) = tokio::join!(controller.search("new text"), observe);

    assert_eq!(
        in_flight.cursor,
        PaginationCursor {
            page: 1,
            total_pages: 1
        }
    );
    assert_eq!(in_flight.phase, SearchPhase::Searching);
    // Old results stay visible while the new search is in flight
    assert_eq!(in_flight.results.unwrap().results[0].id, Some(300));

    assert_eq!(assert_ok!(outcome), SearchOutcome::Updated);
    let settled = controller.snapshot().await;
    assert_eq!(
        settled.cursor,
        PaginationCursor {
            page: 1,
            total_pages: 2
        }
    );
    assert_eq!(settled.phase, SearchPhase::Populated);
}

#[tokio::test]
async fn test_stale_response_is_discarded() {
    let gate = Arc::new(Notify::new());
    let transport = Arc::new(
        FakeTransport::new()
            .respond_gated("query=alien&", search_page(1, 20, 4, 1000), gate.clone())
            .respond("query=aliens&", search_page(1, 20, 2, 2000)),
    );
    let notifier = Arc::new(RecordingNotifier::default());
    let controller = controller(&transport, &notifier);

    let newer = async {
        transport.wait_for_requests(1).await;
        let outcome = controller.search("aliens").await;
        gate.notify_one();
        outcome
    };
    let (older, newer) = tokio::join!(controller.search("alien"), newer);

    assert_eq!(assert_ok!(older), SearchOutcome::Superseded);
    assert_eq!(assert_ok!(newer), SearchOutcome::Updated);

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.text.as_deref(), Some("aliens"));
    assert_eq!(snapshot.cursor.total_pages, 2);
    assert_eq!(snapshot.results.unwrap().results[0].id, Some(2000));
}

#[tokio::test]
async fn test_failed_request_retains_results_and_recovers() {
    let transport = Arc::new(
        FakeTransport::new()
            .respond("page=1&", search_page(1, 20, 3, 10))
            .fail("page=2&", "Movie database returned status 503 Service Unavailable: "),
    );
    let notifier = Arc::new(RecordingNotifier::default());
    let controller = controller(&transport, &notifier);

    assert_ok!(controller.search("dune").await);
    assert_err!(controller.next_page().await);

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.phase, SearchPhase::Populated);
    assert_eq!(
        snapshot.cursor,
        PaginationCursor {
            page: 1,
            total_pages: 3
        }
    );
    assert_eq!(snapshot.results.unwrap().results[0].id, Some(10));
    assert!(snapshot.last_error.unwrap().contains("503"));

    // Neither paging forward again nor refreshing skips past page 2
    assert_err!(controller.next_page().await);
    assert_err!(controller.refresh().await);
    let pages: Vec<_> = transport
        .requests()
        .iter()
        .map(|url| url.contains("page=2&"))
        .collect();
    assert_eq!(pages, vec![false, true, true, true]);

    // A fresh search succeeds and clears the error
    assert_eq!(
        assert_ok!(controller.search("dune").await),
        SearchOutcome::Updated
    );
    assert_eq!(controller.snapshot().await.last_error, None);
    assert!(notifier.messages().is_empty());
}
