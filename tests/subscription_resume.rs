// tests/subscription_resume.rs

mod common;
use crate::common::{TestResult, init_tracing, with_timeout};

use tokio_util::sync::CancellationToken;

use status_reporter::errors::ReporterError;
use status_reporter::watch::{ANY_VERSION, Subscription, WatchRequest};
use status_reporter_test_utils::ArgoWorkflowBuilder;
use status_reporter_test_utils::ScriptedWatchSource;
use status_reporter_test_utils::scripted_source::{
    added, bookmark, interrupted, modified, watch_error,
};

const SELECTOR: &str = "io.codefresh.processId=wf";

fn object(rv: &str) -> kube::api::DynamicObject {
    ArgoWorkflowBuilder::new("wf")
        .phase("Running")
        .resource_version(rv)
        .build()
}

fn request(rv: &str) -> WatchRequest {
    WatchRequest {
        label_selector: SELECTOR.to_string(),
        resource_version: rv.to_string(),
    }
}

#[tokio::test]
async fn closed_stream_resumes_from_last_resource_version() -> TestResult {
    init_tracing();

    let source = ScriptedWatchSource::new()
        .session(vec![added(object("10")), modified(object("11"))])
        .open_session(vec![modified(object("12"))]);
    let requests = source.requests();

    let mut subscription = Subscription::new(source, SELECTOR, CancellationToken::new());
    subscription.open().await?;

    let mut versions = Vec::new();
    for _ in 0..3 {
        let next = with_timeout(subscription.next()).await?;
        versions.push(next.and_then(|o| o.metadata.resource_version).unwrap());
    }

    assert_eq!(versions, vec!["10", "11", "12"]);
    assert_eq!(subscription.label_selector(), SELECTOR);
    assert_eq!(subscription.resource_version(), "12");
    assert_eq!(
        *requests.lock().unwrap(),
        vec![request(ANY_VERSION), request("11")]
    );
    assert_eq!(subscription.restarts(), 1);
    Ok(())
}

#[tokio::test]
async fn bookmark_advances_cursor_without_an_object() -> TestResult {
    let source = ScriptedWatchSource::new()
        .session(vec![added(object("5")), bookmark("42")])
        .open_session(vec![modified(object("43"))]);
    let requests = source.requests();

    let mut subscription = Subscription::new(source, SELECTOR, CancellationToken::new());
    subscription.open().await?;

    let first = with_timeout(subscription.next()).await?.unwrap();
    assert_eq!(first.metadata.resource_version.as_deref(), Some("5"));

    let second = with_timeout(subscription.next()).await?.unwrap();
    assert_eq!(second.metadata.resource_version.as_deref(), Some("43"));

    assert_eq!(requests.lock().unwrap()[1], request("42"));
    Ok(())
}

#[tokio::test]
async fn expired_cursor_restarts_from_any_version() -> TestResult {
    let source = ScriptedWatchSource::new()
        .open_session(vec![added(object("7")), watch_error(410, "too old resource version")])
        .open_session(vec![added(object("90"))]);
    let requests = source.requests();

    let mut subscription = Subscription::new(source, SELECTOR, CancellationToken::new());
    subscription.open().await?;

    with_timeout(subscription.next()).await?;
    let resumed = with_timeout(subscription.next()).await?.unwrap();

    assert_eq!(resumed.metadata.resource_version.as_deref(), Some("90"));
    assert_eq!(requests.lock().unwrap()[1], request(ANY_VERSION));
    Ok(())
}

#[tokio::test]
async fn other_watch_errors_are_fatal() -> TestResult {
    let source = ScriptedWatchSource::new()
        .open_session(vec![watch_error(403, "forbidden")]);

    let mut subscription = Subscription::new(source, SELECTOR, CancellationToken::new());
    subscription.open().await?;

    let err = with_timeout(subscription.next()).await.unwrap_err();
    assert!(
        matches!(err, ReporterError::WatchRejected { code: 403, .. }),
        "got {err:?}"
    );
    Ok(())
}

#[tokio::test]
async fn interrupted_stream_is_reopened() -> TestResult {
    let source = ScriptedWatchSource::new()
        .open_session(vec![added(object("3")), interrupted("connection reset")])
        .open_session(vec![modified(object("4"))]);
    let requests = source.requests();

    let mut subscription = Subscription::new(source, SELECTOR, CancellationToken::new());
    subscription.open().await?;

    with_timeout(subscription.next()).await?;
    let next = with_timeout(subscription.next()).await?.unwrap();

    assert_eq!(next.metadata.resource_version.as_deref(), Some("4"));
    assert_eq!(requests.lock().unwrap()[1], request("3"));
    Ok(())
}

#[tokio::test]
async fn decode_errors_are_fatal() -> TestResult {
    let source = ScriptedWatchSource::new()
        .open_session(vec![Err(ReporterError::DecodeError("not a Workflow".into()))]);

    let mut subscription = Subscription::new(source, SELECTOR, CancellationToken::new());
    subscription.open().await?;

    let err = with_timeout(subscription.next()).await.unwrap_err();
    assert!(matches!(err, ReporterError::DecodeError(_)));
    Ok(())
}

#[tokio::test]
async fn initial_subscription_failure_is_returned() {
    let source = ScriptedWatchSource::new()
        .failing_session(ReporterError::StreamError("connection refused".into()));

    let mut subscription = Subscription::new(source, SELECTOR, CancellationToken::new());

    assert!(subscription.open().await.is_err());
}

#[tokio::test]
async fn failure_to_resubscribe_is_fatal() -> TestResult {
    let source = ScriptedWatchSource::new()
        .session(vec![added(object("1"))])
        .failing_session(ReporterError::StreamError("connection refused".into()));

    let mut subscription = Subscription::new(source, SELECTOR, CancellationToken::new());
    subscription.open().await?;

    with_timeout(subscription.next()).await?;
    assert!(with_timeout(subscription.next()).await.is_err());
    Ok(())
}

#[tokio::test]
async fn cancellation_ends_the_sequence() -> TestResult {
    let cancel = CancellationToken::new();
    let source = ScriptedWatchSource::new().open_session(vec![added(object("1"))]);

    let mut subscription = Subscription::new(source, SELECTOR, cancel.clone());
    subscription.open().await?;

    assert!(with_timeout(subscription.next()).await?.is_some());

    let waiter = tokio::spawn(async move { subscription.next().await.map(|o| o.is_none()) });
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    cancel.cancel();

    let ended = with_timeout(waiter).await??;
    assert!(ended, "no object after cancellation");
    Ok(())
}
