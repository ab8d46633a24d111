use std::sync::Arc;
use std::time::Duration;

use bench_common::BenchmarkRun;

use crate::common::{FailingChat, GatedChat, TestApp, TestOptions, routes};

#[tokio::test]
async fn summary_is_written_after_upload() {
    let chat = GatedChat::open("Smooth frame pacing on both runs.");
    let app = TestApp::spawn_with(TestOptions {
        chat: Some(chat.clone()),
        ..Default::default()
    })
    .await;
    let (_, session) = app.login_as("1001", "alice").await;

    let id = app.create_benchmark(&session, "Summarized").await;

    let summary = app.wait_for_summary(id).await;
    assert_eq!(summary, "Smooth frame pacing on both runs.");
    assert_eq!(chat.calls(), 1);

    let res = app.get(&routes::benchmark(id), None).await;
    assert_eq!(
        res.body["benchmark"]["ai_summary"],
        "Smooth frame pacing on both runs."
    );
    assert_eq!(res.body["ai_summary_in_progress"], false);
}

#[tokio::test]
async fn only_one_summary_runs_per_benchmark() {
    let chat = GatedChat::new("Done.");
    let app = TestApp::spawn_with(TestOptions {
        chat: Some(chat.clone()),
        ..Default::default()
    })
    .await;
    let (_, session) = app.login_as("1001", "alice").await;
    let id = app.create_benchmark(&session, "Gated").await;

    let res = app.get(&routes::benchmark(id), None).await;
    assert_eq!(res.body["ai_summary_in_progress"], true);

    let model = app.benchmark_row(id).await.unwrap();
    let runs = app.state.blobs.retrieve(model.id).await.unwrap();
    assert!(app.state.summarizer.summarize(&model, runs.into()).is_none());

    chat.release(1);
    app.wait_for_summary(id).await;
    assert_eq!(chat.calls(), 1);

    // The slot frees once the task finishes.
    let mut freed = false;
    for _ in 0..100 {
        if !app.state.summarizer.is_in_flight(model.id) {
            freed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(freed);

    let runs = app.state.blobs.retrieve(model.id).await.unwrap();
    chat.release(1);
    let handle = app
        .state
        .summarizer
        .summarize(&model, runs.into())
        .expect("a new summary can start");
    handle.await.unwrap();
    assert_eq!(chat.calls(), 2);
}

#[tokio::test]
async fn summaries_for_different_benchmarks_run_concurrently() {
    let chat = GatedChat::new("Done.");
    let app = TestApp::spawn_with(TestOptions {
        chat: Some(chat.clone()),
        ..Default::default()
    })
    .await;
    let (_, session) = app.login_as("1001", "alice").await;

    let first = app.create_benchmark(&session, "First").await;
    let second = app.create_benchmark(&session, "Second").await;

    assert!(app.state.summarizer.is_in_flight(first as i32));
    assert!(app.state.summarizer.is_in_flight(second as i32));

    // Both requests reach the chat client before either is allowed to finish.
    let mut both_waiting = false;
    for _ in 0..100 {
        if chat.calls() == 2 {
            both_waiting = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(both_waiting, "only {} summary call(s) started", chat.calls());

    chat.release(2);
    assert_eq!(app.wait_for_summary(first).await, "Done.");
    assert_eq!(app.wait_for_summary(second).await, "Done.");
    assert_eq!(chat.calls(), 2);
}

#[tokio::test]
async fn failed_summary_leaves_the_benchmark_untouched() {
    let app = TestApp::spawn_with(TestOptions {
        chat: Some(Arc::new(FailingChat)),
        ..Default::default()
    })
    .await;
    let (_, session) = app.login_as("1001", "alice").await;
    let id = app.create_benchmark(&session, "Unlucky").await;

    let model = app.benchmark_row(id).await.unwrap();
    let runs = app.state.blobs.retrieve(model.id).await.unwrap();
    // Wait out the upload's own task, then run one to completion.
    for _ in 0..100 {
        if !app.state.summarizer.is_in_flight(model.id) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    if let Some(handle) = app.state.summarizer.summarize(&model, runs.into()) {
        handle.await.unwrap();
    }

    let row = app.benchmark_row(id).await.unwrap();
    assert!(row.ai_summary.is_none());
    assert!(!app.state.summarizer.is_in_flight(model.id));

    let res = app.get(&routes::benchmark(id), None).await;
    assert_eq!(res.status, 200);
}

#[tokio::test]
async fn disabled_summarizer_never_starts() {
    let app = TestApp::spawn().await;
    let (_, session) = app.login_as("1001", "alice").await;
    let id = app.create_benchmark(&session, "Plain").await;

    assert!(!app.state.summarizer.is_enabled());
    let model = app.benchmark_row(id).await.unwrap();
    let no_runs: Arc<[BenchmarkRun]> = Arc::from(Vec::new());
    assert!(app.state.summarizer.summarize(&model, no_runs).is_none());
    assert!(model.ai_summary.is_none());
}
