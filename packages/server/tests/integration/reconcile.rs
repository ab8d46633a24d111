use bench_server::reconcile::sweep_orphan_blobs;

use crate::common::TestApp;

#[tokio::test]
async fn sweep_removes_only_blobs_without_a_live_row() {
    let app = TestApp::spawn().await;
    let (_, session) = app.login_as("1001", "alice").await;
    let live = app.create_benchmark(&session, "Live").await as i32;

    let runs = app.state.blobs.retrieve(live).await.unwrap();
    app.state.blobs.store(9999, runs.into()).await.unwrap();

    let removed = sweep_orphan_blobs(&app.db, app.state.blobs.as_ref())
        .await
        .unwrap();

    assert_eq!(removed, 1);
    assert!(app.state.blobs.retrieve(9999).await.is_err());
    assert_eq!(app.state.blobs.list_ids().await.unwrap(), vec![live]);
}

#[tokio::test]
async fn sweep_of_an_empty_store_is_a_no_op() {
    let app = TestApp::spawn().await;

    let removed = sweep_orphan_blobs(&app.db, app.state.blobs.as_ref())
        .await
        .unwrap();

    assert_eq!(removed, 0);
}
