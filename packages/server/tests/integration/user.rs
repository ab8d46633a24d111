use crate::common::{TestApp, routes};

#[tokio::test]
async fn user_page_lists_only_their_live_benchmarks() {
    let app = TestApp::spawn().await;
    let (alice, alice_session) = app.login_as("1001", "alice").await;
    let (_, bob_session) = app.login_as("2002", "bob").await;

    let first = app.create_benchmark(&alice_session, "Alice one").await;
    app.create_benchmark(&bob_session, "Bob one").await;
    let second = app.create_benchmark(&alice_session, "Alice two").await;
    let gone = app.create_benchmark(&alice_session, "Alice gone").await;
    app.delete(&routes::benchmark(gone), Some(&alice_session))
        .await;

    let res = app.get(&routes::user(alice.id), None).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["user"]["id"], alice.id);
    assert_eq!(res.body["user"]["username"], "alice");
    let ids: Vec<i64> = res.body["benchmarks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second, first]);
    assert_eq!(res.body["benchmarks"][0]["user"]["username"], "alice");
    assert_eq!(res.body["pagination"]["total"], 2);
}

#[tokio::test]
async fn user_page_is_paginated() {
    let app = TestApp::spawn().await;
    let (alice, session) = app.login_as("1001", "alice").await;
    for i in 0..12 {
        app.create_benchmark(&session, &format!("Run {i}")).await;
    }

    let res = app
        .get(&format!("{}?page=2", routes::user(alice.id)), None)
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["benchmarks"].as_array().unwrap().len(), 2);
    assert_eq!(res.body["pagination"]["total_pages"], 2);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get(&routes::user(404), None).await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn user_without_benchmarks_has_an_empty_page() {
    let app = TestApp::spawn().await;
    let (alice, _) = app.login_as("1001", "alice").await;

    let res = app.get(&routes::user(alice.id), None).await;

    assert_eq!(res.status, 200);
    assert!(res.body["benchmarks"].as_array().unwrap().is_empty());
    assert_eq!(res.body["pagination"]["total"], 0);
}

#[tokio::test]
async fn user_page_past_the_addressable_range_is_rejected() {
    let app = TestApp::spawn().await;
    let (alice, _) = app.login_as("1001", "alice").await;

    let res = app
        .get(&format!("{}?page={}", routes::user(alice.id), u64::MAX), None)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}
