use std::io::{Cursor, Read};
use std::sync::Arc;
use std::time::Duration;

use bench_server::entity::benchmark;
use sea_orm::{EntityTrait, PaginatorTrait};

use crate::common::{
    DATA_HEADER, FailingBlobStore, SPEC_HEADER, SPEC_VALUES, TestApp, TestOptions, capture, routes,
};

mod create {
    use super::*;

    #[tokio::test]
    async fn upload_stores_runs_and_redirects_to_the_benchmark() {
        let app = TestApp::spawn().await;
        let (user, session) = app.login_as("1001", "alice").await;

        let res = app
            .upload(
                Some(&session),
                "  Cyberpunk scheduler shootout  ",
                "lavd vs bore",
                &[
                    ("lavd.csv", capture(&[60.0, 62.0, 58.0])),
                    ("bore.csv", capture(&[55.0, 57.0])),
                ],
            )
            .await;

        assert_eq!(res.status, 303, "Upload failed: {}", res.text);
        let id = res.body["id"].as_i64().unwrap();
        assert_eq!(res.header("location"), Some(routes::benchmark(id).as_str()));

        let res = app.get(&routes::benchmark(id), None).await;
        assert_eq!(res.status, 200);
        let bench = &res.body["benchmark"];
        assert_eq!(bench["title"], "Cyberpunk scheduler shootout");
        assert_eq!(bench["description"], "lavd vs bore");
        assert_eq!(bench["user"]["id"], user.id);
        assert_eq!(bench["user"]["username"], "alice");
        assert_eq!(bench["spec"]["distro"], "Arch Linux");
        assert_eq!(bench["spec"]["ram"], "17 GB");
        assert_eq!(bench["spec"]["scheduler"], "scx_lavd");
        assert!(bench["ai_summary"].is_null());
        assert_eq!(res.body["ai_summary_in_progress"], false);

        let runs = res.body["runs"].as_array().unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0]["label"], "lavd");
        assert_eq!(runs[0]["fps"].as_array().unwrap().len(), 3);
        assert_eq!(runs[1]["label"], "bore");
        assert_eq!(runs[1]["fps"][1], 57.0);
    }

    #[tokio::test]
    async fn upload_without_a_session_is_unauthorized() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(None, "Title", "desc", &[("run.csv", capture(&[60.0]))])
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn upload_with_an_unknown_session_is_unauthorized() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(
                Some("not-a-session"),
                "Title",
                "desc",
                &[("run.csv", capture(&[60.0]))],
            )
            .await;

        assert_eq!(res.status, 401);
    }

    #[tokio::test]
    async fn upload_form_requires_login() {
        let app = TestApp::spawn().await;
        let (_, session) = app.login_as("1001", "alice").await;

        let anonymous = app.get(routes::UPLOAD, None).await;
        assert_eq!(anonymous.status, 401);

        let res = app.get(routes::UPLOAD, Some(&session)).await;
        assert_eq!(res.status, 200);
        assert!(res.text.contains("<form"));
        assert!(res.text.contains("multipart/form-data"));
    }

    #[tokio::test]
    async fn upload_without_files_is_rejected() {
        let app = TestApp::spawn().await;
        let (_, session) = app.login_as("1001", "alice").await;

        let res = app.upload(Some(&session), "Title", "desc", &[]).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "No files uploaded");
    }

    #[tokio::test]
    async fn upload_with_thirty_one_files_is_rejected() {
        let app = TestApp::spawn().await;
        let (_, session) = app.login_as("1001", "alice").await;
        let files: Vec<(&str, String)> = (0..31).map(|_| ("run.csv", capture(&[60.0]))).collect();

        let res = app.upload(Some(&session), "Title", "desc", &files).await;

        assert_eq!(res.status, 400);
        assert!(
            res.body["message"].as_str().unwrap().contains("max 30"),
            "{}",
            res.text
        );
    }

    #[tokio::test]
    async fn upload_with_thirty_files_is_accepted() {
        let app = TestApp::spawn().await;
        let (_, session) = app.login_as("1001", "alice").await;
        let files: Vec<(&str, String)> = (0..30).map(|_| ("run.csv", capture(&[60.0]))).collect();

        let res = app.upload(Some(&session), "Title", "desc", &files).await;

        assert_eq!(res.status, 303, "{}", res.text);
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let app = TestApp::spawn().await;
        let (_, session) = app.login_as("1001", "alice").await;

        let res = app
            .upload(Some(&session), "   ", "desc", &[("run.csv", capture(&[60.0]))])
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Title must be 1-100 characters");
    }

    #[tokio::test]
    async fn overlong_description_is_rejected() {
        let app = TestApp::spawn().await;
        let (_, session) = app.login_as("1001", "alice").await;

        let res = app
            .upload(
                Some(&session),
                "Title",
                &"d".repeat(501),
                &[("run.csv", capture(&[60.0]))],
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Description must be 1-500 characters");
    }

    #[tokio::test]
    async fn malformed_csv_reports_the_parser_error() {
        let app = TestApp::spawn().await;
        let (_, session) = app.login_as("1001", "alice").await;

        let bad_value = format!(
            "{SPEC_HEADER}\n{SPEC_VALUES}\n{DATA_HEADER}\nabc,16,31,97,64,71,2650,1250,9.1,310,11.2,0,1.4,0\n"
        );
        let res = app
            .upload(Some(&session), "Title", "desc", &[("bad.csv", bad_value)])
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "failed to parse FPS value 'abc'");

        let short_header = format!("{SPEC_HEADER}\n{SPEC_VALUES}\nfps,frametime\n");
        let res = app
            .upload(Some(&session), "Title", "desc", &[("bad.csv", short_header)])
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "invalid CSV file (err 6)");

        let res = app
            .upload(Some(&session), "Title", "desc", &[("empty.csv", capture(&[]))])
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "empty CSV file");

        let count = benchmark::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn one_bad_file_rejects_the_whole_upload() {
        let app = TestApp::spawn().await;
        let (_, session) = app.login_as("1001", "alice").await;

        let res = app
            .upload(
                Some(&session),
                "Title",
                "desc",
                &[
                    ("good.csv", capture(&[60.0])),
                    ("bad.csv", "garbage".to_string()),
                ],
            )
            .await;

        assert_eq!(res.status, 400);
        let count = benchmark::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn storage_failure_leaves_no_row_behind() {
        let app = TestApp::spawn_with(TestOptions {
            blobs: Some(Arc::new(FailingBlobStore)),
            ..Default::default()
        })
        .await;
        let (_, session) = app.login_as("1001", "alice").await;

        let res = app
            .upload(Some(&session), "Title", "desc", &[("run.csv", capture(&[60.0]))])
            .await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["code"], "INTERNAL_ERROR");
        assert!(
            res.body["message"]
                .as_str()
                .unwrap()
                .starts_with("failed to store benchmark data"),
            "{}",
            res.text
        );

        let count = benchmark::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn upload_abandoned_mid_write_still_persists_row_and_blob() {
        let app = TestApp::spawn_with(TestOptions {
            store_delay: Some(Duration::from_millis(800)),
            ..Default::default()
        })
        .await;
        let (_, session) = app.login_as("1001", "alice").await;

        // The client gives up while the blob write is still sleeping.
        let sent = app
            .upload_request("Abandoned", "desc", &[("run.csv", capture(&[60.0, 61.0]))])
            .header("Cookie", format!("session={session}"))
            .timeout(Duration::from_millis(200))
            .send()
            .await;
        assert!(sent.is_err_and(|e| e.is_timeout()));

        let mut stored = None;
        for _ in 0..100 {
            if let Some(model) = benchmark::Entity::find().one(&app.db).await.unwrap()
                && app.get(&routes::benchmark(model.id as i64), None).await.status == 200
            {
                stored = Some(model);
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        let model = stored.expect("abandoned upload was never fully persisted");
        assert_eq!(model.title, "Abandoned");
        assert_eq!(benchmark::Entity::find().count(&app.db).await.unwrap(), 1);
        let runs = app.state.blobs.retrieve(model.id).await.unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].fps, vec![60.0, 61.0]);
    }
}

mod read {
    use super::*;

    #[tokio::test]
    async fn unknown_benchmark_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::benchmark(999), None).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn index_redirects_to_the_listing() {
        let app = TestApp::spawn().await;

        let res = app.get("/", None).await;

        assert_eq!(res.status, 307);
        assert_eq!(res.header("location"), Some(routes::BENCHMARKS));
    }

    #[tokio::test]
    async fn download_returns_a_zip_with_one_csv_per_run() {
        let app = TestApp::spawn().await;
        let (_, session) = app.login_as("1001", "alice").await;
        let res = app
            .upload(
                Some(&session),
                "Title",
                "desc",
                &[
                    ("lavd.csv", capture(&[60.0, 61.0])),
                    ("lavd.csv", capture(&[50.0])),
                ],
            )
            .await;
        let id = res.body["id"].as_i64().unwrap();

        let res = app.get(&routes::download(id), None).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.header("content-type"), Some("application/zip"));
        assert_eq!(
            res.header("content-disposition"),
            Some(format!("attachment; filename=\"benchmark_{id}.zip\"").as_str())
        );

        let mut archive = zip::ZipArchive::new(Cursor::new(res.bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut csv = String::new();
        archive
            .by_name("lavd.csv")
            .unwrap()
            .read_to_string(&mut csv)
            .unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], SPEC_HEADER);
        assert!(lines[1].starts_with("Arch Linux,"));
        assert_eq!(lines[2], DATA_HEADER);
        assert_eq!(lines.len(), 5);
        assert!(lines[3].starts_with("60.0000,"));
        assert!(lines[3].ends_with(",0,0"));

        assert!(archive.by_name("lavd (2).csv").is_ok());
    }

    #[tokio::test]
    async fn download_of_unknown_benchmark_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::download(42), None).await;

        assert_eq!(res.status, 404);
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn owner_can_delete_and_the_blob_is_removed() {
        let app = TestApp::spawn().await;
        let (_, session) = app.login_as("1001", "alice").await;
        let id = app.create_benchmark(&session, "Doomed").await;

        let res = app.delete(&routes::benchmark(id), Some(&session)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.header("hx-redirect"), Some(routes::BENCHMARKS));
        assert_eq!(res.body["id"], id);
        assert_eq!(res.body["message"], "Benchmark deleted successfully");

        let res = app.get(&routes::benchmark(id), None).await;
        assert_eq!(res.status, 404);

        let row = app.benchmark_row(id).await.expect("row is soft-deleted");
        assert!(row.deleted_at.is_some());
        assert!(app.state.blobs.retrieve(id as i32).await.is_err());

        let again = app.delete(&routes::benchmark(id), Some(&session)).await;
        assert_eq!(again.status, 404);
    }

    #[tokio::test]
    async fn non_owner_cannot_delete() {
        let app = TestApp::spawn().await;
        let (_, owner) = app.login_as("1001", "alice").await;
        let (_, other) = app.login_as("2002", "bob").await;
        let id = app.create_benchmark(&owner, "Mine").await;

        let res = app.delete(&routes::benchmark(id), Some(&other)).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "NOT_OWNER");

        let res = app.get(&routes::benchmark(id), None).await;
        assert_eq!(res.status, 200);
    }

    #[tokio::test]
    async fn anonymous_delete_is_unauthorized() {
        let app = TestApp::spawn().await;
        let (_, session) = app.login_as("1001", "alice").await;
        let id = app.create_benchmark(&session, "Mine").await;

        let res = app.delete(&routes::benchmark(id), None).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn deleting_an_unknown_benchmark_is_not_found() {
        let app = TestApp::spawn().await;
        let (_, session) = app.login_as("1001", "alice").await;

        let res = app.delete(&routes::benchmark(77), Some(&session)).await;

        assert_eq!(res.status, 404);
    }
}

mod list {
    use super::*;

    #[tokio::test]
    async fn listing_is_newest_first_and_paginated() {
        let app = TestApp::spawn().await;
        let (_, session) = app.login_as("1001", "alice").await;
        for i in 0..11 {
            app.create_benchmark(&session, &format!("Run {i}")).await;
        }

        let first = app.get(routes::BENCHMARKS, None).await;
        assert_eq!(first.status, 200);
        let data = first.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 10);
        assert_eq!(data[0]["title"], "Run 10");
        assert_eq!(data[9]["title"], "Run 1");
        assert_eq!(data[0]["user"]["username"], "alice");
        assert_eq!(first.body["pagination"]["total"], 11);
        assert_eq!(first.body["pagination"]["total_pages"], 2);

        let second = app.get(&format!("{}?page=2", routes::BENCHMARKS), None).await;
        let data = second.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["title"], "Run 0");
        assert_eq!(second.body["pagination"]["page"], 2);

        let zero = app.get(&format!("{}?page=0", routes::BENCHMARKS), None).await;
        assert_eq!(zero.body["pagination"]["page"], 1);
        assert_eq!(zero.body["data"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn search_matches_title_or_description() {
        let app = TestApp::spawn().await;
        let (_, session) = app.login_as("1001", "alice").await;
        app.create_benchmark(&session, "Cyberpunk lavd").await;
        app.create_benchmark(&session, "Elden Ring bore").await;
        app.upload(
            Some(&session),
            "Baldur's Gate",
            "tested with lavd defaults",
            &[("run.csv", capture(&[60.0]))],
        )
        .await;

        let res = app
            .get(&format!("{}?query=lavd", routes::BENCHMARKS), None)
            .await;
        let titles: Vec<&str> = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Baldur's Gate", "Cyberpunk lavd"]);
        assert_eq!(res.body["pagination"]["total"], 2);

        let empty_query = app.get(&format!("{}?query=", routes::BENCHMARKS), None).await;
        assert_eq!(empty_query.body["pagination"]["total"], 3);
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let app = TestApp::spawn().await;
        let (_, session) = app.login_as("1001", "alice").await;
        app.create_benchmark(&session, "Plain title").await;
        app.create_benchmark(&session, "100% GPU bound").await;

        let res = app
            .get(&format!("{}?query=%25", routes::BENCHMARKS), None)
            .await;
        assert_eq!(res.body["pagination"]["total"], 1);
        assert_eq!(res.body["data"][0]["title"], "100% GPU bound");

        let res = app
            .get(&format!("{}?query=_", routes::BENCHMARKS), None)
            .await;
        assert_eq!(res.body["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn deleted_benchmarks_are_not_listed() {
        let app = TestApp::spawn().await;
        let (_, session) = app.login_as("1001", "alice").await;
        let keep = app.create_benchmark(&session, "Keep").await;
        let gone = app.create_benchmark(&session, "Gone").await;
        app.delete(&routes::benchmark(gone), Some(&session)).await;

        let res = app.get(routes::BENCHMARKS, None).await;

        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["id"], keep);
    }

    #[tokio::test]
    async fn page_past_the_addressable_range_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&format!("{}?page={}", routes::BENCHMARKS, u64::MAX), None)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "Page number is too large");
    }
}
