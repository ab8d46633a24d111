use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect};
use bench_common::csv::UploadedFile;
use bench_common::export::export_zip;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::session::{AuthUser, MaybeUser};
use crate::models::benchmark::*;
use crate::models::shared::{BENCHMARKS_PER_PAGE, Pagination, page_number};
use crate::services::BenchmarkService;
use crate::state::AppState;

const UPLOAD_FORM: &str = include_str!("../../assets/upload.html");

/// Body limit layer for the upload route (512MB).
pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(512 * 1024 * 1024)
}

#[utoipa::path(
    get,
    path = "/benchmarks",
    tag = "Benchmarks",
    operation_id = "listBenchmarks",
    summary = "List benchmarks",
    description = "Returns live benchmarks, newest first, 10 per page. A non-empty `query` keeps only benchmarks whose title or description contains it.",
    params(BenchmarkListQuery),
    responses(
        (status = 200, description = "One page of benchmarks", body = BenchmarkListResponse),
    ),
)]
#[instrument(skip(state, query), fields(query = query.query.as_deref().unwrap_or("")))]
pub async fn list_benchmarks(
    State(state): State<AppState>,
    Query(query): Query<BenchmarkListQuery>,
) -> Result<Json<BenchmarkListResponse>, AppError> {
    let page = page_number(query.page);
    let result = BenchmarkService::new(&state)
        .list(query.query.as_deref(), page)
        .await?;

    Ok(Json(BenchmarkListResponse {
        data: result
            .items
            .into_iter()
            .map(|(model, owner)| BenchmarkResponse::new(model, owner))
            .collect(),
        pagination: Pagination::new(page, BENCHMARKS_PER_PAGE, result.total),
    }))
}

#[utoipa::path(
    get,
    path = "/benchmark",
    tag = "Benchmarks",
    operation_id = "uploadForm",
    summary = "Upload form",
    responses(
        (status = 200, description = "HTML upload form", body = String, content_type = "text/html"),
        (status = 401, description = "Not logged in (UNAUTHORIZED)", body = ErrorBody),
    ),
)]
pub async fn upload_form(_user: AuthUser) -> Html<&'static str> {
    Html(UPLOAD_FORM)
}

#[utoipa::path(
    post,
    path = "/benchmark",
    tag = "Benchmarks",
    operation_id = "createBenchmark",
    summary = "Upload a benchmark",
    description = "Parses 1 to 30 CSV captures, stores them as one benchmark and redirects to it. An AI summary is generated in the background when enabled.",
    request_body(content = CreateBenchmarkForm, content_type = "multipart/form-data"),
    responses(
        (status = 303, description = "Created; `Location` points at the new benchmark", body = CreatedBenchmarkResponse),
        (status = 400, description = "Invalid form or CSV (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Not logged in (UNAUTHORIZED)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, user, multipart))]
pub async fn create_benchmark(
    MaybeUser(user): MaybeUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    if user.is_none() {
        return Err(AppError::Unauthorized);
    }

    let mut title = String::new();
    let mut description = String::new();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => {
                title = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read title: {e}")))?;
            }
            "description" => {
                description = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read description: {e}"))
                })?;
            }
            "files" | "files[]" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                files.push(UploadedFile {
                    name: file_name,
                    data: data.to_vec(),
                });
            }
            _ => {}
        }
    }

    let id = BenchmarkService::new(&state)
        .create(user.as_ref(), &title, &description, files)
        .await?;

    Ok((
        StatusCode::SEE_OTHER,
        [(header::LOCATION, format!("/benchmark/{id}"))],
        Json(CreatedBenchmarkResponse { id }),
    ))
}

#[utoipa::path(
    get,
    path = "/benchmark/{id}",
    tag = "Benchmarks",
    operation_id = "getBenchmark",
    summary = "Get a benchmark with its runs",
    params(("id" = i32, Path, description = "Benchmark ID")),
    responses(
        (status = 200, description = "Benchmark and decoded runs", body = BenchmarkDetailResponse),
        (status = 404, description = "Benchmark not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Benchmark data unreadable (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_benchmark(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BenchmarkDetailResponse>, AppError> {
    let ((model, owner), runs) = BenchmarkService::new(&state).read(id).await?;

    Ok(Json(BenchmarkDetailResponse {
        ai_summary_in_progress: state.summarizer.is_in_flight(id),
        benchmark: BenchmarkResponse::new(model, owner),
        runs,
    }))
}

#[utoipa::path(
    get,
    path = "/benchmark/{id}/download",
    tag = "Benchmarks",
    operation_id = "downloadBenchmark",
    summary = "Download runs as CSV files",
    description = "Returns a ZIP archive with one CSV capture per run.",
    params(("id" = i32, Path, description = "Benchmark ID")),
    responses(
        (status = 200, description = "ZIP archive", body = Vec<u8>, content_type = "application/zip"),
        (status = 404, description = "Benchmark not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn download_benchmark(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let (_, runs) = BenchmarkService::new(&state).read(id).await?;

    let archive = tokio::task::spawn_blocking(move || export_zip(&runs))
        .await
        .map_err(|e| AppError::Internal(format!("export task failed: {e}")))?
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"benchmark_{id}.zip\""))
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/zip")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        archive,
    ))
}

#[utoipa::path(
    delete,
    path = "/benchmark/{id}",
    tag = "Benchmarks",
    operation_id = "deleteBenchmark",
    summary = "Delete a benchmark",
    description = "Only the owner may delete. The response carries `HX-Redirect: /benchmarks`.",
    params(("id" = i32, Path, description = "Benchmark ID")),
    responses(
        (status = 200, description = "Deleted", body = DeletedBenchmarkResponse),
        (status = 401, description = "Not logged in (UNAUTHORIZED) or not the owner (NOT_OWNER)", body = ErrorBody),
        (status = 404, description = "Benchmark not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, user))]
pub async fn delete_benchmark(
    MaybeUser(user): MaybeUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    BenchmarkService::new(&state).delete(id, user.as_ref()).await?;

    Ok((
        [("HX-Redirect", "/benchmarks")],
        Json(DeletedBenchmarkResponse {
            id,
            message: "Benchmark deleted successfully".into(),
        }),
    ))
}

/// `GET /` lands on the listing.
pub async fn index() -> Redirect {
    Redirect::temporary("/benchmarks")
}
