use axum::Json;
use axum::extract::{Path, Query, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::benchmark::{BenchmarkResponse, PageQuery};
use crate::models::shared::{BENCHMARKS_PER_PAGE, Pagination, page_number};
use crate::models::user::{UserPageResponse, UserResponse};
use crate::services::BenchmarkService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/user/{id}",
    tag = "Users",
    operation_id = "getUserPage",
    summary = "A user and their benchmarks",
    description = "Returns the user and their live benchmarks, newest first, 10 per page.",
    params(("id" = i32, Path, description = "User ID"), PageQuery),
    responses(
        (status = 200, description = "User page", body = UserPageResponse),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn get_user_page(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<Json<UserPageResponse>, AppError> {
    let page = page_number(query.page);
    let (owner, result) = BenchmarkService::new(&state)
        .list_for_user(id, page)
        .await?;

    Ok(Json(UserPageResponse {
        benchmarks: result
            .items
            .into_iter()
            .map(|(model, _)| BenchmarkResponse::new(model, Some(owner.clone())))
            .collect(),
        user: UserResponse::from(owner),
        pagination: Pagination::new(page, BENCHMARKS_PER_PAGE, result.total),
    }))
}
