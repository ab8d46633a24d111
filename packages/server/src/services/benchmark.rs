use std::sync::Arc;

use bench_common::csv::{UploadedFile, parse_uploads};
use bench_common::{BenchmarkRun, RunSpec};
use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::LikeExpr;
use sea_orm::*;
use tracing::{Instrument, error, info, instrument, warn};

use super::session::SessionUser;
use super::user::UserService;
use crate::entity::{benchmark, user};
use crate::error::AppError;
use crate::models::shared::{
    BENCHMARKS_PER_PAGE, escape_like, validate_description, validate_title,
};
use crate::state::AppState;

/// Upper bound on files per upload.
pub const MAX_FILES: usize = 30;

/// A benchmark row joined with its owner.
pub type BenchmarkWithUser = (benchmark::Model, Option<user::Model>);

/// One listing page plus the total number of matching rows.
pub struct BenchmarkPage {
    pub items: Vec<BenchmarkWithUser>,
    pub total: u64,
}

/// Binds benchmark rows to their blobs and keeps the two consistent.
pub struct BenchmarkService<'a> {
    state: &'a AppState,
}

impl<'a> BenchmarkService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Validate and parse an upload, then persist its row and blob.
    #[instrument(skip(self, owner, title, description, files), fields(files = files.len()))]
    pub async fn create(
        &self,
        owner: Option<&SessionUser>,
        title: &str,
        description: &str,
        files: Vec<UploadedFile>,
    ) -> Result<i32, AppError> {
        let owner = owner.ok_or(AppError::Unauthorized)?;
        let title = validate_title(title)?;
        let description = validate_description(description)?;

        if files.is_empty() {
            return Err(AppError::Validation("No files uploaded".into()));
        }
        if files.len() > MAX_FILES {
            return Err(AppError::Validation(format!(
                "Too many files uploaded (max {MAX_FILES})"
            )));
        }

        let parsed = tokio::task::spawn_blocking(move || parse_uploads(&files))
            .await
            .map_err(|e| AppError::Internal(format!("CSV parsing task failed: {e}")))?
            .map_err(|e| AppError::Validation(e.to_string()))?;

        // The persist step runs detached so a dropped request cannot stop it
        // between the row insert and the blob write.
        let state = self.state.clone();
        let user_id = owner.user_id;
        let spec = parsed.spec;
        let runs: Arc<[BenchmarkRun]> = parsed.runs.into();
        let task = async move { persist(&state, user_id, title, description, spec, runs).await };
        tokio::spawn(task.in_current_span())
            .await
            .map_err(|e| AppError::Internal(format!("Benchmark create task failed: {e}")))?
    }

    /// Fetch the row (with owner) and the decoded runs concurrently.
    #[instrument(skip(self))]
    pub async fn read(&self, id: i32) -> Result<(BenchmarkWithUser, Vec<BenchmarkRun>), AppError> {
        let metadata = benchmark::Entity::find_by_id(id)
            .filter(benchmark::Column::DeletedAt.is_null())
            .find_also_related(user::Entity)
            .one(&self.state.db);
        let runs = self.state.blobs.retrieve(id);

        let (metadata, runs) = tokio::join!(metadata, runs);

        let row = metadata?.ok_or_else(|| AppError::NotFound("Benchmark not found".into()))?;
        let runs = runs?;
        Ok((row, runs))
    }

    /// Soft-delete the row, then remove its blob. Only the owner may delete.
    #[instrument(skip(self, requester))]
    pub async fn delete(&self, id: i32, requester: Option<&SessionUser>) -> Result<(), AppError> {
        let requester = requester.ok_or(AppError::Unauthorized)?;

        let model = benchmark::Entity::find_by_id(id)
            .filter(benchmark::Column::DeletedAt.is_null())
            .one(&self.state.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Benchmark not found".into()))?;

        if model.user_id != requester.user_id {
            warn!(id, requester = requester.user_id, "Delete refused for non-owner");
            return Err(AppError::NotOwner);
        }

        let now = Utc::now();
        let mut active: benchmark::ActiveModel = model.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&self.state.db).await?;

        self.state.blobs.delete(id).await?;

        info!(id, user_id = requester.user_id, "Deleted benchmark");
        Ok(())
    }

    /// One page of live benchmarks, newest first, optionally filtered by a
    /// substring of the title or description.
    #[instrument(skip(self))]
    pub async fn list(&self, query: Option<&str>, page: u64) -> Result<BenchmarkPage, AppError> {
        let mut select = benchmark::Entity::find().filter(benchmark::Column::DeletedAt.is_null());

        if let Some(query) = query.filter(|q| !q.is_empty()) {
            let pattern = format!("%{}%", escape_like(query));
            select = select.filter(
                Condition::any()
                    .add(
                        Expr::col((benchmark::Entity, benchmark::Column::Title))
                            .like(LikeExpr::new(pattern.clone()).escape('\\')),
                    )
                    .add(
                        Expr::col((benchmark::Entity, benchmark::Column::Description))
                            .like(LikeExpr::new(pattern).escape('\\')),
                    ),
            );
        }

        self.page(select, page).await
    }

    /// A user and one page of their live benchmarks, newest first.
    #[instrument(skip(self))]
    pub async fn list_for_user(
        &self,
        user_id: i32,
        page: u64,
    ) -> Result<(user::Model, BenchmarkPage), AppError> {
        let owner = UserService::new(&self.state.db)
            .find(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        let select = benchmark::Entity::find()
            .filter(benchmark::Column::DeletedAt.is_null())
            .filter(benchmark::Column::UserId.eq(user_id));

        let page = self.page(select, page).await?;
        Ok((owner, page))
    }

    async fn page(
        &self,
        select: Select<benchmark::Entity>,
        page: u64,
    ) -> Result<BenchmarkPage, AppError> {
        let total = select.clone().count(&self.state.db).await?;

        let items = select
            .order_by_desc(benchmark::Column::CreatedAt)
            .order_by_desc(benchmark::Column::Id)
            .find_also_related(user::Entity)
            .offset(Some(page_offset(page)?))
            .limit(Some(BENCHMARKS_PER_PAGE))
            .all(&self.state.db)
            .await?;

        Ok(BenchmarkPage { items, total })
    }
}

/// Insert the row, write its blob, then hand the runs to the summarizer.
///
/// If the blob cannot be written the row is removed again, so a failed
/// create leaves nothing behind.
async fn persist(
    state: &AppState,
    user_id: i32,
    title: String,
    description: String,
    spec: RunSpec,
    runs: Arc<[BenchmarkRun]>,
) -> Result<i32, AppError> {
    let now = Utc::now();
    let model = benchmark::ActiveModel {
        user_id: Set(user_id),
        title: Set(title),
        description: Set(description),
        spec_distro: Set(spec.os),
        spec_cpu: Set(spec.cpu),
        spec_gpu: Set(spec.gpu),
        spec_ram: Set(spec.ram),
        spec_kernel: Set(spec.kernel),
        spec_scheduler: Set(spec.scheduler),
        ai_summary: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    if let Err(e) = state.blobs.store(model.id, Arc::clone(&runs)).await {
        if let Err(rollback) = benchmark::Entity::delete_by_id(model.id)
            .exec(&state.db)
            .await
        {
            error!(id = model.id, error = %rollback, "Failed to roll back benchmark row");
        }
        return Err(AppError::Internal(format!(
            "failed to store benchmark data: {e}"
        )));
    }

    info!(id = model.id, user_id, runs = runs.len(), "Created benchmark");

    state.summarizer.summarize(&model, runs);

    Ok(model.id)
}

/// Row offset of a 1-based page, rejecting pages the database cannot address.
fn page_offset(page: u64) -> Result<u64, AppError> {
    Ord::max(page, 1)
        .saturating_sub(1)
        .checked_mul(BENCHMARKS_PER_PAGE)
        .filter(|offset| i64::try_from(*offset).is_ok())
        .ok_or_else(|| AppError::Validation("Page number is too large".into()))
}
