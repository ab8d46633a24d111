//! Startup cleanup of blobs that no live benchmark row points at.

use std::collections::HashSet;

use bench_common::storage::BlobStore;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};
use tracing::{error, info, warn};

use crate::entity::benchmark;

/// Delete orphaned blobs, returning how many were removed.
pub async fn sweep_orphan_blobs(
    db: &DatabaseConnection,
    blobs: &dyn BlobStore,
) -> anyhow::Result<usize> {
    let blob_ids = blobs.list_ids().await?;
    if blob_ids.is_empty() {
        return Ok(0);
    }

    let live: HashSet<i32> = benchmark::Entity::find()
        .select_only()
        .column(benchmark::Column::Id)
        .filter(benchmark::Column::DeletedAt.is_null())
        .into_tuple::<i32>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let mut removed = 0;
    for id in blob_ids.into_iter().filter(|id| !live.contains(id)) {
        match blobs.delete(id).await {
            Ok(()) => removed += 1,
            Err(e) => warn!(id, error = %e, "Failed to delete orphan blob"),
        }
    }

    Ok(removed)
}

/// Run [`sweep_orphan_blobs`] and log the outcome; never fails.
pub async fn run_orphan_sweep(db: DatabaseConnection, blobs: std::sync::Arc<dyn BlobStore>) {
    match sweep_orphan_blobs(&db, blobs.as_ref()).await {
        Ok(0) => {}
        Ok(count) => info!(count, "Removed orphan benchmark blobs"),
        Err(e) => error!(error = %e, "Orphan blob sweep failed"),
    }
}
