use std::sync::Arc;

use async_trait::async_trait;

use super::error::StorageError;
use crate::run::BenchmarkRun;

/// Per-benchmark storage of the decoded run list.
///
/// One blob per benchmark id. Create is the only writer, so implementations
/// need no locking beyond what the filesystem gives them.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write the runs for `id`, replacing any existing blob.
    ///
    /// The run list is shared so callers can hand the same allocation to
    /// other consumers while the write happens off the async runtime.
    async fn store(&self, id: i32, runs: Arc<[BenchmarkRun]>) -> Result<(), StorageError>;

    /// Read back the runs for `id`.
    async fn retrieve(&self, id: i32) -> Result<Vec<BenchmarkRun>, StorageError>;

    /// Remove the blob for `id`. A missing blob is [`StorageError::NotFound`].
    async fn delete(&self, id: i32) -> Result<(), StorageError>;

    /// Ids of every blob currently present.
    async fn list_ids(&self) -> Result<Vec<i32>, StorageError>;
}
