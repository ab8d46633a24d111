use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::traits::BlobStore;
use crate::run::BenchmarkRun;

/// zstd's fastest level; captures compress well even at this setting.
const COMPRESSION_LEVEL: i32 = 1;

const BLOB_EXTENSION: &str = "bin";

/// Filesystem-backed blob store.
///
/// Each benchmark is a single file `{base_path}/{id}.bin` holding one zstd
/// frame around the bincode encoding of its run list.
#[derive(Clone, Debug)]
pub struct FilesystemBlobStore {
    base_path: PathBuf,
}

impl FilesystemBlobStore {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    pub async fn new(base_path: PathBuf) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn blob_path(&self, id: i32) -> PathBuf {
        self.base_path.join(format!("{id}.{BLOB_EXTENSION}"))
    }
}

fn encode(runs: &[BenchmarkRun]) -> Result<Vec<u8>, StorageError> {
    let raw = bincode::serialize(runs).map_err(|e| StorageError::Encode(e.to_string()))?;
    Ok(zstd::encode_all(raw.as_slice(), COMPRESSION_LEVEL)?)
}

fn decode(id: i32, data: &[u8]) -> Result<Vec<BenchmarkRun>, StorageError> {
    let corrupt = |reason: String| StorageError::Corrupt { id, reason };
    let raw = zstd::decode_all(data).map_err(|e| corrupt(e.to_string()))?;
    bincode::deserialize(&raw).map_err(|e| corrupt(e.to_string()))
}

async fn blocking<T, F>(f: F) -> Result<T, StorageError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn store(&self, id: i32, runs: Arc<[BenchmarkRun]>) -> Result<(), StorageError> {
        let path = self.blob_path(id);

        let size = blocking(move || {
            let data = encode(&runs)?;
            std::fs::write(&path, &data)?;
            Ok(data.len())
        })
        .await?;

        tracing::debug!(id, bytes = size, "Stored benchmark data");
        Ok(())
    }

    async fn retrieve(&self, id: i32) -> Result<Vec<BenchmarkRun>, StorageError> {
        let path = self.blob_path(id);

        blocking(move || {
            let data = match std::fs::read(&path) {
                Ok(data) => data,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    return Err(StorageError::NotFound(id));
                }
                Err(e) => return Err(e.into()),
            };
            decode(id, &data)
        })
        .await
    }

    async fn delete(&self, id: i32) -> Result<(), StorageError> {
        match fs::remove_file(self.blob_path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_ids(&self) -> Result<Vec<i32>, StorageError> {
        let mut entries = fs::read_dir(&self.base_path).await?;
        let mut ids = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(BLOB_EXTENSION) {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<i32>().ok())
            {
                ids.push(id);
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }
}
