use bench_common::BenchmarkRun;
use bench_common::format::humanize_since;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::shared::Pagination;
use super::user::UserRef;
use crate::entity::{benchmark, user};

#[derive(Deserialize, IntoParams)]
pub struct BenchmarkListQuery {
    /// Substring matched against title or description.
    pub query: Option<String>,
    /// 1-based page number.
    pub page: Option<u64>,
}

#[derive(Deserialize, IntoParams)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: Option<u64>,
}

/// Hardware and software summary of an upload.
#[derive(Serialize, ToSchema)]
pub struct BenchmarkSpec {
    pub distro: String,
    pub cpu: String,
    pub gpu: String,
    pub ram: String,
    pub kernel: String,
    pub scheduler: String,
}

#[derive(Serialize, ToSchema)]
pub struct BenchmarkResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub user: Option<UserRef>,
    pub spec: BenchmarkSpec,
    /// Generated summary; `null` until the background task finishes.
    pub ai_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    #[schema(example = "5 minutes ago")]
    pub created_at_humanized: String,
    pub updated_at: DateTime<Utc>,
}

impl BenchmarkResponse {
    pub fn new(model: benchmark::Model, owner: Option<user::Model>) -> Self {
        let created_at_humanized = humanize_since(model.created_at, Utc::now());
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            user: owner.map(UserRef::from),
            spec: BenchmarkSpec {
                distro: model.spec_distro,
                cpu: model.spec_cpu,
                gpu: model.spec_gpu,
                ram: model.spec_ram,
                kernel: model.spec_kernel,
                scheduler: model.spec_scheduler,
            },
            ai_summary: model.ai_summary,
            created_at: model.created_at,
            created_at_humanized,
            updated_at: model.updated_at,
        }
    }
}

/// A benchmark with its decoded runs.
#[derive(Serialize, ToSchema)]
pub struct BenchmarkDetailResponse {
    pub benchmark: BenchmarkResponse,
    pub runs: Vec<BenchmarkRun>,
    /// Whether an AI summary is being generated right now.
    pub ai_summary_in_progress: bool,
}

#[derive(Serialize, ToSchema)]
pub struct BenchmarkListResponse {
    pub data: Vec<BenchmarkResponse>,
    pub pagination: Pagination,
}

#[derive(Serialize, ToSchema)]
pub struct CreatedBenchmarkResponse {
    pub id: i32,
}

#[derive(Serialize, ToSchema)]
pub struct DeletedBenchmarkResponse {
    pub id: i32,
    #[schema(example = "Benchmark deleted")]
    pub message: String,
}

/// Multipart body of an upload.
#[derive(ToSchema)]
pub struct CreateBenchmarkForm {
    #[schema(example = "Cyberpunk 2077 scheduler comparison")]
    pub title: String,
    pub description: String,
    /// 1 to 30 MangoHud CSV captures; each file name becomes a run label.
    #[schema(value_type = Vec<String>, format = Binary)]
    pub files: Vec<Vec<u8>>,
}
