use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::benchmark::BenchmarkResponse;
use super::shared::Pagination;
use crate::entity::user;

/// Owner reference embedded in benchmark responses.
#[derive(Serialize, ToSchema)]
pub struct UserRef {
    pub id: i32,
    #[schema(example = "gamer42")]
    pub username: String,
}

impl From<user::Model> for UserRef {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            created_at: m.created_at,
        }
    }
}

/// A user with one page of their benchmarks.
#[derive(Serialize, ToSchema)]
pub struct UserPageResponse {
    pub user: UserResponse,
    pub benchmarks: Vec<BenchmarkResponse>,
    pub pagination: Pagination,
}
