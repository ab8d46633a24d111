use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "benchmark")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
    pub user: HasOne<super::user::Entity>,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,

    // Spec summary of the upload. Write-once.
    pub spec_distro: String,
    pub spec_cpu: String,
    pub spec_gpu: String,
    pub spec_ram: String,
    pub spec_kernel: String,
    pub spec_scheduler: String,

    /// Filled in asynchronously after creation; the only mutable column.
    #[sea_orm(column_type = "Text", nullable)]
    pub ai_summary: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}
