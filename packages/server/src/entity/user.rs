use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Discord snowflake, at most 20 digits.
    #[sea_orm(unique)]
    pub discord_id: String,
    /// Discord display name, truncated to 32 characters.
    pub username: String,
    #[sea_orm(default_value = false)]
    pub is_admin: bool,

    #[sea_orm(has_many)]
    pub benchmarks: HasMany<super::benchmark::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}
