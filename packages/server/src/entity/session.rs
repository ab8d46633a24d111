use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Server-side session referenced by the `session` cookie.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "session")]
pub struct Model {
    /// Opaque random id stored in the cookie.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Set once the OAuth callback completes.
    pub user_id: Option<i32>,
    pub username: Option<String>,

    /// Pending OAuth `state` nonce, cleared by the callback.
    pub oauth_state: Option<String>,

    pub expires_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
