use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
};

use crate::entity::user;

/// Usernames are cut to this many characters.
pub const MAX_USERNAME_CHARS: usize = 32;

pub struct UserService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> UserService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Live (not soft-deleted) user by id.
    pub async fn find(&self, id: i32) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find_by_id(id)
            .filter(user::Column::DeletedAt.is_null())
            .one(self.conn)
            .await
    }

    /// Create the user for `discord_id`, or refresh the stored username.
    pub async fn upsert_discord_user(
        &self,
        discord_id: &str,
        username: &str,
    ) -> Result<user::Model, DbErr> {
        let username: String = username.chars().take(MAX_USERNAME_CHARS).collect();
        let now = Utc::now();

        let existing = user::Entity::find()
            .filter(user::Column::DiscordId.eq(discord_id))
            .one(self.conn)
            .await?;

        match existing {
            Some(model) => {
                let mut active: user::ActiveModel = model.into();
                active.username = Set(username);
                active.updated_at = Set(now);
                active.update(self.conn).await
            }
            None => {
                user::ActiveModel {
                    discord_id: Set(discord_id.to_string()),
                    username: Set(username),
                    is_admin: Set(false),
                    created_at: Set(now),
                    updated_at: Set(now),
                    deleted_at: Set(None),
                    ..Default::default()
                }
                .insert(self.conn)
                .await
            }
        }
    }
}
