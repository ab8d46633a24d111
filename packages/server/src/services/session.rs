use chrono::{Duration, Utc};
use rand::RngCore;
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entity::{session, user};

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "session";

/// Sessions expire this many days after the last login attempt.
pub const SESSION_TTL_DAYS: i64 = 30;

/// The logged-in user bound to a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: i32,
    pub username: String,
}

pub struct SessionService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> SessionService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Load a live session; expired or unknown ids yield `None`.
    pub async fn find(&self, id: &str) -> Result<Option<session::Model>, DbErr> {
        session::Entity::find_by_id(id.to_string())
            .filter(session::Column::ExpiresAt.gt(Utc::now()))
            .one(self.conn)
            .await
    }

    /// The user bound to session `id`, if any.
    pub async fn current_user(&self, id: &str) -> Result<Option<SessionUser>, DbErr> {
        let Some(model) = self.find(id).await? else {
            return Ok(None);
        };
        Ok(match (model.user_id, model.username) {
            (Some(user_id), Some(username)) => Some(SessionUser { user_id, username }),
            _ => None,
        })
    }

    /// Store a fresh OAuth state nonce, reusing the session `existing` when it
    /// is still live. Returns the session id and the nonce.
    pub async fn begin_login(&self, existing: Option<&str>) -> Result<(String, String), DbErr> {
        let state = random_state();
        let expires_at = Utc::now() + Duration::days(SESSION_TTL_DAYS);

        if let Some(id) = existing
            && let Some(model) = self.find(id).await?
        {
            let mut active: session::ActiveModel = model.into();
            active.oauth_state = Set(Some(state.clone()));
            active.expires_at = Set(expires_at);
            let model = active.update(self.conn).await?;
            return Ok((model.id, state));
        }

        let id = Uuid::new_v4().simple().to_string();
        session::ActiveModel {
            id: Set(id.clone()),
            user_id: Set(None),
            username: Set(None),
            oauth_state: Set(Some(state.clone())),
            expires_at: Set(expires_at),
        }
        .insert(self.conn)
        .await?;

        Ok((id, state))
    }

    /// Whether `state` matches the nonce stored by [`Self::begin_login`].
    pub async fn state_matches(&self, id: &str, state: &str) -> Result<bool, DbErr> {
        Ok(self
            .find(id)
            .await?
            .and_then(|m| m.oauth_state)
            .is_some_and(|expected| expected == state))
    }

    /// Bind the session to `user` and clear the pending nonce.
    pub async fn bind_user(&self, id: &str, user: &user::Model) -> Result<(), DbErr> {
        session::Entity::update_many()
            .col_expr(session::Column::UserId, Expr::value(Some(user.id)))
            .col_expr(session::Column::Username, Expr::value(Some(user.username.clone())))
            .col_expr(session::Column::OauthState, Expr::value(Option::<String>::None))
            .filter(session::Column::Id.eq(id))
            .exec(self.conn)
            .await?;
        Ok(())
    }

    pub async fn destroy(&self, id: &str) -> Result<(), DbErr> {
        session::Entity::delete_by_id(id.to_string())
            .exec(self.conn)
            .await?;
        Ok(())
    }

    /// Delete every expired session, returning how many were removed.
    pub async fn purge_expired(&self) -> Result<u64, DbErr> {
        let res = session::Entity::delete_many()
            .filter(session::Column::ExpiresAt.lte(Utc::now()))
            .exec(self.conn)
            .await?;
        Ok(res.rows_affected)
    }
}

/// 16 random bytes, hex encoded.
fn random_state() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
