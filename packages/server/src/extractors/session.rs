use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::error::AppError;
use crate::services::session::{SESSION_COOKIE, SessionService, SessionUser};
use crate::state::AppState;

/// Session user if the request carries a live, logged-in session cookie.
///
/// Missing, unknown and expired sessions all resolve to `None`.
pub struct MaybeUser(pub Option<SessionUser>);

/// Logged-in session user. Rejects with `UNAUTHORIZED` otherwise.
pub struct AuthUser(pub SessionUser);

/// Raw session id from the cookie, whether or not it is logged in.
pub fn session_id(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(id) = session_id(&jar) else {
            return Ok(MaybeUser(None));
        };

        let user = SessionService::new(&state.db).current_user(&id).await?;
        Ok(MaybeUser(user))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;
        user.map(AuthUser).ok_or(AppError::Unauthorized)
    }
}
