use axum::extract::{Query, State};
use axum::response::Redirect;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::IntoParams;

use crate::error::{AppError, ErrorBody};
use crate::extractors::session::session_id;
use crate::services::session::{SESSION_COOKIE, SESSION_TTL_DAYS};
use crate::services::{SessionService, UserService};
use crate::state::AppState;

#[derive(Deserialize, IntoParams)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

fn session_cookie(id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(SESSION_TTL_DAYS))
        .build()
}

#[utoipa::path(
    get,
    path = "/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Start Discord login",
    description = "Stores a fresh state nonce in the session and redirects to Discord's authorize page.",
    responses(
        (status = 307, description = "Redirect to Discord"),
    ),
)]
#[instrument(skip(state, jar))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    let existing = session_id(&jar);
    let (id, nonce) = SessionService::new(&state.db)
        .begin_login(existing.as_deref())
        .await?;

    let url = state
        .oauth
        .authorize_url(&nonce)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((jar.add(session_cookie(id)), Redirect::temporary(url.as_str())))
}

#[utoipa::path(
    get,
    path = "/login/callback",
    tag = "Auth",
    operation_id = "loginCallback",
    summary = "Finish Discord login",
    description = "Checks the state nonce, exchanges the code, creates or updates the user and binds it to the session.",
    params(CallbackQuery),
    responses(
        (status = 307, description = "Logged in; redirect to `/`"),
        (status = 400, description = "State mismatch (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Discord request failed (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, query))]
pub async fn login_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect, AppError> {
    let invalid_state = || AppError::Validation("Invalid Discord state".into());

    let id = session_id(&jar).ok_or_else(invalid_state)?;
    let sessions = SessionService::new(&state.db);
    let returned_state = query.state.as_deref().unwrap_or_default();
    if !sessions.state_matches(&id, returned_state).await? {
        return Err(invalid_state());
    }

    let code = query.code.as_deref().unwrap_or_default();
    let token = state
        .oauth
        .exchange_code(code)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to exchange code for token: {e}")))?;
    let discord_user = state.oauth.fetch_user(&token).await.map_err(|e| {
        AppError::Internal(format!("Failed to get user details from Discord: {e}"))
    })?;

    let user = UserService::new(&state.db)
        .upsert_discord_user(&discord_user.id, &discord_user.username)
        .await?;
    sessions.bind_user(&id, &user).await?;

    info!(user_id = user.id, username = %user.username, "User logged in");
    Ok(Redirect::temporary("/"))
}

#[utoipa::path(
    get,
    path = "/logout",
    tag = "Auth",
    operation_id = "logout",
    summary = "Log out",
    responses(
        (status = 307, description = "Session cleared; redirect to `/`"),
    ),
)]
#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    if let Some(id) = session_id(&jar) {
        SessionService::new(&state.db).destroy(&id).await?;
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, Redirect::temporary("/")))
}
