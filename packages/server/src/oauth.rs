//! Discord OAuth2 authorization-code flow.

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("invalid OAuth URL: {0}")]
    InvalidUrl(String),

    #[error("Discord request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Discord returned {status} for {what}")]
    Status { what: &'static str, status: u16 },
}

/// Discord endpoints; overridable so tests can point at a local server.
#[derive(Clone, Debug)]
pub struct DiscordEndpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub api_base: String,
}

impl Default for DiscordEndpoints {
    fn default() -> Self {
        Self {
            authorize_url: "https://discord.com/oauth2/authorize".into(),
            token_url: "https://discord.com/api/oauth2/token".into(),
            api_base: "https://discord.com/api".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct DiscordOAuth {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_url: String,
    endpoints: DiscordEndpoints,
}

impl DiscordOAuth {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: config.discord_client_id.clone(),
            client_secret: config.discord_client_secret.clone(),
            redirect_url: config.discord_redirect_url.clone(),
            endpoints: DiscordEndpoints::default(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: DiscordEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// URL the browser is sent to, requesting the `identify` scope.
    pub fn authorize_url(&self, state: &str) -> Result<Url, OAuthError> {
        Url::parse_with_params(
            &self.endpoints.authorize_url,
            [
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", "identify"),
                ("state", state),
            ],
        )
        .map_err(|e| OAuthError::InvalidUrl(e.to_string()))
    }

    /// Trade an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let resp = self
            .http
            .post(&self.endpoints.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_url.as_str()),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(OAuthError::Status {
                what: "token exchange",
                status: resp.status().as_u16(),
            });
        }

        let token: TokenResponse = resp.json().await?;
        Ok(token.access_token)
    }

    pub async fn fetch_user(&self, access_token: &str) -> Result<DiscordUser, OAuthError> {
        let resp = self
            .http
            .get(format!("{}/users/@me", self.endpoints.api_base))
            .bearer_auth(access_token)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(OAuthError::Status {
                what: "user details",
                status: resp.status().as_u16(),
            });
        }

        Ok(resp.json().await?)
    }
}
