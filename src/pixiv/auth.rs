//! OAuth token refresh.
//!
//! Exchanges the stored refresh token for a fresh access token using the
//! public mobile-app client credentials.

use async_trait::async_trait;
use serde::Deserialize;

use crate::common::error::RefreshError;
use crate::pixiv::reauth::{RefreshTokens, TokenPair};

const AUTH_TOKEN_URL: &str = "https://oauth.secure.pixiv.net/auth/token";
const CLIENT_ID: &str = "MOBrBDS8blbauoSck0ZfDbtuzpyT";
const CLIENT_SECRET: &str = "lsACyCD94FhDUtGTXi3QzcFE2uU1hqtDaKeqrdwj";

/// Client for the pixiv OAuth endpoint.
#[derive(Debug, Clone)]
pub struct PixivOauth {
    http: reqwest::Client,
}

impl PixivOauth {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    response: Option<AuthPayload>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct AuthPayload {
    access_token: String,
    refresh_token: String,
}

#[async_trait]
impl RefreshTokens for PixivOauth {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, RefreshError> {
        let reply: AuthResponse = self
            .http
            .post(AUTH_TOKEN_URL)
            .form(&[
                ("client_id", CLIENT_ID),
                ("client_secret", CLIENT_SECRET),
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("include_policy", "true"),
            ])
            .send()
            .await?
            .json()
            .await?;

        match reply.response {
            Some(payload) => Ok(TokenPair {
                access_token: payload.access_token,
                refresh_token: payload.refresh_token,
            }),
            None => Err(RefreshError::Rejected {
                message: reply
                    .errors
                    .map(|errors| errors.to_string())
                    .unwrap_or_else(|| "no token in response".to_string()),
            }),
        }
    }
}
