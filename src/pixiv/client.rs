//! Pixiv App API client.
//!
//! Owns the HTTP client and live session credentials. Detail fetches go
//! through the single-retry auth wrapper; downloads carry the App-API
//! referer that pixiv's image hosts require.

use std::path::{Path, PathBuf};

use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};
use tracing::debug;

use crate::common::error::PixivError;
use crate::pixiv::auth::PixivOauth;
use crate::pixiv::reauth::{call_with_reauth, SessionTokens};
use crate::pixiv::store::StoredTokens;
use crate::pixiv::types::IllustDetailEnvelope;

const APP_API_BASE: &str = "https://app-api.pixiv.net";
const IMAGE_REFERER: &str = "https://app-api.pixiv.net/";
const APP_USER_AGENT: &str = "PixivIOSApp/7.13.3 (iOS 14.6; iPhone13,2)";

pub struct PixivClient {
    http: reqwest::Client,
    session: SessionTokens,
    oauth: PixivOauth,
}

impl PixivClient {
    pub fn new(tokens: StoredTokens) -> Result<Self, PixivError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(APP_USER_AGENT));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            oauth: PixivOauth::new(http.clone()),
            session: SessionTokens::new(tokens.access_token, tokens.refresh_token),
            http,
        })
    }

    /// Fetch illustration metadata, refreshing the access token once if the
    /// API flags the first attempt.
    pub async fn illust_detail(&self, illust_id: u64) -> Result<IllustDetailEnvelope, PixivError> {
        call_with_reauth(
            &self.session,
            &self.oauth,
            |reply: &Result<IllustDetailEnvelope, PixivError>| {
                matches!(reply, Ok(envelope) if envelope.error.is_some())
            },
            || self.illust_detail_once(illust_id),
        )
        .await
    }

    /// One detail request. The API reports errors in-body, so the response
    /// is decoded regardless of HTTP status.
    async fn illust_detail_once(&self, illust_id: u64) -> Result<IllustDetailEnvelope, PixivError> {
        let token = self.session.bearer().await;
        let envelope = self
            .http
            .get(format!("{}/v1/illust/detail", APP_API_BASE))
            .query(&[("illust_id", illust_id)])
            .bearer_auth(token)
            .send()
            .await?
            .json()
            .await?;

        Ok(envelope)
    }

    /// Download an image into `dir`, returning the written path.
    pub async fn download(&self, url: &str, dir: &Path) -> Result<PathBuf, PixivError> {
        let name = url.rsplit('/').find(|s| !s.is_empty()).unwrap_or("image");
        let dest = dir.join(name);

        debug!("Downloading {} -> {}", url, dest.display());
        let bytes = self
            .http
            .get(url)
            .header(REFERER, IMAGE_REFERER)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        tokio::fs::write(&dest, &bytes).await?;

        Ok(dest)
    }
}
