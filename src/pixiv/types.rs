//! Pixiv App API response types (the subset the bot consumes).

use serde::Deserialize;

/// `illust_detail` response body. The App API reports failures in-body
/// rather than through HTTP status alone.
#[derive(Debug, Clone, Deserialize)]
pub struct IllustDetailEnvelope {
    #[serde(default)]
    pub illust: Option<Illust>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

/// In-body API error object.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_message: String,
    #[serde(default)]
    pub reason: String,
}

impl ApiError {
    /// The first populated message field; pixiv fills a different one
    /// depending on the failure.
    pub fn describe(&self) -> &str {
        for message in [&self.user_message, &self.message, &self.reason] {
            if !message.is_empty() {
                return message;
            }
        }
        "unspecified error"
    }
}

/// One illustration's metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Illust {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_urls: ImageUrls,
    #[serde(default)]
    pub meta_single_page: Option<MetaSinglePage>,
    #[serde(default)]
    pub meta_pages: Vec<MetaPage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageUrls {
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub original: Option<String>,
}

/// Carries a URL only for single-image posts; multi-page posts send an
/// empty object here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetaSinglePage {
    #[serde(default)]
    pub original_image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetaPage {
    #[serde(default)]
    pub image_urls: ImageUrls,
}
