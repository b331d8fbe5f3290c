//! Re-posting fetched images as reply attachments.
//!
//! For each scanned link: fetch metadata, pick the image URLs, download
//! them to the staging directory, and reply with the files attached,
//! batching to Discord's per-message attachment limit.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serenity::builder::{CreateAllowedMentions, CreateAttachment, CreateMessage, EditMessage};
use serenity::model::channel::Message;
use serenity::prelude::*;
use tracing::{debug, info, warn};

use crate::common::error::Result;
use crate::pixiv::types::Illust;
use crate::pixiv::PixivClient;
use crate::scan::{is_spoilered, LinkMatch};

/// Discord allows at most this many attachments per message.
const MAX_ATTACHMENTS: usize = 10;

pub struct Reposter {
    pixiv: Arc<PixivClient>,
    temp_dir: PathBuf,
}

impl Reposter {
    pub fn new(pixiv: Arc<PixivClient>, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            pixiv,
            temp_dir: temp_dir.into(),
        }
    }

    /// Fetch and re-post every link's images as reply attachments.
    pub async fn repost_links(
        &self,
        ctx: &Context,
        msg: &Message,
        links: &[LinkMatch],
    ) -> Result<()> {
        let mut posted = false;

        for link in links {
            let envelope = self.pixiv.illust_detail(link.illust.id()).await?;
            if let Some(error) = envelope.error {
                warn!(
                    "Detail fetch for illust {} failed: {}",
                    link.illust.id(),
                    error.describe()
                );
                continue;
            }
            let Some(illust) = envelope.illust else { continue };
            let Some(urls) = select_image_urls(&illust, link.page) else {
                debug!("Illust {} has no usable image set, skipping", illust.id);
                continue;
            };

            let spoiler = is_spoilered(&msg.content, link.start, link.end);
            info!(
                "Reposting illust {} '{}' ({} image(s), spoiler: {})",
                illust.id,
                illust.title,
                urls.len(),
                spoiler
            );
            self.send_batches(ctx, msg, &urls, spoiler).await?;
            posted = true;
        }

        if posted {
            suppress_source_embeds(ctx, msg).await;
        }

        Ok(())
    }

    async fn send_batches(
        &self,
        ctx: &Context,
        msg: &Message,
        urls: &[String],
        spoiler: bool,
    ) -> Result<()> {
        for batch in urls.chunks(MAX_ATTACHMENTS) {
            let mut files = Vec::with_capacity(batch.len());
            for url in batch {
                let path = self.pixiv.download(url, &self.temp_dir).await?;
                files.push(attachment_for(&path, spoiler).await?);
            }

            let reply = CreateMessage::new()
                .reference_message(msg)
                .allowed_mentions(CreateAllowedMentions::new().replied_user(false));
            msg.channel_id.send_files(&ctx.http, files, reply).await?;
        }

        Ok(())
    }
}

/// Build an upload from a downloaded file, applying Discord's spoiler
/// filename convention when needed.
async fn attachment_for(path: &Path, spoiler: bool) -> Result<CreateAttachment> {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("image");
    let name = if spoiler {
        format!("SPOILER_{}", name)
    } else {
        name.to_string()
    };
    let data = tokio::fs::read(path).await?;

    Ok(CreateAttachment::bytes(data, name))
}

/// Pick the image URLs to post for one illustration.
///
/// Single-image posts use their one large rendition; multi-page posts use
/// every page's. A 1-based fragment index narrows the set to that page;
/// indices out of range fall back to the full list.
fn select_image_urls(illust: &Illust, page: Option<u32>) -> Option<Vec<String>> {
    let urls: Vec<String> = if let Some(single) = illust
        .meta_single_page
        .as_ref()
        .and_then(|meta| meta.original_image_url.as_deref())
    {
        vec![illust
            .image_urls
            .large
            .clone()
            .unwrap_or_else(|| single.to_string())]
    } else if !illust.meta_pages.is_empty() {
        illust
            .meta_pages
            .iter()
            .filter_map(|p| p.image_urls.large.clone().or_else(|| p.image_urls.original.clone()))
            .collect()
    } else {
        return None;
    };

    if urls.is_empty() {
        return None;
    }

    if let Some(hint) = page {
        if let Some(url) = (hint as usize).checked_sub(1).and_then(|i| urls.get(i)) {
            return Some(vec![url.clone()]);
        }
    }

    Some(urls)
}

/// Hide the original message's auto-embed once the images are re-posted.
/// Needs Manage Messages; without it the edit fails and is ignored.
async fn suppress_source_embeds(ctx: &Context, msg: &Message) {
    let edit = EditMessage::new().suppress_embeds(true);
    if let Err(e) = msg.channel_id.edit_message(&ctx.http, msg.id, edit).await {
        debug!("Could not suppress embeds on source message: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixiv::types::{ImageUrls, MetaPage, MetaSinglePage};

    fn single_page(large: Option<&str>, original: &str) -> Illust {
        Illust {
            id: 1,
            image_urls: ImageUrls {
                large: large.map(str::to_string),
                original: None,
            },
            meta_single_page: Some(MetaSinglePage {
                original_image_url: Some(original.to_string()),
            }),
            ..Illust::default()
        }
    }

    fn multi_page(larges: &[&str]) -> Illust {
        Illust {
            id: 2,
            // Multi-page posts come with an empty meta_single_page object.
            meta_single_page: Some(MetaSinglePage::default()),
            meta_pages: larges
                .iter()
                .map(|url| MetaPage {
                    image_urls: ImageUrls {
                        large: Some(url.to_string()),
                        original: None,
                    },
                })
                .collect(),
            ..Illust::default()
        }
    }

    #[test]
    fn test_single_page_uses_large_url() {
        let illust = single_page(Some("large.jpg"), "orig.jpg");
        assert_eq!(select_image_urls(&illust, None), Some(vec!["large.jpg".to_string()]));
    }

    #[test]
    fn test_single_page_falls_back_to_original() {
        let illust = single_page(None, "orig.jpg");
        assert_eq!(select_image_urls(&illust, None), Some(vec!["orig.jpg".to_string()]));
    }

    #[test]
    fn test_multi_page_collects_all() {
        let illust = multi_page(&["p0.jpg", "p1.jpg", "p2.jpg"]);
        let urls = select_image_urls(&illust, None).unwrap();
        assert_eq!(urls, vec!["p0.jpg", "p1.jpg", "p2.jpg"]);
    }

    #[test]
    fn test_multi_page_falls_back_to_original_url() {
        let mut illust = multi_page(&[]);
        illust.meta_pages = vec![MetaPage {
            image_urls: ImageUrls {
                large: None,
                original: Some("o.jpg".to_string()),
            },
        }];
        assert_eq!(select_image_urls(&illust, None), Some(vec!["o.jpg".to_string()]));
    }

    #[test]
    fn test_page_hint_selects_one() {
        let illust = multi_page(&["p0.jpg", "p1.jpg", "p2.jpg"]);
        // Fragment indices are 1-based.
        assert_eq!(select_image_urls(&illust, Some(2)), Some(vec!["p1.jpg".to_string()]));
    }

    #[test]
    fn test_out_of_range_hint_falls_back_to_full_list() {
        let illust = multi_page(&["p0.jpg", "p1.jpg"]);
        let urls = select_image_urls(&illust, Some(9)).unwrap();
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn test_zero_hint_falls_back_to_full_list() {
        let illust = multi_page(&["p0.jpg", "p1.jpg"]);
        let urls = select_image_urls(&illust, Some(0)).unwrap();
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn test_no_images_is_skip() {
        let illust = Illust {
            id: 3,
            meta_single_page: Some(MetaSinglePage::default()),
            ..Illust::default()
        };
        assert_eq!(select_image_urls(&illust, None), None);
    }
}
