//! Pixiv link extraction.
//!
//! Finds pixiv illustration links in raw message text. Both URL shapes in
//! circulation are recognized: the current `/artworks/<id>` path and the
//! legacy `member_illust.php?illust_id=<id>` query form. Links wrapped in
//! `<...>` are skipped, since Discord already suppresses their previews.

use std::sync::LazyLock;

use fancy_regex::Regex;
use tracing::warn;

/// Current URL shape, e.g. `https://www.pixiv.net/en/artworks/12345`.
static NEW_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?<!<)https?://(?:www\.)?pixiv\.net/[^\s<>]*?artworks/(?P<id>\d+)/?(?:#(?P<page>\d+))?(?!\S*>)",
    )
    .unwrap()
});

/// Legacy URL shape, e.g. `https://pixiv.net/member_illust.php?illust_id=999`.
static OLD_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?<!<)https?://(?:www\.)?pixiv\.net/member_illust\.php\?[^\s<>#]*?illust_id=(?P<id>\d+)[^\s<>#]*(?:#(?P<page>\d+))?(?!\S*>)",
    )
    .unwrap()
});

/// Illustration reference parsed from a URL. Each URL shape carries its
/// identifier in a different place, so matches stay tagged with their origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllustRef {
    /// `/artworks/<id>` path segment.
    NewStyle { id: u64 },
    /// `illust_id=<id>` query parameter.
    OldStyle { id: u64 },
}

impl IllustRef {
    /// The illustration ID, regardless of URL shape.
    pub fn id(&self) -> u64 {
        match *self {
            IllustRef::NewStyle { id } | IllustRef::OldStyle { id } => id,
        }
    }
}

/// One pixiv link found in a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    pub illust: IllustRef,
    /// 1-based sub-image index from the URL fragment, as written.
    pub page: Option<u32>,
    /// Byte offset of the first matched character in the source text.
    pub start: usize,
    /// Byte offset one past the last matched character.
    pub end: usize,
}

/// Scan message text for pixiv links, ordered by position.
///
/// The text is re-scanned on every call; nothing is cached.
pub fn scan_links(text: &str) -> Vec<LinkMatch> {
    let mut matches = Vec::new();
    collect(&NEW_STYLE_RE, text, |id| IllustRef::NewStyle { id }, &mut matches);
    collect(&OLD_STYLE_RE, text, |id| IllustRef::OldStyle { id }, &mut matches);
    matches.sort_by_key(|m| m.start);
    matches
}

fn collect(
    re: &Regex,
    text: &str,
    make_ref: impl Fn(u64) -> IllustRef,
    out: &mut Vec<LinkMatch>,
) {
    for caps in re.captures_iter(text) {
        let caps = match caps {
            Ok(caps) => caps,
            Err(e) => {
                warn!("Link pattern failed to match: {}", e);
                continue;
            }
        };
        let Some(whole) = caps.get(0) else { continue };
        // An ID too long for u64 is not a real illustration.
        let Some(id) = caps.name("id").and_then(|m| m.as_str().parse().ok()) else {
            continue;
        };
        let page = caps.name("page").and_then(|m| m.as_str().parse().ok());

        out.push(LinkMatch {
            illust: make_ref(id),
            page,
            start: whole.start(),
            end: whole.end(),
        });
    }
}
