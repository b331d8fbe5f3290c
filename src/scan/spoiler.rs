//! Spoiler markup analysis.
//!
//! Discord spoilers are `||spoiler||` spans; a backslash escapes the marker.
//! Whether a link sits inside a spoiler is decided by counting unescaped
//! markers around its span, so any number of spoiler pairs per message is
//! handled.

use std::sync::LazyLock;

use fancy_regex::Regex;
use tracing::warn;

/// An unescaped `||` marker.
static SPOILER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?<!\\)\|\|").unwrap());

/// Whether the text contains at least one unescaped spoiler marker.
pub fn has_spoiler(text: &str) -> bool {
    SPOILER_RE.is_match(text).unwrap_or_else(|e| {
        warn!("Spoiler pattern failed to match: {}", e);
        false
    })
}

/// Whether the `[link_start, link_end)` span sits inside an active spoiler.
///
/// The link is spoiler-opened when an odd number of markers ends before it
/// (an unclosed opening marker precedes it), and closed when any marker
/// occurs after it. Markers overlapping the span itself count toward
/// neither side.
pub fn is_spoilered(text: &str, link_start: usize, link_end: usize) -> bool {
    let mut before = 0usize;
    let mut after = 0usize;

    for m in SPOILER_RE.find_iter(text) {
        let m = match m {
            Ok(m) => m,
            Err(e) => {
                warn!("Spoiler pattern failed to match: {}", e);
                continue;
            }
        };
        if m.end() <= link_start {
            before += 1;
        } else if m.start() >= link_end {
            after += 1;
        }
    }

    before % 2 == 1 && after > 0
}
