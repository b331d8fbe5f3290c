//! Message scanning: pixiv link extraction and spoiler markup analysis.

pub mod links;
pub mod spoiler;

pub use links::{scan_links, IllustRef, LinkMatch};
pub use spoiler::{has_spoiler, is_spoilered};
