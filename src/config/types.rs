//! Configuration type definitions.

use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub discord: DiscordConfig,
    pub pixiv: PixivConfig,
    pub access: Option<AccessConfig>,
}

/// Discord bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    pub token: String,
}

/// Pixiv API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PixivConfig {
    /// Path to the two-line token store (access token, refresh token).
    pub token_file: String,
    /// Directory downloaded images are staged in before upload.
    pub temp_dir: String,
}

/// Access control settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessConfig {
    /// Guild allow-list. Empty or absent means every guild is accepted.
    pub guilds: Option<Vec<GuildAccess>>,
    /// Per-channel/per-guild spoiler requirements.
    pub spoilers: Option<Vec<SpoilerRule>>,
}

/// One allow-listed guild.
#[derive(Debug, Clone, Deserialize)]
pub struct GuildAccess {
    /// Guild ID.
    pub guild: u64,
    /// Allowed channel IDs. Absent or empty means all channels of the guild.
    pub channels: Option<Vec<u64>>,
}

/// Spoiler requirement for a channel or guild.
#[derive(Debug, Clone, Deserialize)]
pub struct SpoilerRule {
    /// Channel or guild ID.
    pub id: u64,
    /// When true, un-spoilered pixiv links are ignored here.
    pub require_spoiler: bool,
}
