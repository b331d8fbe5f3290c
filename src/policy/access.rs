//! Allow-list and spoiler-exemption decisions.
//!
//! Both checks are pure lookups against maps built once from config at
//! startup.

use std::collections::{HashMap, HashSet};

use crate::config::AccessConfig;

/// Decides which channels the bot acts in and where spoilers are mandatory.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    /// Guild ID -> allowed channel IDs. An empty set allows every channel
    /// of that guild. An empty map allows every guild.
    allowed_guilds: HashMap<u64, HashSet<u64>>,
    /// Channel or guild ID -> whether links must be spoilered there.
    spoiler_required: HashMap<u64, bool>,
}

impl AccessPolicy {
    /// Build the policy from the optional `access` config section.
    pub fn from_config(access: Option<&AccessConfig>) -> Self {
        let mut policy = AccessPolicy::default();

        let Some(access) = access else {
            return policy;
        };

        for entry in access.guilds.iter().flatten() {
            let channels = entry.channels.iter().flatten().copied().collect();
            policy.allowed_guilds.insert(entry.guild, channels);
        }
        for rule in access.spoilers.iter().flatten() {
            policy.spoiler_required.insert(rule.id, rule.require_spoiler);
        }

        policy
    }

    /// Whether a message from this channel may trigger processing.
    ///
    /// Direct messages carry no guild and are always accepted.
    pub fn is_accepted_channel(&self, guild_id: Option<u64>, channel_id: u64) -> bool {
        let Some(guild_id) = guild_id else {
            return true;
        };
        if self.allowed_guilds.is_empty() {
            return true;
        }
        match self.allowed_guilds.get(&guild_id) {
            None => false,
            Some(channels) => channels.is_empty() || channels.contains(&channel_id),
        }
    }

    /// Whether un-spoilered links are still processed here.
    ///
    /// The channel's rule wins over the guild's; with neither configured,
    /// unspoilered links are allowed.
    pub fn allows_unspoilered_links(&self, guild_id: Option<u64>, channel_id: u64) -> bool {
        let required = self
            .spoiler_required
            .get(&channel_id)
            .or_else(|| guild_id.and_then(|g| self.spoiler_required.get(&g)));

        !required.copied().unwrap_or(false)
    }
}
