//! Discord message event handling.
//!
//! Gates incoming messages through the access policy and spoiler rules,
//! then hands eligible ones to the reposter.

use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tracing::{debug, error, info};

use crate::discord::reply::Reposter;
use crate::policy::AccessPolicy;
use crate::scan::{has_spoiler, scan_links};

/// Discord event handler.
pub struct RepostHandler {
    policy: AccessPolicy,
    reposter: Reposter,
}

impl RepostHandler {
    pub fn new(policy: AccessPolicy, reposter: Reposter) -> Self {
        Self { policy, reposter }
    }
}

#[async_trait]
impl EventHandler for RepostHandler {
    async fn message(&self, ctx: Context, msg: Message) {
        // Ignore our own messages
        if msg.author.id == ctx.cache.current_user().id {
            return;
        }

        // Ignore bots
        if msg.author.bot {
            return;
        }

        let guild_id = msg.guild_id.map(|id| id.get());
        let channel_id = msg.channel_id.get();

        if !self.policy.is_accepted_channel(guild_id, channel_id) {
            return;
        }

        let links = scan_links(&msg.content);
        if links.is_empty() {
            return;
        }

        // Channels can insist on spoilered links only.
        if !has_spoiler(&msg.content)
            && !self.policy.allows_unspoilered_links(guild_id, channel_id)
        {
            debug!(
                "Dropping {} unspoilered link(s) in channel {}",
                links.len(),
                channel_id
            );
            return;
        }

        if let Err(e) = self.reposter.repost_links(&ctx, &msg, &links).await {
            error!("Failed to repost pixiv links: {}", e);
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Discord bot connected as {}", ready.user.name);
    }
}
