//! Discord-facing side of the bot.

pub mod handler;
pub mod reply;

pub use handler::RepostHandler;
pub use reply::Reposter;
