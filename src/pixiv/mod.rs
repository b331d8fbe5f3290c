//! Pixiv App API integration.

pub mod auth;
pub mod client;
pub mod reauth;
pub mod store;
pub mod types;

pub use client::PixivClient;
pub use store::load_token_store;
