//! Error types for the application.

use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
#[allow(dead_code)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pixiv error: {0}")]
    Pixiv(#[from] PixivError),

    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },

    #[error("Bad token file '{path}': {message}")]
    TokenFile { path: String, message: String },
}

/// Errors from the pixiv App API client.
#[derive(Debug, Error)]
pub enum PixivError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the OAuth token refresh exchange.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("Refresh request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Refresh token rejected: {message}")]
    Rejected { message: String },
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
