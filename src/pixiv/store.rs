//! Two-line token store.
//!
//! Line 1 ends in the access token, line 2 ends in the refresh token; each
//! line may carry leading fields (e.g. `export PIXIV_ACCESS <token>`). The
//! store is read once at startup and never rewritten; refreshed access
//! tokens live only in memory.

use std::fs;
use std::path::Path;

use crate::common::error::ConfigError;

/// Token pair read from the store.
#[derive(Debug, Clone)]
pub struct StoredTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Read and parse the token store at `path`.
pub fn load_token_store(path: impl AsRef<Path>) -> Result<StoredTokens, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.display().to_string(),
        source,
    })?;

    parse_token_store(&contents).map_err(|message| ConfigError::TokenFile {
        path: path.display().to_string(),
        message,
    })
}

fn parse_token_store(contents: &str) -> Result<StoredTokens, String> {
    let mut lines = contents.lines();
    let access_token = last_field(lines.next(), "access token line")?;
    let refresh_token = last_field(lines.next(), "refresh token line")?;

    Ok(StoredTokens {
        access_token,
        refresh_token,
    })
}

fn last_field(line: Option<&str>, what: &str) -> Result<String, String> {
    line.and_then(|line| line.split_whitespace().last())
        .map(str::to_string)
        .ok_or_else(|| format!("missing {}", what))
}
