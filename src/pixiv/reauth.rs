//! Single-retry authentication wrapper.
//!
//! Pixiv access tokens expire after an hour; rather than track expiry, a
//! call that comes back error-flagged triggers exactly one token refresh
//! followed by exactly one retry. The second result is returned as-is,
//! whatever it says.

use std::future::Future;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

use crate::common::error::RefreshError;

/// A fresh access/refresh token pair from the OAuth endpoint.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    /// The endpoint rotates this too, but the on-disk store keeps the
    /// original refresh token, so it is not consumed here.
    #[allow(dead_code)]
    pub refresh_token: String,
}

/// Exchanges a refresh token for a new token pair.
#[async_trait]
pub trait RefreshTokens {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, RefreshError>;
}

/// Shared session credentials.
///
/// The access token mutex doubles as the refresh serializer: it is held
/// across the refresh-and-swap step only, never across an outer API call,
/// so concurrent fetches don't queue behind a refresh.
#[derive(Debug)]
pub struct SessionTokens {
    access: Mutex<String>,
    /// Read-only; the on-disk store is never rewritten.
    refresh: String,
}

impl SessionTokens {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: Mutex::new(access.into()),
            refresh: refresh.into(),
        }
    }

    /// Current access token, for a bearer-auth header.
    pub async fn bearer(&self) -> String {
        self.access.lock().await.clone()
    }
}

/// Run `call`; if `is_error` flags the reply, refresh the access token once
/// and run `call` once more, returning the second reply unconditionally.
///
/// A failed refresh is logged and the retry proceeds with the stale token;
/// its failure, if any, is the caller's to interpret.
pub async fn call_with_reauth<T, F, Fut>(
    session: &SessionTokens,
    auth: &(impl RefreshTokens + Sync),
    is_error: impl Fn(&T) -> bool,
    call: F,
) -> T
where
    F: Fn() -> Fut,
    Fut: Future<Output = T>,
{
    let first = call().await;
    if !is_error(&first) {
        return first;
    }

    {
        let mut access = session.access.lock().await;
        match auth.refresh(&session.refresh).await {
            Ok(pair) => *access = pair.access_token,
            Err(e) => warn!("Token refresh failed, retrying with current credentials: {}", e),
        }
    }

    call().await
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeAuth {
        refreshes: AtomicUsize,
        reject: bool,
    }

    #[async_trait]
    impl RefreshTokens for FakeAuth {
        async fn refresh(&self, _refresh_token: &str) -> Result<TokenPair, RefreshError> {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            if self.reject {
                Err(RefreshError::Rejected {
                    message: "expired".to_string(),
                })
            } else {
                Ok(TokenPair {
                    access_token: "fresh".to_string(),
                    refresh_token: "next".to_string(),
                })
            }
        }
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Reply {
        failed: bool,
        attempt: usize,
    }

    fn failing_first(attempts: &Arc<AtomicUsize>) -> impl Fn() -> std::pin::Pin<Box<dyn Future<Output = Reply> + Send>> {
        let attempts = Arc::clone(attempts);
        move || {
            let attempts = Arc::clone(&attempts);
            Box::pin(async move {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst);
                Reply {
                    failed: attempt == 0,
                    attempt,
                }
            }) as std::pin::Pin<Box<dyn Future<Output = Reply> + Send>>
        }
    }

    #[tokio::test]
    async fn test_flagged_reply_refreshes_once_and_returns_second() {
        let session = SessionTokens::new("stale", "refresh-me");
        let auth = FakeAuth::default();
        let attempts = Arc::new(AtomicUsize::new(0));

        let reply =
            call_with_reauth(&session, &auth, |r: &Reply| r.failed, failing_first(&attempts)).await;

        assert_eq!(reply, Reply { failed: false, attempt: 1 });
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(auth.refreshes.load(Ordering::SeqCst), 1);
        assert_eq!(session.bearer().await, "fresh");
    }

    #[tokio::test]
    async fn test_clean_reply_skips_refresh() {
        let session = SessionTokens::new("stale", "refresh-me");
        let auth = FakeAuth::default();
        let attempts = Arc::new(AtomicUsize::new(0));

        let calls = Arc::clone(&attempts);
        let reply = call_with_reauth(
            &session,
            &auth,
            |r: &Reply| r.failed,
            move || {
                let calls = Arc::clone(&calls);
                Box::pin(async move {
                    let attempt = calls.fetch_add(1, Ordering::SeqCst);
                    Reply { failed: false, attempt }
                }) as std::pin::Pin<Box<dyn Future<Output = Reply> + Send>>
            },
        )
        .await;

        assert_eq!(reply, Reply { failed: false, attempt: 0 });
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(auth.refreshes.load(Ordering::SeqCst), 0);
        assert_eq!(session.bearer().await, "stale");
    }

    #[tokio::test]
    async fn test_failed_refresh_still_retries_with_stale_token() {
        let session = SessionTokens::new("stale", "refresh-me");
        let auth = FakeAuth { reject: true, ..FakeAuth::default() };
        let attempts = Arc::new(AtomicUsize::new(0));

        // Both attempts fail; the second reply comes back unmodified.
        let always_failing = {
            let attempts = Arc::clone(&attempts);
            move || {
                let attempts = Arc::clone(&attempts);
                Box::pin(async move {
                    let attempt = attempts.fetch_add(1, Ordering::SeqCst);
                    Reply { failed: true, attempt }
                }) as std::pin::Pin<Box<dyn Future<Output = Reply> + Send>>
            }
        };

        let reply = call_with_reauth(&session, &auth, |r: &Reply| r.failed, always_failing).await;

        assert_eq!(reply, Reply { failed: true, attempt: 1 });
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(auth.refreshes.load(Ordering::SeqCst), 1);
        assert_eq!(session.bearer().await, "stale");
    }
}
