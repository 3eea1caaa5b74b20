use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Error;
use crate::flow::OAuthFlow;
use crate::token::Token;
use crate::token_source::refresh_token_source::RefreshTokenSource;
use crate::token_source::reuse_token_source::ReuseTokenSource;
use crate::token_source::TokenSource as InternalTokenSource;

/// The signed-in state of one user.
///
/// The session is owned by the caller and shared with the clients that need a
/// token by `Arc`. Expired access tokens are renewed with the refresh token on
/// demand; concurrent callers wait for a single renewal.
pub struct OAuthSession {
    inner: ReuseTokenSource,
}

impl Debug for OAuthSession {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthSession").finish_non_exhaustive()
    }
}

impl OAuthSession {
    /// Restores a session from a token obtained earlier, e.g. one that was persisted.
    pub fn new(flow: OAuthFlow, token: Token) -> Self {
        let refresh = RefreshTokenSource::new(flow, token.refresh_token.clone());
        Self::with_source(Box::new(refresh), token)
    }

    /// Completes the authorization code flow.
    pub async fn from_code(flow: OAuthFlow, code: &str) -> Result<Self, Error> {
        let token = flow.exchange_code(code).await?;
        Ok(Self::new(flow, token))
    }

    pub(crate) fn with_source(source: Box<dyn InternalTokenSource>, token: Token) -> Self {
        Self {
            inner: ReuseTokenSource::new(source, token),
        }
    }

    /// Returns a valid token, renewing it first when it has expired.
    pub async fn token(&self) -> Result<Token, Error> {
        self.inner.token().await
    }

    /// The token as currently held, for persisting.
    pub fn current(&self) -> Result<Token, Error> {
        self.inner.current()
    }
}

#[async_trait]
impl onedrive_token::TokenSource for OAuthSession {
    async fn token(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let token = self.inner.token().await?;
        Ok(token.value())
    }
}

#[derive(Debug, Clone)]
pub struct OAuthSessionProvider {
    session: Arc<OAuthSession>,
}

impl OAuthSessionProvider {
    pub fn new(session: Arc<OAuthSession>) -> Self {
        Self { session }
    }
}

impl onedrive_token::TokenSourceProvider for OAuthSessionProvider {
    fn token_source(&self) -> Arc<dyn onedrive_token::TokenSource> {
        self.session.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use onedrive_token::{TokenSource, TokenSourceProvider};

    use super::*;
    use crate::token_source::reuse_token_source::tests::{token_expiring_in, CountingTokenSource};

    #[ctor::ctor]
    fn init() {
        let _ = tracing_subscriber::fmt::try_init();
    }

    #[tokio::test]
    async fn test_header_value() {
        let calls = Arc::new(AtomicUsize::new(0));
        let session = OAuthSession::with_source(
            Box::new(CountingTokenSource { calls: calls.clone() }),
            token_expiring_in(time::Duration::hours(1)),
        );
        let provider = OAuthSessionProvider::new(Arc::new(session));
        let value = provider.token_source().token().await.unwrap();
        assert_eq!(value, "Bearer initial");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_renews_and_exposes_current() {
        let calls = Arc::new(AtomicUsize::new(0));
        let session = OAuthSession::with_source(
            Box::new(CountingTokenSource { calls: calls.clone() }),
            token_expiring_in(time::Duration::seconds(-1)),
        );
        assert_eq!(session.current().unwrap().access_token, "initial");
        let value = TokenSource::token(&session).await.unwrap();
        assert_eq!(value, "Bearer renewed-1");
        assert_eq!(session.current().unwrap().access_token, "renewed-1");
    }

    #[tokio::test]
    async fn test_expired_without_refresh_token() {
        let flow = OAuthFlow::new(crate::OAuthConfig::new("id", "http://localhost/cb"));
        let mut token = token_expiring_in(time::Duration::seconds(-1));
        token.refresh_token = None;
        let session = OAuthSession::new(flow, token);
        assert!(matches!(session.token().await, Err(Error::RefreshTokenIsRequired)));
    }
}
