use std::error::Error;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use onedrive_token::{TokenSource, TokenSourceProvider};

/// An access token obtained elsewhere, sent as is until the client is dropped.
#[derive(Clone)]
pub struct StaticTokenSource {
    value: String,
}

impl StaticTokenSource {
    pub fn new(access_token: impl AsRef<str>) -> Self {
        Self {
            value: format!("Bearer {}", access_token.as_ref()),
        }
    }
}

impl Debug for StaticTokenSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenSource").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl TokenSource for StaticTokenSource {
    async fn token(&self) -> Result<String, Box<dyn Error + Send + Sync>> {
        Ok(self.value.clone())
    }
}

#[derive(Debug, Clone)]
pub struct StaticTokenSourceProvider {
    ts: Arc<StaticTokenSource>,
}

impl StaticTokenSourceProvider {
    pub fn new(access_token: impl AsRef<str>) -> Self {
        Self {
            ts: Arc::new(StaticTokenSource::new(access_token)),
        }
    }
}

impl TokenSourceProvider for StaticTokenSourceProvider {
    fn token_source(&self) -> Arc<dyn TokenSource> {
        self.ts.clone()
    }
}
