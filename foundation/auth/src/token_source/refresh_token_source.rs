use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::Error;
use crate::flow::OAuthFlow;
use crate::token::Token;
use crate::token_source::TokenSource;

/// Issues new access tokens with the `refresh_token` grant.
#[derive(Debug)]
pub struct RefreshTokenSource {
    flow: OAuthFlow,
    refresh_token: RwLock<Option<String>>,
}

impl RefreshTokenSource {
    pub fn new(flow: OAuthFlow, refresh_token: Option<String>) -> Self {
        Self {
            flow,
            refresh_token: RwLock::new(refresh_token),
        }
    }

    /// Keeps the refresh token the provider rotated to, if any.
    fn remember(&self, token: &Token) -> Result<(), Error> {
        if let Some(rotated) = &token.refresh_token {
            *self.refresh_token.write()? = Some(rotated.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl TokenSource for RefreshTokenSource {
    async fn token(&self) -> Result<Token, Error> {
        let refresh_token = self.refresh_token.read()?.clone().ok_or(Error::RefreshTokenIsRequired)?;
        let token = self.flow.refresh(&refresh_token).await?;
        self.remember(&token)?;
        Ok(token)
    }
}
