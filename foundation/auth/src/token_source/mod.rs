pub mod refresh_token_source;
pub mod reuse_token_source;

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::Error;
use crate::token::Token;

#[async_trait]
pub trait TokenSource: Send + Sync + Debug {
    async fn token(&self) -> Result<Token, Error>;
}
