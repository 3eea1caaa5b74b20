use std::error::Error;
use std::fmt::Debug;
use std::sync::Arc;

#[async_trait::async_trait]
pub trait TokenSource: Send + Sync + Debug {
    /// token returns the value of the `Authorization` header, e.g. `Bearer eyJ0...`
    async fn token(&self) -> Result<String, Box<dyn Error + Send + Sync>>;
}

pub trait TokenSourceProvider: Send + Sync + Debug {
    /// token_source returns the token source implementation
    fn token_source(&self) -> Arc<dyn TokenSource>;
}
