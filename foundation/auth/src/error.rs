use std::fmt;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The token endpoint rejected the request.
    #[error("token endpoint responded with status {0}: {1}")]
    Token(u16, TokenErrorResponse),

    /// The token endpoint responded with a status and a body that is not an OAuth error.
    #[error("token endpoint responded with status {0}: {1}")]
    UnexpectedStatus(u16, String),

    #[error("refresh token is required to renew the access token")]
    RefreshTokenIsRequired,

    #[error("invalid token")]
    InvalidToken,

    #[error("token lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    HttpClient(#[from] reqwest::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),
}

impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Error::LockPoisoned
    }
}

/// The error body defined by RFC 6749 section 5.2.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct TokenErrorResponse {
    /// Example values include `invalid_grant` and `invalid_client`.
    pub error: String,
    pub error_description: Option<String>,
    pub error_codes: Option<Vec<i64>>,
    pub correlation_id: Option<String>,
}

impl fmt::Display for TokenErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_description {
            Some(description) => write!(f, "{}: {}", self.error, description),
            None => self.error.fmt(f),
        }
    }
}
