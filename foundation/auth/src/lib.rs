//! # onedrive-auth
//!
//! OAuth2 authorization code flow against the Microsoft identity platform.
//!
//! ```
//! use onedrive_auth::{OAuthConfig, flow::OAuthFlow, session::OAuthSession};
//!
//! async fn run(code: &str) -> Result<(), onedrive_auth::error::Error> {
//!     let flow = OAuthFlow::new(OAuthConfig::new("client-id", "http://localhost:8080/callback"));
//!     // redirect the user here, then receive `code` on the redirect uri
//!     let login_url = flow.login_url(Some("csrf-state"))?;
//!     let session = OAuthSession::from_code(flow, code).await?;
//!     let token = session.token().await?;
//!     Ok(())
//! }
//! ```
pub mod error;
pub mod flow;
pub mod session;
pub mod token;
pub mod token_source;

pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com/common/oauth2/v2.0";

pub const DEFAULT_SCOPES: [&str; 2] = ["offline_access", "Files.ReadWrite.All"];

#[derive(Clone, Debug)]
pub struct OAuthConfig {
    pub client_id: String,
    /// Only confidential (web) applications have a secret.
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    /// Base of the `authorize` and `token` endpoints.
    pub authority: String,
}

impl OAuthConfig {
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            redirect_uri: redirect_uri.into(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            authority: DEFAULT_AUTHORITY.to_string(),
        }
    }

    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn with_scopes<S: Into<String>>(mut self, scopes: impl IntoIterator<Item = S>) -> Self {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn scopes_to_string(&self, sep: &str) -> String {
        self.scopes.join(sep)
    }

    pub(crate) fn authorize_url(&self) -> String {
        format!("{}/authorize", self.authority.trim_end_matches('/'))
    }

    pub(crate) fn token_url(&self) -> String {
        format!("{}/token", self.authority.trim_end_matches('/'))
    }
}
