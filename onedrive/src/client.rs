use std::ops::Deref;
use std::sync::Arc;

use onedrive_token::TokenSourceProvider;
use reqwest_middleware::ClientWithMiddleware;

use crate::http::drive_client::DriveClient;
use crate::http::items::ItemLocation;
use crate::http::transport::{HttpTransport, Transport};
use crate::item::DriveItemProxy;
use crate::token_source::StaticTokenSourceProvider;

pub const DEFAULT_GRAPH_ENDPOINT: &str = "https://graph.microsoft.com/v1.0";

#[derive(Debug)]
pub struct ClientConfig {
    /// Add retries, timeouts or logging here as `reqwest-middleware` middleware.
    pub http: Option<ClientWithMiddleware>,
    pub graph_endpoint: String,
    pub token_source_provider: Option<Box<dyn TokenSourceProvider>>,
    /// Replaces `http` entirely when set.
    pub transport: Option<Arc<dyn Transport>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            http: None,
            graph_endpoint: DEFAULT_GRAPH_ENDPOINT.to_string(),
            token_source_provider: None,
            transport: None,
        }
    }
}

impl ClientConfig {
    /// Sends no `Authorization` header. Only pre-authenticated urls work this way.
    pub fn anonymous(mut self) -> Self {
        self.token_source_provider = None;
        self
    }

    /// Uses an access token obtained elsewhere. It is never refreshed.
    pub fn with_access_token(mut self, access_token: impl AsRef<str>) -> Self {
        self.token_source_provider = Some(Box::new(StaticTokenSourceProvider::new(access_token)));
        self
    }

    pub fn with_http(mut self, http: ClientWithMiddleware) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_graph_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.graph_endpoint = endpoint.into();
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }
}

#[cfg(feature = "auth")]
pub use onedrive_auth;

#[cfg(feature = "auth")]
impl ClientConfig {
    /// Authenticates with a signed-in session. The session is shared, so the
    /// caller can keep using it, e.g. to persist the renewed token.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use onedrive::client::{Client, ClientConfig};
    /// use onedrive::client::onedrive_auth::{OAuthConfig, flow::OAuthFlow, session::OAuthSession};
    ///
    /// async fn run(code: &str) -> Result<(), onedrive_auth::error::Error> {
    ///     let flow = OAuthFlow::new(OAuthConfig::new("client-id", "http://localhost:8080/callback"));
    ///     let session = Arc::new(OAuthSession::from_code(flow, code).await?);
    ///     let client = Client::new(ClientConfig::default().with_oauth(session.clone()));
    ///     Ok(())
    /// }
    /// ```
    pub fn with_oauth(mut self, session: Arc<onedrive_auth::session::OAuthSession>) -> Self {
        self.token_source_provider = Some(Box::new(onedrive_auth::session::OAuthSessionProvider::new(session)));
        self
    }
}

#[derive(Clone, Debug)]
pub struct Client {
    drive_client: DriveClient,
}

impl Deref for Client {
    type Target = DriveClient;

    fn deref(&self) -> &Self::Target {
        &self.drive_client
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl Client {
    /// New client
    pub fn new(config: ClientConfig) -> Self {
        let ts = match config.token_source_provider {
            Some(tsp) => Some(tsp.token_source()),
            None => {
                tracing::trace!("Use anonymous access due to lack of token");
                None
            }
        };
        let transport: Arc<dyn Transport> = match (config.transport, config.http) {
            (Some(transport), _) => transport,
            (None, Some(http)) => Arc::new(HttpTransport::new(http)),
            (None, None) => Arc::new(HttpTransport::default()),
        };
        Self {
            drive_client: DriveClient::new(ts, config.graph_endpoint.as_str(), transport),
        }
    }

    /// A lazily fetched item.
    ///
    /// ```
    /// use onedrive::client::Client;
    /// use onedrive::http::items::ItemLocation;
    /// use onedrive::http::Error;
    ///
    /// async fn run(client: Client) -> Result<(), Error> {
    ///     let report = client.item(ItemLocation::path("/Documents/report.pdf"));
    ///     println!("{} is {} bytes", report.name().await?, report.size().await?);
    ///     Ok(())
    /// }
    /// ```
    pub fn item(&self, location: ItemLocation) -> DriveItemProxy {
        DriveItemProxy::new(&self.drive_client, location)
    }

    /// The root folder of the signed-in user's drive.
    pub fn root(&self) -> DriveItemProxy {
        self.item(ItemLocation::root())
    }
}
