#![allow(clippy::result_large_err)]
//! # onedrive-client
//!
//! OneDrive client library built on Microsoft Graph.
//!
//! * [Working with files in Microsoft Graph](https://learn.microsoft.com/en-us/graph/api/resources/onedrive)
//! * [Upload large files with an upload session](https://learn.microsoft.com/en-us/graph/api/driveitem-createuploadsession)
//!
//! ## Quick Start
//!
//! ### Authentication
//!
//! #### OAuth2
//!
//! Sign the user in with the authorization code flow of `onedrive-auth` and
//! share the session with the client. Expired access tokens are renewed with
//! the refresh token when a request needs one.
//!
//! ```
//! use std::sync::Arc;
//! use onedrive::client::{Client, ClientConfig};
//! use onedrive::client::onedrive_auth::{OAuthConfig, flow::OAuthFlow, session::OAuthSession};
//!
//! async fn run(code: &str) -> Result<(), onedrive_auth::error::Error> {
//!     let flow = OAuthFlow::new(OAuthConfig::new("client-id", "http://localhost:8080/callback"));
//!     let session = Arc::new(OAuthSession::from_code(flow, code).await?);
//!     let client = Client::new(ClientConfig::default().with_oauth(session));
//!     Ok(())
//! }
//! ```
//!
//! #### Access token
//!
//! When the token comes from somewhere else:
//!
//! ```
//! use onedrive::client::{Client, ClientConfig};
//!
//! async fn run(access_token: String) {
//!     let client = Client::new(ClientConfig::default().with_access_token(access_token));
//! }
//! ```
//!
//! ### Usage
//!
//! ```
//! use onedrive::client::Client;
//! use onedrive::http::Error;
//! use onedrive::http::items::ItemLocation;
//! use onedrive::http::items::download::Range;
//! use onedrive::http::items::upload::UploadItemRequest;
//!
//! async fn run(client: Client) -> Result<(), Error> {
//!     // Upload a small file
//!     let uploaded = client.upload_small(&UploadItemRequest {
//!         parent: ItemLocation::path("/Documents"),
//!         name: "hello.txt".to_string(),
//!         ..Default::default()
//!     }, "hello world").await?;
//!
//!     // Upload a large file, one range at a time
//!     let file = tokio::fs::File::open("backup.tar").await?;
//!     let session = client.root().child("Backups").upload_session("backup.tar").await?;
//!     let item = session.with_content_type("application/x-tar").complete(file).await?;
//!
//!     // Download the file
//!     let data = client.download(&item.location(), &Range::default()).await?;
//!
//!     // Browse
//!     for child in client.root().children().await? {
//!         println!("{} {}", child.name().await?, child.size().await?);
//!     }
//!     Ok(())
//! }
//! ```
pub mod client;
pub mod http;
pub mod item;
pub mod token_source;
