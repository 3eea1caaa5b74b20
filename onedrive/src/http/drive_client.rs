use std::sync::Arc;

use bytes::Bytes;
use futures_util::{Stream, TryStreamExt};
use onedrive_token::TokenSource;
use reqwest::header::{AUTHORIZATION, LOCATION, USER_AGENT};
use reqwest::{Body, Client, RequestBuilder, Response};

use crate::http::drives::get::GetDriveRequest;
use crate::http::drives::Drive;
use crate::http::items::copy::CopyItemRequest;
use crate::http::items::create_folder::CreateFolderRequest;
use crate::http::items::create_upload_session::CreateUploadSessionRequest;
use crate::http::items::delete::DeleteItemRequest;
use crate::http::items::download::Range;
use crate::http::items::get::GetItemRequest;
use crate::http::items::list_children::{ListChildrenRequest, ListChildrenResponse};
use crate::http::items::update::UpdateItemRequest;
use crate::http::items::upload::UploadItemRequest;
use crate::http::items::{self, DriveItem, ItemLocation};
use crate::http::permissions::create_link::CreateLinkRequest;
use crate::http::permissions::delete::DeletePermissionRequest;
use crate::http::permissions::list::ListPermissionsResponse;
use crate::http::permissions::{self, Permission};
use crate::http::transport::Transport;
use crate::http::upload_session::{UploadSession, UploadSessionInfo};
use crate::http::{check_response_status, drives, Error};

const USER_AGENT_VALUE: &str = concat!("onedrive-client-rust/", env!("CARGO_PKG_VERSION"));

/// Operations on drives, items and permissions.
#[derive(Clone, Debug)]
pub struct DriveClient {
    ts: Option<Arc<dyn TokenSource>>,
    endpoint: String,
    http: Client,
    transport: Arc<dyn Transport>,
}

impl DriveClient {
    pub(crate) fn new(ts: Option<Arc<dyn TokenSource>>, endpoint: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            ts,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: Client::new(),
            transport,
        }
    }

    /// Gets the signed-in user's drive, or the drive with the given id.
    ///
    /// ```
    /// use onedrive::client::Client;
    /// use onedrive::http::drives::get::GetDriveRequest;
    ///
    /// async fn run(client: Client) {
    ///     let drive = client.get_drive(&GetDriveRequest::default()).await;
    /// }
    /// ```
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn get_drive(&self, req: &GetDriveRequest) -> Result<Drive, Error> {
        let builder = drives::get::build(self.endpoint.as_str(), &self.http, req);
        self.send(builder).await
    }

    /// Gets the metadata of an item.
    ///
    /// ```
    /// use onedrive::client::Client;
    /// use onedrive::http::items::ItemLocation;
    /// use onedrive::http::items::get::GetItemRequest;
    ///
    /// async fn run(client: Client) {
    ///     let item = client.get_item(&GetItemRequest {
    ///         item: ItemLocation::path("/Documents/report.pdf"),
    ///         ..Default::default()
    ///     }).await;
    /// }
    /// ```
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn get_item(&self, req: &GetItemRequest) -> Result<DriveItem, Error> {
        let builder = items::get::build(self.endpoint.as_str(), &self.http, req);
        self.send(builder).await
    }

    /// Lists the first page of the children of a folder.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn list_children(&self, req: &ListChildrenRequest) -> Result<ListChildrenResponse, Error> {
        let builder = items::list_children::build(self.endpoint.as_str(), &self.http, req);
        self.send(builder).await
    }

    /// Fetches the page a previous response's `next_link` points at.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn list_children_next(&self, next_link: &str) -> Result<ListChildrenResponse, Error> {
        let url = url::Url::parse(next_link)?;
        let endpoint = url::Url::parse(&self.endpoint)?;
        let prefix = format!("{}/", endpoint.path().trim_end_matches('/'));
        if url.origin() != endpoint.origin() || !url.path().starts_with(&prefix) {
            return Err(Error::ForeignNextLink {
                link: next_link.to_string(),
                endpoint: self.endpoint.clone(),
            });
        }
        let builder = self.http.get(url);
        self.send(builder).await
    }

    /// Creates a folder.
    ///
    /// ```
    /// use onedrive::client::Client;
    /// use onedrive::http::items::{ConflictBehavior, ItemLocation};
    /// use onedrive::http::items::create_folder::CreateFolderRequest;
    ///
    /// async fn run(client: Client) {
    ///     let folder = client.create_folder(&CreateFolderRequest {
    ///         parent: ItemLocation::path("/Documents"),
    ///         name: "2024".to_string(),
    ///         conflict_behavior: ConflictBehavior::Rename,
    ///     }).await;
    /// }
    /// ```
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn create_folder(&self, req: &CreateFolderRequest) -> Result<DriveItem, Error> {
        let builder = items::create_folder::build(self.endpoint.as_str(), &self.http, req);
        self.send(builder).await
    }

    /// Renames or moves an item.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn update_item(&self, req: &UpdateItemRequest) -> Result<DriveItem, Error> {
        let builder = items::update::build(self.endpoint.as_str(), &self.http, req);
        self.send(builder).await
    }

    /// Moves an item to the recycle bin.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn delete_item(&self, req: &DeleteItemRequest) -> Result<(), Error> {
        let builder = items::delete::build(self.endpoint.as_str(), &self.http, req);
        self.send_get_empty(builder).await
    }

    /// Starts copying an item. The copy runs in the background; the returned
    /// url, when the service provides one, reports its progress.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn copy_item(&self, req: &CopyItemRequest) -> Result<Option<String>, Error> {
        let builder = items::copy::build(self.endpoint.as_str(), &self.http, req);
        let response = self.execute(builder).await?;
        let monitor = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        Ok(monitor)
    }

    /// Uploads a file of up to 4 MiB in a single request. Larger files need an upload session.
    ///
    /// ```
    /// use onedrive::client::Client;
    /// use onedrive::http::items::ItemLocation;
    /// use onedrive::http::items::upload::UploadItemRequest;
    ///
    /// async fn run(client: Client) {
    ///     let item = client.upload_small(&UploadItemRequest {
    ///         parent: ItemLocation::root(),
    ///         name: "hello.txt".to_string(),
    ///         content_type: Some("text/plain".to_string()),
    ///         ..Default::default()
    ///     }, "hello world").await;
    /// }
    /// ```
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn upload_small<T: Into<Body>>(&self, req: &UploadItemRequest, data: T) -> Result<DriveItem, Error> {
        let builder = items::upload::build(self.endpoint.as_str(), &self.http, req, data);
        self.send(builder).await
    }

    /// Downloads the content of a file.
    ///
    /// ```
    /// use onedrive::client::Client;
    /// use onedrive::http::items::ItemLocation;
    /// use onedrive::http::items::download::Range;
    ///
    /// async fn run(client: Client) {
    ///     let data = client.download(&ItemLocation::path("/hello.txt"), &Range::default()).await;
    /// }
    /// ```
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn download(&self, item: &ItemLocation, range: &Range) -> Result<Vec<u8>, Error> {
        let builder = items::download::build(self.endpoint.as_str(), &self.http, item, range);
        let response = self.execute(builder).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Downloads the content of a file as a stream of chunks.
    ///
    /// ```
    /// use futures_util::StreamExt;
    /// use onedrive::client::Client;
    /// use onedrive::http::items::ItemLocation;
    /// use onedrive::http::items::download::Range;
    ///
    /// async fn run(client: Client) {
    ///     let mut stream = client
    ///         .download_streamed(&ItemLocation::path("/backup.tar"), &Range::default())
    ///         .await
    ///         .unwrap();
    ///     while let Some(chunk) = stream.next().await {
    ///         let _chunk = chunk.unwrap();
    ///     }
    /// }
    /// ```
    pub async fn download_streamed(
        &self,
        item: &ItemLocation,
        range: &Range,
    ) -> Result<impl Stream<Item = Result<Bytes, Error>>, Error> {
        let builder = items::download::build(self.endpoint.as_str(), &self.http, item, range);
        let response = self.execute(builder).await?;
        Ok(response.bytes_stream().map_err(Error::from))
    }

    /// Creates an upload session for a file of any size.
    /// See [`UploadSession`] for uploading the content.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn create_upload_session(&self, req: &CreateUploadSessionRequest) -> Result<UploadSession, Error> {
        let builder = items::create_upload_session::build(self.endpoint.as_str(), &self.http, req);
        let info: UploadSessionInfo = self.send(builder).await?;
        tracing::debug!("upload session created: {}", info.upload_url);
        Ok(self.resume_upload_session(info))
    }

    /// Rebuilds a session from its persisted state, e.g. after a restart.
    pub fn resume_upload_session(&self, info: UploadSessionInfo) -> UploadSession {
        UploadSession::new(info, self.http.clone(), self.transport.clone())
    }

    /// Lists the sharing permissions of an item.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn list_permissions(&self, item: &ItemLocation) -> Result<ListPermissionsResponse, Error> {
        let builder = permissions::list::build(self.endpoint.as_str(), &self.http, item);
        self.send(builder).await
    }

    /// Creates a sharing link, or returns the existing one of the same type and scope.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn create_link(&self, req: &CreateLinkRequest) -> Result<Permission, Error> {
        let builder = permissions::create_link::build(self.endpoint.as_str(), &self.http, req);
        self.send(builder).await
    }

    /// Revokes a sharing permission.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn delete_permission(&self, req: &DeletePermissionRequest) -> Result<(), Error> {
        let builder = permissions::delete::build(self.endpoint.as_str(), &self.http, req);
        self.send_get_empty(builder).await
    }

    async fn with_headers(&self, builder: RequestBuilder) -> Result<RequestBuilder, Error> {
        let builder = builder.header(USER_AGENT, USER_AGENT_VALUE);
        match &self.ts {
            Some(ts) => {
                let token = ts.token().await.map_err(Error::TokenSource)?;
                Ok(builder.header(AUTHORIZATION, token))
            }
            None => Ok(builder),
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response, Error> {
        let request = self.with_headers(builder).await?.build()?;
        let method = request.method().clone();
        let url = request.url().to_string();
        tracing::trace!("{} {}", method, url);
        let response = self.transport.execute(request).await?;
        check_response_status(&method, &url, response).await
    }

    async fn send<T: for<'de> serde::Deserialize<'de>>(&self, builder: RequestBuilder) -> Result<T, Error> {
        let response = self.execute(builder).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn send_get_empty(&self, builder: RequestBuilder) -> Result<(), Error> {
        self.execute(builder).await?;
        Ok(())
    }
}
