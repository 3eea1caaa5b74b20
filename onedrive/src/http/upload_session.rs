use std::fmt;
use std::sync::Arc;

use reqwest::header::{CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE};
use reqwest::{Body, Client, Method, Response, StatusCode};
use time::OffsetDateTime;

use crate::http::items::DriveItem;
use crate::http::transport::Transport;
use crate::http::upload_source::UploadSource;
use crate::http::{check_response_status, map_error, Error};

/// Range sizes must be a multiple of this many bytes (320 KiB).
pub const RANGE_SIZE_UNIT: u64 = 327_680;

/// The largest range the service accepts in one request (60 MiB).
pub const MAX_RANGE_SIZE: u64 = 62_914_560;

/// Returns the range size to upload with: the preference rounded down to a
/// multiple of [`RANGE_SIZE_UNIT`] and kept within `[RANGE_SIZE_UNIT, MAX_RANGE_SIZE]`.
pub fn normalize_range_size(preference: Option<u64>) -> u64 {
    match preference {
        Some(size) => (size / RANGE_SIZE_UNIT * RANGE_SIZE_UNIT).clamp(RANGE_SIZE_UNIT, MAX_RANGE_SIZE),
        None => RANGE_SIZE_UNIT,
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RangeError {
    #[error("invalid range: first={0} last={1}")]
    InvalidRange(u64, u64),
    #[error("total size must not be zero")]
    ZeroTotalSize,
    #[error("last byte must be less than total size: last={0} total={1}")]
    InvalidLastByte(u64, u64),
}

/// One inclusive byte range of the content, sent as the `Content-Range` header.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ContentRange {
    first: u64,
    last: u64,
    total: u64,
}

impl fmt::Display for ContentRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "bytes {}-{}/{}", self.first, self.last, self.total)
    }
}

impl ContentRange {
    pub fn new(first: u64, last: u64, total: u64) -> Result<ContentRange, RangeError> {
        if total == 0 {
            return Err(RangeError::ZeroTotalSize);
        }
        if first > last {
            return Err(RangeError::InvalidRange(first, last));
        }
        if last >= total {
            return Err(RangeError::InvalidLastByte(last, total));
        }
        Ok(Self { first, last, total })
    }

    pub fn first(&self) -> u64 {
        self.first
    }

    pub fn last(&self) -> u64 {
        self.last
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// The number of bytes in the range.
    pub fn len(&self) -> u64 {
        self.last - self.first + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Splits `[0, total)` into consecutive ranges of `range_size` bytes. Only the last one may be shorter.
pub fn content_ranges(total: u64, range_size: u64) -> impl Iterator<Item = ContentRange> {
    let range_size = range_size.max(1);
    let mut first = 0;
    std::iter::from_fn(move || {
        if first >= total {
            return None;
        }
        let last = first.saturating_add(range_size).min(total) - 1;
        let range = ContentRange { first, last, total };
        first = last + 1;
        Some(range)
    })
}

/// The state of an upload session as reported by the service.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadSessionInfo {
    /// The pre-authenticated url ranges are uploaded to.
    pub upload_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(with = "time::serde::rfc3339::option")]
    pub expiration_date_time: Option<OffsetDateTime>,
    /// Ranges the service is still missing, e.g. `["0-"]` or `["12345-55232", "77829-99375"]`.
    pub next_expected_ranges: Vec<String>,
}

#[derive(PartialEq, Debug)]
pub enum UploadStatus {
    /// The last range was received and the file was created.
    Completed(DriveItem),
    /// The range was accepted and the service is waiting for more.
    Accepted(UploadSessionInfo),
}

/// A resumable upload of one file.
///
/// See [Upload large files with an upload session][1].
///
/// ```
/// use onedrive::client::Client;
/// use onedrive::http::items::ItemLocation;
/// use onedrive::http::items::create_upload_session::CreateUploadSessionRequest;
/// use onedrive::http::Error;
///
/// async fn run(client: Client) -> Result<(), Error> {
///     let file = tokio::fs::File::open("backup.tar").await?;
///     let session = client
///         .create_upload_session(&CreateUploadSessionRequest {
///             parent: ItemLocation::path("/Backups"),
///             name: "backup.tar".to_string(),
///             ..Default::default()
///         })
///         .await?;
///     let item = session.with_range_size(10 * 1024 * 1024).complete(file).await?;
///     println!("uploaded {} ({} bytes)", item.id, item.size);
///     Ok(())
/// }
/// ```
///
/// [1]: https://learn.microsoft.com/en-us/graph/api/driveitem-createuploadsession
#[derive(Clone, Debug)]
pub struct UploadSession {
    info: UploadSessionInfo,
    content_type: Option<String>,
    range_size: Option<u64>,
    http: Client,
    transport: Arc<dyn Transport>,
}

impl UploadSession {
    pub(crate) fn new(info: UploadSessionInfo, http: Client, transport: Arc<dyn Transport>) -> Self {
        Self {
            info,
            content_type: None,
            range_size: None,
            http,
            transport,
        }
    }

    pub fn url(&self) -> &str {
        self.info.upload_url.as_str()
    }

    pub fn expiration_date_time(&self) -> Option<OffsetDateTime> {
        self.info.expiration_date_time
    }

    pub fn next_expected_ranges(&self) -> &[String] {
        &self.info.next_expected_ranges
    }

    /// The session as created, for persisting and resuming later.
    pub fn info(&self) -> &UploadSessionInfo {
        &self.info
    }

    /// Sent as `Content-Type` with every range.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// The preferred range size. It is normalized with [`normalize_range_size`].
    pub fn with_range_size(mut self, range_size: u64) -> Self {
        self.range_size = Some(range_size);
        self
    }

    /// The range size the content is split into.
    pub fn range_size(&self) -> u64 {
        normalize_range_size(self.range_size)
    }

    /// Uploads the whole content one range after another and returns the created item.
    ///
    /// Fails on the first range the service does not accept. Ranges already
    /// accepted are not rolled back, and nothing is retried.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all, fields(url = %self.info.upload_url)))]
    pub async fn complete<S: UploadSource>(self, mut source: S) -> Result<DriveItem, Error> {
        let range_size = self.range_size();
        let total = source.size().await?;
        tracing::debug!("upload start: url={} total={} range_size={}", self.url(), total, range_size);

        let mut uploaded = 0;
        for range in content_ranges(total, range_size) {
            let data = source.read(range.len() as usize).await?;
            if (data.len() as u64) < range.len() {
                return Err(Error::SourceSizeMismatch {
                    expected: total,
                    actual: range.first() + data.len() as u64,
                });
            }
            match self.upload_range(data, &range).await? {
                UploadStatus::Completed(item) => {
                    tracing::info!("upload completed: id={} size={}", item.id, item.size);
                    return Ok(item);
                }
                UploadStatus::Accepted(_) => uploaded = range.last() + 1,
            }
        }
        Err(Error::UploadNotFinalized {
            url: self.info.upload_url,
            uploaded,
        })
    }

    /// Uploads a single range.
    pub async fn upload_range<T: Into<Body>>(&self, data: T, range: &ContentRange) -> Result<UploadStatus, Error> {
        let mut builder = self
            .http
            .put(self.url())
            .header(CONTENT_LENGTH, range.len())
            .header(CONTENT_RANGE, range.to_string())
            .body(data);
        if let Some(content_type) = &self.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        let response = self.transport.execute(builder.build()?).await?;
        tracing::debug!("upload range: {} status={}", range, response.status());
        self.map_range_response(response).await
    }

    /// Fetches the current state of the session.
    pub async fn status(&self) -> Result<UploadSessionInfo, Error> {
        let request = self.http.get(self.url()).build()?;
        let response = self.transport.execute(request).await?;
        let response = check_response_status(&Method::GET, self.url(), response).await?;
        let mut info: UploadSessionInfo = serde_json::from_slice(&response.bytes().await?)?;
        if info.upload_url.is_empty() {
            info.upload_url = self.info.upload_url.clone();
        }
        Ok(info)
    }

    /// Discards the session and the ranges uploaded so far.
    pub async fn cancel(self) -> Result<(), Error> {
        let request = self.http.delete(self.url()).build()?;
        let response = self.transport.execute(request).await?;
        check_response_status(&Method::DELETE, self.url(), response).await?;
        Ok(())
    }

    async fn map_range_response(&self, response: Response) -> Result<UploadStatus, Error> {
        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                let item = serde_json::from_slice(&response.bytes().await?)?;
                Ok(UploadStatus::Completed(item))
            }
            StatusCode::ACCEPTED => {
                // informational only; an unreadable body does not fail the range
                let info = match response.bytes().await {
                    Ok(body) => serde_json::from_slice(&body).unwrap_or_default(),
                    Err(e) => {
                        tracing::debug!("ignoring unreadable 202 body: {e}");
                        UploadSessionInfo::default()
                    }
                };
                Ok(UploadStatus::Accepted(info))
            }
            _ => Err(map_error(&Method::PUT, self.url(), response).await),
        }
    }
}
