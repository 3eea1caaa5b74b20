use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Method, Response, StatusCode};

pub mod drive_client;
pub mod drives;
pub mod error;
pub mod items;
pub mod permissions;
pub mod transport;
pub mod upload_session;
pub mod upload_source;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An error returned from the Microsoft Graph service.
    #[error("{method} {url} failed with status {status}: {error}")]
    Response {
        method: Method,
        url: String,
        status: StatusCode,
        error: error::ErrorResponse,
    },

    /// A status the operation does not accept, with a body that is not a Graph error.
    #[error("unexpected status {status} from {method} {url}: {detail}")]
    UnexpectedStatus {
        method: Method,
        url: String,
        status: StatusCode,
        detail: String,
    },

    /// Every range of the content was accepted but the service never returned the finished item.
    #[error("upload session {url} was not finalized after {uploaded} bytes")]
    UploadNotFinalized { url: String, uploaded: u64 },

    /// The upload source ended before the size it reported.
    #[error("upload source ended early: expected {expected} bytes, read {actual}")]
    SourceSizeMismatch { expected: u64, actual: u64 },

    /// A paging link that leaves the Graph endpoint. No credentials were sent to it.
    #[error("next link {link} is outside of {endpoint}")]
    ForeignNextLink { link: String, endpoint: String },

    /// An error from the underlying HTTP client.
    #[error(transparent)]
    HttpClient(#[from] reqwest::Error),

    /// An error from one of the middleware used.
    #[error(transparent)]
    HttpMiddleware(anyhow::Error),

    /// An error from a token source.
    #[error("token source failed: {0}")]
    TokenSource(Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Deserialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest_middleware::Error> for Error {
    fn from(error: reqwest_middleware::Error) -> Self {
        match error {
            reqwest_middleware::Error::Middleware(err) => Error::HttpMiddleware(err),
            reqwest_middleware::Error::Reqwest(err) => Error::HttpClient(err),
        }
    }
}

impl Error {
    /// Returns `true` for failures worth retrying: connection problems and
    /// throttling or server side statuses. Protocol errors are not retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Response { status, .. } | Error::UnexpectedStatus { status, .. } => is_retryable_status(*status),
            Error::HttpClient(e) => e.is_timeout() || e.is_connect() || e.status().is_some_and(is_retryable_status),
            Error::HttpMiddleware(_) => true,
            Error::Io(e) => matches!(e.kind(), std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted),
            _ => false,
        }
    }

    /// The HTTP status of a status error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Response { status, .. } | Error::UnexpectedStatus { status, .. } => Some(*status),
            Error::HttpClient(e) => e.status(),
            _ => None,
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 408 | 429 | 500..=599)
}

/// Checks whether an HTTP response is successful and returns it, or returns an error.
pub(crate) async fn check_response_status(method: &Method, url: &str, response: Response) -> Result<Response, Error> {
    if response.status().is_success() {
        return Ok(response);
    }
    Err(map_error(method, url, response).await)
}

/// Converts a failed response into an error, preferring the Graph error body when there is one.
pub(crate) async fn map_error(method: &Method, url: &str, response: Response) -> Error {
    let status = response.status();
    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => format!("{e}"),
    };
    match serde_json::from_str::<error::ErrorWrapper>(&text) {
        Ok(wrapper) => Error::Response {
            method: method.clone(),
            url: url.to_string(),
            status,
            error: wrapper.error,
        },
        Err(_) => Error::UnexpectedStatus {
            method: method.clone(),
            url: url.to_string(),
            status,
            detail: text,
        },
    }
}

pub(crate) trait Escape {
    fn escape(&self) -> String;
}

impl Escape for str {
    fn escape(&self) -> String {
        utf8_percent_encode(self, ENCODE_SET).to_string()
    }
}

impl Escape for String {
    fn escape(&self) -> String {
        self.as_str().escape()
    }
}

/// Escapes each segment of a `/` separated path.
pub(crate) fn escape_path(path: &str) -> String {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.escape())
        .collect::<Vec<_>>()
        .join("/")
}

const ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'!')
    .remove(b'~');

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_path() {
        assert_eq!(escape_path("/Documents/My Files/a#b.txt"), "Documents/My%20Files/a%23b.txt");
        assert_eq!(escape_path("a//b/"), "a/b");
        assert_eq!("D4648F06C91D9D3D!54927".escape(), "D4648F06C91D9D3D!54927");
    }

    #[test]
    fn test_is_retryable() {
        let status_error = |status: u16| Error::UnexpectedStatus {
            method: Method::PUT,
            url: "https://example.com".to_string(),
            status: StatusCode::from_u16(status).unwrap(),
            detail: String::new(),
        };
        assert!(status_error(503).is_retryable());
        assert!(status_error(429).is_retryable());
        assert!(!status_error(404).is_retryable());
        assert!(!status_error(416).is_retryable());
        assert!(!Error::UploadNotFinalized {
            url: "https://example.com".to_string(),
            uploaded: 1
        }
        .is_retryable());
    }

    #[test]
    fn test_io_errors_are_retryable_only_when_transient() {
        let io = |kind: std::io::ErrorKind| Error::Io(std::io::Error::from(kind));
        assert!(!io(std::io::ErrorKind::NotFound).is_retryable());
        assert!(!io(std::io::ErrorKind::PermissionDenied).is_retryable());
        assert!(!io(std::io::ErrorKind::UnexpectedEof).is_retryable());
        assert!(io(std::io::ErrorKind::TimedOut).is_retryable());
        assert!(io(std::io::ErrorKind::Interrupted).is_retryable());
    }

    #[test]
    fn test_status_error_display() {
        let error = Error::UnexpectedStatus {
            method: Method::PUT,
            url: "https://up.example.com/session".to_string(),
            status: StatusCode::SERVICE_UNAVAILABLE,
            detail: "busy".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "unexpected status 503 Service Unavailable from PUT https://up.example.com/session: busy"
        );
    }
}
