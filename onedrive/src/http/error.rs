use std::error::Error;
use std::fmt;

/// An error response returned from Microsoft Graph.
///
/// See the [`Error responses`][1] documentation for more details.
///
/// [1]: https://learn.microsoft.com/en-us/graph/errors
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Example values include: `itemNotFound`, `nameAlreadyExists` and `invalidRange`.
    pub code: String,

    /// Description of the error.
    pub message: String,

    /// A more specific error, when the service provides one.
    pub inner_error: Option<InnerError>,
}

impl ErrorResponse {
    /// The most specific error code, descending through nested inner errors.
    pub fn most_specific_code(&self) -> &str {
        let mut code = self.code.as_str();
        let mut inner = self.inner_error.as_ref();
        while let Some(e) = inner {
            if let Some(c) = &e.code {
                code = c.as_str();
            }
            inner = e.inner_error.as_deref();
        }
        code
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl Error for ErrorResponse {}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InnerError {
    pub code: Option<String>,
    #[serde(rename = "request-id")]
    pub request_id: Option<String>,
    pub date: Option<String>,
    pub inner_error: Option<Box<InnerError>>,
}

/// The Graph error response JSON format contains an extra object level that is inconvenient to include in our
/// error.
#[derive(serde::Deserialize)]
pub(crate) struct ErrorWrapper {
    pub(crate) error: ErrorResponse,
}
