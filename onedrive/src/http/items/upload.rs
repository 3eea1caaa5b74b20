use reqwest::header::CONTENT_TYPE;
use reqwest::{Body, Client, RequestBuilder};

use crate::http::items::{ConflictBehavior, ItemLocation};

/// The largest content accepted by a single PUT. Use an upload session above this.
pub const MAX_SIMPLE_UPLOAD_SIZE: u64 = 4 * 1024 * 1024;

/// Request message for a single request upload.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct UploadItemRequest {
    /// Required. The folder to upload into.
    pub parent: ItemLocation,
    /// Required. Name of the file.
    pub name: String,
    pub content_type: Option<String>,
    pub conflict_behavior: Option<ConflictBehavior>,
}

pub(crate) fn build<T: Into<Body>>(base_url: &str, client: &Client, req: &UploadItemRequest, body: T) -> RequestBuilder {
    let url = req.parent.child(&req.name).url_with(base_url, "content");
    let mut builder = client.put(url).body(body);
    if let Some(c) = req.conflict_behavior {
        builder = builder.query(&[("@microsoft.graph.conflictBehavior", c.as_str())]);
    }
    match &req.content_type {
        Some(content_type) => builder.header(CONTENT_TYPE, content_type),
        None => builder,
    }
}
