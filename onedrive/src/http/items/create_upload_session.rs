use reqwest::{Client, RequestBuilder};

use crate::http::items::{ConflictBehavior, ItemLocation};

/// Request message for CreateUploadSession.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CreateUploadSessionRequest {
    /// Required. The folder to upload into.
    pub parent: ItemLocation,
    /// Required. Name of the file.
    pub name: String,
    pub conflict_behavior: Option<ConflictBehavior>,
    pub description: Option<String>,
    /// Lets the service reject the upload early when the quota is insufficient.
    pub file_size: Option<u64>,
}

#[derive(serde::Serialize)]
struct Body<'a> {
    item: UploadableProperties<'a>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadableProperties<'a> {
    #[serde(rename = "@microsoft.graph.conflictBehavior", skip_serializing_if = "Option::is_none")]
    conflict_behavior: Option<ConflictBehavior>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_size: Option<u64>,
}

pub(crate) fn build(base_url: &str, client: &Client, req: &CreateUploadSessionRequest) -> RequestBuilder {
    let body = Body {
        item: UploadableProperties {
            conflict_behavior: req.conflict_behavior,
            description: req.description.as_deref(),
            file_size: req.file_size,
        },
    };
    let url = req.parent.child(&req.name).url_with(base_url, "createUploadSession");
    client.post(url).json(&body)
}
