use reqwest::{Client, RequestBuilder};

use crate::http::items::{ConflictBehavior, ItemLocation, ItemReference};

/// Request message for CopyItem.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CopyItemRequest {
    /// Required. The item to copy.
    pub item: ItemLocation,
    /// Required. The folder to copy into.
    pub parent_reference: ItemReference,
    /// Name of the copy. Defaults to the original name.
    pub name: Option<String>,
    pub conflict_behavior: Option<ConflictBehavior>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Body<'a> {
    parent_reference: &'a ItemReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

pub(crate) fn build(base_url: &str, client: &Client, req: &CopyItemRequest) -> RequestBuilder {
    let body = Body {
        parent_reference: &req.parent_reference,
        name: req.name.as_deref(),
    };
    let builder = client.post(req.item.url_with(base_url, "copy")).json(&body);
    match req.conflict_behavior {
        Some(c) => builder.query(&[("@microsoft.graph.conflictBehavior", c.as_str())]),
        None => builder,
    }
}
