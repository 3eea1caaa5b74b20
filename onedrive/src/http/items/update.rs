use reqwest::{Client, RequestBuilder};

use crate::http::items::{ItemLocation, ItemReference};

/// Request message for UpdateItem. Renames the item, moves it, or both.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct UpdateItemRequest {
    /// Required. The item to update.
    pub item: ItemLocation,
    /// The new name.
    pub name: Option<String>,
    /// The new parent folder.
    pub parent_reference: Option<ItemReference>,
    pub description: Option<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Body<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_reference: Option<&'a ItemReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

pub(crate) fn build(base_url: &str, client: &Client, req: &UpdateItemRequest) -> RequestBuilder {
    let body = Body {
        name: req.name.as_deref(),
        parent_reference: req.parent_reference.as_ref(),
        description: req.description.as_deref(),
    };
    client.patch(req.item.url(base_url)).json(&body)
}
