use reqwest::{Client, RequestBuilder};

use crate::http::items::ItemLocation;

/// Request message for DeleteItem.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct DeleteItemRequest {
    /// Required. The item to move to the recycle bin.
    pub item: ItemLocation,
    /// Deletes only when the item's current eTag matches.
    pub if_match: Option<String>,
}

pub(crate) fn build(base_url: &str, client: &Client, req: &DeleteItemRequest) -> RequestBuilder {
    let builder = client.delete(req.item.url(base_url));
    match &req.if_match {
        Some(etag) => builder.header(reqwest::header::IF_MATCH, etag),
        None => builder,
    }
}
