use reqwest::{Client, RequestBuilder};

use crate::http::items::ItemLocation;

/// Request message for GetItem.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct GetItemRequest {
    /// Required. The item to fetch.
    pub item: ItemLocation,
    /// Restricts the returned properties, e.g. `["id", "name", "size"]`.
    pub select: Option<Vec<String>>,
}

pub(crate) fn build(base_url: &str, client: &Client, req: &GetItemRequest) -> RequestBuilder {
    let builder = client.get(req.item.url(base_url));
    match &req.select {
        Some(select) => builder.query(&[("$select", select.join(","))]),
        None => builder,
    }
}
