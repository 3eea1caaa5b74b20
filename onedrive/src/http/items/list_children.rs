use reqwest::{Client, RequestBuilder};

use crate::http::items::{DriveItem, ItemLocation};

/// Request message for ListChildren.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ListChildrenRequest {
    /// Required. The folder to list.
    pub item: ItemLocation,
    /// Maximum number of items in the page. The service may return fewer.
    pub top: Option<u32>,
    /// e.g. `name asc` or `lastModifiedDateTime desc`.
    pub order_by: Option<String>,
    pub select: Option<Vec<String>>,
}

/// One page of children.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, Debug, Default)]
#[serde(default)]
pub struct ListChildrenResponse {
    pub value: Vec<DriveItem>,
    /// Url of the next page, absent on the last page.
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

pub(crate) fn build(base_url: &str, client: &Client, req: &ListChildrenRequest) -> RequestBuilder {
    let mut query = vec![];
    if let Some(top) = req.top {
        query.push(("$top", top.to_string()));
    }
    if let Some(order_by) = &req.order_by {
        query.push(("$orderby", order_by.clone()));
    }
    if let Some(select) = &req.select {
        query.push(("$select", select.join(",")));
    }
    client.get(req.item.url_with(base_url, "children")).query(&query)
}
