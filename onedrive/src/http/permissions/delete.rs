use reqwest::{Client, RequestBuilder};

use crate::http::items::ItemLocation;
use crate::http::Escape;

/// Request message for DeletePermission.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct DeletePermissionRequest {
    /// Required. The shared item.
    pub item: ItemLocation,
    /// Required. The permission to revoke.
    pub permission_id: String,
}

pub(crate) fn build(base_url: &str, client: &Client, req: &DeletePermissionRequest) -> RequestBuilder {
    let url = req
        .item
        .url_with(base_url, &format!("permissions/{}", req.permission_id.escape()));
    client.delete(url)
}
