use reqwest::{Client, RequestBuilder};

use crate::http::items::ItemLocation;
use crate::http::permissions::Permission;

#[derive(Clone, PartialEq, Eq, serde::Deserialize, Debug, Default)]
#[serde(default)]
pub struct ListPermissionsResponse {
    pub value: Vec<Permission>,
}

pub(crate) fn build(base_url: &str, client: &Client, item: &ItemLocation) -> RequestBuilder {
    client.get(item.url_with(base_url, "permissions"))
}
