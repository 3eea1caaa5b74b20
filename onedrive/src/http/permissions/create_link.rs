use reqwest::{Client, RequestBuilder};

use crate::http::items::ItemLocation;
use crate::http::permissions::{LinkScope, LinkType};

/// Request message for CreateLink.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CreateLinkRequest {
    /// Required. The item to share.
    pub item: ItemLocation,
    pub link_type: LinkType,
    /// The service default applies when empty.
    pub scope: Option<LinkScope>,
}

impl Default for CreateLinkRequest {
    fn default() -> Self {
        Self {
            item: ItemLocation::root(),
            link_type: LinkType::View,
            scope: None,
        }
    }
}

#[derive(serde::Serialize)]
struct Body {
    #[serde(rename = "type")]
    link_type: LinkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<LinkScope>,
}

pub(crate) fn build(base_url: &str, client: &Client, req: &CreateLinkRequest) -> RequestBuilder {
    let body = Body {
        link_type: req.link_type,
        scope: req.scope,
    };
    client.post(req.item.url_with(base_url, "createLink")).json(&body)
}
