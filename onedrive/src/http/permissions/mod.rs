use crate::http::drives::IdentitySet;
use crate::http::items::ItemReference;

pub mod create_link;
pub mod delete;
pub mod list;

/// A sharing permission granted on an item.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct Permission {
    pub id: String,
    /// e.g. `read`, `write` or `owner`.
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<SharingLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granted_to: Option<IdentitySet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_id: Option<String>,
    /// Set when the permission is inherited from an ancestor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherited_from: Option<ItemReference>,
}

#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct SharingLink {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub link_type: Option<LinkType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<LinkScope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    pub prevents_download: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    View,
    Edit,
    Embed,
}

#[derive(Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "lowercase")]
pub enum LinkScope {
    Anonymous,
    Organization,
    Users,
}
