use reqwest::{Client, RequestBuilder};

use crate::http::items::{ConflictBehavior, ItemLocation};

/// Request message for CreateFolder.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CreateFolderRequest {
    /// Required. The folder to create the new folder in.
    pub parent: ItemLocation,
    /// Required. Name of the new folder.
    pub name: String,
    pub conflict_behavior: ConflictBehavior,
}

impl Default for CreateFolderRequest {
    fn default() -> Self {
        Self {
            parent: ItemLocation::root(),
            name: String::new(),
            conflict_behavior: ConflictBehavior::Fail,
        }
    }
}

#[derive(serde::Serialize)]
struct Body<'a> {
    name: &'a str,
    folder: Folder,
    #[serde(rename = "@microsoft.graph.conflictBehavior")]
    conflict_behavior: ConflictBehavior,
}

#[derive(serde::Serialize)]
struct Folder {}

pub(crate) fn build(base_url: &str, client: &Client, req: &CreateFolderRequest) -> RequestBuilder {
    let body = Body {
        name: &req.name,
        folder: Folder {},
        conflict_behavior: req.conflict_behavior,
    };
    client.post(req.parent.url_with(base_url, "children")).json(&body)
}
