use reqwest::{Client, RequestBuilder};

use crate::http::Escape;

/// Request message for GetDrive.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct GetDriveRequest {
    /// The drive to fetch. The signed-in user's drive when empty.
    pub drive_id: Option<String>,
}

pub(crate) fn build(base_url: &str, client: &Client, req: &GetDriveRequest) -> RequestBuilder {
    let url = match &req.drive_id {
        Some(drive_id) => format!("{}/drives/{}", base_url, drive_id.escape()),
        None => format!("{}/me/drive", base_url),
    };
    client.get(url)
}
