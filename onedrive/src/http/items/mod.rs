use time::OffsetDateTime;

use crate::http::{escape_path, Escape};

pub mod copy;
pub mod create_folder;
pub mod create_upload_session;
pub mod delete;
pub mod download;
pub mod get;
pub mod list_children;
pub mod update;
pub mod upload;

/// A file, folder or other item stored in a drive.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct DriveItem {
    /// The unique identifier of the item within the drive.
    pub id: String,
    /// The name of the item (filename and extension).
    pub name: String,
    /// Size of the item in bytes. For folders, the total size of all the files they contain.
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,
    /// Changes when the content changes, but not when only the metadata does.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// URL that displays the resource in the browser.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_date_time: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_modified_date_time: Option<OffsetDateTime>,
    /// Where the item lives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_reference: Option<ItemReference>,
    /// Present when the item is a folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<FolderFacet>,
    /// Present when the item is a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileFacet>,
    /// Present when the item has been deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<DeletedFacet>,
    /// A short lived, pre-authenticated url to the content.
    #[serde(rename = "@microsoft.graph.downloadUrl", skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl DriveItem {
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }

    pub fn is_file(&self) -> bool {
        self.file.is_some()
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_reference.as_ref().and_then(|p| p.id.as_deref())
    }

    /// The location addressing this item by id.
    pub fn location(&self) -> ItemLocation {
        let location = ItemLocation::id(&self.id);
        match self.parent_reference.as_ref().and_then(|p| p.drive_id.as_ref()) {
            Some(drive_id) => location.in_drive(drive_id),
            None => location,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_id: Option<String>,
    /// `personal`, `business` or `documentLibrary`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_type: Option<String>,
    /// Percent-encoded path of the parent, e.g. `/drive/root:/Documents`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ItemReference {
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }
}

#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct FolderFacet {
    pub child_count: u64,
}

#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct FileFacet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashes: Option<Hashes>,
}

#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct Hashes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha1_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_xor_hash: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct DeletedFacet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// What the service does when the target name is already taken.
#[derive(Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ConflictBehavior {
    Rename,
    Replace,
    Fail,
}

impl ConflictBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictBehavior::Rename => "rename",
            ConflictBehavior::Replace => "replace",
            ConflictBehavior::Fail => "fail",
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
enum Target {
    Root,
    Id(String),
    /// A path relative to the drive root, or to the item `anchor` when set.
    Path { anchor: Option<String>, path: String },
}

/// Addresses a drive item by id, by path or as the drive root.
///
/// ```
/// use onedrive::http::items::ItemLocation;
///
/// let by_path = ItemLocation::path("/Documents/report.pdf");
/// let by_id = ItemLocation::id("01BYE5RZ6QN3ZWBTUFOFD3GSPGOHDJD36K").in_drive("b!-RIj2DuyvEyV");
/// let child = by_id.child("notes.txt");
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ItemLocation {
    drive_id: Option<String>,
    target: Target,
}

impl Default for ItemLocation {
    fn default() -> Self {
        Self::root()
    }
}

impl ItemLocation {
    /// The root folder of the signed-in user's drive.
    pub fn root() -> Self {
        Self {
            drive_id: None,
            target: Target::Root,
        }
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self {
            drive_id: None,
            target: Target::Id(id.into()),
        }
    }

    /// A path relative to the drive root. Leading and trailing `/` are ignored.
    pub fn path(path: impl AsRef<str>) -> Self {
        let path = path.as_ref().trim_matches('/');
        let target = if path.is_empty() {
            Target::Root
        } else {
            Target::Path {
                anchor: None,
                path: path.to_string(),
            }
        };
        Self { drive_id: None, target }
    }

    /// Moves the location into the given drive instead of the signed-in user's one.
    pub fn in_drive(mut self, drive_id: impl Into<String>) -> Self {
        self.drive_id = Some(drive_id.into());
        self
    }

    pub fn drive_id(&self) -> Option<&str> {
        self.drive_id.as_deref()
    }

    /// The location of the entry `name` inside this folder.
    pub fn child(&self, name: &str) -> Self {
        let name = name.trim_matches('/');
        let target = match &self.target {
            Target::Root => Target::Path {
                anchor: None,
                path: name.to_string(),
            },
            Target::Id(id) => Target::Path {
                anchor: Some(id.clone()),
                path: name.to_string(),
            },
            Target::Path { anchor, path } => Target::Path {
                anchor: anchor.clone(),
                path: format!("{path}/{name}"),
            },
        };
        Self {
            drive_id: self.drive_id.clone(),
            target,
        }
    }

    fn drive_path(&self) -> String {
        match &self.drive_id {
            Some(drive_id) => format!("drives/{}", drive_id.escape()),
            None => "me/drive".to_string(),
        }
    }

    /// The Graph resource path, relative to the service endpoint.
    pub(crate) fn to_path(&self) -> String {
        let drive = self.drive_path();
        match &self.target {
            Target::Root => format!("{drive}/root"),
            Target::Id(id) => format!("{drive}/items/{}", id.escape()),
            Target::Path { anchor: None, path } => format!("{drive}/root:/{}:", escape_path(path)),
            Target::Path {
                anchor: Some(anchor),
                path,
            } => format!("{drive}/items/{}:/{}:", anchor.escape(), escape_path(path)),
        }
    }

    pub(crate) fn url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url, self.to_path())
    }

    /// The url of an action or navigation property of the item, e.g. `children`.
    pub(crate) fn url_with(&self, base_url: &str, segment: &str) -> String {
        format!("{}/{}/{}", base_url, self.to_path(), segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_path() {
        assert_eq!(ItemLocation::root().to_path(), "me/drive/root");
        assert_eq!(ItemLocation::path("/").to_path(), "me/drive/root");
        assert_eq!(ItemLocation::id("ABC!12").to_path(), "me/drive/items/ABC!12");
        assert_eq!(
            ItemLocation::path("/Documents/Q1 report.xlsx").to_path(),
            "me/drive/root:/Documents/Q1%20report.xlsx:"
        );
        assert_eq!(
            ItemLocation::id("ABC").in_drive("b!xyz").to_path(),
            "drives/b!xyz/items/ABC"
        );
    }

    #[test]
    fn test_child() {
        assert_eq!(ItemLocation::root().child("a.txt").to_path(), "me/drive/root:/a.txt:");
        assert_eq!(
            ItemLocation::path("Documents").child("a.txt").to_path(),
            "me/drive/root:/Documents/a.txt:"
        );
        assert_eq!(
            ItemLocation::id("PARENT").child("a b.txt").to_path(),
            "me/drive/items/PARENT:/a%20b.txt:"
        );
        assert_eq!(
            ItemLocation::id("PARENT").child("sub").child("a.txt").to_path(),
            "me/drive/items/PARENT:/sub/a.txt:"
        );
        assert_eq!(ItemLocation::root().in_drive("d").child("x").drive_id(), Some("d"));
    }

    #[test]
    fn test_url_with() {
        let base = "https://graph.microsoft.com/v1.0";
        assert_eq!(
            ItemLocation::path("Documents").url_with(base, "children"),
            "https://graph.microsoft.com/v1.0/me/drive/root:/Documents:/children"
        );
        assert_eq!(
            ItemLocation::root().url_with(base, "children"),
            "https://graph.microsoft.com/v1.0/me/drive/root/children"
        );
    }

    #[test]
    fn test_deserialize_drive_item() {
        let body = r#"{
            "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#drives('b')/items/$entity",
            "id": "01BYE5RZ6QN3ZWBTUFOFD3GSPGOHDJD36K",
            "name": "largefile.vhd",
            "size": 33554432,
            "eTag": "\"{3A7F5AD6-7B55-4C3F-A6B1-0F7DB3E1B4E6},2\"",
            "createdDateTime": "2024-05-01T09:30:00Z",
            "lastModifiedDateTime": "2024-05-01T09:31:12.123Z",
            "parentReference": { "driveId": "b!-RIj2DuyvEyV", "id": "01BYE5RZ56Y2GOVW7725BZO354PWSELRRZ", "path": "/drive/root:" },
            "file": { "mimeType": "application/octet-stream", "hashes": { "quickXorHash": "AAAAAAAAAAAAAAAAAAAAAAAAAAA=" } },
            "@microsoft.graph.downloadUrl": "https://public.dm.files.1drv.com/y4m"
        }"#;
        let item: DriveItem = serde_json::from_str(body).unwrap();
        assert_eq!(item.id, "01BYE5RZ6QN3ZWBTUFOFD3GSPGOHDJD36K");
        assert_eq!(item.size, 33554432);
        assert!(item.is_file());
        assert!(!item.is_folder());
        assert_eq!(item.parent_id(), Some("01BYE5RZ56Y2GOVW7725BZO354PWSELRRZ"));
        assert_eq!(item.created_date_time.unwrap().year(), 2024);
        assert_eq!(item.download_url.as_deref(), Some("https://public.dm.files.1drv.com/y4m"));
        assert_eq!(
            item.location(),
            ItemLocation::id("01BYE5RZ6QN3ZWBTUFOFD3GSPGOHDJD36K").in_drive("b!-RIj2DuyvEyV")
        );
    }

    #[test]
    fn test_deserialize_folder() {
        let item: DriveItem = serde_json::from_str(r#"{"id":"1","name":"root","folder":{"childCount":3}}"#).unwrap();
        assert!(item.is_folder());
        assert_eq!(item.folder.unwrap().child_count, 3);
        assert_eq!(item.size, 0);
    }

    #[test]
    fn test_serialize_conflict_behavior() {
        assert_eq!(serde_json::to_string(&ConflictBehavior::Rename).unwrap(), "\"rename\"");
        assert_eq!(ConflictBehavior::Replace.as_str(), "replace");
    }
}
