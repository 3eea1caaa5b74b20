use tokio::sync::OnceCell;

use crate::http::drive_client::DriveClient;
use crate::http::items::create_folder::CreateFolderRequest;
use crate::http::items::create_upload_session::CreateUploadSessionRequest;
use crate::http::items::delete::DeleteItemRequest;
use crate::http::items::get::GetItemRequest;
use crate::http::items::list_children::ListChildrenRequest;
use crate::http::items::{ConflictBehavior, DriveItem, ItemLocation};
use crate::http::upload_session::UploadSession;
use crate::http::Error;

/// A drive item whose metadata is fetched on first use and then kept.
///
/// Accessors are async because the first one issues a request. The metadata is
/// never refetched; use [`DriveItemProxy::refresh`] for an up to date view.
#[derive(Debug)]
pub struct DriveItemProxy {
    client: DriveClient,
    location: ItemLocation,
    item: OnceCell<DriveItem>,
}

impl DriveItemProxy {
    pub(crate) fn new(client: &DriveClient, location: ItemLocation) -> Self {
        Self {
            client: client.clone(),
            location,
            item: OnceCell::new(),
        }
    }

    /// A proxy that already holds the item, e.g. the one returned by an upload.
    pub fn from_item(client: &DriveClient, item: DriveItem) -> Self {
        Self {
            client: client.clone(),
            location: item.location(),
            item: OnceCell::new_with(Some(item)),
        }
    }

    pub fn location(&self) -> &ItemLocation {
        &self.location
    }

    /// Fetches the metadata unless it was fetched before.
    pub async fn fetch(&self) -> Result<&DriveItem, Error> {
        self.item
            .get_or_try_init(|| async {
                tracing::trace!("fetch item: {:?}", self.location);
                self.client
                    .get_item(&GetItemRequest {
                        item: self.location.clone(),
                        select: None,
                    })
                    .await
            })
            .await
    }

    pub async fn id(&self) -> Result<&str, Error> {
        Ok(self.fetch().await?.id.as_str())
    }

    pub async fn name(&self) -> Result<&str, Error> {
        Ok(self.fetch().await?.name.as_str())
    }

    pub async fn size(&self) -> Result<u64, Error> {
        Ok(self.fetch().await?.size)
    }

    pub async fn is_folder(&self) -> Result<bool, Error> {
        Ok(self.fetch().await?.is_folder())
    }

    pub async fn parent_id(&self) -> Result<Option<&str>, Error> {
        Ok(self.fetch().await?.parent_id())
    }

    /// A new proxy for the same location, fetched again on first use.
    pub fn refresh(&self) -> DriveItemProxy {
        DriveItemProxy::new(&self.client, self.location.clone())
    }

    /// The entry `name` in this folder. Nothing is fetched.
    pub fn child(&self, name: &str) -> DriveItemProxy {
        DriveItemProxy::new(&self.client, self.location.child(name))
    }

    /// Lists every child of this folder, following all pages.
    pub async fn children(&self) -> Result<Vec<DriveItemProxy>, Error> {
        let mut page = self
            .client
            .list_children(&ListChildrenRequest {
                item: self.location.clone(),
                ..Default::default()
            })
            .await?;
        let mut items = std::mem::take(&mut page.value);
        while let Some(next_link) = page.next_link.take() {
            page = self.client.list_children_next(&next_link).await?;
            items.append(&mut page.value);
        }
        Ok(items
            .into_iter()
            .map(|item| DriveItemProxy::from_item(&self.client, item))
            .collect())
    }

    /// Creates a folder in this folder, failing when the name is taken.
    pub async fn create_folder(&self, name: &str) -> Result<DriveItemProxy, Error> {
        let item = self
            .client
            .create_folder(&CreateFolderRequest {
                parent: self.location.clone(),
                name: name.to_string(),
                conflict_behavior: ConflictBehavior::Fail,
            })
            .await?;
        Ok(DriveItemProxy::from_item(&self.client, item))
    }

    /// Starts an upload of the file `name` into this folder.
    pub async fn upload_session(&self, name: &str) -> Result<UploadSession, Error> {
        self.client
            .create_upload_session(&CreateUploadSessionRequest {
                parent: self.location.clone(),
                name: name.to_string(),
                ..Default::default()
            })
            .await
    }

    pub async fn delete(self) -> Result<(), Error> {
        self.client
            .delete_item(&DeleteItemRequest {
                item: self.location,
                if_match: None,
            })
            .await
    }
}
