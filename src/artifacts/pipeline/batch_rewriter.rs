use crate::areas::remote::RemoteObjectClient;
use crate::artifacts::objects::tree::TreeItem;
use crate::artifacts::updater::ContentUpdater;
use crate::error::{Error, Result};
use futures::{StreamExt, TryStreamExt, stream};

/// Applies an updater to every selected file and publishes the new blobs
///
/// Per-file work (fetch, transform, create blob) runs concurrently, at most
/// `max_concurrency` files at a time. The first failure fails the whole batch
/// and no further files are started.
pub struct BatchRewriter<'r> {
    client: &'r dyn RemoteObjectClient,
    max_concurrency: usize,
}

impl<'r> BatchRewriter<'r> {
    pub fn new(client: &'r dyn RemoteObjectClient, max_concurrency: usize) -> Self {
        BatchRewriter {
            client,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// New tree items for the rewritten files only, in no particular order
    pub async fn rewrite<U>(&self, items: &[TreeItem], updater: &U) -> Result<Vec<TreeItem>>
    where
        U: ContentUpdater + ?Sized,
    {
        let selected = updater.items_to_update(items);
        if selected.is_empty() {
            return Err(Error::NoMatchingItems {
                updater: updater.name().to_string(),
            });
        }
        tracing::debug!(
            updater = updater.name(),
            selected = selected.len(),
            "rewriting selected items"
        );

        stream::iter(selected)
            .map(|item| self.rewrite_item(item, updater))
            .buffer_unordered(self.max_concurrency)
            .try_collect()
            .await
    }

    async fn rewrite_item<U>(&self, item: TreeItem, updater: &U) -> Result<TreeItem>
    where
        U: ContentUpdater + ?Sized,
    {
        let blob = self.client.blob(&item.sha).await?;
        let content = updater.update(&item, blob.content())?;
        let sha = self.client.create_blob(&content).await?;
        tracing::trace!(path = %item.path, %sha, "rewrote item");

        Ok(item.with_sha(sha))
    }
}
