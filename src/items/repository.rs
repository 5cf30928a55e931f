//! Item operations over an injected store.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::items::model::{Deleted, Item, ItemChanges, ItemId, NewItem};
use crate::store::ItemStore;

/// Validates input and parses identifiers before delegating to the store.
///
/// A malformed identifier or invalid body never produces a store call.
#[derive(Clone)]
pub struct ItemRepository {
    store: Arc<dyn ItemStore>,
}

impl ItemRepository {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub async fn list_all(&self) -> Result<Vec<Item>> {
        let items = self.store.find_all().await?;
        tracing::debug!(count = items.len(), "Listed items");
        Ok(items)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Item> {
        let id: ItemId = id.parse()?;
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    pub async fn create(&self, new_item: NewItem) -> Result<Item> {
        let item = new_item.validate()?;
        let created = self.store.insert(item).await?;
        tracing::info!(id = %created.id, name = %created.name, "Item created");
        Ok(created)
    }

    /// `PUT`: name and quantity required; supplied fields overwrite, others
    /// are kept.
    pub async fn replace(&self, id: &str, changes: ItemChanges) -> Result<Item> {
        let id: ItemId = id.parse()?;
        let changes = changes.validate_replacement()?;
        self.write(id, changes).await
    }

    /// `PATCH`: any subset of fields.
    pub async fn patch(&self, id: &str, changes: ItemChanges) -> Result<Item> {
        let id: ItemId = id.parse()?;
        let changes = changes.validate_patch()?;
        self.write(id, changes).await
    }

    pub async fn delete(&self, id: &str) -> Result<Deleted> {
        let id: ItemId = id.parse()?;
        let deleted_count = self.store.delete(id).await?;
        if deleted_count == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        tracing::info!(id = %id, "Item deleted");
        Ok(Deleted {
            id,
            deleted_count,
            message: "Item deleted".to_string(),
        })
    }

    async fn write(&self, id: ItemId, changes: ItemChanges) -> Result<Item> {
        let updated = self
            .store
            .update(id, changes)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        tracing::info!(id = %id, "Item updated");
        Ok(updated)
    }
}
