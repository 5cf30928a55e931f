//! In-process item store backed by a concurrent map.
//!
//! Used by the integration tests and by `--in-memory` local runs. Contents
//! are lost when the process exits.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::error::Result;
use crate::items::{Item, ItemChanges, ItemId, ValidItem};
use crate::store::ItemStore;

#[derive(Default)]
pub struct MemoryStore {
    items: DashMap<ItemId, Item>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Item>> {
        let mut items: Vec<Item> = self.items.iter().map(|entry| entry.value().clone()).collect();
        // ObjectIds grow monotonically within a process, so they break ties
        // between items created in the same instant.
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.object_id().bytes().cmp(&a.id.object_id().bytes()))
        });
        Ok(items)
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>> {
        Ok(self.items.get(&id).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, item: ValidItem) -> Result<Item> {
        let item = Item {
            id: ItemId::generate(),
            name: item.name,
            description: item.description,
            quantity: item.quantity,
            price: item.price,
            location: item.location,
            created_at: Utc::now(),
        };
        self.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update(&self, id: ItemId, changes: ItemChanges) -> Result<Option<Item>> {
        Ok(self.items.get_mut(&id).map(|mut entry| {
            entry.apply(&changes);
            entry.clone()
        }))
    }

    async fn delete(&self, id: ItemId) -> Result<u64> {
        Ok(self.items.remove(&id).map_or(0, |_| 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(name: &str, quantity: i64) -> ValidItem {
        ValidItem {
            name: name.into(),
            description: None,
            quantity,
            price: None,
            location: None,
        }
    }

    #[tokio::test]
    async fn test_find_all_newest_first() {
        let store = MemoryStore::new();
        let first = store.insert(valid("first", 1)).await.unwrap();
        let second = store.insert(valid("second", 2)).await.unwrap();
        let third = store.insert(valid("third", 3)).await.unwrap();

        let ids: Vec<_> = store.find_all().await.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id() {
        let store = MemoryStore::new();
        let unknown = ItemId::generate();

        let updated = store
            .update(unknown, ItemChanges { quantity: Some(1), ..Default::default() })
            .await
            .unwrap();
        assert!(updated.is_none());
        assert_eq!(store.delete(unknown).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_once() {
        let store = MemoryStore::new();
        let item = store.insert(valid("gasket", 5)).await.unwrap();

        assert_eq!(store.delete(item.id).await.unwrap(), 1);
        assert_eq!(store.delete(item.id).await.unwrap(), 0);
        assert!(store.is_empty());
    }
}
