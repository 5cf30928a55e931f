//! MongoDB-backed item store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::items::{Item, ItemChanges, ItemId, ValidItem};
use crate::store::{Connector, ItemStore};

/// Item as stored in the collection.
///
/// Documents written by older clients may lack `createdAt` or `quantity`;
/// those read back as the ObjectId timestamp and 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<bson::DateTime>,
}

impl From<ItemDocument> for Item {
    fn from(doc: ItemDocument) -> Self {
        let created = doc.created_at.unwrap_or_else(|| doc.id.timestamp());
        Item {
            id: doc.id.into(),
            name: doc.name,
            description: doc.description,
            quantity: doc.quantity,
            price: doc.price,
            location: doc.location,
            created_at: DateTime::<Utc>::from_timestamp_millis(created.timestamp_millis())
                .unwrap_or_default(),
        }
    }
}

/// `$set` body for the supplied fields only.
fn set_document(changes: &ItemChanges) -> Document {
    let mut set = Document::new();
    if let Some(name) = &changes.name {
        set.insert("name", name.as_str());
    }
    if let Some(description) = &changes.description {
        set.insert("description", description.as_str());
    }
    if let Some(quantity) = changes.quantity {
        set.insert("quantity", quantity);
    }
    if let Some(price) = changes.price {
        set.insert("price", price);
    }
    if let Some(location) = &changes.location {
        set.insert("location", location.as_str());
    }
    set
}

pub struct MongoStore {
    connector: Connector,
}

impl MongoStore {
    pub fn new(connector: Connector) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl ItemStore for MongoStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> Result<()> {
        self.connector.collection().await?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Item>> {
        let collection = self.connector.collection().await?;
        let docs: Vec<ItemDocument> = collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .await?
            .try_collect()
            .await?;

        Ok(docs.into_iter().map(Item::from).collect())
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>> {
        let collection = self.connector.collection().await?;
        let doc = collection.find_one(doc! { "_id": id.object_id() }).await?;
        Ok(doc.map(Item::from))
    }

    async fn insert(&self, item: ValidItem) -> Result<Item> {
        let collection = self.connector.collection().await?;
        let doc = ItemDocument {
            id: ObjectId::new(),
            name: item.name,
            description: item.description,
            quantity: item.quantity,
            price: item.price,
            location: item.location,
            created_at: Some(bson::DateTime::now()),
        };

        collection.insert_one(&doc).await?;
        tracing::debug!(id = %doc.id, "Inserted item document");

        Ok(doc.into())
    }

    async fn update(&self, id: ItemId, changes: ItemChanges) -> Result<Option<Item>> {
        let collection = self.connector.collection().await?;
        let filter = doc! { "_id": id.object_id() };
        let set = set_document(&changes);

        // An empty $set is rejected by the server.
        if set.is_empty() {
            return Ok(collection.find_one(filter).await?.map(Item::from));
        }

        let doc = collection
            .find_one_and_update(filter, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;

        Ok(doc.map(Item::from))
    }

    async fn delete(&self, id: ItemId) -> Result<u64> {
        let collection = self.connector.collection().await?;
        let result = collection.delete_one(doc! { "_id": id.object_id() }).await?;
        Ok(result.deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_document_contains_only_supplied_fields() {
        let set = set_document(&ItemChanges {
            quantity: Some(12),
            location: Some("Aisle 3".into()),
            ..Default::default()
        });

        assert_eq!(set, doc! { "quantity": 12_i64, "location": "Aisle 3" });
    }

    #[test]
    fn test_legacy_document_defaults() {
        let oid = ObjectId::new();
        let doc: ItemDocument =
            bson::from_document(doc! { "_id": oid, "name": "Pulley" }).unwrap();
        let item = Item::from(doc);

        assert_eq!(item.quantity, 0);
        assert_eq!(item.id.object_id(), oid);
        assert_eq!(
            item.created_at.timestamp_millis(),
            oid.timestamp().timestamp_millis()
        );
    }
}
