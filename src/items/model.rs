//! Item types and request-body validation.
//!
//! Request bodies arrive as [`NewItem`] / [`ItemChanges`] with every field
//! optional; they are checked here before any store call.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Store-assigned item identifier (a 12-byte ObjectId, 24 hex chars on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(ObjectId);

impl ItemId {
    /// Allocate a fresh identifier.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for ItemId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for ItemId {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| Error::InvalidIdentifier(raw.to_string()))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A persisted inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Overwrite the fields present in `changes`.
    pub fn apply(&mut self, changes: &ItemChanges) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(description) = &changes.description {
            self.description = Some(description.clone());
        }
        if let Some(quantity) = changes.quantity {
            self.quantity = quantity;
        }
        if let Some(price) = changes.price {
            self.price = Some(price);
        }
        if let Some(location) = &changes.location {
            self.location = Some(location.clone());
        }
    }
}

/// Body of `POST /items`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NewItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    pub location: Option<String>,
}

/// A [`NewItem`] that passed validation; what a store inserts.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidItem {
    pub name: String,
    pub description: Option<String>,
    pub quantity: i64,
    pub price: Option<f64>,
    pub location: Option<String>,
}

impl NewItem {
    pub fn validate(self) -> Result<ValidItem> {
        let name = required_name(self.name)?;
        let quantity = self
            .quantity
            .ok_or_else(|| Error::Validation("quantity is required".into()))?;
        check_price(self.price)?;

        Ok(ValidItem {
            name,
            description: self.description,
            quantity,
            price: self.price,
            location: self.location,
        })
    }
}

/// Body of `PUT` and `PATCH /items/{id}`. Absent or `null` fields are left
/// untouched by the write.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ItemChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ItemChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
            && self.location.is_none()
    }

    /// Rules for `PUT`: name and quantity must be supplied.
    pub fn validate_replacement(mut self) -> Result<Self> {
        self.name = Some(required_name(self.name)?);
        if self.quantity.is_none() {
            return Err(Error::Validation("quantity is required".into()));
        }
        check_price(self.price)?;
        Ok(self)
    }

    /// Rules for `PATCH`: anything may be omitted, but not everything.
    pub fn validate_patch(mut self) -> Result<Self> {
        if self.is_empty() {
            return Err(Error::Validation("no fields to update".into()));
        }
        if self.name.is_some() {
            self.name = Some(required_name(self.name)?);
        }
        check_price(self.price)?;
        Ok(self)
    }
}

fn required_name(name: Option<String>) -> Result<String> {
    match name.as_deref().map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        Some(_) => Err(Error::Validation("name must not be empty".into())),
        None => Err(Error::Validation("name is required".into())),
    }
}

fn check_price(price: Option<f64>) -> Result<()> {
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => Err(Error::Validation(
            "price must be a non-negative number".into(),
        )),
        _ => Ok(()),
    }
}

/// Confirmation body for `DELETE /items/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deleted {
    pub id: ItemId,
    pub deleted_count: u64,
    pub message: String,
}
