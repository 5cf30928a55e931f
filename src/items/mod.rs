//! Inventory items: the data model and the repository operating on it.

pub mod model;
pub mod repository;

pub use model::{Deleted, Item, ItemChanges, ItemId, NewItem, ValidItem};
pub use repository::ItemRepository;
