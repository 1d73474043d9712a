//! Repository implementations for database access

pub mod items;

pub use items::{DbError, Item, ItemRepo};
