//! Domain models parsed from request input
//!
//! Titles are stored as given, so the only parsed value is the path id.

pub mod item_id;

pub use item_id::ItemId;
