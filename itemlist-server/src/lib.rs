//! itemlist-server: HTTP server for a single list of items
//!
//! Exposes list/add/edit/delete over HTTP, each backed by one
//! parameterized statement against the `items` table in PostgreSQL.

pub mod db;
pub mod http;
pub mod models;

pub use db::{create_pool, ConnectionTarget, DatabaseConfig, DbError};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
pub use models::ItemId;
