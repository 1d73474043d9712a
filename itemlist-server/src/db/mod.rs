//! Database layer - connection pool and repositories
//!
//! # Design Principles
//!
//! - The pool is created once at startup and handed to the router as state
//! - Every operation is a single statement; no multi-step transactions
//! - User values are always bound through `$n` placeholders
//! - The `items` table is owned by the deployment, never created here

pub mod pool;
pub mod repos;

pub use pool::{create_pool, ConnectionTarget, DatabaseConfig};
pub use repos::*;
