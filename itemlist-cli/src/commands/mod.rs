//! Command implementations for itemlist CLI

pub mod serve;

pub use serve::run_serve;
