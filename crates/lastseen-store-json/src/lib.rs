//! JSON-file backend for the lastseen report store.
//!
//! The whole collection lives in memory behind a single writer lock and is
//! written back to one pretty-printed JSON array on every mutation.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::JsonFileStore;

#[cfg(test)]
mod tests;
