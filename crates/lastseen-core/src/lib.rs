//! Core types and trait definitions for the lastseen reporting board.
//!
//! This crate is deliberately free of HTTP and storage dependencies. The
//! validation rules in [`schema`] and the photo policy in [`photo`] are shared
//! by the server and the client so both sides accept exactly the same input.

// Native `async fn` in traits; the store trait spells out `Send` futures itself.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod photo;
pub mod report;
pub mod schema;
pub mod store;

pub use error::{Error, Result};
pub use report::{NewReport, Report, Status};
