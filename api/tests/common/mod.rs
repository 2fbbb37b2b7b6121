//! Test infrastructure for API integration tests
//!
//! Provides TestCtx, which serializes tests over one shared SQLite store,
//! resets it and routes the application's database sessions to it, along
//! with fluent builders for making HTTP requests.
#![allow(dead_code)]

mod ctx;
mod request;
mod response;
mod session;

pub use ctx::*;
pub use request::*;
pub use response::*;
pub use session::*;
