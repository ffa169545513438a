//! # Server Module
//!
//! The axum HTTP surface: the HTML form at `/`, a health check, and a small
//! JSON API mirroring the form.

mod server;
pub mod routes;
pub mod types;
pub mod page;

pub use server::{router, ApiServer};
