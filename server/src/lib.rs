//! HTTP surface of the HR backend.

pub mod config;
mod error;
mod extract;
mod handlers;
pub mod http;

pub use http::{AppState, build_router};
