//! HTTP networking module
//!
//! Provides the HTTP client used to reach the image-search backend.

mod client;

pub use client::{BackendResponse, HttpClient};
