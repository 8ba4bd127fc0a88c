//! Backend module
//!
//! Capabilities the page logic depends on (image search, people lookup)
//! and their HTTP implementations.

mod image_search;
mod people;
mod traits;

pub use image_search::HttpSearchBackend;
pub use people::HttpPeopleDirectory;
pub use traits::*;
