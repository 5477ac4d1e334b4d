//! HTTP API handlers for rxscan-api

pub mod docs;
pub mod extract;
pub mod fallback;
pub mod health;
pub mod image;

pub use docs::api_index;
pub use extract::{batch_process, extract_entities, process_text};
pub use fallback::not_found;
pub use health::health_routes;
pub use image::process_image;
