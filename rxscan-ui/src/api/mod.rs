//! HTTP API handlers for rxscan-ui

pub mod fallback;
pub mod health;
pub mod pages;
pub mod process;
pub mod proxy;
pub mod request;
pub mod site;

pub use fallback::not_found;
pub use health::health_routes;
pub use pages::{favicon, serve_index};
pub use process::{process_image, process_text};
pub use proxy::{batch_process, extract_entities};
pub use site::{contact_submit, history};
