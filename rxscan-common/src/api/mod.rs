//! API module for shared HTTP API types
//!
//! The error envelope and fixed messages used by both services, plus the
//! panic handler both routers install.

pub mod panic;
pub mod types;

pub use panic::panic_response;
pub use types::{
    ErrorEnvelope, MSG_ENDPOINT_NOT_FOUND, MSG_FILE_TOO_LARGE, MSG_INTERNAL_ERROR,
    MSG_PAGE_NOT_FOUND,
};
