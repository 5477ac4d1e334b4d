//! Shared API request/response types
//!
//! Every error response from either service uses the same envelope:
//! `{"success": false, "error": "<message>"}`.

use serde::{Deserialize, Serialize};

// ========================================
// Fixed Messages
// ========================================

/// Backend 404 message
pub const MSG_ENDPOINT_NOT_FOUND: &str = "Endpoint not found";

/// Frontend 404 message
pub const MSG_PAGE_NOT_FOUND: &str = "Page not found";

/// Generic 500 message
pub const MSG_INTERNAL_ERROR: &str = "Internal server error";

/// Backend 413 message
pub const MSG_FILE_TOO_LARGE: &str = "File too large";

// ========================================
// Error Envelope
// ========================================

/// Uniform error response
///
/// # Examples
///
/// ```
/// use rxscan_common::api::types::ErrorEnvelope;
///
/// let envelope = ErrorEnvelope::new("Prescription text cannot be empty");
/// assert!(!envelope.success);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorEnvelope {
    /// Always `false`
    pub success: bool,
    /// Human-readable error message
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

// ========================================
// Tests
// ========================================
