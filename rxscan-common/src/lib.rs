//! # RxScan Common Library
//!
//! Shared code for the RxScan services including:
//! - Medication entity containers and extraction result types
//! - API envelope types shared by rxscan-api and rxscan-ui
//! - Configuration loading (TOML file + resolution helpers)
//! - Common error type

pub mod api;
pub mod config;
pub mod entities;
pub mod error;

pub use entities::{BatchItem, EntityCategory, ExtractionResult, MedicationEntities};
pub use error::{Error, Result};
