//! Cloud resource inventory
//!
//! Lists cloud resources across regions by calling provider operations
//! described in a YAML definitions document, extracts the configured fields
//! from the nested responses, and writes one CSV table per resource type.
//!
//! - [`resource`] - Definitions and the extraction engine
//! - [`aws`] - Provider calls through the `aws` CLI
//! - [`inventory`] - Run orchestration across resource types and regions
//! - [`output`] - CSV tables and run directories
//! - [`config`] - Locating the definitions document

pub mod aws;
pub mod config;
pub mod error;
pub mod inventory;
pub mod output;
pub mod resource;

pub use error::{ConfigError, InvokeError};
