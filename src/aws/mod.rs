//! AWS provider integration
//!
//! Provider calls are delegated to the `aws` command line tool, which owns
//! credentials, request signing, retries, and pagination.
//!
//! # Module Structure
//!
//! - [`cli`] - [`Invoker`](crate::resource::Invoker) backed by the `aws` CLI
//! - [`account`] - Account identity and region discovery

pub mod account;
pub mod cli;

pub use account::{account_id, list_regions};
pub use cli::{describe_error, AwsCliInvoker};
