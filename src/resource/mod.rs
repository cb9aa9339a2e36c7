//! Resource extraction engine
//!
//! Resource types are described declaratively: which provider operation
//! lists them, where the items sit in the response, which detail calls to
//! chain per item, and which fields to keep. This module turns those
//! definitions plus provider responses into flat records.
//!
//! # Architecture
//!
//! - [`item`] - Tagged model of raw provider responses
//! - [`path`] - Dot-path resolution with `[]` list flattening
//! - [`normalize`] - Output cell values (timestamps, empty placeholders)
//! - [`chain`] - Detail call chains with stored-parent threading
//! - [`projector`] - Field projection into ordered flat records
//! - [`extractor`] - Per resource type and region extraction
//! - [`registry`] - Resource definitions loaded from YAML
//! - [`dispatch`] - The invoker seam and a named-operation table
//!
//! # Example
//!
//! ```
//! use cloud_inventory::resource::{extract, OperationTable, RawItem, Registry};
//! use serde_json::json;
//!
//! let registry = Registry::from_yaml(r#"
//! resources:
//!   things: {service: x, method: list, response_key: "Items.[]", fields: ["Id", "Name:DisplayName"]}
//! "#).unwrap();
//! let response = RawItem::from(json!({"Items": [{"Id": "i-1", "Name": "a"}]}));
//!
//! let records = extract(&registry.resources[0], "us-east-1", &response, &OperationTable::new());
//! assert_eq!(records[0].get("DisplayName").unwrap().to_cell(), "a");
//! ```

pub mod chain;
pub mod dispatch;
pub mod extractor;
pub mod item;
pub mod normalize;
pub mod path;
pub mod projector;
pub mod registry;

pub use chain::{run_chain, CallContext};
pub use dispatch::{Invoker, OperationTable};
pub use extractor::{collect_region, extract, fetch_records};
pub use item::{RawItem, Scalar};
pub use normalize::{normalize, OutputValue};
pub use path::{resolve, resolve_first, FLATTEN};
pub use projector::{project, FlatRecord, REGION_COLUMN};
pub use registry::{
    DetailStep, FieldSpec, ParamSource, Params, Registry, ResourceConfig, DEFAULT_REGION,
};
