//! Resource Extractor
//!
//! Turns a primary response into flat records for one resource type and
//! region: resolve the primary items, run the detail chain per item when one
//! is configured, and project each result.

use super::chain::{run_chain, CallContext};
use super::dispatch::Invoker;
use super::item::RawItem;
use super::path;
use super::projector::{project, FlatRecord};
use super::registry::ResourceConfig;
use crate::error::InvokeError;

/// Extract records from an already-fetched primary response.
///
/// Output order follows the primary item order. A detail-call failure drops
/// only the item it happened on.
pub fn extract(
    resource: &ResourceConfig,
    region: &str,
    primary_response: &RawItem,
    invoker: &dyn Invoker,
) -> Vec<FlatRecord> {
    let items = path::resolve(primary_response, &resource.response_key);
    if !items.iter().any(|item| item.is_truthy()) {
        return Vec::new();
    }

    let ctx = CallContext::new(invoker, &resource.service, region);
    let mut records = Vec::with_capacity(items.len());

    for primary in items {
        if !resource.has_detail() {
            records.push(project(primary, &resource.fields, region));
            continue;
        }

        match run_chain(&ctx, primary, &resource.detail_steps) {
            Ok(Some(item)) => records.push(project(&item, &resource.fields, region)),
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(
                    "{} in {}: detail call failed, skipping item: {}",
                    resource.name,
                    region,
                    e
                );
            }
        }
    }

    records
}

/// Make the primary call for `resource` in `region`, then [`extract`].
pub fn fetch_records(
    resource: &ResourceConfig,
    region: &str,
    invoker: &dyn Invoker,
) -> Result<Vec<FlatRecord>, InvokeError> {
    let response = invoker.invoke(
        &resource.service,
        region,
        &resource.method,
        &resource.primary_params,
    )?;
    Ok(extract(resource, region, &response, invoker))
}

/// [`fetch_records`], reporting a primary-call failure and yielding no records.
pub fn collect_region(
    resource: &ResourceConfig,
    region: &str,
    invoker: &dyn Invoker,
) -> Vec<FlatRecord> {
    match fetch_records(resource, region, invoker) {
        Ok(records) => {
            tracing::debug!("{} in {}: {} records", resource.name, region, records.len());
            records
        }
        Err(e) => {
            tracing::warn!(
                "Skipping {} ({}) in {}: {}",
                resource.name,
                resource.service,
                region,
                e.code
            );
            Vec::new()
        }
    }
}
