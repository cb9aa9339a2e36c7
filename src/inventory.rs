//! Inventory run orchestration
//!
//! Walks every configured resource type, extracts it from each region
//! concurrently, concatenates the records region-major, and writes one table
//! per resource type.

use crate::output;
use crate::resource::{collect_region, FlatRecord, Invoker, Registry, ResourceConfig};
use anyhow::Result;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A table written during a run
#[derive(Debug, Clone)]
pub struct WrittenTable {
    pub resource: String,
    pub records: usize,
    pub path: PathBuf,
}

/// Outcome of a run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub tables: Vec<WrittenTable>,
    /// Resource types that produced no records
    pub empty: Vec<String>,
}

/// One inventory run over a fixed set of regions.
pub struct Inventory {
    registry: Registry,
    invoker: Arc<dyn Invoker>,
    regions: Vec<String>,
}

impl Inventory {
    pub fn new(registry: Registry, invoker: Arc<dyn Invoker>, regions: Vec<String>) -> Self {
        Self {
            registry,
            invoker,
            regions,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Regions `resource` is collected from
    pub fn regions_for(&self, resource: &ResourceConfig) -> Vec<String> {
        self.registry.regions_for(resource, &self.regions)
    }

    /// Collect one resource type from all of its regions.
    ///
    /// Regions run as blocking tasks in parallel; records come back in region
    /// order.
    pub async fn collect_resource(&self, resource: &ResourceConfig) -> Vec<FlatRecord> {
        let resource = Arc::new(resource.clone());

        let tasks = self.regions_for(&resource).into_iter().map(|region| {
            let resource = Arc::clone(&resource);
            let invoker = Arc::clone(&self.invoker);
            tokio::task::spawn_blocking(move || {
                collect_region(&resource, &region, invoker.as_ref())
            })
        });

        let mut records = Vec::new();
        for result in join_all(tasks).await {
            match result {
                Ok(region_records) => records.extend(region_records),
                Err(e) => tracing::error!("{}: region task failed: {}", resource.name, e),
            }
        }
        records
    }

    /// Collect every resource type and write its table into `run_dir`.
    pub async fn run(&self, run_dir: &Path) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for resource in &self.registry.resources {
            println!("Collecting {} resources...", resource.name);

            let records = self.collect_resource(resource).await;
            match output::write_table(run_dir, &resource.name, &records)? {
                Some(path) => {
                    tracing::info!("{}: wrote {} records to {}", resource.name, records.len(), path.display());
                    summary.tables.push(WrittenTable {
                        resource: resource.name.clone(),
                        records: records.len(),
                        path,
                    });
                }
                None => {
                    tracing::info!("{}: no resources found", resource.name);
                    summary.empty.push(resource.name.clone());
                }
            }
        }

        Ok(summary)
    }
}
