use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use cloud_inventory::aws::{self, AwsCliInvoker};
use cloud_inventory::config;
use cloud_inventory::inventory::Inventory;
use cloud_inventory::output;
use cloud_inventory::resource::{Invoker, Registry};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Inventory cloud resources across regions into CSV tables
#[derive(Parser, Debug)]
#[command(name = "cloudinv", version, about, long_about = None)]
struct Args {
    /// Resource definitions file (defaults to ./config.yaml, then built-in definitions)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base directory for inventory output
    #[arg(short, long, default_value = "inventory")]
    output_dir: PathBuf,

    /// Regions to inventory instead of discovering them
    #[arg(short, long, value_delimiter = ',')]
    regions: Vec<String>,

    /// Only collect these resource types
    #[arg(long, value_delimiter = ',')]
    only: Vec<String>,

    /// AWS CLI profile to use
    #[arg(short, long)]
    profile: Option<String>,

    /// Validate definitions and print the plan without collecting
    #[arg(long)]
    dry_run: bool,

    /// Log level for diagnostics on stderr
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Also write logs to a file (default location when no path is given)
    #[arg(long)]
    log_file: Option<Option<PathBuf>>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn setup_logging(
    level: LogLevel,
    log_file: Option<&Option<PathBuf>>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let log_path = path.clone().unwrap_or_else(get_log_path);
            if let Some(parent) = log_path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::info!("cloudinv started with log level: {:?}", level);

    Ok(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        return data_dir.join("cloudinv").join("cloudinv.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".cloudinv").join("cloudinv.log");
    }
    PathBuf::from("cloudinv.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level, args.log_file.as_ref())?;

    // Step 1: Load and validate definitions before any provider call
    let source = config::locate(args.config.as_deref());
    let mut registry = config::load(&source)
        .with_context(|| format!("Invalid resource definitions in {}", source))?;
    if !args.only.is_empty() {
        registry.retain_only(&args.only)?;
    }
    tracing::info!("Loaded {} resource types from {}", registry.resources.len(), source);

    let invoker: Arc<dyn Invoker> = Arc::new(AwsCliInvoker::new(args.profile.clone()));

    // Step 2: Regions
    let regions = if args.regions.is_empty() {
        let invoker = Arc::clone(&invoker);
        tokio::task::spawn_blocking(move || aws::list_regions(invoker.as_ref())).await?
    } else {
        args.regions.clone()
    };

    if args.dry_run {
        print_plan(&registry, &regions);
        return Ok(());
    }

    // Step 3: Account identity and run directory
    let account = {
        let invoker = Arc::clone(&invoker);
        tokio::task::spawn_blocking(move || aws::account_id(invoker.as_ref())).await?
    }
    .map_err(|e| anyhow::anyhow!("Failed to identify account: {}", aws::describe_error(&e)))?;

    println!("Starting inventory for Account: {}", account);

    let run_dir = output::create_run_dir(&args.output_dir, &account, &Local::now())?;
    tracing::info!("Writing to {}", run_dir.display());

    // Step 4: Collect
    let inventory = Inventory::new(registry, invoker, regions);
    let summary = inventory.run(&run_dir).await?;

    print_summary(&run_dir, &summary);
    Ok(())
}

fn print_plan(registry: &Registry, regions: &[String]) {
    for resource in &registry.resources {
        let regions = registry.regions_for(resource, regions);
        let detail = if resource.has_detail() {
            let names: Vec<&str> = resource.detail_steps.iter().map(|s| s.name.as_str()).collect();
            format!(" -> {}", names.join(" -> "))
        } else {
            String::new()
        };
        println!(
            "{}: {}.{}{} [{} field(s)] in {}",
            resource.name,
            resource.service,
            resource.method,
            detail,
            resource.fields.len(),
            regions.join(", ")
        );
    }
}

fn print_summary(run_dir: &Path, summary: &cloud_inventory::inventory::RunSummary) {
    for table in &summary.tables {
        println!("  {}: {} record(s)", table.resource, table.records);
    }
    println!(
        "Wrote {} table(s) to {} ({} resource type(s) empty)",
        summary.tables.len(),
        run_dir.display(),
        summary.empty.len()
    );
}
