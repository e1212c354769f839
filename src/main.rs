use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::time::Duration;

use netcensus::collector;
use netcensus::config::Config;
use netcensus::gcp::auth;
use netcensus::gcp::client::GcpClient;
use netcensus::gcp::projects;
use netcensus::metric;
use netcensus::resource::kind::ALL_KINDS;
use netcensus::sink::{self, SinkKind};

/// Census of GCP networking resources
#[derive(Parser, Debug)]
#[command(name = "netcensus", version, about, long_about = None)]
struct Args {
    /// Log level for process output
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count networking resources across projects and write to sinks
    Collect {
        /// Target project IDs (repeatable); overrides the configured list
        #[arg(short, long = "project")]
        projects: Vec<String>,

        /// Discover target projects instead of using a static list
        #[arg(long, conflicts_with = "projects")]
        discover: bool,

        /// Substring a discovered project ID must contain
        #[arg(long)]
        name_filter: Option<String>,

        /// Region for region-scoped listings (VPN tunnels, routers)
        #[arg(short, long)]
        region: Option<String>,

        /// Sinks to write to (repeatable); defaults to console
        #[arg(long = "sink", value_enum)]
        sinks: Vec<SinkKind>,

        /// Cloud Storage bucket for the storage sink
        #[arg(long)]
        bucket: Option<String>,

        /// Object name for the storage sink
        #[arg(long)]
        object: Option<String>,

        /// Cloud Logging log name for the cloud-log sink
        #[arg(long)]
        log_name: Option<String>,

        /// Seconds to sleep between projects
        #[arg(long)]
        delay_secs: Option<u64>,
    },

    /// Manage the custom vpc_count metric
    Metric {
        #[command(subcommand)]
        action: MetricAction,
    },
}

#[derive(Subcommand, Debug)]
enum MetricAction {
    /// Register the vpc_count metric descriptor
    Create {
        /// Project to register in; defaults to the ambient project
        #[arg(short, long)]
        project: Option<String>,
    },
    /// Count VPCs and write one gauge point
    Write {
        /// Project to count and write in; defaults to the ambient project
        #[arg(short, long)]
        project: Option<String>,
    },
    /// Delete every custom metric descriptor in the project
    Delete {
        /// Project to sweep; defaults to the ambient project
        #[arg(short, long)]
        project: Option<String>,
    },
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
    fn as_directive(self) -> &'static str {
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

fn setup_logging(level: LogLevel) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.as_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.log_level);

    let config = Config::load();

    match args.command {
        Command::Collect {
            projects,
            discover,
            name_filter,
            region,
            sinks,
            bucket,
            object,
            log_name,
            delay_secs,
        } => {
            run_collect(
                &config,
                CollectOpts {
                    projects,
                    discover,
                    name_filter,
                    region,
                    sinks,
                    bucket,
                    object,
                    log_name,
                    delay_secs,
                },
            )
            .await
        }
        Command::Metric { action } => run_metric(&config, action).await,
    }
}

struct CollectOpts {
    projects: Vec<String>,
    discover: bool,
    name_filter: Option<String>,
    region: Option<String>,
    sinks: Vec<SinkKind>,
    bucket: Option<String>,
    object: Option<String>,
    log_name: Option<String>,
    delay_secs: Option<u64>,
}

async fn run_collect(config: &Config, opts: CollectOpts) -> Result<()> {
    let client = GcpClient::new().await?;

    let target_projects = if opts.discover {
        let filter = opts
            .name_filter
            .unwrap_or_else(|| config.effective_name_filter());
        let discovered = projects::discover_project_ids(&client, &filter).await?;
        tracing::info!(
            "Discovered {} projects matching \"{}\"",
            discovered.len(),
            filter
        );
        discovered
    } else if !opts.projects.is_empty() {
        opts.projects
    } else {
        config.projects.clone()
    };

    if target_projects.is_empty() {
        bail!("No target projects. Pass --project, configure a list, or use --discover");
    }

    let region = opts.region.unwrap_or_else(|| config.effective_region());
    let delay = Duration::from_secs(opts.delay_secs.unwrap_or_else(|| config.effective_delay_secs()));

    let reports = collector::collect_all(
        &client,
        &target_projects,
        &ALL_KINDS,
        Some(&region),
        delay,
    )
    .await;

    let sinks = if opts.sinks.is_empty() {
        vec![SinkKind::Console]
    } else {
        opts.sinks
    };

    for sink_kind in &sinks {
        match sink_kind {
            SinkKind::Console => {
                for report in &reports {
                    sink::console::write_report(report);
                }
            }
            SinkKind::CloudLog => {
                let Some(log_project) = config.effective_log_project() else {
                    tracing::error!(
                        "No project available for the cloud-log sink; set log_project in the config"
                    );
                    continue;
                };
                let log_name = opts
                    .log_name
                    .clone()
                    .unwrap_or_else(|| config.effective_log_name());
                for report in &reports {
                    if let Err(e) =
                        sink::cloud_log::write_report(&client, &log_project, &log_name, report)
                            .await
                    {
                        tracing::error!("{:#}", e);
                    }
                }
            }
            SinkKind::Storage => {
                let bucket = opts
                    .bucket
                    .clone()
                    .unwrap_or_else(|| config.effective_bucket());
                let object = opts
                    .object
                    .clone()
                    .unwrap_or_else(|| config.effective_object());
                let payload = sink::storage::compose(&reports);
                if let Err(e) = sink::storage::write(&client, &bucket, &object, payload).await {
                    tracing::error!("{:#}", e);
                }
            }
        }
    }

    Ok(())
}

async fn run_metric(config: &Config, action: MetricAction) -> Result<()> {
    let client = GcpClient::new().await?;

    let resolve_project = |explicit: Option<String>| -> Result<String> {
        explicit
            .or_else(|| config.effective_log_project())
            .or_else(auth::get_default_project)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No project available. Pass --project or set GOOGLE_CLOUD_PROJECT"
                )
            })
    };

    match action {
        MetricAction::Create { project } => {
            let project = resolve_project(project)?;
            metric::create(&client, &project).await
        }
        MetricAction::Write { project } => {
            let project = resolve_project(project)?;
            metric::write_vpc_count(&client, &project).await?;
            Ok(())
        }
        MetricAction::Delete { project } => {
            let project = resolve_project(project)?;
            let deleted = metric::delete_custom_metrics(&client, &project).await?;
            tracing::info!("Deleted {} custom metrics in {}", deleted, project);
            Ok(())
        }
    }
}
