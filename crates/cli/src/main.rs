use crate::{
    commands::{Commands, SettingsArgs},
    conn::{ConnectionKind, ConnectionPinger, MongoConnectionPinger, MySqlConnectionPinger},
    env::EnvManager,
    error::CliError,
    output::PlanReport,
    shutdown::{ExitCode, ShutdownCoordinator},
};
use clap::Parser;
use connectors::{
    mongo::destination::MongoDestination, source::RecordSource,
    sql::mysql::adapter::MySqlAdapter,
};
use engine_config::settings::{
    MigrationSettings, loader::SettingsLoader, overrides::SettingsOverrides,
};
use engine_core::{
    batch_size::{SysinfoProbe, batch_size_for},
    partition::split_work,
};
use engine_runtime::execution::executor::{MigrationOptions, MigrationOrchestrator};
use std::{path::PathBuf, str::FromStr, sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

mod commands;
mod conn;
mod env;
mod error;
mod logging;
mod output;
mod shutdown;

const ENV_PREFIX: &str = "SQL2DOC_";

#[derive(Parser)]
#[command(
    name = "sql2doc",
    version = "0.1.0",
    about = "Bulk-migrate a MySQL table into a MongoDB collection"
)]
struct Cli {
    #[arg(long, global = true, help = "Log to the console only")]
    no_log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match logging::init(!cli.no_log_file) {
        Ok(Some(path)) => info!("Logging to {}", path.display()),
        Ok(None) => {}
        Err(e) => eprintln!("Warning: {e}"),
    }

    let code = match run(cli.command).await {
        Ok(()) => ExitCode::Success,
        Err(CliError::ShutdownRequested) => {
            warn!("Migration interrupted before completion");
            ExitCode::ShutdownRequested
        }
        Err(e) => {
            error!("{e}");
            ExitCode::GeneralError
        }
    };

    std::process::exit(code.as_i32());
}

async fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Migrate {
            settings,
            workers,
            batch_size,
            report_threshold,
            timeout,
            summary,
        } => {
            let overrides = SettingsOverrides {
                num_workers: workers,
                batch_size,
                report_threshold,
            };
            let loaded = load_settings(&settings, &overrides)?;
            migrate(loaded, timeout.map(Duration::from_secs), summary).await
        }
        Commands::TestConn { target, settings } => {
            let kind = ConnectionKind::from_str(&target)
                .map_err(|_| CliError::InvalidConnectionTarget(target.clone()))?;
            let loaded = load_settings(&settings, &SettingsOverrides::default())?;
            match kind {
                ConnectionKind::MySql => {
                    MySqlConnectionPinger {
                        params: loaded.config.mysql.params(),
                    }
                    .ping()
                    .await
                }
                ConnectionKind::MongoDb => {
                    MongoConnectionPinger {
                        params: loaded.config.mongodb.params(),
                    }
                    .ping()
                    .await
                }
            }
        }
        Commands::Plan {
            settings,
            workers,
            batch_size,
        } => {
            let overrides = SettingsOverrides {
                num_workers: workers,
                batch_size,
                report_threshold: None,
            };
            let loaded = load_settings(&settings, &overrides)?;
            plan(loaded).await
        }
    }
}

fn load_settings(
    args: &SettingsArgs,
    overrides: &SettingsOverrides,
) -> Result<MigrationSettings, CliError> {
    let mut env = EnvManager::new();
    if let Some(path) = &args.env_file {
        env.load_from_file(path)?;
        info!("Loaded environment file {}", path.display());
    }
    for (key, value) in env.redacted_with_prefix(ENV_PREFIX) {
        info!("Environment override {key}={value}");
    }

    Ok(SettingsLoader::new(&args.config_dir).load(env.all(), overrides)?)
}

fn options(settings: &MigrationSettings) -> MigrationOptions {
    let general = &settings.config.general;
    MigrationOptions {
        num_workers: general.num_workers,
        max_batch_size: general.batch_size,
        report_threshold: general.report_threshold,
        record_cap: general.record_cap(),
        estimated_doc_size: general.estimated_doc_size,
    }
}

async fn migrate(
    settings: MigrationSettings,
    timeout: Option<Duration>,
    summary_path: Option<PathBuf>,
) -> Result<(), CliError> {
    // Signals and the deadline cover connecting as well as the run.
    let shutdown = ShutdownCoordinator::new(CancellationToken::new());
    shutdown.register_handlers();
    if let Some(limit) = timeout {
        shutdown.register_deadline(limit);
    }
    let cancel = shutdown.cancel_token();

    let source = MySqlAdapter::connect(&settings.config.mysql.params())?;
    let mongodb_params = settings.config.mongodb.params();
    let destination = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(CliError::ShutdownRequested),
        connected = MongoDestination::connect(&mongodb_params) => connected?,
    };
    info!(
        "Migrating '{}' at {} into '{}'",
        source.table(),
        source.target(),
        destination.namespace()
    );

    let orchestrator = MigrationOrchestrator::new(
        Arc::new(source.clone()),
        Arc::new(destination),
        Arc::new(settings.mapping.clone()),
        options(&settings),
    );
    // Both connections are checked before the collection is dropped.
    let result = orchestrator.run(cancel).await;
    drop(orchestrator);

    if let Err(e) = source.disconnect().await {
        warn!("Failed to close MySQL pool: {e}");
    }

    let summary = match result {
        Ok(summary) => summary,
        Err(e) if shutdown.is_shutdown_requested() => {
            info!("Run stopped: {e}");
            return Err(CliError::ShutdownRequested);
        }
        Err(e) => return Err(e.into()),
    };

    match summary_path {
        Some(path) => {
            output::write_summary(&summary, &path).await?;
            info!("Summary written to {}", path.display());
        }
        None => output::print_summary(&summary)?,
    }
    Ok(())
}

async fn plan(settings: MigrationSettings) -> Result<(), CliError> {
    let source = MySqlAdapter::connect(&settings.config.mysql.params())?;
    let opts = options(&settings);

    let counted = source.count_records(opts.record_cap).await;
    let table = source.table().to_string();
    if let Err(e) = source.disconnect().await {
        warn!("Failed to close MySQL pool: {e}");
    }
    let total = counted?;

    let workers = opts.num_workers.max(1);
    let report = PlanReport {
        table,
        total_records: total,
        record_cap: opts.record_cap,
        workers,
        batch_size: batch_size_for(
            &SysinfoProbe,
            opts.max_batch_size,
            opts.estimated_doc_size,
            workers,
        ),
        ranges: split_work(total, workers),
    };
    output::print_plan(&report)
}
