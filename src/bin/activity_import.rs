//! Imports an activity spreadsheet export into the task tables.
//!
//! Usage:
//!
//! ```text
//! activity-import <csv> --operator <user name> [--config <json>]
//!     [--database-url <url>] [--delimiter comma|semicolon|tab]
//!     [--encoding auto|utf-8|windows-1252|iso-8859-1]
//!     [--no-header] [--update-existing]
//! ```
//!
//! The operator must exist in the users table; they become the assignee of
//! every row whose assignee cannot be resolved. Command-line flags override
//! the JSON configuration file. The import summary is written to stdout and
//! log events to stderr (`RUST_LOG` selects the level, `info` by default).
//!
//! Row failures are part of the summary and do not change the exit status;
//! only setup failures (configuration, database, unknown operator) do.

use activity_import::config::{ConfigError, ImportConfig};
use activity_import::task::{
    adapters::{
        csv::{Delimiter, TextEncoding},
        postgres::{
            PostgresReferenceDirectory, PostgresStageCatalog, PostgresTagCatalog,
            PostgresTaskRepository, TaskPgPool,
        },
    },
    ports::{CatalogError, ReferenceDirectory, StageCatalog},
    services::{
        DuplicatePolicy, ReconcileContext, TaskImportError, TaskImportReconciler,
        TaskImportService,
    },
};
use clap::Parser;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use mockable::DefaultClock;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};
use tracing_subscriber::EnvFilter;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "activity-import", version, about = "Import activities from a CSV export")]
struct Args {
    /// CSV file to import.
    csv: PathBuf,
    /// Display name of the user running the import.
    #[arg(long)]
    operator: String,
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// `PostgreSQL` connection URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
    /// Field separator.
    #[arg(long)]
    delimiter: Option<Delimiter>,
    /// Character encoding of the file.
    #[arg(long)]
    encoding: Option<TextEncoding>,
    /// The first line is data, not column labels.
    #[arg(long)]
    no_header: bool,
    /// Update a matching activity instead of creating a new one.
    #[arg(long)]
    update_existing: bool,
}

/// Errors that abort the whole run.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no database URL: pass --database-url or set DATABASE_URL")]
    MissingDatabaseUrl,
    #[error("cannot connect to the database: {0}")]
    Pool(#[from] PoolError),
    #[error("cannot start the async runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("cannot read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("operator '{0}' is not a known user")]
    UnknownOperator(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Import(#[from] TaskImportError),
    #[error("cannot write the summary: {0}")]
    Output(#[source] io::Error),
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "activity import aborted");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Loads the configuration file, if any, and applies flag overrides.
fn effective_config(args: &Args) -> Result<ImportConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => ImportConfig::load(path)?,
        None => ImportConfig::default(),
    };
    if let Some(delimiter) = args.delimiter {
        config.csv.delimiter = delimiter;
    }
    if let Some(encoding) = args.encoding {
        config.csv.encoding = encoding;
    }
    if args.no_header {
        config.csv.has_header = false;
    }
    if args.update_existing {
        config.duplicate_policy = DuplicatePolicy::UpdateExisting;
    }
    if let Some(url) = &args.database_url {
        config.database_url = Some(url.clone());
    }
    Ok(config)
}

fn build_runtime() -> Result<Runtime, CliError> {
    Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = effective_config(args)?;
    let default_stage_label = config.default_stage_label()?;
    let url = config
        .database_url
        .as_deref()
        .ok_or(CliError::MissingDatabaseUrl)?;
    let bytes = std::fs::read(&args.csv).map_err(|source| CliError::ReadInput {
        path: args.csv.clone(),
        source,
    })?;
    let pool: TaskPgPool = Pool::builder().build(ConnectionManager::<PgConnection>::new(url))?;

    let directory = Arc::new(PostgresReferenceDirectory::new(pool.clone()));
    let tags = Arc::new(PostgresTagCatalog::new(pool.clone()));
    let stages = Arc::new(PostgresStageCatalog::new(pool.clone()));
    let repository = Arc::new(PostgresTaskRepository::new(pool));

    let runtime = build_runtime()?;
    let report = runtime.block_on(async {
        let operator = directory
            .find_user_by_name(&args.operator)
            .await?
            .ok_or_else(|| CliError::UnknownOperator(args.operator.clone()))?;
        let default_stage = stages.get_or_create(&default_stage_label).await?;
        let context = ReconcileContext::new(operator.id, default_stage.id());

        let reconciler = TaskImportReconciler::new(directory, tags, stages);
        let service = TaskImportService::new(repository, reconciler, Arc::new(DefaultClock))
            .with_policy(config.duplicate_policy);
        tracing::info!(
            file = %args.csv.display(),
            operator = %args.operator,
            delimiter = %config.csv.delimiter,
            encoding = %config.csv.encoding,
            has_header = config.csv.has_header,
            "starting activity import"
        );
        service
            .import_csv(&bytes, config.csv, &context)
            .await
            .map_err(CliError::from)
    })?;

    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", report.summary()).map_err(CliError::Output)?;
    stdout.flush().map_err(CliError::Output)
}
