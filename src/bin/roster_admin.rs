//! Operator tooling for duty roster databases.
//!
//! Usage:
//!
//! ```text
//! roster-admin --database-url <admin-url> migrate
//! roster-admin --database-url <admin-url> seed-defaults --tenant <code>
//! roster-admin --database-url <admin-url> workload --tenant <code> --from <date> --to <date>
//! roster-admin --database-url <admin-url> compliance --tenant <code>
//! ```
//!
//! `migrate` brings the database named by `--database-url` up to the current
//! schema version. The tenant commands look the tenant up in that database
//! and then work against the tenant's own database. Reports go to stdout and
//! logs go to stderr, filtered by `RUST_LOG`.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use diesel::{Connection, ConnectionError, PgConnection};
use duty_roster::catalog::adapters::postgres::PostgresCatalogStore;
use duty_roster::catalog::services::{CatalogService, CatalogServiceError};
use duty_roster::roster::adapters::postgres::PostgresRosterRepository;
use duty_roster::roster::services::{RosterReporting, RosterServiceError};
use duty_roster::schema::{self, SchemaError};
use duty_roster::tenant::adapters::postgres::PostgresTenantDirectory;
use duty_roster::tenant::domain::{TenantContext, TenantRecord};
use duty_roster::tenant::services::{TenantResolutionError, TenantResolver};
use mockable::DefaultClock;
use std::io::{self, Write};
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

type PgPool = Pool<ConnectionManager<PgConnection>>;

#[derive(Debug, Parser)]
#[command(name = "roster-admin", version, about = "Duty roster operator tooling")]
struct Cli {
    /// Connection string of the admin database holding the tenant directory.
    #[arg(long, env = "ROSTER_DATABASE_URL")]
    database_url: String,

    /// Connections per pool.
    #[arg(long, env = "ROSTER_POOL_SIZE", default_value_t = 4)]
    pool_size: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending schema migrations.
    Migrate,
    /// Seed the default catalog for a tenant.
    SeedDefaults {
        /// Tenant routing code.
        #[arg(long)]
        tenant: String,
    },
    /// Summarise per-assignee workload over a date range.
    Workload {
        /// Tenant routing code.
        #[arg(long)]
        tenant: String,
        /// First day, inclusive.
        #[arg(long)]
        from: NaiveDate,
        /// Last day, inclusive.
        #[arg(long)]
        to: NaiveDate,
    },
    /// List high-risk duties that lack a supervisor requirement.
    Compliance {
        /// Tenant routing code.
        #[arg(long)]
        tenant: String,
    },
}

#[derive(Debug, Error)]
enum AdminError {
    #[error("database connection failed: {0}")]
    Connection(#[from] ConnectionError),
    #[error("connection pool failed: {0}")]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Tenant(#[from] TenantResolutionError),
    #[error(transparent)]
    Catalog(#[from] CatalogServiceError),
    #[error(transparent)]
    Roster(#[from] RosterServiceError),
    #[error("io failure: {0}")]
    Io(#[from] io::Error),
}

fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(AdminError::Io)?;
    runtime.block_on(run(cli))?;
    Ok(())
}

async fn run(cli: Cli) -> Result<(), AdminError> {
    let mut out = io::stdout().lock();
    match cli.command {
        Command::Migrate => migrate(&cli.database_url, &mut out),
        Command::SeedDefaults { tenant } => {
            let (record, pool) = open_tenant(&cli.database_url, cli.pool_size, &tenant).await?;
            seed_defaults(record.context(), pool, &mut out).await
        }
        Command::Workload { tenant, from, to } => {
            let (record, pool) = open_tenant(&cli.database_url, cli.pool_size, &tenant).await?;
            let reporting = RosterReporting::new(Arc::new(PostgresRosterRepository::new(pool)));
            let summary = reporting
                .workload_summary(&record.context(), from, to)
                .await?;
            writeln!(out, "assignee\tlive\taccepted\tcompleted\tdeclined\tminutes")?;
            for entry in summary {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    entry.assignee,
                    entry.live,
                    entry.accepted,
                    entry.completed,
                    entry.declined,
                    entry.total_minutes
                )?;
            }
            Ok(())
        }
        Command::Compliance { tenant } => {
            let (record, pool) = open_tenant(&cli.database_url, cli.pool_size, &tenant).await?;
            let issues = catalog_service(pool)
                .duty_compliance_issues(&record.context())
                .await?;
            for issue in &issues {
                writeln!(out, "{}\t{}", issue.code, issue.message)?;
            }
            info!(tenant = %record.code, issues = issues.len(), "compliance check finished");
            Ok(())
        }
    }
}

fn migrate(database_url: &str, out: &mut impl Write) -> Result<(), AdminError> {
    let mut conn = PgConnection::establish(database_url)?;
    for version in schema::apply_migrations(&mut conn)? {
        writeln!(out, "applied {version}")?;
    }
    let current = schema::current_version(&mut conn)?;
    writeln!(out, "schema version: {}", current.as_deref().unwrap_or("none"))?;
    Ok(())
}

async fn seed_defaults(
    ctx: TenantContext,
    pool: PgPool,
    out: &mut impl Write,
) -> Result<(), AdminError> {
    let report = catalog_service(pool).seed_defaults(&ctx).await?;
    for entry in &report.created {
        writeln!(out, "created {} {}", entry.kind, entry.code)?;
    }
    for entry in &report.skipped {
        writeln!(out, "skipped {} {}", entry.kind, entry.code)?;
    }
    Ok(())
}

fn catalog_service(pool: PgPool) -> CatalogService<PostgresCatalogStore, DefaultClock> {
    CatalogService::new(
        Arc::new(PostgresCatalogStore::new(pool)),
        Arc::new(DefaultClock),
    )
}

/// Resolves the tenant in the admin database and opens its own pool.
async fn open_tenant(
    admin_url: &str,
    pool_size: u32,
    code: &str,
) -> Result<(TenantRecord, PgPool), AdminError> {
    let directory = PostgresTenantDirectory::new(build_pool(admin_url, 1)?);
    let record = TenantResolver::new(Arc::new(directory))
        .resolve_record(code)
        .await?;
    let pool = build_pool(&record.database_url, pool_size)?;
    info!(tenant = %record.code, "tenant database opened");
    Ok((record, pool))
}

fn build_pool(url: &str, size: u32) -> Result<PgPool, AdminError> {
    let pool = Pool::builder()
        .max_size(size.max(1))
        .build(ConnectionManager::<PgConnection>::new(url))?;
    Ok(pool)
}
