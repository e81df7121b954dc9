use std::net::IpAddr;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use platform_db::{DatabaseSettings, DbPool, connect};
use platform_obs::{ObsConfig, init_tracing};
use server::{
    AppState,
    config::AppConfig,
    http::{self, ServeConfig},
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "hr-server", version, about = "HR administration backend")]
struct Cli {
    /// Allow insecure development defaults such as a fixed token secret.
    #[arg(long, global = true, env = "HR_DEV")]
    dev: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Insert the demo companies and projects if they are missing.
    Seed,
    /// Delete revocation entries for tokens that have expired.
    PruneRevoked,
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
    /// Rollback everything, then apply all migrations again.
    Reset,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, cli.dev).await,
        Command::Migrate(action) => run_migrations(action).await,
        Command::Seed => run_seed().await,
        Command::PruneRevoked => prune_revoked().await,
    }
}

async fn setup_pool() -> Result<DbPool> {
    let settings = DatabaseSettings::from_env()?;
    setup_pool_with(&settings).await
}

async fn setup_pool_with(settings: &DatabaseSettings) -> Result<DbPool> {
    connect(settings)
        .await
        .with_context(|| format!("failed to connect to {}", redact(&settings.url)))
}

async fn run_server(cmd: ServeCommand, dev: bool) -> Result<()> {
    let config = AppConfig::load(dev)?;
    let pool = setup_pool_with(&config.database).await?;
    ensure_migrations(&pool, cmd.allow_dirty).await?;
    let state = AppState::new(pool, config);
    http::serve((&cmd).into(), state).await
}

async fn ensure_migrations(pool: &DbPool, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if !pending.is_empty() && !allow_dirty {
        anyhow::bail!(
            "{} pending migrations detected; run `hr-server migrate up` or pass --allow-dirty",
            pending.len()
        );
    }
    Ok(())
}

async fn run_migrations(action: MigrateCommand) -> Result<()> {
    let pool = setup_pool().await?;
    match action {
        MigrateCommand::Up => {
            Migrator::up(&pool, None).await?;
            info!("database migrations applied");
        }
        MigrateCommand::Down => {
            Migrator::down(&pool, Some(1)).await?;
            info!("most recent migration rolled back");
        }
        MigrateCommand::Reset => {
            Migrator::reset(&pool).await?;
            Migrator::up(&pool, None).await?;
            info!("database reset");
        }
    }
    Ok(())
}

async fn run_seed() -> Result<()> {
    let pool = setup_pool().await?;
    ensure_migrations(&pool, false).await?;
    let report = products_hr::seed::seed_demo_catalog(&pool).await?;
    info!(
        companies = report.companies_created,
        projects = report.projects_created,
        "seed complete"
    );
    Ok(())
}

async fn prune_revoked() -> Result<()> {
    let pool = setup_pool().await?;
    let removed = platform_authn::prune_expired(&pool).await?;
    info!(removed, "expired revocation entries pruned");
    Ok(())
}

/// Hide the password embedded in a connection URL.
fn redact(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) if parsed.password().is_some() => {
            let _ = parsed.set_password(Some("***"));
            parsed.to_string()
        }
        _ => raw.to_string(),
    }
}
