use anyhow::Context;
use tracing::info;

use category_service::{config, migrator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    info!("Starting database migration");
    migrator::run_migration(cfg.database_url()).await?;
    info!("Migration completed successfully");

    Ok(())
}
