//! Tableau tenant config exporter
//!
//! Assembles the boards whose slug matches a pattern, together with their
//! swimlanes, lists, custom fields and every named user, and prints the
//! result as JSON.
//!
//! Usage: cargo run --bin exporter -- [SLUG_PATTERN]

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tableau_db::{ConfigAssembler, connect};
use tableau_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tableau=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::load()?;
    let pattern = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.export.slug_pattern.clone());

    let store = connect(&config.database).await?;
    info!(database = %config.database.name, "Connected to document store");

    let assembler =
        ConfigAssembler::new(Arc::new(store)).with_deadline(config.database.query_timeout());
    let tenant = assembler.assemble(&pattern).await?;

    if tenant.has_no_boards() {
        info!(%pattern, "No board matched");
    }
    println!("{}", serde_json::to_string_pretty(&tenant)?);

    Ok(())
}
