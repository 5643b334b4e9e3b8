//! Table provisioning CLI.
//!
//! Creates the post table (if missing) with the `id`/`createdAt` key schema
//! and turns on TTL expiry for the `ttl` attribute. Reads `POSTS_TABLE` and
//! `DYNAMODB_ENDPOINT` like the server does.

use anyhow::Context;
use bbs_infra::DynamoConfig;
use bbs_infra::store::ensure_table;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let config = DynamoConfig::from_env();
    let client = config.client().await;

    let created = ensure_table(&client, &config.table_name)
        .await
        .with_context(|| format!("failed to provision table {}", config.table_name))?;

    if created {
        tracing::info!(table = %config.table_name, "Table provisioned");
    } else {
        tracing::info!(table = %config.table_name, "Nothing to do");
    }
    Ok(())
}
