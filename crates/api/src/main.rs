use std::sync::Arc;

use scopegate_api::{app::build_app, config::AppConfig};
use scopegate_session::InMemoryTenantDirectory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    scopegate_observability::init();

    let config = AppConfig::from_env();
    let directory = Arc::new(InMemoryTenantDirectory::new());
    let app = build_app(config, directory);

    let addr = std::env::var("SCOPEGATE_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
