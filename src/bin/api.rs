use financial_query_router::{api::start_server, config::RouterConfig, pipeline::QueryPipeline};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = RouterConfig::from_env()?;

    if config.groq.api_key.is_none() {
        warn!("GROQ_API_KEY not set in .env; every query will receive the fallback reply");
    }

    info!("Financial Query Router - API Server");
    info!("Port: {}", config.port);

    let pipeline = Arc::new(QueryPipeline::from_config(&config)?);

    info!("Pipeline initialized");
    info!("Starting API server...");

    start_server(pipeline, config.port).await?;

    Ok(())
}
