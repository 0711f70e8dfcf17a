use floorplan_feed::{config::Config, feed::service::PipelineService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cfg = Config::from_env()?;
    let service = PipelineService::new(cfg);

    let output = service.run().await?;
    service.emit(&output).await?;

    Ok(())
}
