use plantation_service::{config::Config, services::metrics, Application};
use service_core::observability::logging::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("plantation-service", "info");
    metrics::init_metrics();

    let config = Config::from_env()?;
    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
