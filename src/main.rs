use botreport::api::router::create_router;
use botreport::config::AppConfig;
use botreport::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    for source in &config.sources {
        tracing::info!(
            label = %source.label,
            path = %source.path.display(),
            "Trade log source configured"
        );
    }
    tracing::info!(
        ttl_secs = config.cache_ttl.as_secs(),
        "Report cache window"
    );

    let metrics_handle = botreport::metrics::init_metrics()?;
    let state = AppState::new(config, metrics_handle);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
