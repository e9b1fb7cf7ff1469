use crate::cli::ServeArgs;
use crate::infra::{seed_from_csv, AppState};
use crate::routes::with_marketplace_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use estate_market::config::{AppConfig, ConfigError};
use estate_market::error::AppError;
use estate_market::marketplace::{InMemoryMarketplaceStore, MarketplaceService};
use estate_market::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryMarketplaceStore::new());
    let service = Arc::new(MarketplaceService::new(
        store,
        config.marketplace.clone(),
    ));

    if let Some(path) = args.seed_csv.take() {
        let password = config
            .marketplace
            .seed_password
            .as_deref()
            .ok_or(ConfigError::MissingSeedPassword)?;
        let seeded = seed_from_csv(&service, &path, password).await?;
        info!(listings = seeded.len(), path = %path.display(), "seeded listings from csv");
    }

    let app = with_marketplace_routes(service)
        .layer(Extension(app_state))
        .layer(TimeoutLayer::new(config.server.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, page_size = config.marketplace.page_size, "estate market api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
