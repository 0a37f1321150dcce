use crate::cli::ServeArgs;
use crate::infra::{assemble_hub, load_catalog, AppState};
use crate::routes::with_service_routes;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use metrics_exporter_prometheus::PrometheusHandle;
use property_hub::config::AppConfig;
use property_hub::error::AppError;
use property_hub::listings::Property;
use property_hub::telemetry;
use property_hub::PropertyHub;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Router and readiness flag for a hub that has not started listening yet.
pub(crate) struct PreparedService {
    pub(crate) app: Router,
    pub(crate) readiness: Arc<AtomicBool>,
}

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
    let catalog = load_catalog(args.seed_csv.as_deref())?;
    let service = prepare(&config, catalog, prometheus_handle)?;
    let app = service.app.layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    service.readiness.store(true, Ordering::Release);

    info!(?config.environment, %addr, "property hub ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Assembles the hub over `catalog` and mounts it with the operational routes. Readiness stays
/// off until the caller has bound a listener.
pub(crate) fn prepare(
    config: &AppConfig,
    catalog: Vec<Property>,
    metrics: PrometheusHandle,
) -> Result<PreparedService, AppError> {
    let hub = assemble_hub(config, catalog)?;
    log_startup_summary(&hub, config);

    let readiness = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness.clone(),
        metrics: Arc::new(metrics),
    };
    let app = with_service_routes(hub).layer(Extension(app_state));

    Ok(PreparedService { app, readiness })
}

fn log_startup_summary(hub: &PropertyHub, config: &AppConfig) {
    match hub.moderation.dashboard() {
        Ok(stats) => info!(
            listings = stats.total_properties,
            active = stats.active,
            pending = stats.pending,
            administrators = stats.admins,
            page_size = config.listings.page_size,
            max_images = config.listings.max_images,
            "marketplace catalog loaded"
        ),
        Err(err) => warn!(error = %err, "catalog summary unavailable at startup"),
    }
}
