use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use property_hub::config::{AppConfig, ListingsConfig};
use property_hub::error::AppError;
use property_hub::listings::{Property, SeedImporter};
use property_hub::{Backend, PropertyHub};
use tracing::{info, warn};

/// Catalog bundled with the repository for demos and local runs.
pub(crate) const DEFAULT_SEED_CSV: &str = "data/seed_properties.csv";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn default_seed_path() -> PathBuf {
    PathBuf::from(DEFAULT_SEED_CSV)
}

/// Imports the seed catalog when a path is given; otherwise the catalog starts empty.
pub(crate) fn load_catalog(seed_csv: Option<&Path>) -> Result<Vec<Property>, AppError> {
    let Some(path) = seed_csv else {
        return Ok(Vec::new());
    };
    let properties = SeedImporter::from_path(path)?;
    info!(path = %path.display(), count = properties.len(), "seed catalog imported");
    Ok(properties)
}

/// Builds the in-memory hub and seeds the configured administrator, if any.
pub(crate) fn assemble_hub(
    config: &AppConfig,
    properties: Vec<Property>,
) -> Result<PropertyHub, AppError> {
    let hub = PropertyHub::new(Backend::in_memory(properties), &config.listings);

    match &config.bootstrap.admin {
        Some(admin) => {
            hub.accounts
                .bootstrap_admin(&admin.email, &admin.password, "Administrator")?;
        }
        None => warn!("no administrator configured; admin routes will deny every caller"),
    }

    Ok(hub)
}

/// Hub used by the CLI commands, which never need an administrator account up front.
pub(crate) fn offline_hub(properties: Vec<Property>) -> PropertyHub {
    PropertyHub::new(Backend::in_memory(properties), &ListingsConfig::default())
}
