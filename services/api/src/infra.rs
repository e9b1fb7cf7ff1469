use estate_market::error::AppError;
use estate_market::marketplace::{
    ListingImporter, MarketplaceService, MarketplaceStore, Principal, Property, Registration,
    Role,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) const SEED_SELLER_USERNAME: &str = "seed-seller";

/// Registers the seed seller and lists every row of the CSV under it.
pub(crate) async fn seed_from_csv<S>(
    service: &MarketplaceService<S>,
    path: &Path,
    password: &str,
) -> Result<Vec<Property>, AppError>
where
    S: MarketplaceStore + 'static,
{
    let drafts = ListingImporter::from_path(path)?;
    let grant = service.register(Registration {
        username: SEED_SELLER_USERNAME.to_string(),
        password: password.to_string(),
        name: "Seed Seller".to_string(),
        email: "seed-seller@example.com".to_string(),
        role: Role::Seller,
    })
    .await?;
    service.logout(&grant.token).await?;

    Ok(service.seed_listings(&Principal::from(&grant.user), drafts)?)
}
