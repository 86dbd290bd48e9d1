use std::sync::Arc;

use videoclub_auth::IdentityProvider;
use videoclub_catalog::CatalogService;
use videoclub_infra::{InMemoryIdentityProvider, InMemoryStore, RestIdentityProvider, RestStore};
use videoclub_rentals::RentalService;

use crate::config::Config;

/// Everything the route handlers need, wired once at process start and
/// shared through a request extension.
#[derive(Clone)]
pub struct AppServices {
    pub identity: Arc<dyn IdentityProvider>,
    pub catalog: CatalogService,
    pub rentals: RentalService,
    pub environment: String,
}

/// Handles onto the in-memory backends, for out-of-band setup in tests
/// (seeding, role promotion).
pub struct InMemoryHandles {
    pub store: Arc<InMemoryStore>,
    pub identity: Arc<InMemoryIdentityProvider>,
}

pub fn build_services(config: &Config) -> AppServices {
    if config.use_in_memory() {
        tracing::info!("using in-memory backend (no BACKEND_URL/SERVICE_ROLE_KEY configured)");
        return in_memory_services(config.env_name()).0;
    }

    // `use_in_memory` checked both values.
    let url = config.backend_url.as_deref().expect("backend_url checked");
    let key = config.service_key.as_deref().expect("service_key checked");

    let store = Arc::new(RestStore::new(url, key));
    let identity = Arc::new(RestIdentityProvider::new(url, key));
    tracing::info!(backend = url, "using REST backend");

    AppServices {
        identity,
        catalog: CatalogService::new(store.clone(), store.clone()),
        rentals: RentalService::new(store.clone(), store),
        environment: config.env_name().to_string(),
    }
}

/// In-memory wiring for dev and for the black-box tests, which need the
/// raw handles for out-of-band setup.
pub fn in_memory_services(environment: &str) -> (AppServices, InMemoryHandles) {
    let store = Arc::new(InMemoryStore::new());
    let identity = Arc::new(InMemoryIdentityProvider::new());

    let services = AppServices {
        identity: identity.clone(),
        catalog: CatalogService::new(store.clone(), store.clone()),
        rentals: RentalService::new(store.clone(), store.clone()),
        environment: environment.to_string(),
    };

    (services, InMemoryHandles { store, identity })
}
