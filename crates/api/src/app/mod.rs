//! Application wiring: one axum router per service kind.
//!
//! - `services/`: application services (rules, peer checks, store calls)
//! - `routes/`: HTTP handlers, one file per service surface
//! - `dto.rs`: wire shapes and their mapping to domain types
//! - `errors.rs`: error taxonomy and HTTP responses
//! - `openapi.rs`: the document each process serves

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Extension, Router};
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use sparetrack_auth::{AuthError, Authenticator, PasswordHasher, Registration, UserDirectory};
use sparetrack_categories::Category;
use sparetrack_gateway::{Aggregator, GatewayError, HttpDocSource, ServiceEndpoint};
use sparetrack_infra::config::{PeerSettings, Settings};
use sparetrack_infra::{
    connect, InMemoryTable, InMemoryUsers, PartLookup, PgPool, PgRecord, PgTable, PgUsers,
    StoreError, SupplierLookup, Table,
};
use sparetrack_inventory::InventoryItem;
use sparetrack_parts::Part;
use sparetrack_peers::{
    CategoryDirectory, Credentials, HttpDirectory, HttpPartUsage, PartDirectory, PeerClient,
    PeerError, PeerOptions, SupplierDirectory,
};
use sparetrack_suppliers::Supplier;

use crate::middleware::{self, AuthState};

pub mod dto;
pub mod errors;
pub mod openapi;
pub mod routes;
pub mod services;

use services::{CategoryService, InventoryService, PartService, SupplierService};

/// Which service a process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ServiceKind {
    Category,
    Supplier,
    Part,
    Inventory,
    Gateway,
    Auth,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ServiceKind::Category => "category",
            ServiceKind::Supplier => "supplier",
            ServiceKind::Part => "part",
            ServiceKind::Inventory => "inventory",
            ServiceKind::Gateway => "gateway",
            ServiceKind::Auth => "auth",
        })
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Peer(#[from] PeerError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Wrap a service's routes with the endpoints every process serves, the
/// optional Basic-auth guard and request tracing.
pub fn service_router(kind: ServiceKind, surface: Router, auth: Option<AuthState>) -> Router {
    let mut router = Router::new()
        .route("/health", get(routes::system::health))
        .route("/v3/api-docs", get(routes::system::api_docs))
        .merge(surface)
        .layer(Extension(Arc::new(openapi::document(kind))));

    if let Some(auth) = auth {
        router = router.layer(axum::middleware::from_fn_with_state(
            auth,
            middleware::basic_auth_middleware,
        ));
    }

    router.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

pub fn category_router(service: Arc<CategoryService>, auth: Option<AuthState>) -> Router {
    let surface = Router::new()
        .nest("/api/categories", routes::categories::router())
        .layer(Extension(service));
    service_router(ServiceKind::Category, surface, auth)
}

pub fn supplier_router(service: Arc<SupplierService>, auth: Option<AuthState>) -> Router {
    let surface = Router::new()
        .nest("/api/suppliers", routes::suppliers::router())
        .layer(Extension(service));
    service_router(ServiceKind::Supplier, surface, auth)
}

pub fn part_router(service: Arc<PartService>, auth: Option<AuthState>) -> Router {
    let surface = Router::new()
        .nest("/api/parts", routes::parts::router())
        .layer(Extension(service));
    service_router(ServiceKind::Part, surface, auth)
}

pub fn inventory_router(service: Arc<InventoryService>, auth: Option<AuthState>) -> Router {
    let surface = Router::new()
        .nest("/api/inventories", routes::inventory::router())
        .layer(Extension(service));
    service_router(ServiceKind::Inventory, surface, auth)
}

pub fn gateway_router(aggregator: Arc<Aggregator>, auth: Option<AuthState>) -> Router {
    let surface = routes::gateway::router().layer(Extension(aggregator));
    service_router(ServiceKind::Gateway, surface, auth)
}

pub fn auth_router(authenticator: Arc<Authenticator>, auth: Option<AuthState>) -> Router {
    let surface = routes::auth::router().layer(Extension(authenticator));
    service_router(ServiceKind::Auth, surface, auth)
}

/// Build the router for `kind` from settings: Postgres tables when a
/// database URL is configured, in-memory tables otherwise.
pub async fn build_app(kind: ServiceKind, settings: &Settings) -> Result<Router, StartupError> {
    let pool = connect(&settings.database).await?;

    let authenticator = Arc::new(Authenticator::new(
        user_directory(pool.as_ref()).await?,
        PasswordHasher::default(),
    ));
    let auth = if settings.auth.enabled {
        seed_service_account(&authenticator, &settings.peers).await?;
        Some(AuthState::new(
            authenticator.clone(),
            settings.auth.protected_prefixes.clone(),
        ))
    } else {
        None
    };

    let router = match kind {
        ServiceKind::Category => {
            let table: Arc<dyn Table<Category>> = match &pool {
                Some(pool) => Arc::new(pg_table::<Category>(pool).await?),
                None => Arc::new(InMemoryTable::<Category>::new()),
            };
            let usage = part_usage(&settings.peers)?;
            category_router(Arc::new(CategoryService::new(table, usage)), auth)
        }
        ServiceKind::Supplier => {
            let table: Arc<dyn SupplierLookup> = match &pool {
                Some(pool) => Arc::new(pg_table::<Supplier>(pool).await?),
                None => Arc::new(InMemoryTable::<Supplier>::new()),
            };
            let usage = part_usage(&settings.peers)?;
            supplier_router(Arc::new(SupplierService::new(table, usage)), auth)
        }
        ServiceKind::Part => {
            let table: Arc<dyn PartLookup> = match &pool {
                Some(pool) => Arc::new(pg_table::<Part>(pool).await?),
                None => Arc::new(InMemoryTable::<Part>::new()),
            };
            let categories: Arc<CategoryDirectory> = Arc::new(HttpDirectory::categories(peer(
                "category-service",
                &settings.peers.category_url,
                &settings.peers,
            )?));
            let suppliers: Arc<SupplierDirectory> = Arc::new(HttpDirectory::suppliers(peer(
                "supplier-service",
                &settings.peers.supplier_url,
                &settings.peers,
            )?));
            part_router(Arc::new(PartService::new(table, categories, suppliers)), auth)
        }
        ServiceKind::Inventory => {
            let table: Arc<dyn Table<InventoryItem>> = match &pool {
                Some(pool) => Arc::new(pg_table::<InventoryItem>(pool).await?),
                None => Arc::new(InMemoryTable::<InventoryItem>::new()),
            };
            let parts: Arc<PartDirectory> = Arc::new(HttpDirectory::parts(peer(
                "part-service",
                &settings.peers.part_url,
                &settings.peers,
            )?));
            inventory_router(Arc::new(InventoryService::new(table, parts)), auth)
        }
        ServiceKind::Gateway => {
            let source = HttpDocSource::new(
                settings.gateway.docs_path.clone(),
                Duration::from_millis(settings.peers.timeout_ms),
            )?;
            let services = settings
                .gateway
                .services
                .iter()
                .map(|s| ServiceEndpoint::new(s.name.clone(), s.url.clone()))
                .collect();
            gateway_router(Arc::new(Aggregator::new(Arc::new(source), services)), auth)
        }
        ServiceKind::Auth => auth_router(authenticator, auth),
    };

    info!(service = %kind, persistent = pool.is_some(), "service wired");
    Ok(router)
}

async fn pg_table<R: PgRecord>(pool: &PgPool) -> Result<PgTable<R>, StoreError> {
    let table = PgTable::<R>::new(pool.clone());
    table.ensure_schema().await?;
    Ok(table)
}

async fn user_directory(pool: Option<&PgPool>) -> Result<Arc<dyn UserDirectory>, StoreError> {
    match pool {
        Some(pool) => {
            let users = PgUsers::new(pool.clone());
            users.ensure_schema().await?;
            Ok(Arc::new(users))
        }
        None => Ok(Arc::new(InMemoryUsers::new())),
    }
}

fn peer_options(peers: &PeerSettings) -> PeerOptions {
    let credentials = match (&peers.username, &peers.password) {
        (Some(username), Some(password)) => Some(Credentials {
            username: username.clone(),
            password: password.clone(),
        }),
        _ => None,
    };
    PeerOptions {
        timeout: Duration::from_millis(peers.timeout_ms),
        credentials,
    }
}

fn part_usage(peers: &PeerSettings) -> Result<Arc<HttpPartUsage>, PeerError> {
    Ok(Arc::new(HttpPartUsage::new(peer("part-service", &peers.part_url, peers)?)))
}

fn peer(service: &'static str, url: &str, peers: &PeerSettings) -> Result<PeerClient, PeerError> {
    PeerClient::new(service, url, &peer_options(peers))
}

/// Make the configured outbound peer credentials valid on this process too,
/// so services that call each other can authenticate.
async fn seed_service_account(
    authenticator: &Authenticator,
    peers: &PeerSettings,
) -> Result<(), AuthError> {
    let (Some(username), Some(password)) = (&peers.username, &peers.password) else {
        return Ok(());
    };

    let registration = Registration {
        username: Some(username.clone()),
        password: Some(password.clone()),
    };
    match authenticator.register(registration).await {
        Ok(_) | Err(AuthError::UsernameTaken) => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peer_credentials_need_both_halves() {
        let mut peers = PeerSettings {
            username: Some("svc".to_string()),
            ..PeerSettings::default()
        };
        assert!(peer_options(&peers).credentials.is_none());

        peers.password = Some("secret".to_string());
        let options = peer_options(&peers);
        assert_eq!(options.credentials.unwrap().username, "svc");
        assert_eq!(options.timeout, Duration::from_millis(5000));
    }

    #[tokio::test]
    async fn service_account_is_seeded_once() {
        let authenticator = Authenticator::new(
            Arc::new(InMemoryUsers::new()),
            PasswordHasher::with_cost(4),
        );
        let peers = PeerSettings {
            username: Some("svc".to_string()),
            password: Some("secret".to_string()),
            ..PeerSettings::default()
        };

        seed_service_account(&authenticator, &peers).await.unwrap();
        seed_service_account(&authenticator, &peers).await.unwrap();
        assert!(authenticator
            .authenticate(Some("Basic c3ZjOnNlY3JldA=="))
            .await
            .is_ok());
    }

    #[test]
    fn kinds_display_as_cli_values() {
        use clap::ValueEnum;
        for kind in ServiceKind::value_variants() {
            let value = kind.to_possible_value().unwrap();
            assert_eq!(value.get_name(), kind.to_string());
        }
    }
}
