//! HTTP API server with observability for the shipment tracking system.
//!
//! Provides REST endpoints for shipment management and the customer and
//! enterprise registries, with structured logging (tracing) and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use service::ShipmentService;
use store::{CustomerRepository, EnterpriseRepository, ShipmentRepository, UnitOfWork};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::shipments::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/shipments", post(routes::shipments::create))
        .route("/shipments", get(routes::shipments::list))
        .route("/shipments/{id}", get(routes::shipments::get))
        .route("/shipments/{id}", put(routes::shipments::update))
        .route("/shipments/{id}", delete(routes::shipments::remove))
        .route("/customers", post(routes::customers::create))
        .route("/customers", get(routes::customers::list))
        .route("/customers/{id}", get(routes::customers::get))
        .route(
            "/customers/{id}/shipments",
            get(routes::shipments::list_by_customer),
        )
        .route("/enterprises", post(routes::enterprises::create))
        .route("/enterprises", get(routes::enterprises::list))
        .route("/enterprises/{id}", get(routes::enterprises::get))
        .route(
            "/enterprises/{id}/shipments",
            get(routes::shipments::list_by_enterprise),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Builds the shared application state over a storage backend that
/// implements every port.
pub fn create_state<S>(store: S) -> Arc<AppState>
where
    S: ShipmentRepository + CustomerRepository + EnterpriseRepository + UnitOfWork + Clone + 'static,
{
    let shipments = ShipmentService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    );

    Arc::new(AppState {
        shipments,
        customers: Arc::new(store.clone()),
        enterprises: Arc::new(store.clone()),
        unit_of_work: Arc::new(store),
    })
}
