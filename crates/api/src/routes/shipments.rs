//! Shipment CRUD and relation listing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{CustomerId, EnterpriseId, ShipmentId};
use domain::{NewShipment, Shipment, ShipmentStatus, ShipmentUpdate};
use serde::{Deserialize, Serialize};
use service::ShipmentService;
use store::{CustomerRepository, EnterpriseRepository, UnitOfWork};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub shipments: ShipmentService,
    pub customers: Arc<dyn CustomerRepository>,
    pub enterprises: Arc<dyn EnterpriseRepository>,
    pub unit_of_work: Arc<dyn UnitOfWork>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateShipmentRequest {
    pub customer_id: i64,
    pub enterprise_id: i64,
    pub delivery_date: DateTime<Utc>,
    pub status: Option<ShipmentStatus>,
}

#[derive(Deserialize)]
pub struct UpdateShipmentRequest {
    pub delivery_date: DateTime<Utc>,
    pub status: ShipmentStatus,
}

// -- Response types --

#[derive(Serialize)]
pub struct ShipmentResponseBody {
    pub id: i64,
    pub customer_id: i64,
    pub enterprise_id: i64,
    pub delivery_date: String,
    pub status: String,
}

impl From<Shipment> for ShipmentResponseBody {
    fn from(shipment: Shipment) -> Self {
        Self {
            id: shipment.id.as_i64(),
            customer_id: shipment.customer_id.as_i64(),
            enterprise_id: shipment.enterprise_id.as_i64(),
            delivery_date: shipment.delivery_date.to_rfc3339(),
            status: shipment.status.to_string(),
        }
    }
}

// -- Handlers --

/// POST /shipments — register a new shipment.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateShipmentRequest>,
) -> Result<(StatusCode, Json<ShipmentResponseBody>), ApiError> {
    let shipment = NewShipment {
        customer_id: CustomerId::new(req.customer_id),
        enterprise_id: EnterpriseId::new(req.enterprise_id),
        delivery_date: req.delivery_date,
        status: req.status.unwrap_or_default(),
    };

    let saved = state.shipments.save(shipment).await?;
    Ok((StatusCode::CREATED, Json(saved.into())))
}

/// GET /shipments — list every shipment.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ShipmentResponseBody>>, ApiError> {
    let shipments = state.shipments.list().await?;
    Ok(Json(shipments.into_iter().map(Into::into).collect()))
}

/// GET /shipments/:id — load a shipment by ID.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ShipmentResponseBody>, ApiError> {
    let shipment = state
        .shipments
        .get_by_id(ShipmentId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Shipment {id} not found")))?;

    Ok(Json(shipment.into()))
}

/// PUT /shipments/:id — update a shipment's delivery date and status.
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateShipmentRequest>,
) -> Result<Json<ShipmentResponseBody>, ApiError> {
    let changes = ShipmentUpdate {
        delivery_date: req.delivery_date,
        status: req.status,
    };

    let updated = state.shipments.update(ShipmentId::new(id), changes).await?;
    Ok(Json(updated.into()))
}

/// DELETE /shipments/:id — remove a shipment, returning its last state.
#[tracing::instrument(skip(state))]
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ShipmentResponseBody>, ApiError> {
    let deleted = state.shipments.delete(ShipmentId::new(id)).await?;
    Ok(Json(deleted.into()))
}

/// GET /customers/:id/shipments — list the shipments of one customer.
#[tracing::instrument(skip(state))]
pub async fn list_by_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ShipmentResponseBody>>, ApiError> {
    let shipments = state
        .shipments
        .list_by_customer_id(CustomerId::new(id))
        .await?;
    Ok(Json(shipments.into_iter().map(Into::into).collect()))
}

/// GET /enterprises/:id/shipments — list the shipments of one enterprise.
#[tracing::instrument(skip(state))]
pub async fn list_by_enterprise(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ShipmentResponseBody>>, ApiError> {
    let shipments = state
        .shipments
        .list_by_enterprise_id(EnterpriseId::new(id))
        .await?;
    Ok(Json(shipments.into_iter().map(Into::into).collect()))
}
