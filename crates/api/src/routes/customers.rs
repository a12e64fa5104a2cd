//! Customer registry endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::CustomerId;
use domain::{Customer, NewCustomer};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::shipments::AppState;

#[derive(Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct CustomerResponseBody {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<Customer> for CustomerResponseBody {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id.as_i64(),
            name: customer.name,
            email: customer.email,
        }
    }
}

/// POST /customers — register a new customer.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponseBody>), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name required".to_string()));
    }

    let customer = state
        .customers
        .add(NewCustomer {
            name: req.name,
            email: req.email,
        })
        .await?;
    state.unit_of_work.complete().await?;

    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// GET /customers — list every customer.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CustomerResponseBody>>, ApiError> {
    let customers = state.customers.list().await?;
    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

/// GET /customers/:id — load a customer by ID.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<CustomerResponseBody>, ApiError> {
    let customer = state
        .customers
        .find_by_id(CustomerId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Customer {id} not found")))?;

    Ok(Json(customer.into()))
}
