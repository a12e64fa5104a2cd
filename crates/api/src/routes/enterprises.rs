//! Enterprise registry endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::EnterpriseId;
use domain::{Enterprise, NewEnterprise};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::shipments::AppState;

#[derive(Deserialize)]
pub struct CreateEnterpriseRequest {
    pub name: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct EnterpriseResponseBody {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<Enterprise> for EnterpriseResponseBody {
    fn from(enterprise: Enterprise) -> Self {
        Self {
            id: enterprise.id.as_i64(),
            name: enterprise.name,
            email: enterprise.email,
        }
    }
}

/// POST /enterprises — register a new enterprise.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateEnterpriseRequest>,
) -> Result<(StatusCode, Json<EnterpriseResponseBody>), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name required".to_string()));
    }

    let enterprise = state
        .enterprises
        .add(NewEnterprise {
            name: req.name,
            email: req.email,
        })
        .await?;
    state.unit_of_work.complete().await?;

    Ok((StatusCode::CREATED, Json(enterprise.into())))
}

/// GET /enterprises — list every enterprise.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EnterpriseResponseBody>>, ApiError> {
    let enterprises = state.enterprises.list().await?;
    Ok(Json(enterprises.into_iter().map(Into::into).collect()))
}

/// GET /enterprises/:id — load an enterprise by ID.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<EnterpriseResponseBody>, ApiError> {
    let enterprise = state
        .enterprises
        .find_by_id(EnterpriseId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Enterprise {id} not found")))?;

    Ok(Json(enterprise.into()))
}
