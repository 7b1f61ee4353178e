// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::ApiError,
    state::AppState,
    storage::{ServiceRecord, ServiceRepository},
};

#[utoipa::path(
    get,
    path = "/api/services",
    tag = "Services",
    responses((status = 200, body = [ServiceRecord]))
)]
pub async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceRecord>>, ApiError> {
    let services = ServiceRepository::new(&state.store).list()?;
    Ok(Json(services))
}

#[utoipa::path(
    get,
    path = "/api/services/{service_id}",
    params(
        ("service_id" = String, Path, description = "Identifier of the service")
    ),
    tag = "Services",
    responses(
        (status = 200, body = ServiceRecord),
        (status = 404, description = "No such service")
    )
)]
pub async fn get_service(
    Path(service_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ServiceRecord>, ApiError> {
    let service = ServiceRepository::new(&state.store).get(&service_id)?;
    Ok(Json(service))
}
