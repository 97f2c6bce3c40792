use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{error::Result, models::master_data::MasterDataKind, AppState};

// Both handlers serve all five lookup tables; the router attaches the
// `MasterDataKind` for each path as an extension.

#[utoipa::path(
    get,
    path = "/api/v1/{kind}",
    params(
        ("kind" = String, Path, description = "licenses, skills, job-types, experience-levels or qualifications")
    ),
    responses(
        (status = 200, description = "Lookup rows ordered by sort order"),
        (status = 401, description = "Missing or invalid license key")
    )
)]
#[axum::debug_handler]
pub async fn list_items(
    State(state): State<AppState>,
    Extension(kind): Extension<MasterDataKind>,
) -> Result<impl IntoResponse> {
    let items = state.master_data_service.list(kind).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/v1/{kind}/{id}",
    params(
        ("kind" = String, Path, description = "Lookup table"),
        ("id" = Uuid, Path, description = "Row ID")
    ),
    responses(
        (status = 200, description = "Lookup row"),
        (status = 404, description = "Row not found")
    )
)]
#[axum::debug_handler]
pub async fn get_item(
    State(state): State<AppState>,
    Extension(kind): Extension<MasterDataKind>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let item = state.master_data_service.get(kind, id).await?;
    Ok(Json(item))
}
