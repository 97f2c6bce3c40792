use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::job_dto::{CreateJobsitePayload, UpdateJobsitePayload},
    error::Result,
    middleware::auth::Claims,
    models::user::UserRole,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/v1/jobsites",
    request_body = CreateJobsitePayload,
    responses(
        (status = 201, description = "Jobsite created", body = Json<Jobsite>),
        (status = 404, description = "Builder profile not found")
    )
)]
#[axum::debug_handler]
pub async fn create_jobsite(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateJobsitePayload>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Builder)?;
    payload.validate()?;
    let site = state.jobsite_service.create(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(site)))
}

#[utoipa::path(
    get,
    path = "/api/v1/jobsites",
    responses(
        (status = 200, description = "Own jobsites", body = [Jobsite])
    )
)]
#[axum::debug_handler]
pub async fn list_jobsites(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Builder)?;
    let sites = state.jobsite_service.list_mine(user_id).await?;
    Ok(Json(sites))
}

#[utoipa::path(
    get,
    path = "/api/v1/jobsites/{id}",
    params(
        ("id" = Uuid, Path, description = "Jobsite ID")
    ),
    responses(
        (status = 200, description = "Jobsite", body = Json<Jobsite>),
        (status = 403, description = "Jobsite belongs to another builder"),
        (status = 404, description = "Jobsite not found")
    )
)]
#[axum::debug_handler]
pub async fn get_jobsite(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Builder)?;
    let site = state.jobsite_service.get(user_id, id).await?;
    Ok(Json(site))
}

#[utoipa::path(
    put,
    path = "/api/v1/jobsites/{id}",
    params(
        ("id" = Uuid, Path, description = "Jobsite ID")
    ),
    request_body = UpdateJobsitePayload,
    responses(
        (status = 200, description = "Jobsite updated", body = Json<Jobsite>),
        (status = 403, description = "Jobsite belongs to another builder"),
        (status = 404, description = "Jobsite not found")
    )
)]
#[axum::debug_handler]
pub async fn update_jobsite(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobsitePayload>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Builder)?;
    payload.validate()?;
    let site = state.jobsite_service.update(user_id, id, payload).await?;
    Ok(Json(site))
}

#[utoipa::path(
    delete,
    path = "/api/v1/jobsites/{id}",
    params(
        ("id" = Uuid, Path, description = "Jobsite ID")
    ),
    responses(
        (status = 204, description = "Jobsite deleted"),
        (status = 404, description = "Jobsite not found"),
        (status = 409, description = "Jobs still reference the jobsite")
    )
)]
#[axum::debug_handler]
pub async fn delete_jobsite(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Builder)?;
    state.jobsite_service.delete(user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
