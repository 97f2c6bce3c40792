use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::application_dto::{
        CreateApplicationPayload, JobScopedQuery, UpdateApplicationStatusPayload,
    },
    error::Result,
    middleware::auth::Claims,
    models::user::UserRole,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/v1/applications",
    request_body = CreateApplicationPayload,
    responses(
        (status = 201, description = "Application submitted", body = Json<JobApplication>),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Application already exists for this job")
    )
)]
#[axum::debug_handler]
pub async fn create_application(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateApplicationPayload>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Labour)?;
    payload.validate()?;
    let application = state.application_service.create(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[utoipa::path(
    get,
    path = "/api/v1/applications",
    params(
        ("job_id" = Uuid, Query, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Applications for the job", body = [JobApplication]),
        (status = 403, description = "Job belongs to another builder")
    )
)]
#[axum::debug_handler]
pub async fn list_job_applications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<JobScopedQuery>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Builder)?;
    let items = state
        .application_service
        .list_for_job(user_id, query.job_id)
        .await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/v1/applications/mine",
    responses(
        (status = 200, description = "Caller's applications", body = [JobApplication])
    )
)]
#[axum::debug_handler]
pub async fn list_my_applications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Labour)?;
    let items = state.application_service.list_mine(user_id).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/v1/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application", body = Json<JobApplication>),
        (status = 403, description = "Not the applicant or job owner"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let application = state
        .application_service
        .get(claims.user_id()?, id)
        .await?;
    Ok(Json(application))
}

#[utoipa::path(
    put,
    path = "/api/v1/applications/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = UpdateApplicationStatusPayload,
    responses(
        (status = 200, description = "Status updated", body = Json<ApplicationStatusResponse>),
        (status = 400, description = "Invalid application status"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_application_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateApplicationStatusPayload>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Builder)?;
    let response = state
        .application_service
        .update_status(user_id, id, &payload.status)
        .await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/applications/{id}/withdraw",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application withdrawn", body = Json<JobApplication>),
        (status = 400, description = "Application already withdrawn"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn withdraw_application(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Labour)?;
    let application = state.application_service.withdraw(user_id, id).await?;
    Ok(Json(application))
}
