use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::job_dto::{JobListQuery, JobListResponse, JobPayload, UpdateJobStatusPayload},
    error::Result,
    middleware::auth::Claims,
    models::user::UserRole,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/v1/jobs",
    request_body = JobPayload,
    responses(
        (status = 201, description = "Job posted", body = Json<JobDetails>),
        (status = 400, description = "Payload failed validation"),
        (status = 403, description = "Jobsite belongs to another builder"),
        (status = 404, description = "Builder profile not found")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<JobPayload>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Builder)?;
    payload.validate()?;
    let job = state.job_service.create(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    get,
    path = "/api/v1/jobs",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("per_page" = Option<i64>, Query, description = "Items per page"),
        ("status" = Option<String>, Query, description = "Job status, OPEN when omitted"),
        ("job_type_id" = Option<Uuid>, Query, description = "Filter by job type"),
        ("search" = Option<String>, Query, description = "Search in title")
    ),
    responses(
        (status = 200, description = "Page of jobs", body = Json<JobListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let result = state.job_service.list(query).await?;
    Ok(Json(JobListResponse::from(result)))
}

#[utoipa::path(
    get,
    path = "/api/v1/jobs/mine",
    responses(
        (status = 200, description = "Jobs posted by the caller", body = [Job])
    )
)]
#[axum::debug_handler]
pub async fn list_my_jobs(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Builder)?;
    let jobs = state.job_service.list_mine(user_id).await?;
    Ok(Json(jobs))
}

#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job with requirements", body = Json<JobDetails>),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get(id).await?;
    Ok(Json(job))
}

#[utoipa::path(
    put,
    path = "/api/v1/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    request_body = JobPayload,
    responses(
        (status = 200, description = "Job replaced", body = Json<JobDetails>),
        (status = 403, description = "Job belongs to another builder"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn replace_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<JobPayload>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Builder)?;
    payload.validate()?;
    let job = state.job_service.replace(user_id, id, payload).await?;
    Ok(Json(job))
}

#[utoipa::path(
    patch,
    path = "/api/v1/jobs/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    request_body = UpdateJobStatusPayload,
    responses(
        (status = 200, description = "Status updated", body = Json<Job>),
        (status = 400, description = "Invalid job status"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobStatusPayload>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Builder)?;
    let job = state
        .job_service
        .update_status(user_id, id, &payload.status)
        .await?;
    Ok(Json(job))
}

#[utoipa::path(
    delete,
    path = "/api/v1/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 204, description = "Job deleted"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Builder)?;
    state.job_service.delete(user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
