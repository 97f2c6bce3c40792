use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::application_dto::{CompleteAssignmentPayload, CreateAssignmentPayload, JobScopedQuery},
    error::Result,
    middleware::auth::Claims,
    models::user::UserRole,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/v1/assignments",
    request_body = CreateAssignmentPayload,
    responses(
        (status = 201, description = "Assignment created", body = Json<JobAssignment>),
        (status = 400, description = "Application is not accepted"),
        (status = 409, description = "Assignment already exists for this application")
    )
)]
#[axum::debug_handler]
pub async fn create_assignment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateAssignmentPayload>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Builder)?;
    let assignment = state.assignment_service.create(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

#[utoipa::path(
    get,
    path = "/api/v1/assignments",
    params(
        ("job_id" = Uuid, Query, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Assignments for the job", body = [JobAssignment])
    )
)]
#[axum::debug_handler]
pub async fn list_job_assignments(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<JobScopedQuery>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Builder)?;
    let items = state
        .assignment_service
        .list_for_job(user_id, query.job_id)
        .await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/v1/assignments/mine",
    responses(
        (status = 200, description = "Assignments held (labour) or issued (builder)", body = [JobAssignment])
    )
)]
#[axum::debug_handler]
pub async fn list_my_assignments(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let items = state.assignment_service.list_mine(&claims).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/v1/assignments/{id}",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    responses(
        (status = 200, description = "Assignment", body = Json<JobAssignment>),
        (status = 404, description = "Assignment not found")
    )
)]
#[axum::debug_handler]
pub async fn get_assignment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let assignment = state
        .assignment_service
        .get(claims.user_id()?, id)
        .await?;
    Ok(Json(assignment))
}

#[utoipa::path(
    post,
    path = "/api/v1/assignments/{id}/complete",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    request_body = CompleteAssignmentPayload,
    responses(
        (status = 200, description = "Assignment completed", body = Json<JobAssignment>),
        (status = 400, description = "Assignment already completed")
    )
)]
#[axum::debug_handler]
pub async fn complete_assignment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    payload: Option<Json<CompleteAssignmentPayload>>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Builder)?;
    let end_date = payload.and_then(|Json(body)| body.end_date);
    let assignment = state
        .assignment_service
        .complete(user_id, id, end_date)
        .await?;
    Ok(Json(assignment))
}

#[utoipa::path(
    post,
    path = "/api/v1/assignments/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    responses(
        (status = 200, description = "Assignment cancelled", body = Json<JobAssignment>),
        (status = 400, description = "Assignment already cancelled")
    )
)]
#[axum::debug_handler]
pub async fn cancel_assignment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Builder)?;
    let assignment = state.assignment_service.cancel(user_id, id).await?;
    Ok(Json(assignment))
}
