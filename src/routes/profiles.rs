use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::profile_dto::{
        CreateBuilderProfilePayload, CreateLabourProfilePayload, UpdateBuilderProfilePayload,
        UpdateLabourProfilePayload,
    },
    error::Result,
    middleware::auth::Claims,
    models::user::UserRole,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/v1/profiles/builder",
    request_body = CreateBuilderProfilePayload,
    responses(
        (status = 201, description = "Builder profile created", body = Json<BuilderProfile>),
        (status = 403, description = "Caller is not a builder"),
        (status = 409, description = "Builder profile already exists")
    )
)]
#[axum::debug_handler]
pub async fn create_builder_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateBuilderProfilePayload>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Builder)?;
    payload.validate()?;
    let profile = state.profile_service.create_builder(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

#[utoipa::path(
    get,
    path = "/api/v1/profiles/builder/me",
    responses(
        (status = 200, description = "Own builder profile", body = Json<BuilderProfile>),
        (status = 404, description = "No builder profile yet")
    )
)]
#[axum::debug_handler]
pub async fn get_my_builder_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Builder)?;
    let profile = state.profile_service.builder_for_user(user_id).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    put,
    path = "/api/v1/profiles/builder/me",
    request_body = UpdateBuilderProfilePayload,
    responses(
        (status = 200, description = "Builder profile updated", body = Json<BuilderProfile>),
        (status = 404, description = "No builder profile yet")
    )
)]
#[axum::debug_handler]
pub async fn update_my_builder_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateBuilderProfilePayload>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Builder)?;
    payload.validate()?;
    let profile = state.profile_service.update_builder(user_id, payload).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    post,
    path = "/api/v1/profiles/labour",
    request_body = CreateLabourProfilePayload,
    responses(
        (status = 201, description = "Labour profile created", body = Json<LabourProfileDetails>),
        (status = 400, description = "Unknown license, skill or experience level"),
        (status = 409, description = "Labour profile already exists")
    )
)]
#[axum::debug_handler]
pub async fn create_labour_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateLabourProfilePayload>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Labour)?;
    payload.validate()?;
    let profile = state.profile_service.create_labour(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

#[utoipa::path(
    get,
    path = "/api/v1/profiles/labour/me",
    responses(
        (status = 200, description = "Own labour profile", body = Json<LabourProfileDetails>),
        (status = 404, description = "No labour profile yet")
    )
)]
#[axum::debug_handler]
pub async fn get_my_labour_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Labour)?;
    let profile = state.profile_service.labour_for_user(user_id).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    put,
    path = "/api/v1/profiles/labour/me",
    request_body = UpdateLabourProfilePayload,
    responses(
        (status = 200, description = "Labour profile updated", body = Json<LabourProfile>),
        (status = 404, description = "No labour profile yet")
    )
)]
#[axum::debug_handler]
pub async fn update_my_labour_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateLabourProfilePayload>,
) -> Result<impl IntoResponse> {
    let user_id = claims.require_role(UserRole::Labour)?;
    payload.validate()?;
    let profile = state.profile_service.update_labour(user_id, payload).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    get,
    path = "/api/v1/profiles/labour/{id}",
    params(
        ("id" = Uuid, Path, description = "Labour profile ID")
    ),
    responses(
        (status = 200, description = "Labour profile", body = Json<LabourProfileDetails>),
        (status = 404, description = "Labour profile not found")
    )
)]
#[axum::debug_handler]
pub async fn get_labour_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let profile = state.profile_service.labour_by_id(id).await?;
    Ok(Json(profile))
}
