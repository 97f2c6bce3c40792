pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod utils;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
    Extension, Router,
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::middleware::{
    auth::{require_bearer_auth, require_license_key},
    cors::api_cors,
    rate_limit::{new_rps_state, rps_middleware},
};
use crate::models::master_data::MasterDataKind;
use crate::repositories::Repositories;
use crate::services::{
    application_service::ApplicationService, assignment_service::AssignmentService,
    auth_service::AuthService, job_service::JobService,
    job_validation_service::JobValidationService, jobsite_service::JobsiteService,
    master_data_service::MasterDataService, profile_service::ProfileService,
};
use crate::utils::token::JwtKeys;

const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub jwt: JwtKeys,
    pub license_key: String,
    pub auth_service: AuthService,
    pub profile_service: ProfileService,
    pub master_data_service: MasterDataService,
    pub jobsite_service: JobsiteService,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub assignment_service: AssignmentService,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self::with_repositories(Repositories::postgres(pool), config)
    }

    pub fn with_repositories(repos: Repositories, config: &Config) -> Self {
        let jwt = JwtKeys::new(&config.jwt_secret, config.jwt_expiry_hours);

        let master_data_service = MasterDataService::new(repos.master_data.clone());
        let validation = JobValidationService::new(
            repos.builder_profiles.clone(),
            repos.jobsites.clone(),
            master_data_service.clone(),
        );

        Self {
            auth_service: AuthService::new(repos.users.clone(), jwt.clone()),
            profile_service: ProfileService::new(
                repos.builder_profiles.clone(),
                repos.labour_profiles.clone(),
                master_data_service.clone(),
            ),
            jobsite_service: JobsiteService::new(
                repos.jobsites.clone(),
                repos.builder_profiles.clone(),
            ),
            job_service: JobService::new(
                repos.jobs.clone(),
                repos.builder_profiles.clone(),
                validation,
            ),
            application_service: ApplicationService::new(
                repos.applications.clone(),
                repos.jobs.clone(),
                repos.builder_profiles.clone(),
            ),
            assignment_service: AssignmentService::new(
                repos.assignments.clone(),
                repos.applications.clone(),
                repos.jobs.clone(),
                repos.builder_profiles.clone(),
            ),
            master_data_service,
            jwt,
            license_key: config.license_key.clone(),
        }
    }
}

/// Full HTTP surface: `/health` plus the versioned API under `/api/v1`.
pub fn build_router(state: AppState, rate_limit_rps: u32) -> Router {
    let public_api = Router::new()
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login));

    let mut master_data_api = Router::new();
    for kind in MasterDataKind::ALL {
        let collection = format!("/{}", kind.path_segment());
        master_data_api = master_data_api
            .route(
                &collection,
                get(routes::master_data::list_items).layer(Extension(kind)),
            )
            .route(
                &format!("{}/:id", collection),
                get(routes::master_data::get_item).layer(Extension(kind)),
            );
    }
    let master_data_api = master_data_api.route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        require_license_key,
    ));

    let authed_api = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .route(
            "/profiles/builder",
            post(routes::profiles::create_builder_profile),
        )
        .route(
            "/profiles/builder/me",
            get(routes::profiles::get_my_builder_profile)
                .put(routes::profiles::update_my_builder_profile),
        )
        .route(
            "/profiles/labour",
            post(routes::profiles::create_labour_profile),
        )
        .route(
            "/profiles/labour/me",
            get(routes::profiles::get_my_labour_profile)
                .put(routes::profiles::update_my_labour_profile),
        )
        .route(
            "/profiles/labour/:id",
            get(routes::profiles::get_labour_profile),
        )
        .route(
            "/jobsites",
            get(routes::jobsites::list_jobsites).post(routes::jobsites::create_jobsite),
        )
        .route(
            "/jobsites/:id",
            get(routes::jobsites::get_jobsite)
                .put(routes::jobsites::update_jobsite)
                .delete(routes::jobsites::delete_jobsite),
        )
        .route(
            "/jobs",
            get(routes::jobs::list_jobs).post(routes::jobs::create_job),
        )
        .route("/jobs/mine", get(routes::jobs::list_my_jobs))
        .route(
            "/jobs/:id",
            get(routes::jobs::get_job)
                .put(routes::jobs::replace_job)
                .delete(routes::jobs::delete_job),
        )
        .route("/jobs/:id/status", patch(routes::jobs::update_job_status))
        .route(
            "/applications",
            get(routes::applications::list_job_applications)
                .post(routes::applications::create_application),
        )
        .route(
            "/applications/mine",
            get(routes::applications::list_my_applications),
        )
        .route(
            "/applications/:id",
            get(routes::applications::get_application),
        )
        .route(
            "/applications/:id/status",
            put(routes::applications::update_application_status),
        )
        .route(
            "/applications/:id/withdraw",
            post(routes::applications::withdraw_application),
        )
        .route(
            "/assignments",
            get(routes::assignments::list_job_assignments)
                .post(routes::assignments::create_assignment),
        )
        .route(
            "/assignments/mine",
            get(routes::assignments::list_my_assignments),
        )
        .route(
            "/assignments/:id",
            get(routes::assignments::get_assignment),
        )
        .route(
            "/assignments/:id/complete",
            post(routes::assignments::complete_assignment),
        )
        .route(
            "/assignments/:id/cancel",
            post(routes::assignments::cancel_assignment),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_bearer_auth,
        ));

    let api = public_api
        .merge(master_data_api)
        .merge(authed_api)
        .layer(axum::middleware::from_fn_with_state(
            new_rps_state(rate_limit_rps),
            rps_middleware,
        ));

    Router::new()
        .route("/health", get(routes::health::health))
        .nest("/api/v1", api)
        .with_state(state)
        .layer(api_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
