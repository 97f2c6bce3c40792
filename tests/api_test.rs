use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use labour_marketplace::{
    build_router,
    config::{Config, LogFormat},
    models::master_data::MasterDataKind,
    repositories::{mocks::MockStore, Repositories},
    AppState,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

const LICENSE_KEY: &str = "test-license-key";

fn test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".into(),
        database_url: "postgres://unused".into(),
        jwt_secret: "test_secret_key".into(),
        jwt_expiry_hours: 1,
        license_key: LICENSE_KEY.into(),
        rate_limit_rps: 10_000,
        db_max_connections: 1,
        log_format: LogFormat::Text,
    }
}

struct TestApp {
    router: Router,
    store: Arc<MockStore>,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(MockStore::new());
        let config = test_config();
        let state = AppState::with_repositories(Repositories::from_store(store.clone()), &config);
        Self {
            router: build_router(state, config.rate_limit_rps),
            store,
        }
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<JsonValue>,
    ) -> (StatusCode, JsonValue) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        send(&self.router, req).await
    }

    async fn register(&self, email: &str, role: &str) -> String {
        let (status, body) = self
            .call(
                "POST",
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "email": email,
                    "password": "correct-horse-battery",
                    "full_name": "Test User",
                    "role": role
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Builder with a profile, a jobsite and one open job; labour account with a token.
struct Marketplace {
    app: TestApp,
    builder: String,
    labour: String,
    job_id: String,
}

async fn marketplace() -> Marketplace {
    let app = TestApp::new();
    let job_type = app
        .store
        .seed_master_item(MasterDataKind::JobType, "GENERAL_LABOUR", "General Labour")
        .await;

    let builder = app.register("site@builder.test", "builder").await;
    let labour = app.register("worker@labour.test", "labour").await;

    let (status, _) = app
        .call(
            "POST",
            "/api/v1/profiles/builder",
            Some(&builder),
            Some(json!({ "company_name": "Harbour Constructions" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, jobsite) = app
        .call(
            "POST",
            "/api/v1/jobsites",
            Some(&builder),
            Some(json!({ "name": "Level 3 fitout", "address": "1 George St, Sydney" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, job) = app
        .call(
            "POST",
            "/api/v1/jobs",
            Some(&builder),
            Some(job_body(jobsite["id"].as_str().unwrap(), &job_type.to_string())),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "job create failed: {}", job);
    assert_eq!(job["status"], "OPEN");

    Marketplace {
        job_id: job["id"].as_str().unwrap().to_string(),
        app,
        builder,
        labour,
    }
}

fn job_body(jobsite_id: &str, job_type_id: &str) -> JsonValue {
    json!({
        "jobsite_id": jobsite_id,
        "job_type_id": job_type_id,
        "title": "Labourers for concrete pour",
        "number_of_labourers": 2,
        "start_date": "2026-11-02",
        "end_date": "2026-11-06",
        "start_time": "07:00",
        "end_time": "15:30",
        "pay_rate": "42.50",
        "payment_type": "HOURLY"
    })
}

#[tokio::test]
async fn health_reports_service_name() {
    let app = TestApp::new();
    let (status, body) = app.call("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "labour-marketplace");
}

#[tokio::test]
async fn register_login_and_me() {
    let app = TestApp::new();
    let token = app.register("Mixed.Case@Example.com", "labour").await;

    let (status, me) = app.call("GET", "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "mixed.case@example.com");
    assert_eq!(me["role"], "labour");
    assert!(me.get("password_hash").is_none());

    let (status, login) = app
        .call(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "mixed.case@example.com", "password": "correct-horse-battery" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["token_type"], "Bearer");

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "mixed.case@example.com", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
}

#[tokio::test]
async fn duplicate_registration_conflicts_and_admin_is_refused() {
    let app = TestApp::new();
    app.register("dup@example.com", "builder").await;

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "email": "DUP@example.com",
                "password": "another-password",
                "full_name": "Dup",
                "role": "labour"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User with this email already exists");

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "email": "root@example.com",
                "password": "another-password",
                "full_name": "Root",
                "role": "admin"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Role must be builder or labour");
}

#[tokio::test]
async fn protected_routes_require_bearer_token() {
    let app = TestApp::new();
    let (status, body) = app.call("GET", "/api/v1/jobs", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing_authorization");

    let (status, body) = app
        .call("GET", "/api/v1/jobs", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn master_data_is_gated_by_license_key() {
    let app = TestApp::new();
    let license = app
        .store
        .seed_master_item(MasterDataKind::License, "WHITE_CARD", "White Card")
        .await;

    let (status, body) = app.call("GET", "/api/v1/licenses", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_license_key");

    let req = Request::builder()
        .uri("/api/v1/licenses")
        .header("x-license-key", "wrong-key")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app.router, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/api/v1/licenses")
        .header("x-license-key", LICENSE_KEY)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app.router, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["code"], "WHITE_CARD");

    let req = Request::builder()
        .uri(format!("/api/v1/licenses/{}", license))
        .header("x-license-key", LICENSE_KEY)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app.router, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "White Card");

    // the same id is not a skill
    let req = Request::builder()
        .uri(format!("/api/v1/skills/{}", license))
        .header("x-license-key", LICENSE_KEY)
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app.router, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn fixed_day_job_without_payment_day_is_rejected() {
    let m = marketplace().await;
    let (_, job) = m
        .app
        .call("GET", &format!("/api/v1/jobs/{}", m.job_id), Some(&m.labour), None)
        .await;

    let mut body = job_body(
        job["jobsite_id"].as_str().unwrap(),
        job["job_type_id"].as_str().unwrap(),
    );
    body["payment_type"] = json!("FIXED_DAY");

    let (status, resp) = m
        .app
        .call("POST", "/api/v1/jobs", Some(&m.builder), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp["error"],
        "payment day must be between 1 and 31 for FIXED_DAY payment type"
    );

    body["payment_day"] = json!(15);
    let (status, _) = m
        .app
        .call("POST", "/api/v1/jobs", Some(&m.builder), Some(body))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn labour_cannot_post_jobs() {
    let m = marketplace().await;
    let (status, _) = m
        .app
        .call(
            "POST",
            "/api/v1/jobs",
            Some(&m.labour),
            Some(job_body(
                "00000000-0000-0000-0000-000000000000",
                "00000000-0000-0000-0000-000000000000",
            )),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn job_listing_paginates_open_jobs() {
    let m = marketplace().await;
    let (status, body) = m
        .app
        .call("GET", "/api/v1/jobs?page=1&per_page=500", Some(&m.labour), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["per_page"], 100);
    assert_eq!(body["items"][0]["id"], m.job_id.as_str());

    let (status, body) = m
        .app
        .call("GET", "/api/v1/jobs?status=bogus", Some(&m.labour), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid job status");
}

#[tokio::test]
async fn second_application_to_same_job_conflicts() {
    let m = marketplace().await;
    let apply = json!({ "job_id": m.job_id, "cover_letter": "Available all week" });

    let (status, app) = m
        .app
        .call("POST", "/api/v1/applications", Some(&m.labour), Some(apply.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app["status"], "APPLIED");

    let (status, body) = m
        .app
        .call("POST", "/api/v1/applications", Some(&m.labour), Some(apply))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Application already exists for this job");
}

#[tokio::test]
async fn withdrawing_twice_is_a_bad_request() {
    let m = marketplace().await;
    let (_, app) = m
        .app
        .call(
            "POST",
            "/api/v1/applications",
            Some(&m.labour),
            Some(json!({ "job_id": m.job_id })),
        )
        .await;
    let uri = format!("/api/v1/applications/{}/withdraw", app["id"].as_str().unwrap());

    let (status, body) = m.app.call("POST", &uri, Some(&m.labour), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "WITHDRAWN");
    assert!(!body["withdrawn_at"].is_null());

    let (status, body) = m.app.call("POST", &uri, Some(&m.labour), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Application already withdrawn");
}

#[tokio::test]
async fn accepting_an_application_opens_an_assignment_that_can_be_completed() {
    let m = marketplace().await;
    let (_, app) = m
        .app
        .call(
            "POST",
            "/api/v1/applications",
            Some(&m.labour),
            Some(json!({ "job_id": m.job_id })),
        )
        .await;
    let app_id = app["id"].as_str().unwrap().to_string();

    // only the job owner can change the status
    let (status, _) = m
        .app
        .call(
            "PUT",
            &format!("/api/v1/applications/{}/status", app_id),
            Some(&m.labour),
            Some(json!({ "status": "ACCEPTED" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, accepted) = m
        .app
        .call(
            "PUT",
            &format!("/api/v1/applications/{}/status", app_id),
            Some(&m.builder),
            Some(json!({ "status": "ACCEPTED" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["application"]["status"], "ACCEPTED");
    assert_eq!(accepted["assignment"]["status"], "ACTIVE");
    let assignment_id = accepted["assignment"]["id"].as_str().unwrap().to_string();

    let (status, mine) = m
        .app
        .call("GET", "/api/v1/assignments/mine", Some(&m.labour), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let complete = format!("/api/v1/assignments/{}/complete", assignment_id);
    let (status, done) = m.app.call("POST", &complete, Some(&m.builder), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "COMPLETED");
    assert!(!done["end_date"].is_null());

    let (status, body) = m.app.call("POST", &complete, Some(&m.builder), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Assignment already completed");
}

#[tokio::test]
async fn unknown_application_status_is_rejected() {
    let m = marketplace().await;
    let (_, app) = m
        .app
        .call(
            "POST",
            "/api/v1/applications",
            Some(&m.labour),
            Some(json!({ "job_id": m.job_id })),
        )
        .await;

    let (status, body) = m
        .app
        .call(
            "PUT",
            &format!("/api/v1/applications/{}/status", app["id"].as_str().unwrap()),
            Some(&m.builder),
            Some(json!({ "status": "HIRED" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid application status");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a disposable PostgreSQL database"]
async fn postgres_register_and_list_master_data() {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL");
    let pool = labour_marketplace::database::pool::connect(&url, 2)
        .await
        .expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    let store = labour_marketplace::repositories::postgres::PgStore::new(pool.clone());
    labour_marketplace::database::seed::seed_all(&store)
        .await
        .expect("seed");

    let config = test_config();
    let router = build_router(AppState::new(pool, &config), config.rate_limit_rps);

    let email = format!("pg_{}@example.com", uuid::Uuid::new_v4());
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/register")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "email": email,
                "password": "correct-horse-battery",
                "full_name": "Pg User",
                "role": "builder"
            })
            .to_string(),
        ))
        .unwrap();
    let (status, _) = send(&router, req).await;
    assert_eq!(status, StatusCode::CREATED);

    let req = Request::builder()
        .uri("/api/v1/job-types")
        .header("x-license-key", LICENSE_KEY)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.as_array().unwrap().is_empty());
}
