use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::user::UserRole;
use crate::AppState;

pub const LICENSE_KEY_HEADER: &str = "x-license-key";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| Error::Unauthorized("invalid_token".to_string()))
    }

    /// Fails with 403 unless the caller holds `role`.
    pub fn require_role(&self, role: UserRole) -> Result<Uuid> {
        if self.role != role {
            return Err(Error::Forbidden(format!(
                "Only {} accounts can perform this action",
                role.as_str()
            )));
        }
        self.user_id()
    }
}

fn reject(status: StatusCode, code: &str) -> Response {
    (status, Json(json!({ "error": code }))).into_response()
}

pub async fn require_bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return reject(StatusCode::UNAUTHORIZED, "missing_authorization");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return reject(StatusCode::UNAUTHORIZED, "bad_authorization");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return reject(StatusCode::UNAUTHORIZED, "unsupported_scheme");
    };

    match state.jwt.verify(token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(_) => reject(StatusCode::UNAUTHORIZED, "invalid_token"),
    }
}

/// Gates master-data endpoints behind the static license key header.
pub async fn require_license_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let provided = req
        .headers()
        .get(LICENSE_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let matches: bool = provided
        .as_bytes()
        .ct_eq(state.license_key.as_bytes())
        .into();
    if provided.is_empty() || !matches {
        tracing::warn!("rejected request with missing or invalid license key");
        return reject(StatusCode::UNAUTHORIZED, "invalid_license_key");
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: UserRole) -> Claims {
        Claims {
            sub: Uuid::new_v4().to_string(),
            email: "x@y.z".into(),
            role,
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn require_role_rejects_other_roles() {
        let err = claims(UserRole::Labour)
            .require_role(UserRole::Builder)
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
        assert!(claims(UserRole::Builder).require_role(UserRole::Builder).is_ok());
    }

    #[test]
    fn malformed_subject_is_unauthorized() {
        let mut c = claims(UserRole::Labour);
        c.sub = "not-a-uuid".into();
        assert!(matches!(c.user_id(), Err(Error::Unauthorized(_))));
    }
}
