use std::sync::Arc;
use uuid::Uuid;

use crate::dto::auth_dto::{AuthResponse, LoginPayload, RegisterPayload, UserResponse};
use crate::error::{Error, Result};
use crate::models::user::{NewUser, User, UserRole, UserStatus};
use crate::repositories::UserRepository;
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::token::JwtKeys;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: JwtKeys,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtKeys) -> Self {
        Self { users, jwt }
    }

    fn session(&self, user: User) -> Result<AuthResponse> {
        let (token, expires_at) = self.jwt.issue(&user)?;
        Ok(AuthResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_at,
            user: UserResponse::from(user),
        })
    }

    /// Self-service signup for builder and labour accounts.
    pub async fn register(&self, payload: RegisterPayload) -> Result<AuthResponse> {
        if payload.role == UserRole::Admin {
            return Err(Error::BadRequest(
                "Role must be builder or labour".to_string(),
            ));
        }

        let password_hash = hash_password(&payload.password)?;
        let user = self
            .users
            .create(NewUser {
                email: normalize_email(&payload.email),
                password_hash,
                full_name: payload.full_name.trim().to_string(),
                phone: payload.phone,
                role: payload.role,
            })
            .await?
            .ok_or_else(|| Error::Conflict("User with this email already exists".to_string()))?;

        tracing::info!(user_id = %user.id, role = user.role.as_str(), "user registered");
        self.session(user)
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<AuthResponse> {
        let Some(user) = self
            .users
            .find_by_email(&normalize_email(&payload.email))
            .await?
        else {
            return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(&payload.password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "login failed: wrong password");
            return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
        if user.status != UserStatus::Active {
            return Err(Error::Forbidden("Account is not active".to_string()));
        }

        self.session(user)
    }

    pub async fn me(&self, user_id: Uuid) -> Result<UserResponse> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::mocks::MockStore;
    use crate::repositories::MockUserRepository;

    fn register_payload(email: &str, role: UserRole) -> RegisterPayload {
        RegisterPayload {
            email: email.to_string(),
            password: "correct horse battery".to_string(),
            full_name: "Alex Carpenter".to_string(),
            phone: None,
            role,
        }
    }

    fn login(email: &str, password: &str) -> LoginPayload {
        LoginPayload {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let svc = AuthService::new(Arc::new(MockStore::new()), JwtKeys::new("secret", 24));
        let registered = svc
            .register(register_payload("Alex@Example.com ", UserRole::Labour))
            .await
            .unwrap();
        assert_eq!(registered.user.email, "alex@example.com");
        assert_eq!(registered.token_type, "Bearer");

        let session = svc
            .login(login("alex@example.com", "correct horse battery"))
            .await
            .unwrap();
        assert_eq!(session.user.id, registered.user.id);

        let me = svc.me(registered.user.id).await.unwrap();
        assert_eq!(me.role, UserRole::Labour);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let svc = AuthService::new(Arc::new(MockStore::new()), JwtKeys::new("secret", 24));
        svc.register(register_payload("a@b.co", UserRole::Builder))
            .await
            .unwrap();
        let err = svc
            .register(register_payload("A@B.co", UserRole::Labour))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn admin_signup_is_rejected() {
        let mut users = MockUserRepository::new();
        users.expect_create().never();
        let svc = AuthService::new(Arc::new(users), JwtKeys::new("secret", 24));
        let err = svc
            .register(register_payload("root@b.co", UserRole::Admin))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let svc = AuthService::new(Arc::new(MockStore::new()), JwtKeys::new("secret", 24));
        svc.register(register_payload("a@b.co", UserRole::Builder))
            .await
            .unwrap();

        for attempt in [login("a@b.co", "nope"), login("ghost@b.co", "nope")] {
            let err = svc.login(attempt).await.unwrap_err();
            assert!(matches!(err, Error::Unauthorized(msg) if msg == INVALID_CREDENTIALS));
        }
    }

    #[tokio::test]
    async fn suspended_account_cannot_log_in() {
        let store = Arc::new(MockStore::new());
        let svc = AuthService::new(store.clone(), JwtKeys::new("secret", 24));
        let registered = svc
            .register(register_payload("a@b.co", UserRole::Labour))
            .await
            .unwrap();
        store
            .set_user_status(registered.user.id, UserStatus::Suspended)
            .await;

        let err = svc
            .login(login("a@b.co", "correct horse battery"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(msg) if msg == "Account is not active"));
    }
}
