/// Auth service - registration, login and profile lookup
use crypto_core::{hash_password, jwt, verify_password};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::db::BlogStore;
use crate::error::{AppError, Result};
use crate::models::{AuthResponse, LoginRequest, NewUser, RegisterRequest, User, UserView};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService {
    store: Arc<dyn BlogStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self { store }
    }

    /// Create an account and issue a token. The role defaults to `user`.
    pub async fn register(&self, mut req: RegisterRequest) -> Result<AuthResponse> {
        req.name = req.name.trim().to_string();
        req.email = req.email.trim().to_lowercase();
        req.validate()?;

        if self.store.find_user_by_email(&req.email).await?.is_some() {
            return Err(AppError::BadRequest("User already exists".into()));
        }

        let password_hash = hash_password(&req.password)?;
        let new_user = NewUser {
            name: req.name,
            email: req.email,
            password_hash,
            role: req.role.unwrap_or_default(),
        };

        // A concurrent registration can still win the unique constraint
        let user = self
            .store
            .create_user(new_user)
            .await?
            .ok_or_else(|| AppError::BadRequest("User already exists".into()))?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        issue(&user)
    }

    pub async fn login(&self, mut req: LoginRequest) -> Result<AuthResponse> {
        req.email = req.email.trim().to_lowercase();
        req.validate()
            .map_err(|_| AppError::Unauthorized(INVALID_CREDENTIALS.into()))?;

        let user = self
            .store
            .find_user_by_email(&req.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.into()))?;

        if !verify_password(&req.password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        tracing::info!(user_id = %user.id, "User logged in");
        issue(&user)
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserView> {
        self.store
            .find_user_by_id(user_id)
            .await?
            .map(|u| UserView::from(&u))
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }
}

fn issue(user: &User) -> Result<AuthResponse> {
    let token = jwt::generate_access_token(user.id, &user.email, &user.name, user.role.as_str())?;
    Ok(AuthResponse {
        token,
        user: UserView::from(user),
    })
}
