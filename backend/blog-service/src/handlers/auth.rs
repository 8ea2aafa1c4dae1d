/// Auth handlers - register, login, profile
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{LoginRequest, RegisterRequest};
use crate::services::AuthService;
use crate::AppState;

/// Register a new account
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let service = AuthService::new(state.store.clone());
    let response = service.register(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

/// Exchange credentials for a token
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let service = AuthService::new(state.store.clone());
    let response = service.login(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Current user's profile
pub async fn profile(state: web::Data<AppState>, user: AuthUser) -> Result<HttpResponse> {
    let service = AuthService::new(state.store.clone());
    let profile = service.profile(user.id).await?;
    Ok(HttpResponse::Ok().json(profile))
}
