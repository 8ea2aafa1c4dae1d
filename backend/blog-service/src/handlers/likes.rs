/// Like handlers
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::services::LikeService;
use crate::AppState;

pub async fn like_post(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = LikeService::new(state.store.clone());
    let response = service.like(&user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn unlike_post(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = LikeService::new(state.store.clone());
    let response = service.unlike(&user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
