/// Post handlers - HTTP endpoints for post operations
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use super::multipart::read_post_form;
use crate::error::Result;
use crate::middleware::{AdminUser, AuthUser};
use crate::models::MessageResponse;
use crate::services::PostService;
use crate::AppState;

fn service(state: &AppState) -> PostService {
    PostService::new(state.store.clone(), state.media.clone())
}

/// Create a post from a multipart form (admin only)
pub async fn create_post(
    state: web::Data<AppState>,
    admin: AdminUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form = read_post_form(payload, &state.upload_limits).await?;
    let post = service(&state).create_post(&admin.0, form).await?;
    Ok(HttpResponse::Created().json(post))
}

/// List all posts, newest first
pub async fn list_posts(state: web::Data<AppState>) -> Result<HttpResponse> {
    let posts = service(&state).list_posts().await?;
    Ok(HttpResponse::Ok().json(posts))
}

pub async fn get_post(state: web::Data<AppState>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let post = service(&state).get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Update a post and reconcile its media (admin author only)
pub async fn update_post(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form = read_post_form(payload, &state.upload_limits).await?;
    let post = service(&state)
        .update_post(&admin.0, path.into_inner(), form)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post (admin author only)
pub async fn delete_post(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    service(&state)
        .delete_post(&admin.0, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post removed")))
}

/// Users who liked a post
pub async fn list_likers(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let likers = service(&state).list_likers(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(likers))
}
