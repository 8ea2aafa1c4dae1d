/// Comment handlers
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{CreateCommentRequest, MessageResponse};
use crate::services::CommentService;
use crate::AppState;

pub async fn create_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let service = CommentService::new(state.store.clone());
    let comment = service.create_comment(&user, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(comment))
}

/// Comments on a post, newest first
pub async fn list_post_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = CommentService::new(state.store.clone());
    let comments = service.list_for_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comments))
}

pub async fn delete_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = CommentService::new(state.store.clone());
    service.delete_comment(&user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Comment removed")))
}
