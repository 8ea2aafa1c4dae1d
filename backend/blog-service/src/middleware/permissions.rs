/// Authorization checks for posts and comments
///
/// Posts may only be modified by their author. Comments may be deleted by
/// their author or by any admin.
use uuid::Uuid;

use super::AuthUser;
use crate::error::AppError;
use crate::models::{Comment, Post};

pub type PermissionResult = Result<(), AppError>;

pub fn check_post_ownership(user_id: Uuid, post: &Post) -> PermissionResult {
    if post.author_id == user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Not authorized to modify this post".to_string(),
        ))
    }
}

pub fn check_comment_deletion(user: &AuthUser, comment: &Comment) -> PermissionResult {
    if comment.author_id == user.id || user.role.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Not authorized to delete this comment".to_string(),
        ))
    }
}
