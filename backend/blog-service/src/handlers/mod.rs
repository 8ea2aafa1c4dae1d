/// HTTP handlers
pub mod auth;
pub mod comments;
pub mod health;
pub mod likes;
pub mod multipart;
pub mod posts;
