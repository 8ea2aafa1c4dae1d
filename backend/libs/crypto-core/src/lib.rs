//! Shared credential helpers for the blog backend.
//!
//! - `jwt`: bearer token issuance and validation
//! - `password`: Argon2id password hashing and verification
pub mod jwt;
pub mod password;

pub use password::{hash_password, verify_password, PasswordError};
