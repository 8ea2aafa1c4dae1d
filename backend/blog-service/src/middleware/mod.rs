/// HTTP middleware for the blog service
///
/// `AuthGate` verifies an optional bearer token and resolves the caller.
/// Handlers declare what they need through the `AuthUser` and `AdminUser`
/// extractors.
pub mod permissions;

pub use permissions::*;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use crypto_core::jwt;
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{User, UserRole};
use crate::AppState;

/// Authenticated caller, stored in request extensions by `AuthGate`
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Authenticated caller holding the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

/// Optional bearer authentication.
///
/// Requests without an `Authorization` header pass through anonymously. A
/// header that is malformed, carries an invalid or expired token, or names a
/// user that no longer exists is rejected with 401.
pub struct AuthGate;

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthGateService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let header = req
                .headers()
                .get("Authorization")
                .map(|h| h.to_str().map(str::to_owned));

            if let Some(header) = header {
                let authenticated = match header {
                    Ok(value) => authenticate(&req, &value).await,
                    Err(_) => Err(AppError::Unauthorized("Not authorized, token failed".into())),
                };

                match authenticated {
                    Ok(user) => {
                        req.extensions_mut().insert(user);
                    }
                    Err(e) => return Ok(req.error_response(e).map_into_right_body()),
                }
            }

            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

async fn authenticate(req: &ServiceRequest, header: &str) -> Result<AuthUser, AppError> {
    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Not authorized, token failed".into()))?;

    let user_id = jwt::get_user_id_from_token(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        AppError::Unauthorized("Not authorized, token failed".into())
    })?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("application state not configured".into()))?;

    let user = state
        .store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Not authorized, user not found".into()))?;

    Ok(AuthUser::from(&user))
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| AppError::Unauthorized("Not authorized, no token".into()).into()),
        )
    }
}

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = match req.extensions().get::<AuthUser>() {
            None => Err(AppError::Unauthorized("Not authorized, no token".into())),
            Some(user) if user.role.is_admin() => Ok(AdminUser(user.clone())),
            Some(_) => Err(AppError::Forbidden("Not authorized as an admin".into())),
        };
        ready(result.map_err(Error::from))
    }
}
