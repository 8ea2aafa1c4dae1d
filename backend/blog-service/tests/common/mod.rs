#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use blog_service::db::MemoryStore;
use blog_service::media::MediaStorage;
use blog_service::{AppState, UploadLimits};

pub const BOUNDARY: &str = "----blogtestboundary7MA4YWxk";

/// Build the full application around the given state
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.clone())
                .wrap(blog_service::middleware::AuthGate)
                .configure(blog_service::routes::configure)
                .service(blog_service::routes::uploads(&$state.media)),
        )
        .await
    };
}

pub fn init_jwt() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = crypto_core::jwt::initialize_jwt_secret("blog-service-integration-secret", 1);
    });
}

pub fn memory_state(upload_dir: &Path) -> web::Data<AppState> {
    init_jwt();
    web::Data::new(AppState::new(
        Arc::new(MemoryStore::new()),
        MediaStorage::new(upload_dir, "/uploads"),
        UploadLimits {
            max_files: 5,
            max_file_size_bytes: 1024 * 1024,
        },
    ))
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Register through the API and return `(token, user_id)`
pub async fn register_user<S, B>(app: &S, name: &str, email: &str, role: &str) -> (String, Uuid)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": name,
            "email": email,
            "password": "secret123",
            "role": role,
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().expect("token").to_string();
    let id = body["user"]["id"]
        .as_str()
        .expect("user id")
        .parse()
        .expect("uuid");
    (token, id)
}

/// A file part for `multipart_body`
pub struct FilePart<'a> {
    pub field: &'a str,
    pub filename: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
}

impl<'a> FilePart<'a> {
    pub fn media(filename: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self {
            field: "media",
            filename,
            content_type,
            data,
        }
    }
}

/// Encode text fields and files as a multipart/form-data body
pub fn multipart_body(fields: &[(&str, &str)], files: &[FilePart<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    for file in files {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                file.field, file.filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
        body.extend_from_slice(file.data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

/// Send a multipart request with a bearer token
pub async fn send_form<S, B>(
    app: &S,
    req: test::TestRequest,
    token: &str,
    fields: &[(&str, &str)],
    files: &[FilePart<'_>],
) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (content_type, body) = multipart_body(fields, files);
    let req = req
        .insert_header(bearer(token))
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    test::call_service(app, req).await
}

/// Number of files currently in the upload directory
pub fn stored_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
