#[macro_use]
mod common;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{bearer, memory_state, register_user, send_form};

async fn create_post<S, B>(app: &S, token: &str, title: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = send_form(
        app,
        test::TestRequest::post().uri("/api/posts"),
        token,
        &[("title", title), ("content", "Body")],
        &[],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let post: Value = test::read_body_json(resp).await;
    post["id"].as_str().unwrap().to_string()
}

async fn comment<S, B>(app: &S, token: &str, post_id: &str, content: &str) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/comments")
        .insert_header(bearer(token))
        .set_json(json!({ "content": content, "postId": post_id }))
        .to_request();
    test::call_service(app, req).await
}

#[actix_web::test]
async fn test_comments_listed_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let state = memory_state(dir.path());
    let app = test_app!(state);

    let (admin, _) = register_user(&app, "Admin", "admin@example.com", "admin").await;
    let (reader, reader_id) = register_user(&app, "Reader", "reader@example.com", "user").await;
    let post_id = create_post(&app, &admin, "Discuss").await;

    let resp = comment(&app, &reader, &post_id, "first").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["content"], "first");
    assert_eq!(created["author"]["id"], reader_id.to_string());
    assert_eq!(created["author"]["name"], "Reader");

    let resp = comment(&app, &admin, &post_id, "second").await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/comments/post/{}", post_id))
        .to_request();
    let comments: Value = test::call_and_read_body_json(&app, req).await;
    let comments = comments.as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["content"], "second");
    assert_eq!(comments[1]["content"], "first");

    // Embedded in the post view as well
    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}", post_id))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(post["comments"].as_array().unwrap().len(), 2);
    assert_eq!(post["comments"][0]["content"], "second");
}

#[actix_web::test]
async fn test_comment_validation() {
    let dir = tempfile::tempdir().unwrap();
    let state = memory_state(dir.path());
    let app = test_app!(state);

    let (admin, _) = register_user(&app, "Admin", "admin@example.com", "admin").await;
    let post_id = create_post(&app, &admin, "Discuss").await;

    let resp = comment(&app, &admin, &post_id, "   ").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/comments")
        .insert_header(bearer(&admin))
        .set_json(json!({ "content": "orphan" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Post ID is required");

    let resp = comment(&app, &admin, &Uuid::new_v4().to_string(), "lost").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Anonymous callers cannot comment
    let req = test::TestRequest::post()
        .uri("/api/comments")
        .set_json(json!({ "content": "hi", "postId": post_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_comment_deletion_permissions() {
    let dir = tempfile::tempdir().unwrap();
    let state = memory_state(dir.path());
    let app = test_app!(state);

    let (admin, _) = register_user(&app, "Admin", "admin@example.com", "admin").await;
    let (alice, _) = register_user(&app, "Alice", "alice@example.com", "user").await;
    let (bob, _) = register_user(&app, "Bob", "bob@example.com", "user").await;
    let post_id = create_post(&app, &admin, "Discuss").await;

    let resp = comment(&app, &alice, &post_id, "alice says").await;
    let first: Value = test::read_body_json(resp).await;
    let resp = comment(&app, &alice, &post_id, "alice again").await;
    let second: Value = test::read_body_json(resp).await;

    let delete = |token: &str, id: &Value| {
        test::TestRequest::delete()
            .uri(&format!("/api/comments/{}", id.as_str().unwrap()))
            .insert_header(bearer(token))
            .to_request()
    };

    let resp = test::call_service(&app, delete(&bob, &first["id"])).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(&app, delete(&alice, &first["id"])).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Comment removed");

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}", post_id))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let remaining = post["comments"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["id"], second["id"]);

    let resp = test::call_service(&app, delete(&admin, &second["id"])).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, delete(&admin, &second["id"])).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/comments/post/{}", post_id))
        .to_request();
    let comments: Value = test::call_and_read_body_json(&app, req).await;
    assert!(comments.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_post_delete_removes_comments() {
    let dir = tempfile::tempdir().unwrap();
    let state = memory_state(dir.path());
    let app = test_app!(state);

    let (admin, _) = register_user(&app, "Admin", "admin@example.com", "admin").await;
    let post_id = create_post(&app, &admin, "Short lived").await;

    let resp = comment(&app, &admin, &post_id, "soon gone").await;
    let created: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{}", post_id))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/comments/post/{}", post_id))
        .to_request();
    let comments: Value = test::call_and_read_body_json(&app, req).await;
    assert!(comments.as_array().unwrap().is_empty());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/comments/{}", created["id"].as_str().unwrap()))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_like_lifecycle_and_likers() {
    let dir = tempfile::tempdir().unwrap();
    let state = memory_state(dir.path());
    let app = test_app!(state);

    let (admin, _) = register_user(&app, "Admin", "admin@example.com", "admin").await;
    let (alice, alice_id) = register_user(&app, "Alice", "alice@example.com", "user").await;
    let (bob, bob_id) = register_user(&app, "Bob", "bob@example.com", "user").await;
    let post_id = create_post(&app, &admin, "Likeable").await;
    let uri = format!("/api/likes/{}", post_id);

    let like = |token: &str| {
        test::TestRequest::post()
            .uri(&uri)
            .insert_header(bearer(token))
            .to_request()
    };
    let unlike = |token: &str| {
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(token))
            .to_request()
    };

    let resp = test::call_service(&app, like(&alice)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Post liked");
    assert_eq!(body["likes"], json!([alice_id.to_string()]));

    let resp = test::call_service(&app, like(&alice)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Post already liked");

    let resp = test::call_service(&app, like(&bob)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}/likes", post_id))
        .insert_header(bearer(&admin))
        .to_request();
    let likers: Value = test::call_and_read_body_json(&app, req).await;
    let likers = likers.as_array().unwrap();
    assert_eq!(likers.len(), 2);
    assert_eq!(likers[0]["id"], alice_id.to_string());
    assert_eq!(likers[1]["id"], bob_id.to_string());
    assert_eq!(likers[1]["name"], "Bob");

    let resp = test::call_service(&app, unlike(&alice)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Post unliked");
    assert_eq!(body["likes"], json!([bob_id.to_string()]));

    let resp = test::call_service(&app, unlike(&alice)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Post has not yet been liked");
}

#[actix_web::test]
async fn test_like_requires_auth_and_existing_post() {
    let dir = tempfile::tempdir().unwrap();
    let state = memory_state(dir.path());
    let app = test_app!(state);

    let (alice, _) = register_user(&app, "Alice", "alice@example.com", "user").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/likes/{}", Uuid::new_v4()))
        .insert_header(bearer(&alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/api/likes/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}/likes", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
