//! Endpoint contract tests for the validation and authentication paths.
//!
//! These run against a fully wired app with a lazily connected MongoDB
//! client; every asserted path rejects the request before any database
//! query is issued.

use actix_web::{test, web, App};
use bson::oid::ObjectId;
use serde_json::{json, Value};

use blog_service::config::{
    AppConfig, Config, DatabaseConfig, EmailConfig, JwtConfig, RateLimitConfig,
};
use blog_service::routes;
use blog_service::security::jwt;
use blog_service::services::EmailService;

const TEST_SECRET: &str = "http-validation-test-secret";

fn test_config() -> Config {
    Config {
        app: AppConfig {
            env: "test".into(),
            host: "127.0.0.1".into(),
            port: 0,
            url: "http://localhost:8080".into(),
        },
        database: DatabaseConfig {
            uri: "mongodb://127.0.0.1:27017".into(),
            db_name: "blog_service_test".into(),
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.into(),
            token_ttl_secs: 3600,
        },
        email: EmailConfig {
            smtp_host: "localhost".into(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            smtp_from: "noreply@blogservice.dev".into(),
        },
        rate_limit: RateLimitConfig {
            max_requests: 200,
            window_secs: 900,
        },
    }
}

/// The driver connects on first operation, so the handle builds without
/// a running MongoDB
async fn test_database() -> mongodb::Database {
    let client = mongodb::Client::with_uri_str(
        "mongodb://127.0.0.1:27017/?serverSelectionTimeoutMS=200&connectTimeoutMS=200",
    )
    .await
    .expect("lazy mongo client");
    client.database("blog_service_test")
}

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(test_database().await))
                .app_data(web::Data::new(test_config()))
                .app_data(web::Data::new(EmailService::new(
                    test_config().email,
                    test_config().app.url,
                )))
                .service(routes::api(TEST_SECRET)),
        )
        .await
    };
}

fn multipart_body(fields: &[(&str, &str)]) -> (String, String) {
    let boundary = "test-boundary";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    (
        format!("multipart/form-data; boundary={boundary}"),
        body,
    )
}

#[actix_web::test]
async fn register_with_invalid_email_returns_400() {
    let app = test_app!();

    let (content_type, body) = multipart_body(&[
        ("name", "Ada"),
        ("email", "not-an-email"),
        ("password", "secret"),
    ]);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("must be a valid email"));
}

#[actix_web::test]
async fn register_with_missing_field_returns_400() {
    let app = test_app!();

    let (content_type, body) =
        multipart_body(&[("email", "user@example.com"), ("password", "secret")]);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], json!("name: is required"));
}

#[actix_web::test]
async fn login_with_invalid_email_returns_400() {
    let app = test_app!();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": "nope", "password": "secret" }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn get_blog_with_malformed_id_returns_400() {
    let app = test_app!();

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/blogs/not-a-valid-id")
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], json!("Invalid blog ID"));
}

#[actix_web::test]
async fn get_comments_with_malformed_id_returns_400() {
    let app = test_app!();

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/blogs/zzz/comments")
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

/// Render a middleware rejection into the response the client would see
async fn unauthorized_body(err: actix_web::Error) -> (actix_web::http::StatusCode, Value) {
    let resp = actix_web::HttpResponse::from_error(err);
    let status = resp.status();
    let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[actix_web::test]
async fn create_blog_without_token_returns_401() {
    let app = test_app!();

    let (content_type, body) =
        multipart_body(&[("title", "First"), ("description", "Body text")]);

    let resp = test::try_call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/blogs")
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;

    let err = resp.expect_err("request without token must be rejected");
    let (status, body) = unauthorized_body(err).await;
    assert_eq!(status, actix_web::http::StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["message"],
        json!("UnAuthorized. Access denied. No token provided.")
    );
}

#[actix_web::test]
async fn liked_blogs_without_token_returns_401() {
    let app = test_app!();

    let resp = test::try_call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/blogs/liked")
            .to_request(),
    )
    .await;

    let err = resp.expect_err("request without token must be rejected");
    let (status, body) = unauthorized_body(err).await;
    assert_eq!(status, actix_web::http::StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        json!("UnAuthorized. Access denied. No token provided.")
    );
}

#[actix_web::test]
async fn like_with_garbage_token_returns_401() {
    let app = test_app!();

    let blog_id = ObjectId::new().to_hex();
    let resp = test::try_call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/blogs/{}/like", blog_id))
            .insert_header(("Authorization", "Bearer not.a.token"))
            .to_request(),
    )
    .await;

    let err = resp.expect_err("garbage token must be rejected");
    let (status, body) = unauthorized_body(err).await;
    assert_eq!(status, actix_web::http::StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("UnAuthorized. Invalid token."));
}

#[actix_web::test]
async fn like_with_valid_token_but_malformed_blog_id_returns_400() {
    let app = test_app!();

    let token = jwt::generate_token(ObjectId::new(), TEST_SECRET, 3600).unwrap();
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/blogs/not-an-id/like")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], json!("Invalid blog ID"));
}

#[actix_web::test]
async fn comment_with_valid_token_but_malformed_blog_id_returns_400() {
    let app = test_app!();

    let token = jwt::generate_token(ObjectId::new(), TEST_SECRET, 3600).unwrap();
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/blogs/not-an-id/comments")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(json!({ "content": "nice post" }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn get_author_with_malformed_id_returns_400() {
    let app = test_app!();

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/authors/not-an-id")
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], json!("Invalid author ID"));
}
