use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::Value;
use tollgate_server::{AppConfig, build_app};
use tower::ServiceExt;

fn app() -> Router {
    build_app(&AppConfig::default()).expect("build app")
}

fn basic(id: &str, secret: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{id}:{secret}")))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}

fn token_request(query: &str, authorization: &str, form: &str) -> Request<Body> {
    Request::post(format!("/oauth/token?{query}"))
        .header(header::AUTHORIZATION, authorization)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

async fn password_token(app: &Router) -> Value {
    let (status, body) = send(
        app,
        token_request(
            "grant_type=password",
            &basic("clientId", "clientSecret"),
            "username=admin&password=123456",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["access_token"].clone()
}

#[tokio::test]
async fn health_reports_up() {
    let (status, body) = send(&app(), Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "status": true }));
}

#[tokio::test]
async fn password_grant_returns_signed_token() {
    let token = password_token(&app()).await;
    assert_eq!(token["token_type"], "signed");
    assert!(!token["token_value"].as_str().unwrap().is_empty());
    assert!(token["refresh_token"]["token_value"].is_string());
    assert!(token["expires_at"].is_string());
}

#[tokio::test]
async fn grant_type_alias_is_accepted() {
    let (status, _) = send(
        &app(),
        token_request(
            "grantType=password",
            &basic("clientId", "clientSecret"),
            "username=admin&password=123456",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn non_form_body_is_rejected_as_request_error() {
    let request = Request::post("/oauth/token?grant_type=password")
        .header(header::AUTHORIZATION, basic("clientId", "clientSecret"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"username":"admin","password":"123456"}"#))
        .unwrap();
    let (status, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid request token");
}

#[tokio::test]
async fn wrong_password_is_bad_request() {
    let (status, body) = send(
        &app(),
        token_request(
            "grant_type=password",
            &basic("clientId", "clientSecret"),
            "username=admin&password=WRONG",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid password");
}

#[tokio::test]
async fn wrong_client_secret_is_unauthorized() {
    let (status, body) = send(
        &app(),
        token_request(
            "grant_type=password",
            &basic("clientId", "nope"),
            "username=admin&password=123456",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid client message");
}

#[tokio::test]
async fn missing_client_is_unauthorized() {
    let request = Request::post("/oauth/token?grant_type=password")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid client message");
}

#[tokio::test]
async fn client_not_allowed_grant_type() {
    let (status, body) = send(
        &app(),
        token_request(
            "grant_type=client_credentials",
            &basic("clientId", "clientSecret"),
            "",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "no support operation: client_credentials");
}

#[tokio::test]
async fn check_token_resolves_context() {
    let app = app();
    let token = password_token(&app).await;
    let value = token["token_value"].as_str().unwrap();

    let request = Request::post(format!("/oauth/check_token?token={value}"))
        .header(header::AUTHORIZATION, basic("clientId", "clientSecret"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let context = &body["authorization_context"];
    assert_eq!(context["user"]["username"], "admin");
    assert_eq!(context["user"]["user_id"], 1);
    assert_eq!(context["client"]["client_id"], "clientId");
    assert!(context["user"].get("password").is_none());
    assert!(context["client"].get("client_secret").is_none());
}

#[tokio::test]
async fn check_token_rejects_garbage() {
    let request = Request::post("/oauth/check_token?token=garbage")
        .header(header::AUTHORIZATION, basic("clientId", "clientSecret"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().starts_with("malformed token"));
}

#[tokio::test]
async fn refresh_grant_issues_new_access_token() {
    let app = app();
    let token = password_token(&app).await;
    let refresh = token["refresh_token"]["token_value"].as_str().unwrap();

    let (status, body) = send(
        &app,
        token_request(
            "grant_type=refresh_token",
            &basic("clientId", "clientSecret"),
            &format!("refresh_token={refresh}"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_ne!(body["access_token"]["token_value"], token["token_value"]);
    assert_eq!(
        body["access_token"]["refresh_token"]["token_value"],
        token["refresh_token"]["token_value"]
    );
}

#[tokio::test]
async fn simple_requires_bearer_token() {
    let app = app();
    let (status, body) = send(&app, Request::get("/simple").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid request token");

    let token = password_token(&app).await;
    let request = Request::get("/simple")
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", token["token_value"].as_str().unwrap()),
        )
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["result"],
        "hello admin ,simple data, with simple authority"
    );
}
