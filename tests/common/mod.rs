#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, App, Error};
use serde_json::{json, Value};
use taskapi::auth::MIN_BCRYPT_COST;
use taskapi::config::Config;
use taskapi::AppServices;

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some("integration-test-secret".to_string()),
        "BCRYPT_COST" => Some(MIN_BCRYPT_COST.to_string()),
        _ => None,
    })
    .expect("test config should be valid")
}

pub fn services() -> AppServices {
    AppServices::in_memory(&test_config())
}

pub async fn init_app(
    services: &AppServices,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    test::init_service(App::new().configure(|cfg| services.configure(cfg))).await
}

/// Sends a request and returns the status plus the body parsed as JSON (`Null` when empty).
pub async fn send(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
    req: Request,
) -> (StatusCode, Value) {
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| {
            panic!(
                "response body is not JSON: {:?}",
                String::from_utf8_lossy(&body)
            )
        })
    };
    (status, value)
}

pub async fn register(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
    username: &str,
    password: &str,
) -> (StatusCode, Value) {
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    send(app, req).await
}

pub async fn login(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
    username: &str,
    password: &str,
) -> (StatusCode, Value) {
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    send(app, req).await
}

pub async fn create_task(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
    payload: Value,
) -> (StatusCode, Value) {
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .set_json(payload)
        .to_request();
    send(app, req).await
}
