use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::TokenService;
use crate::error::AppError;

/// The subject of a valid bearer token on the current request.
///
/// Handlers that take this extractor reject requests without a valid
/// `Authorization: Bearer <token>` header. It needs a `web::Data<TokenService>`
/// registered on the app. The task routes do not use it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

impl AuthenticatedUser {
    pub fn username(&self) -> &str {
        &self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let tokens = req
        .app_data::<web::Data<TokenService>>()
        .ok_or_else(|| AppError::Internal("TokenService is not registered".into()))?;
    let token = bearer_token(req).ok_or(AppError::TokenInvalid)?;
    tokens.validate(token).map(AuthenticatedUser)
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError; // AppError converts through ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::{Duration, Utc};

    fn tokens() -> TokenService {
        TokenService::new(b"extractor-secret", Duration::hours(24))
    }

    async fn extract(req: HttpRequest) -> Result<AuthenticatedUser, ActixError> {
        let mut payload = Payload::None;
        AuthenticatedUser::from_request(&req, &mut payload).await
    }

    #[actix_rt::test]
    async fn test_authenticated_user_extractor_success() {
        let tokens = tokens();
        let token = tokens.issue("alice").unwrap();
        let req = test::TestRequest::default()
            .app_data(web::Data::new(tokens))
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        let user = extract(req).await.unwrap();
        assert_eq!(user.username(), "alice");
    }

    #[actix_rt::test]
    async fn test_missing_header_is_unauthorized() {
        let req = test::TestRequest::default()
            .app_data(web::Data::new(tokens()))
            .to_http_request();

        let err = extract(req).await.unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_expired_token_is_unauthorized() {
        let tokens = tokens();
        let token = tokens
            .issue_at("alice", Utc::now() - Duration::hours(30))
            .unwrap();
        let req = test::TestRequest::default()
            .app_data(web::Data::new(tokens))
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        let err = extract(req).await.unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_non_bearer_scheme_is_rejected() {
        let tokens = tokens();
        let token = tokens.issue("alice").unwrap();
        let req = test::TestRequest::default()
            .app_data(web::Data::new(tokens))
            .insert_header((header::AUTHORIZATION, format!("Basic {}", token)))
            .to_http_request();

        assert!(extract(req).await.is_err());
    }
}
