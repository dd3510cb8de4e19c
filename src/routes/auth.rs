use crate::{
    auth::{AuthResponse, AuthService, LoginRequest, MessageResponse, RegisterRequest},
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Responds `201 Created` with a confirmation message. The account must then
/// log in to obtain a token.
#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    auth.register(&register_data.username, &register_data.password)
        .await?;

    Ok(HttpResponse::Created().json(MessageResponse {
        message: "User registered".to_string(),
    }))
}

/// Login user
///
/// Responds with `{"token": ...}` on success and `401` for any credential mismatch.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let token = auth
        .login(&login_data.username, &login_data.password)
        .await?;

    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}
