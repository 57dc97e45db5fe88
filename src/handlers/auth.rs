use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use mongodb::Database;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use validator::Validate;

use crate::config::Config;
use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::security::{jwt, password};
use crate::services::EmailService;
use crate::utils::images::{self, DEFAULT_AVATAR_URL};
use crate::utils::multipart::read_form;

// ============================================
// Request/Response Structs
// ============================================

#[derive(Debug, Validate)]
pub struct RegisterRequest {
    #[validate(length(max = 25, message = "must be at most 25 characters"))]
    pub name: String,

    #[validate(
        email(message = "must be a valid email"),
        length(max = 25, message = "must be at most 25 characters")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        email(message = "must be a valid email"),
        length(max = 25, message = "must be at most 25 characters")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user_name: String,
    pub user_avatar: String,
}

// ============================================
// Handler Functions
// ============================================

/// Register a new user
/// POST /api/v1/auth/register (multipart; optional `avatar` file part)
pub async fn register(
    db: web::Data<Database>,
    config: web::Data<Config>,
    email_service: web::Data<EmailService>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let mut form = read_form(&mut payload).await?;

    let request = RegisterRequest {
        name: form.required_text("name")?,
        email: form.required_text("email")?,
        password: form.required_text("password")?,
    };

    info!("[REGISTER] Request received - Email: {}", request.email);
    request.validate()?;

    let mut avatar = DEFAULT_AVATAR_URL.to_string();
    if let Some(image) = form.take_image("avatar") {
        images::validate_image(image.data.len(), &image.content_type)?;
        avatar = images::to_data_url(&image.content_type, &image.data);
        info!("[REGISTER] Avatar accepted - File: {}", image.filename);
    }

    if user_repo::find_by_email(&db, &request.email).await?.is_some() {
        warn!(
            "[REGISTER] Failed - User already exists with email: {}",
            request.email
        );
        return Err(AppError::BadRequest("User already exists".to_string()));
    }

    let password_hash = password::hash_password(&request.password)?;
    let user = user_repo::create_user(&db, &request.name, &request.email, &password_hash, &avatar)
        .await?;

    let token = jwt::generate_token(user.id, &config.jwt.secret, config.jwt.token_ttl_secs)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if email_service.is_configured() {
        let service = email_service.clone();
        let to_email = user.email.clone();
        let to_name = user.name.clone();
        tokio::task::spawn_blocking(move || match service.send_welcome_email(&to_email, &to_name) {
            Ok(()) => info!("[REGISTER] Welcome email sent to {}", to_email),
            Err(e) => warn!("[REGISTER] Welcome email failed - {}", e),
        });
    } else {
        debug!("[REGISTER] SMTP not configured, skipping welcome email");
    }

    info!("[REGISTER] Success - User ID: {}", user.id.to_hex());
    Ok(HttpResponse::Created().json(AuthResponse {
        success: true,
        message: "Registration successful".to_string(),
        token,
        user_name: user.name,
        user_avatar: user.avatar,
    }))
}

/// Log an existing user in
/// POST /api/v1/auth/login
pub async fn login(
    db: web::Data<Database>,
    config: web::Data<Config>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    info!("[LOGIN] Request received - Email: {}", request.email);
    request.validate()?;

    let user = match user_repo::find_by_email(&db, &request.email).await? {
        Some(user) => user,
        None => {
            warn!("[LOGIN] Failed - Invalid email: {}", request.email);
            return Err(AppError::BadRequest("Invalid credentials".to_string()));
        }
    };

    if !password::verify_password(&request.password, &user.password_hash)? {
        warn!(
            "[LOGIN] Failed - Incorrect password for email: {}",
            request.email
        );
        return Err(AppError::BadRequest("Invalid credentials".to_string()));
    }

    let token = jwt::generate_token(user.id, &config.jwt.secret, config.jwt.token_ttl_secs)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    info!("[LOGIN] Success - User ID: {}", user.id.to_hex());
    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        user_name: user.name,
        user_avatar: user.avatar,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_rejects_long_name() {
        let request = RegisterRequest {
            name: "x".repeat(26),
            email: "user@example.com".into(),
            password: "secret".into(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_login_request_rejects_bad_email() {
        let request = LoginRequest {
            email: "not-an-email".into(),
            password: "secret".into(),
        };
        assert!(request.validate().is_err());
    }
}
