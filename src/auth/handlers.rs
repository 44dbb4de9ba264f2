use actix_web::{web, HttpResponse};
use serde::Serialize;
use tracing::{info, error};

use crate::auth::service::{Credentials, Registration};
use crate::error::CredentialError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

pub async fn register(
    req: web::Json<Registration>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, CredentialError> {
    info!("Received registration request for user: {}", req.username);
    match state.credentials.register(&req).await {
        Ok(message) => Ok(HttpResponse::Ok().json(MessageResponse { message })),
        Err(e) => {
            error!("Registration failed for user: {}: {}", req.username, e);
            Err(e.into())
        }
    }
}

pub async fn login(
    req: web::Json<Credentials>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, CredentialError> {
    info!("Received login request for user: {}", req.username);
    match state.credentials.login(&req).await {
        Ok(outcome) => {
            info!("Login successful for user: {}", req.username);
            Ok(HttpResponse::Ok().json(LoginResponse {
                message: outcome.message,
                token: outcome.token,
            }))
        }
        Err(e) => {
            error!("Login failed for user: {}: {}", req.username, e);
            Err(e.into())
        }
    }
}
