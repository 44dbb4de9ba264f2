pub mod auth;
pub mod collections;
pub mod config;
pub mod db;
pub mod error;

use std::sync::Arc;
use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use auth::{CredentialService, Identity, IdentityGate, TokenConfig, TokenManager};
pub use collections::CollectionService;
pub use db::{Collection, MemoryStore, PgUserStore, User, UserStore};

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub store: Arc<dyn UserStore>,
    pub credentials: Arc<CredentialService>,
    pub identity: Arc<IdentityGate>,
    pub collections: Arc<CollectionService>,
}

impl AppState {
    pub async fn new(config: Settings) -> Result<Self> {
        let store = db::connect(&config.database).await?;
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Settings, store: Arc<dyn UserStore>) -> Self {
        let tokens = Arc::new(TokenManager::new(TokenConfig::from(&config.auth)));

        Self {
            credentials: Arc::new(CredentialService::new(store.clone(), tokens.clone())),
            identity: Arc::new(IdentityGate::new(tokens, store.clone())),
            collections: Arc::new(CollectionService::new(store.clone())),
            config: Arc::new(config),
            store,
        }
    }
}

// Malformed register/login bodies are reported like any other credential failure.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    actix_web::error::InternalError::from_response(
        err,
        HttpResponse::UnprocessableEntity().json(serde_json::json!({ "message": message })),
    )
    .into()
}

/// Register every route of the API.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/user")
                .route("/register", web::post().to(auth::handlers::register))
                .route("/login", web::post().to(auth::handlers::login))
                .route("/{collection}", web::get().to(collections::handlers::list))
                .route("/{collection}/{id}", web::put().to(collections::handlers::add))
                .route("/{collection}/{id}", web::delete().to(collections::handlers::remove)),
        );
}
